#![allow(dead_code)]

pub mod rides;
