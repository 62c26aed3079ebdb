use std::fs::File;
use std::io::{BufWriter, Write};

use fare_core::FareEstimate;

use crate::error::FareError;

pub(crate) fn export_to_json_impl(estimates: &[FareEstimate], file: File) -> Result<(), FareError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, estimates)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
