use std::fs::{self, File};
use std::path::Path;

use crate::error::FareError;

/// Create (or truncate) the output file, creating missing parent directories.
pub(crate) fn create_output_file(path: impl AsRef<Path>) -> Result<File, FareError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
