//! Ping input: headerless CSV rows of `ride_id,lat,lng,timestamp`.

use std::fs::File;
use std::io;
use std::path::Path;

use fare_core::Ping;

use crate::error::FareError;

/// Pings decoded from CSV records, one per row, in input order.
pub struct PingRecords<R> {
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: io::Read> Iterator for PingRecords<R> {
    type Item = Result<Ping, FareError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(FareError::Csv(err))),
        };
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let fields: Vec<&str> = record.iter().collect();
        Some(
            Ping::from_fields(fields.as_slice())
                .map_err(|source| FareError::MalformedRecord { line, source }),
        )
    }
}

/// Decode pings from any reader.
///
/// Rows may have any number of columns at the CSV level so that a short or
/// long row surfaces as a malformed record with its line number.
pub fn read_pings<R: io::Read>(reader: R) -> PingRecords<R> {
    let records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records();
    PingRecords { records }
}

pub fn open_pings(path: impl AsRef<Path>) -> Result<PingRecords<File>, FareError> {
    Ok(read_pings(File::open(path)?))
}
