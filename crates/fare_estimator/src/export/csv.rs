use std::io::Write;

use fare_core::FareEstimate;

use crate::error::FareError;

pub(crate) fn export_to_csv_impl<W: Write>(
    estimates: &[FareEstimate],
    writer: W,
) -> Result<(), FareError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for estimate in estimates {
        wtr.write_record([estimate.ride_id.to_string(), estimate.fare_text()])?;
    }

    wtr.flush()?;
    Ok(())
}
