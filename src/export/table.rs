//! Delimited-text export of one result set

use std::io::Write;

use crate::error::Result;
use crate::simulation::MonthlySummary;

pub const CSV_HEADER: [&str; 3] = ["Month", "Avg Rate (%)", "Outright"];

/// Write `Month, Avg Rate (%), Outright` rows
pub fn write_csv<W: Write>(results: &[MonthlySummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for row in results {
        csv_writer.write_record([
            row.month.clone(),
            format_value(row.avg_rate),
            format_value(row.outright),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// CSV document as bytes
pub fn csv_bytes(results: &[MonthlySummary]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(results, &mut buffer)?;
    Ok(buffer)
}

/// Shortest round-trip form, always with a decimal point ("5.0", "94.7742")
pub(crate) fn format_value(value: f64) -> String {
    format!("{:?}", value)
}
