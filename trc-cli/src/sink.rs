//! CSV output sink
//!
//! All tabular decisions live here: column order, the header row, and the
//! hex-digit widths of the identifier fields. The decoder emits structured
//! records and knows nothing about any of this.

use anyhow::Result;
use csv::Writer;
use std::io::Write;
use trc_decoder::NormalizedRecord;

/// Column headers, in output order
const HEADERS: [&str; 20] = [
    "Timestamp",
    "Direction",
    "CAN ID",
    "Priority",
    "Reserved",
    "Data Page",
    "PDU Format",
    "PDU Specific",
    "PGN",
    "Source Address",
    "Destination Address",
    "Data Length",
    "Data Field 1",
    "Data Field 2",
    "Data Field 3",
    "Data Field 4",
    "Data Field 5",
    "Data Field 6",
    "Data Field 7",
    "Data Field 8",
];

/// Writes normalized records as CSV rows
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer and emit the header row immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(HEADERS)?;
        Ok(CsvSink { writer })
    }

    /// Write one record as one CSV row.
    pub fn write_record(&mut self, record: &NormalizedRecord) -> Result<()> {
        let f = &record.fields;
        let mut row: Vec<String> = Vec::with_capacity(HEADERS.len());
        row.push(record.timestamp.clone());
        row.push(record.direction.to_string());
        row.push(record.can_id.clone());
        row.push(format!("{:02X}", f.priority));
        row.push(format!("{:01X}", f.reserved));
        row.push(format!("{:01X}", f.data_page));
        row.push(format!("{:02X}", f.pdu_format));
        row.push(format!("{:02X}", f.pdu_specific));
        row.push(format!("{:04X}", f.pgn));
        row.push(format!("{:02X}", f.source_address));
        // Renders as "All" for broadcast, two hex digits otherwise
        row.push(f.destination_address.to_string());
        row.push(record.byte_count.to_string());
        row.extend(record.data.iter().cloned());

        self.writer.write_record(&row)?;
        Ok(())
    }

    /// Flush buffered rows to the underlying writer.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
