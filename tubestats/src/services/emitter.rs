use csv::{QuoteStyle, Writer, WriterBuilder};
use std::io::Write;

use crate::error::Result;
use crate::models::OutputRecord;

/// Sink for a finished record set.
pub trait RecordEmitter {
    fn emit(&mut self, records: &[OutputRecord]) -> Result<()>;
}

/// Writes the header row followed by one CSV row per record.
pub struct CsvEmitter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvEmitter<W> {
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b',')
            .quote(b'"')
            .quote_style(QuoteStyle::Necessary)
            .from_writer(inner);
        CsvEmitter { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::StatsError::Io(e.into_error()))
    }
}

impl<W: Write> RecordEmitter for CsvEmitter<W> {
    fn emit(&mut self, records: &[OutputRecord]) -> Result<()> {
        self.writer.write_record(OutputRecord::HEADER)?;
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
