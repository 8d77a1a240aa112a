//! CSV-backed telemetry writer (§6): one `csv::Writer` per sink, auto
//! deriving the header row from a row struct's field names via `serde`.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::EngineError;
use crate::telemetry::sink::{ChannelTelemetrySink, RowWriter};

pub struct CsvRowWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRowWriter<W> {
    pub fn new(inner: W) -> Self {
        CsvRowWriter {
            writer: csv::Writer::from_writer(inner),
        }
    }
}

impl<W: Write + Send, Row: Serialize> RowWriter<Row> for CsvRowWriter<W> {
    fn write_row(&mut self, row: &Row) -> Result<(), EngineError> {
        self.writer
            .serialize(row)
            .map_err(|e| EngineError::SinkUnavailable("csv".into(), e.to_string()))
    }

    fn flush(&mut self) -> Result<(), EngineError> {
        self.writer
            .flush()
            .map_err(|e| EngineError::SinkUnavailable("csv".into(), e.to_string()))
    }
}

/// Build and start a `ChannelTelemetrySink` writing CSV rows to `path`.
pub fn csv_file_sink<Row: Serialize + Send + 'static>(
    name: impl Into<String>,
    path: impl AsRef<Path>,
) -> Result<ChannelTelemetrySink<Row>, EngineError> {
    let name = name.into();
    let file = File::create(path.as_ref())
        .map_err(|e| EngineError::SinkUnavailable(name.clone(), e.to_string()))?;
    let writer = CsvRowWriter::new(BufWriter::new(file));

    let mut sink = ChannelTelemetrySink::new(name);
    sink.start(Box::new(writer))?;
    Ok(sink)
}
