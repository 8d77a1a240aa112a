pub mod csv_sink;
pub mod rows;
pub mod sink;

pub use csv_sink::{csv_file_sink, CsvRowWriter};
pub use rows::{DynamicsRow, EventRow, MotionRow};
pub use sink::{ChannelTelemetrySink, RowWriter, DEFAULT_CHANNEL_CAPACITY};
