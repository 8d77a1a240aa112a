//! Back-pressured telemetry sink (C10, §4.10): a bounded `flume` channel
//! feeding a dedicated writer thread, non-blocking on the producer side.
//! Shaped after the teacher's channel-backed `TelemetrySender`/
//! `TelemetryReceiver` split (`telemetry/service.rs`), but using `flume`
//! directly rather than the teacher's bespoke `ringchannel`: the teacher
//! already depends on `flume` for its own cross-thread signaling, and a
//! bounded MPSC with try-send is exactly what `flume::bounded` gives for
//! free.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::EngineError;

/// Rows are dropped rather than blocking the simulation step once this
/// many are queued and unconsumed (§4.10).
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

pub trait RowWriter<Row>: Send {
    fn write_row(&mut self, row: &Row) -> Result<(), EngineError>;
    fn flush(&mut self) -> Result<(), EngineError>;
}

pub struct ChannelTelemetrySink<Row> {
    name: String,
    sender: Option<flume::Sender<Row>>,
    worker: Option<JoinHandle<()>>,
    dropped: Arc<AtomicU64>,
}

impl<Row: Send + 'static> ChannelTelemetrySink<Row> {
    pub fn new(name: impl Into<String>) -> Self {
        ChannelTelemetrySink {
            name: name.into(),
            sender: None,
            worker: None,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Start the background writer thread, consuming rows until `stop` is
    /// called or every sender is dropped.
    pub fn start(&mut self, mut writer: Box<dyn RowWriter<Row>>) -> Result<(), EngineError> {
        if self.sender.is_some() {
            return Err(EngineError::SinkAlreadyStarted(self.name.clone()));
        }

        let (tx, rx) = flume::bounded::<Row>(DEFAULT_CHANNEL_CAPACITY);
        let name = self.name.clone();

        let handle = std::thread::Builder::new()
            .name(format!("telemetry-{name}"))
            .spawn(move || {
                for row in rx.iter() {
                    if let Err(e) = writer.write_row(&row) {
                        log::error!("telemetry sink '{name}' failed to write row: {e}");
                    }
                }
                if let Err(e) = writer.flush() {
                    log::error!("telemetry sink '{name}' failed to flush on shutdown: {e}");
                }
            })
            .map_err(|e| EngineError::SinkUnavailable(self.name.clone(), e.to_string()))?;

        self.sender = Some(tx);
        self.worker = Some(handle);
        Ok(())
    }

    /// Non-blocking emit: drops the row and logs a warning (at most once
    /// per 100 consecutive drops) if the channel is full (§4.10).
    pub fn emit(&self, row: Row) -> Result<(), EngineError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| EngineError::SinkUnavailable(self.name.clone(), "not started".into()))?;

        match sender.try_send(row) {
            Ok(()) => Ok(()),
            Err(flume::TrySendError::Full(_)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if total % 100 == 0 {
                    log::warn!(
                        "telemetry sink '{}' has dropped {} rows (queue full)",
                        self.name,
                        total
                    );
                }
                Ok(())
            }
            Err(flume::TrySendError::Disconnected(_)) => Err(EngineError::SinkUnavailable(
                self.name.clone(),
                "writer thread is gone".into(),
            )),
        }
    }

    /// Close the channel and join the writer thread, flushing any
    /// buffered rows. Idempotent.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.sender.take();
        if let Some(handle) = self.worker.take() {
            handle
                .join()
                .map_err(|_| EngineError::SinkUnavailable(self.name.clone(), "writer thread panicked".into()))?;
        }
        Ok(())
    }
}

impl<Row> Drop for ChannelTelemetrySink<Row> {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingWriter {
        rows: Arc<Mutex<Vec<i32>>>,
    }

    impl RowWriter<i32> for CollectingWriter {
        fn write_row(&mut self, row: &i32) -> Result<(), EngineError> {
            self.rows.lock().unwrap().push(*row);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn starting_twice_fails() {
        let rows = Arc::new(Mutex::new(Vec::new()));
        let mut sink = ChannelTelemetrySink::<i32>::new("test");
        sink.start(Box::new(CollectingWriter { rows: rows.clone() }))
            .unwrap();
        let err = sink
            .start(Box::new(CollectingWriter { rows: rows.clone() }))
            .unwrap_err();
        assert!(matches!(err, EngineError::SinkAlreadyStarted(_)));
        sink.stop().unwrap();
    }

    #[test]
    fn emitted_rows_reach_the_writer() {
        let rows = Arc::new(Mutex::new(Vec::new()));
        let mut sink = ChannelTelemetrySink::<i32>::new("test");
        sink.start(Box::new(CollectingWriter { rows: rows.clone() }))
            .unwrap();
        for i in 0..10 {
            sink.emit(i).unwrap();
        }
        sink.stop().unwrap();
        assert_eq!(*rows.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn emit_before_start_is_unavailable() {
        let sink = ChannelTelemetrySink::<i32>::new("test");
        assert!(matches!(
            sink.emit(1),
            Err(EngineError::SinkUnavailable(_, _))
        ));
    }
}
