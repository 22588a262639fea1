use super::Record;
use anyhow::Result;

/// Writes records to an output destination.
///
/// Any error writing a record is returned to the caller; the training loop
/// does not retry.
pub trait Recorder {
    /// Writes a record tagged with a step index.
    fn write(&mut self, step: usize, record: Record) -> Result<()>;

    /// Flushes buffered output, if any.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
