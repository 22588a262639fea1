use super::{Record, Recorder};
use anyhow::Result;

/// A recorder that ignores any record.
#[derive(Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _step: usize, _record: Record) -> Result<()> {
        Ok(())
    }
}
