use super::{Record, Recorder};
use anyhow::Result;

/// Keeps records in memory.
///
/// Useful for inspecting what the training loop emitted.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records with their steps.
    pub fn iter(&self) -> std::slice::Iter<(usize, Record)> {
        self.buf.iter()
    }

    /// Returns `(step, value)` pairs of the scalar named `key`, in write order.
    pub fn scalars(&self, key: &str) -> Vec<(usize, f32)> {
        self.buf
            .iter()
            .filter_map(|(step, record)| record.get_scalar(key).ok().map(|v| (*step, v)))
            .collect()
    }

    /// Returns `(step, values)` pairs of the histogram named `key`, in write order.
    pub fn histograms(&self, key: &str) -> Vec<(usize, Vec<f32>)> {
        self.buf
            .iter()
            .filter_map(|(step, record)| record.get_histogram(key).ok().map(|v| (*step, v)))
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, step: usize, record: Record) -> Result<()> {
        self.buf.push((step, record));
        Ok(())
    }
}
