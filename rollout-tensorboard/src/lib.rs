//! Recorder writing TFRecord event files readable by tensorboard.
use anyhow::{bail, Result};
use log::trace;
use rollout_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

const N_BUCKETS: usize = 30;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] failing on values it cannot write.
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            ignore_unsupported_value: false,
        }
    }

    fn add_histogram(&mut self, tag: &str, values: &[f32], step: usize) {
        match Histogram::new(values, N_BUCKETS) {
            Some(h) => self.writer.add_histogram_raw(
                tag,
                h.min,
                h.max,
                h.num,
                h.sum,
                h.sum_squares,
                &h.bucket_limits,
                &h.bucket_counts,
                step,
            ),
            None => trace!("Skip empty histogram {}", tag),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Scalars and histograms are written under their keys. The elements of
    /// [`RecordValue::Array1`] are written as scalars `key/0`, `key/1`, and so on.
    /// Strings are not supported.
    fn write(&mut self, step: usize, record: Record) -> Result<()> {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::Histogram(values) => self.add_histogram(k, values, step),
                RecordValue::Array1(values) => {
                    for (i, v) in values.iter().enumerate() {
                        self.writer.add_scalar(&format!("{}/{}", k, i), *v, step);
                    }
                }
                RecordValue::String(_) => {
                    if !self.ignore_unsupported_value {
                        bail!("Unsupported value: {:?}", (k, v));
                    }
                }
            };
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush();
        Ok(())
    }
}

/// Summary of samples in equal-width buckets.
#[derive(Debug, PartialEq)]
struct Histogram {
    min: f64,
    max: f64,
    num: f64,
    sum: f64,
    sum_squares: f64,

    /// Right edges of the buckets.
    bucket_limits: Vec<f64>,
    bucket_counts: Vec<f64>,
}

impl Histogram {
    /// Returns `None` for an empty set of samples.
    fn new(values: &[f32], n_buckets: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let values = values.iter().map(|v| *v as f64).collect::<Vec<_>>();
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        let max = values.iter().copied().fold(f64::MIN, f64::max);

        // All samples fall in a single bucket when they are equal.
        let n_buckets = if max > min { n_buckets.max(1) } else { 1 };
        let width = (max - min) / n_buckets as f64;
        let bucket_limits = (1..=n_buckets)
            .map(|i| if i == n_buckets { max } else { min + width * i as f64 })
            .collect::<Vec<_>>();

        let mut bucket_counts = vec![0.0; n_buckets];
        for v in values.iter() {
            let i = if width > 0.0 {
                (((v - min) / width) as usize).min(n_buckets - 1)
            } else {
                0
            };
            bucket_counts[i] += 1.0;
        }

        Some(Self {
            min,
            max,
            num: values.len() as f64,
            sum: values.iter().sum(),
            sum_squares: values.iter().map(|v| v * v).sum(),
            bucket_limits,
            bucket_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_histogram_buckets() {
        let h = Histogram::new(&[0.0, 1.0, 1.0, 4.0], 4).unwrap();
        assert_eq!(h.min, 0.0);
        assert_eq!(h.max, 4.0);
        assert_eq!(h.num, 4.0);
        assert_eq!(h.sum, 6.0);
        assert_eq!(h.sum_squares, 18.0);
        assert_eq!(h.bucket_limits, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.bucket_counts, vec![1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_histogram_of_equal_values() {
        let h = Histogram::new(&[2.0, 2.0], 30).unwrap();
        assert_eq!(h.bucket_limits, vec![2.0]);
        assert_eq!(h.bucket_counts, vec![2.0]);
        assert!(Histogram::new(&[], 30).is_none());
    }

    #[test]
    fn test_write_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir.path());
        let mut record = Record::from_scalar("episode_reward", -150.0);
        record.insert("agent_actions", RecordValue::Histogram(vec![-1.0, 0.5, 2.0]));
        record.insert("note", RecordValue::String("ignored".to_string()));
        recorder.write(1, record)?;
        recorder.flush()?;
        assert!(std::fs::read_dir(dir.path())?.count() > 0);
        Ok(())
    }

    #[test]
    fn test_unsupported_value() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new_with_check_unsupported_value(dir.path());
        let record = Record::from_slice(&[("note", RecordValue::String("text".to_string()))]);
        assert!(recorder.write(1, record).is_err());
        Ok(())
    }
}
