//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a set of named values. A [`Recorder`] writes records to a
//! destination, each tagged with a monotonic step index. Different streams of
//! metrics use different step indices: the training loop writes episode
//! statistics keyed by the episode counter and throughput keyed by the epoch.
//!
//! ```rust
//! use rollout_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode_reward", RecordValue::Scalar(-120.5));
//! record.insert("agent_actions", RecordValue::Histogram(vec![0.1, -0.4, 1.2]));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), -120.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
