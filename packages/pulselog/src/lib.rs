#![cfg_attr(not(test), no_std)]

pub mod buffer;
pub mod capture;
pub mod config;
pub mod console;
pub mod health;
pub mod pipeline;
pub mod rate;
pub mod session;
pub mod status;
pub mod storage;
pub mod telemetry;
#[cfg(test)]
mod testing;

pub use buffer::{Consumer, SampleBuffer};
pub use capture::{ticks_from_micros, Acquisition, TimeBase, TimerFault};
pub use console::{Console, Transport};
pub use health::HealthState;
pub use pipeline::{Recorder, StartupError, Step};
pub use rate::{HeartRate, LogRecord, RateConverter};
pub use session::{AppendError, LogWriter, ProvisionError, SessionPhase};
pub use status::{StatusIndicators, StatusLine, StatusOutputs};
pub use storage::{CreateError, LogStorage};
pub use telemetry::{Counters, CountersSnapshot};

/// Interval between two pulse edges in capture ticks, or the missed-beat sentinel.
pub type RawSample = u16;
