//! Build-time acquisition parameters.

use crate::RawSample;

pub const TIMER_CLOCK_HZ: u32 = 8_000_000;
pub const CAPTURE_PRESCALE: u32 = 256;
pub const CAPTURE_TICK_HZ: u32 = TIMER_CLOCK_HZ / CAPTURE_PRESCALE;
pub const CAPTURE_TICK_US: u32 = 1_000_000 / CAPTURE_TICK_HZ;
/// Beats per minute for a one-tick interval.
pub const RATE_FACTOR: f32 = TIMER_CLOCK_HZ as f32 / CAPTURE_PRESCALE as f32 * 60.0;

pub const SAMPLE_BUFFER_CAPACITY: usize = 32;

pub const LOG_FILE_ATTEMPTS: u16 = 250;
pub const LOG_NAME_PREFIX: &str = "hlog";
pub const LOG_NAME_EXT: &str = "txt";
pub const LOG_NAME_MAX: usize = 12;
pub const LOG_RECORD_LEN: usize = 4;

pub const VALID_RATE_MIN_BPM: f32 = 40.0;
pub const VALID_RATE_MAX_BPM: f32 = 180.0;

/// The watchdog inspects the pulse-error flag once every this many ticks.
pub const WATCHDOG_DIVISOR: u16 = 31;
/// 1024 prescale over an 8-bit counter at `TIMER_CLOCK_HZ`.
pub const WATCHDOG_TICK_US: u64 = 1024 * 256 * 1_000_000 / TIMER_CLOCK_HZ as u64;
/// Full 16-bit span of the capture counter.
pub const CAPTURE_OVERFLOW_US: u64 = 65_536 * CAPTURE_TICK_US as u64;
pub const MISSED_BEAT_SAMPLE: RawSample = 27;

pub const ALERT_BEEP_MS: u64 = 100;

const _: () = assert!(SAMPLE_BUFFER_CAPACITY.is_power_of_two());
const _: () = assert!(CAPTURE_TICK_HZ * CAPTURE_TICK_US == 1_000_000);
