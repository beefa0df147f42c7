//! Interval-to-rate conversion and the fixed-width log record.

use core::fmt;

use crate::{
    config::{LOG_RECORD_LEN, RATE_FACTOR, VALID_RATE_MAX_BPM, VALID_RATE_MIN_BPM},
    RawSample,
};

const ERROR_MARKER: [u8; 3] = *b"ERR";
/// Digits that render as `ERR`. The missed-beat sentinel lands here once the
/// rate is cut to 16 bits (27 ticks -> 69444 bpm -> 3908), and so does any
/// genuine truncated rate ending in 908. Both cases stay indistinguishable in
/// the log; existing log readers depend on it.
const ERROR_DIGITS: [u8; 3] = *b"908";

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct HeartRate(f32);

impl HeartRate {
    pub const fn from_bpm(bpm: f32) -> Self {
        Self(bpm)
    }

    pub const fn bpm(self) -> f32 {
        self.0
    }

    /// Inside the physiologically valid window, bounds included.
    pub fn is_plausible(self) -> bool {
        (VALID_RATE_MIN_BPM..=VALID_RATE_MAX_BPM).contains(&self.0)
    }
}

/// One persisted entry: three characters and a line break.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LogRecord([u8; LOG_RECORD_LEN]);

impl LogRecord {
    pub const fn as_bytes(&self) -> &[u8; LOG_RECORD_LEN] {
        &self.0
    }

    /// The three display characters, without the line break.
    pub fn text(&self) -> &str {
        // Only ASCII digits, spaces and the error marker are ever stored.
        core::str::from_utf8(&self.0[..LOG_RECORD_LEN - 1]).unwrap_or("???")
    }

    pub fn is_error_marker(&self) -> bool {
        self.0[..3] == ERROR_MARKER
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogRecord({:?})", self.text())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RateConverter {
    factor: f32,
}

impl RateConverter {
    pub const fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// `factor / sample`. A zero interval yields an infinite rate.
    pub fn to_rate(&self, sample: RawSample) -> HeartRate {
        HeartRate(self.factor / sample as f32)
    }

    /// Right-justified three-digit rendering of the truncated rate.
    ///
    /// The rate is truncated toward zero and narrowed to 16 bits with
    /// wrap-around, then only the last three decimal digits are kept. Leading
    /// zeros in the hundreds and tens position become spaces.
    pub fn format(rate: HeartRate) -> LogRecord {
        let mut value = rate.bpm() as u32 as u16;
        let mut text = [0u8; LOG_RECORD_LEN];
        for slot in text[..3].iter_mut().rev() {
            *slot = b'0' + (value % 10) as u8;
            value /= 10;
        }

        if text[0] == b'0' {
            text[0] = b' ';
            if text[1] == b'0' {
                text[1] = b' ';
            }
        }

        if text[..3] == ERROR_DIGITS {
            text[..3].copy_from_slice(&ERROR_MARKER);
        }
        text[3] = b'\n';
        LogRecord(text)
    }

    pub fn record_for(&self, sample: RawSample) -> (HeartRate, LogRecord) {
        let rate = self.to_rate(sample);
        (rate, Self::format(rate))
    }
}

impl Default for RateConverter {
    fn default() -> Self {
        Self::new(RATE_FACTOR)
    }
}
