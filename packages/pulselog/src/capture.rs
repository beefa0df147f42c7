//! Interrupt-side producers: pulse capture, capture-overflow flagging and the
//! missed-beat watchdog, all operating on one shared [`Acquisition`] context.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::{
    buffer::{Consumer, SampleBuffer},
    config::{CAPTURE_TICK_US, MISSED_BEAT_SAMPLE, SAMPLE_BUFFER_CAPACITY, WATCHDOG_DIVISOR},
    health::HealthState,
    telemetry::Counters,
    RawSample,
};

/// A periodic timer could not be restarted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFault;

/// Hardware timers behind the capture path.
pub trait TimeBase {
    /// Reads the free-running capture counter and restarts it from zero.
    fn latch_capture(&mut self) -> RawSample;
    /// Restarts the capture-overflow period and the current watchdog period.
    fn restart_timers(&mut self) -> Result<(), TimerFault>;
}

/// Converts elapsed microseconds to capture ticks, saturating at the
/// counter's 16-bit range.
pub fn ticks_from_micros(elapsed_us: u64) -> RawSample {
    let ticks = elapsed_us / CAPTURE_TICK_US as u64;
    ticks.min(RawSample::MAX as u64) as RawSample
}

/// Process-lifetime state shared between interrupt handlers and the consumer.
pub struct Acquisition<const N: usize = SAMPLE_BUFFER_CAPACITY> {
    buffer: SampleBuffer<N>,
    health: HealthState,
    counters: Counters,
    watchdog_ticks: AtomicU16,
    armed: AtomicBool,
}

impl<const N: usize> Acquisition<N> {
    pub const fn new() -> Self {
        Self {
            buffer: SampleBuffer::new(),
            health: HealthState::new(),
            counters: Counters::new(),
            watchdog_ticks: AtomicU16::new(0),
            armed: AtomicBool::new(false),
        }
    }

    pub fn buffer(&self) -> &SampleBuffer<N> {
        &self.buffer
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn take_consumer(&self) -> Option<Consumer<'_, N>> {
        self.buffer.take_consumer()
    }

    /// Lets the handlers produce. Called once provisioning has succeeded.
    pub fn arm(&self) {
        self.watchdog_ticks.store(0, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    /// One-way stop: handlers become no-ops.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Rising edge on the sensor line.
    ///
    /// A timer that fails to restart leaves the pulse error latched and
    /// raises an alert, since missed-beat detection can no longer be trusted.
    pub fn on_pulse_edge<T: TimeBase>(&self, time_base: &mut T) {
        if !self.is_armed() {
            return;
        }
        let interval = time_base.latch_capture();
        self.buffer.push(interval);
        match time_base.restart_timers() {
            Ok(()) => self.health.clear_pulse_error(),
            Err(TimerFault) => {
                self.health.latch_pulse_error();
                self.health.raise_alert();
                self.counters.record_timer_fault();
            }
        }
    }

    /// The capture counter ran a full period without an edge.
    pub fn on_capture_overflow(&self) {
        if !self.is_armed() {
            return;
        }
        self.health.latch_pulse_error();
    }

    /// Periodic watchdog tick. Acts on every `WATCHDOG_DIVISOR`-th tick only.
    ///
    /// Returns `true` when a missed-beat sample was injected.
    pub fn on_watchdog_tick(&self) -> bool {
        if !self.is_armed() {
            return false;
        }
        let ticks = self.watchdog_ticks.load(Ordering::Relaxed) + 1;
        if ticks < WATCHDOG_DIVISOR {
            self.watchdog_ticks.store(ticks, Ordering::Relaxed);
            return false;
        }
        self.watchdog_ticks.store(0, Ordering::Relaxed);

        if !self.health.pulse_error() {
            return false;
        }
        self.buffer.push(MISSED_BEAT_SAMPLE);
        self.health.raise_alert();
        self.counters.record_missed_beat();
        true
    }
}

impl<const N: usize> Default for Acquisition<N> {
    fn default() -> Self {
        Self::new()
    }
}
