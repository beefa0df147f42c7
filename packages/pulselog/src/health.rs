use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Device health flags shared by every execution context.
///
/// Flags start in the failed position: storage is unhealthy until a file is
/// provisioned and the pulse-error flag stays latched until the first edge.
pub struct HealthState {
    storage_ok: AtomicBool,
    pulse_ok: AtomicBool,
    pulse_error: AtomicBool,
    pending_alerts: AtomicU8,
}

impl HealthState {
    pub const fn new() -> Self {
        Self {
            storage_ok: AtomicBool::new(false),
            pulse_ok: AtomicBool::new(false),
            pulse_error: AtomicBool::new(true),
            pending_alerts: AtomicU8::new(0),
        }
    }

    pub fn storage_ok(&self) -> bool {
        self.storage_ok.load(Ordering::Acquire)
    }

    pub fn set_storage_ok(&self, ok: bool) {
        self.storage_ok.store(ok, Ordering::Release);
    }

    pub fn pulse_ok(&self) -> bool {
        self.pulse_ok.load(Ordering::Acquire)
    }

    pub fn set_pulse_ok(&self, ok: bool) {
        self.pulse_ok.store(ok, Ordering::Release);
    }

    pub fn pulse_error(&self) -> bool {
        self.pulse_error.load(Ordering::Acquire)
    }

    pub fn latch_pulse_error(&self) {
        self.pulse_error.store(true, Ordering::Release);
    }

    pub fn clear_pulse_error(&self) {
        self.pulse_error.store(false, Ordering::Release);
    }

    /// Queues one audible alert. Saturates rather than wrapping.
    pub fn raise_alert(&self) {
        let _ = self
            .pending_alerts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1));
    }

    /// Dequeues one alert, returning whether there was one to play.
    pub fn take_alert(&self) -> bool {
        self.pending_alerts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn pending_alerts(&self) -> u8 {
        self.pending_alerts.load(Ordering::Acquire)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
