use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Default)]
pub struct Counters {
    records_written: AtomicU32,
    missed_beats: AtomicU32,
    implausible_rates: AtomicU32,
    samples_lost: AtomicU32,
    timer_faults: AtomicU32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub records_written: u32,
    pub missed_beats: u32,
    pub implausible_rates: u32,
    pub samples_lost: u32,
    pub timer_faults: u32,
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU32::new(0),
            missed_beats: AtomicU32::new(0),
            implausible_rates: AtomicU32::new(0),
            samples_lost: AtomicU32::new(0),
            timer_faults: AtomicU32::new(0),
        }
    }

    pub fn record_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missed_beat(&self) {
        self.missed_beats.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_implausible_rate(&self) {
        self.implausible_rates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_samples_lost(&self, lost: u32) {
        self.samples_lost.fetch_add(lost, Ordering::Relaxed);
    }

    pub fn record_timer_fault(&self) {
        self.timer_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            records_written: self.records_written.load(Ordering::Relaxed),
            missed_beats: self.missed_beats.load(Ordering::Relaxed),
            implausible_rates: self.implausible_rates.load(Ordering::Relaxed),
            samples_lost: self.samples_lost.load(Ordering::Relaxed),
            timer_faults: self.timer_faults.load(Ordering::Relaxed),
        }
    }
}
