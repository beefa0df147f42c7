use core::cell::RefCell;

use critical_section::Mutex;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use esp_hal::{
    gpio::{Event, Input},
    handler,
    time::{Duration, Instant},
    timer::PeriodicTimer,
    Blocking,
};
use pulselog::{
    config::{CAPTURE_OVERFLOW_US, WATCHDOG_TICK_US},
    ticks_from_micros, Acquisition, RawSample, TimeBase, TimerFault,
};

pub(crate) static ACQUISITION: Acquisition = Acquisition::new();
/// Raised by producers after a push; the recorder task drains on wake.
pub(crate) static SAMPLE_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static CAPTURE: Mutex<RefCell<Option<CaptureHw>>> = Mutex::new(RefCell::new(None));

/// Sensor edge input plus the two periodic timers behind the capture path.
/// The capture counter is emulated by the time since the previous edge.
pub(crate) struct CaptureHw {
    sensor: Input<'static>,
    watchdog: PeriodicTimer<'static, Blocking>,
    overflow: PeriodicTimer<'static, Blocking>,
    last_edge: Instant,
}

impl CaptureHw {
    pub(crate) fn new(
        sensor: Input<'static>,
        watchdog: PeriodicTimer<'static, Blocking>,
        overflow: PeriodicTimer<'static, Blocking>,
    ) -> Self {
        Self {
            sensor,
            watchdog,
            overflow,
            last_edge: Instant::now(),
        }
    }
}

impl TimeBase for CaptureHw {
    fn latch_capture(&mut self) -> RawSample {
        let now = Instant::now();
        let elapsed = now - self.last_edge;
        self.last_edge = now;
        ticks_from_micros(elapsed.as_micros())
    }

    fn restart_timers(&mut self) -> Result<(), TimerFault> {
        self.overflow
            .start(Duration::from_micros(CAPTURE_OVERFLOW_US))
            .map_err(|_| TimerFault)?;
        self.watchdog
            .start(Duration::from_micros(WATCHDOG_TICK_US))
            .map_err(|_| TimerFault)
    }
}

/// Starts both timers and listens on all three sources. Call only once the
/// acquisition context is armed.
pub(crate) fn listen(mut hw: CaptureHw) {
    hw.watchdog.set_interrupt_handler(watchdog_handler);
    hw.overflow.set_interrupt_handler(overflow_handler);

    critical_section::with(|cs| {
        hw.last_edge = Instant::now();
        if hw.restart_timers().is_err() {
            log::error!("capture timers failed to start");
            ACQUISITION.health().latch_pulse_error();
        }
        hw.watchdog.listen();
        hw.overflow.listen();
        hw.sensor.listen(Event::RisingEdge);
        CAPTURE.borrow_ref_mut(cs).replace(hw);
    });
}

/// Disarms the context and stops every source for good.
pub(crate) fn release() {
    ACQUISITION.disarm();
    critical_section::with(|cs| {
        if let Some(mut hw) = CAPTURE.borrow_ref_mut(cs).take() {
            hw.sensor.unlisten();
            hw.watchdog.unlisten();
            hw.overflow.unlisten();
        }
    });
}

#[handler]
pub(crate) fn pulse_edge_handler() {
    let pushed = critical_section::with(|cs| {
        let mut capture = CAPTURE.borrow_ref_mut(cs);
        let Some(hw) = capture.as_mut() else {
            return false;
        };
        if !hw.sensor.is_interrupt_set() {
            return false;
        }
        hw.sensor.clear_interrupt();
        ACQUISITION.on_pulse_edge(hw);
        ACQUISITION.is_armed()
    });
    if pushed {
        SAMPLE_READY.signal(());
    }
}

#[handler]
fn watchdog_handler() {
    let injected = critical_section::with(|cs| {
        if let Some(hw) = CAPTURE.borrow_ref_mut(cs).as_mut() {
            hw.watchdog.clear_interrupt();
        }
        ACQUISITION.on_watchdog_tick()
    });
    if injected {
        SAMPLE_READY.signal(());
    }
}

#[handler]
fn overflow_handler() {
    critical_section::with(|cs| {
        if let Some(hw) = CAPTURE.borrow_ref_mut(cs).as_mut() {
            hw.overflow.clear_interrupt();
        }
        ACQUISITION.on_capture_overflow();
    });
}
