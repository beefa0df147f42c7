use embassy_time::{Duration, Ticker, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{delay::Delay, gpio::Output, spi::master::Spi, Blocking};
use hrlogger::platform::{SdLogStorage, StatusPins, UartTransport};
use pulselog::{config::ALERT_BEEP_MS, Recorder, StatusIndicators, StatusLine, Step};

use super::{
    config::STATUS_REFRESH_MS,
    interrupts::{self, ACQUISITION, SAMPLE_READY},
};

pub(crate) type SdDevice = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;
pub(crate) type BoardStorage = SdLogStorage<SdDevice, Delay>;
pub(crate) type BoardRecorder = Recorder<'static, BoardStorage, UartTransport<'static>>;
pub(crate) type BoardIndicators = StatusIndicators<StatusPins<'static>>;

#[embassy_executor::task]
pub(crate) async fn recorder_task(mut recorder: BoardRecorder) {
    // Samples pushed before the first wait are picked up by this drain.
    while recorder.drain() != Step::Stopped {
        SAMPLE_READY.wait().await;
    }

    interrupts::release();
    let counters = ACQUISITION.counters().snapshot();
    log::error!(
        "logging stopped: written={} missed_beats={} implausible={} lost={} timer_faults={}",
        counters.records_written,
        counters.missed_beats,
        counters.implausible_rates,
        counters.samples_lost,
        counters.timer_faults
    );
}

#[embassy_executor::task]
pub(crate) async fn status_task(mut indicators: BoardIndicators) {
    let health = ACQUISITION.health();
    let mut ticker = Ticker::every(Duration::from_millis(STATUS_REFRESH_MS));

    loop {
        indicators.refresh(health);
        if health.take_alert() {
            indicators.set(StatusLine::Buzzer, true);
            Timer::after(Duration::from_millis(ALERT_BEEP_MS)).await;
            indicators.set(StatusLine::Buzzer, false);
        }
        ticker.next().await;
    }
}
