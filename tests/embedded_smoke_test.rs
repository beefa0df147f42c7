//! On-target checks for the acquisition core on xtensa/ESP32.
//! Exercises the ring, the record format and the consumer wakeup without SD hardware.

#![no_std]
#![no_main]

#[cfg(test)]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
    use embassy_time::{Duration, Timer};
    use pulselog::{config::MISSED_BEAT_SAMPLE, Acquisition, RateConverter};

    static READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    #[test]
    fn ring_keeps_arrival_order() {
        let acquisition = Acquisition::<8>::new();
        let mut consumer = acquisition.take_consumer().unwrap();
        acquisition.arm();

        for sample in [26_041, MISSED_BEAT_SAMPLE, 9_375] {
            acquisition.buffer().push(sample);
        }
        assert_eq!(consumer.pop(), Some(26_041));
        assert_eq!(consumer.pop(), Some(MISSED_BEAT_SAMPLE));
        assert_eq!(consumer.pop(), Some(9_375));
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn sentinel_renders_error_marker_with_target_floats() {
        let converter = RateConverter::default();
        let (_, record) = converter.record_for(MISSED_BEAT_SAMPLE);
        assert_eq!(record.as_bytes(), b"ERR\n");
        let (_, record) = converter.record_for(26_041);
        assert_eq!(record.as_bytes(), b" 72\n");
    }

    #[test]
    async fn wakeup_latches_until_awaited() {
        READY.signal(());
        Timer::after(Duration::from_millis(10)).await;
        READY.wait().await;
        assert!(!READY.signaled());
    }
}
