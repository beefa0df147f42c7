use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    delay::Delay,
    gpio::{Input, InputConfig, Io, Level, Output, OutputConfig},
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode as SpiMode,
    },
    time::Rate,
    timer::{timg::TimerGroup, PeriodicTimer},
    uart::{Config as UartConfig, Uart},
};
use esp_rtos::embassy::Executor;
use hrlogger::platform::{SdLogStorage, StatusPins, UartTransport};
use pulselog::{Recorder, StatusIndicators, StatusLine};
use static_cell::StaticCell;

use super::{
    config::{LOG_LEVEL, SD_SPI_KHZ, UART_BAUD},
    interrupts::{self, CaptureHw, ACQUISITION},
    tasks::{self, BoardIndicators},
};

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

pub fn run() -> ! {
    esp_println::logger::init_logger(LOG_LEVEL);
    esp_println::println!("hrlogger {}", env!("CARGO_PKG_VERSION"));
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let mut indicators: BoardIndicators = StatusIndicators::new(StatusPins::new(
        Output::new(peripherals.GPIO25, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO26, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO27, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO32, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO33, Level::Low, OutputConfig::default()),
    ));
    indicators.set(StatusLine::Power, true);
    indicators.set(StatusLine::Buzzer, false);
    indicators.refresh(ACQUISITION.health());

    let uart_cfg = UartConfig::default().with_baudrate(UART_BAUD);
    let uart = Uart::new(peripherals.UART0, uart_cfg)
        .expect("failed to init UART0")
        .with_rx(peripherals.GPIO3)
        .with_tx(peripherals.GPIO1);
    let console = UartTransport::new(uart);

    let sd_spi_cfg = SpiConfig::default()
        .with_frequency(Rate::from_khz(SD_SPI_KHZ))
        .with_mode(SpiMode::_0);
    let sd_spi = Spi::new(peripherals.SPI2, sd_spi_cfg)
        .expect("failed to init SPI2 for SD card")
        .with_sck(peripherals.GPIO14)
        .with_mosi(peripherals.GPIO13)
        .with_miso(peripherals.GPIO12);
    let sd_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let sd_device =
        ExclusiveDevice::new(sd_spi, sd_cs, Delay::new()).expect("failed to claim SD chip select");
    let storage = SdLogStorage::new(sd_device, Delay::new());

    let recorder = match Recorder::start(&ACQUISITION, storage, console) {
        Ok(recorder) => {
            log::info!("recording to {}", recorder.writer().file_name().unwrap_or("?"));
            Some(recorder)
        }
        Err(err) => {
            log::error!("startup failed: {}", err);
            None
        }
    };
    indicators.refresh(ACQUISITION.health());

    if recorder.is_some() {
        let mut io = Io::new(peripherals.IO_MUX);
        io.set_interrupt_handler(interrupts::pulse_edge_handler);
        let timg1 = TimerGroup::new(peripherals.TIMG1);
        interrupts::listen(CaptureHw::new(
            // Input-only pin, biased by the sensor board.
            Input::new(peripherals.GPIO34, InputConfig::default()),
            PeriodicTimer::new(timg1.timer0),
            PeriodicTimer::new(timg1.timer1),
        ));
        log::info!("acquisition armed");
    }

    let executor = EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(tasks::status_task(indicators));
        if let Some(recorder) = recorder {
            spawner.must_spawn(tasks::recorder_task(recorder));
        }
    });
}
