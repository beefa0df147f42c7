use embassy_time::Instant;
use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use embedded_sdmmc::{
    Error as SdError, Mode, RawDirectory, RawFile, SdCard, SdCardError, TimeSource, Timestamp,
    VolumeIdx, VolumeManager,
};
use esp_hal::{
    gpio::{Level, Output},
    uart::Uart,
    Blocking,
};
use pulselog::{CreateError, LogStorage, StatusLine, StatusOutputs, Transport};

/// Indicator pins. LEDs sink current, so an active LED is a low pin; the
/// buzzer is driven high to sound.
pub struct StatusPins<'d> {
    power: Output<'d>,
    storage: Output<'d>,
    pulse: Output<'d>,
    pulse_error: Output<'d>,
    buzzer: Output<'d>,
}

impl<'d> StatusPins<'d> {
    pub fn new(
        power: Output<'d>,
        storage: Output<'d>,
        pulse: Output<'d>,
        pulse_error: Output<'d>,
        buzzer: Output<'d>,
    ) -> Self {
        Self {
            power,
            storage,
            pulse,
            pulse_error,
            buzzer,
        }
    }
}

impl StatusOutputs for StatusPins<'_> {
    fn drive(&mut self, line: StatusLine, active: bool) {
        let (pin, level) = match line {
            StatusLine::Power => (&mut self.power, Level::from(!active)),
            StatusLine::Storage => (&mut self.storage, Level::from(!active)),
            StatusLine::Pulse => (&mut self.pulse, Level::from(!active)),
            StatusLine::PulseError => (&mut self.pulse_error, Level::from(!active)),
            StatusLine::Buzzer => (&mut self.buzzer, Level::from(active)),
        };
        pin.set_level(level);
    }
}

pub struct UartTransport<'d> {
    uart: Uart<'d, Blocking>,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: Uart<'d, Blocking>) -> Self {
        Self { uart }
    }
}

impl Transport for UartTransport<'_> {
    fn transmit(&mut self, byte: u8) {
        // Status text is best effort: a TX error drops the byte.
        while let Ok(0) = self.uart.write(&[byte]) {}
    }
}

/// No RTC on the board: file timestamps count uptime from 2025-01-01.
#[derive(Clone, Copy, Default)]
pub struct UptimeTimeSource;

impl TimeSource for UptimeTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        let uptime_secs = Instant::now().as_secs();
        let days = uptime_secs / 86_400;
        let rem = uptime_secs % 86_400;

        Timestamp {
            year_since_1970: 55,
            zero_indexed_month: ((days / 28) % 12) as u8,
            zero_indexed_day: (days % 28) as u8,
            hours: (rem / 3_600) as u8,
            minutes: ((rem % 3_600) / 60) as u8,
            seconds: (rem % 60) as u8,
        }
    }
}

pub type SdStorageError = SdError<SdCardError>;

/// FAT volume 0 of an SPI SD card; log files live in the root directory.
pub struct SdLogStorage<D, DL>
where
    D: SpiDevice<u8>,
    DL: DelayNs,
{
    volumes: VolumeManager<SdCard<D, DL>, UptimeTimeSource>,
    root: Option<RawDirectory>,
}

impl<D, DL> SdLogStorage<D, DL>
where
    D: SpiDevice<u8>,
    DL: DelayNs,
{
    pub fn new(device: D, delay: DL) -> Self {
        let card = SdCard::new(device, delay);
        Self {
            volumes: VolumeManager::new(card, UptimeTimeSource),
            root: None,
        }
    }
}

impl<D, DL> LogStorage for SdLogStorage<D, DL>
where
    D: SpiDevice<u8>,
    DL: DelayNs,
{
    type File = RawFile;
    type Error = SdStorageError;

    fn mount(&mut self) -> Result<(), Self::Error> {
        let volume = self.volumes.open_raw_volume(VolumeIdx(0))?;
        let root = self.volumes.open_root_dir(volume)?;
        log::debug!("sd volume mounted");
        self.root = Some(root);
        Ok(())
    }

    fn create_exclusive(&mut self, name: &str) -> Result<Self::File, CreateError<Self::Error>> {
        let root = self.root.ok_or(SdError::BadHandle)?;
        match self
            .volumes
            .open_file_in_dir(root, name, Mode::ReadWriteCreate)
        {
            Ok(file) => Ok(file),
            Err(SdError::FileAlreadyExists) => Err(CreateError::AlreadyExists),
            Err(err) => Err(CreateError::Storage(err)),
        }
    }

    fn append(&mut self, file: &mut Self::File, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.volumes.write(*file, bytes)?;
        Ok(bytes.len())
    }

    fn flush(&mut self, file: &mut Self::File) -> Result<(), Self::Error> {
        self.volumes.flush_file(*file)
    }
}
