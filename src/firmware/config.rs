use log::LevelFilter;

pub(crate) const LOG_LEVEL: LevelFilter = LevelFilter::Info;
/// Shared with `esp-println` on UART0.
pub(crate) const UART_BAUD: u32 = 4_800;
/// Card init clock; the bus stays there afterwards.
pub(crate) const SD_SPI_KHZ: u32 = 400;
pub(crate) const STATUS_REFRESH_MS: u64 = 20;
