#[allow(clippy::module_inception)]
mod config;
mod encoder_config;
mod macros_config;
mod serial_config;

pub(crate) use {
    config::Config, encoder_config::EncoderConfig, macros_config::MacrosConfig,
    serial_config::SerialConfig,
};

pub(crate) const DEFAULT_BAUD_RATE: u32 = 115_200;
pub(crate) const DEFAULT_READ_TIMEOUT_MS: u64 = 50;

pub(crate) fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

pub(crate) fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}
