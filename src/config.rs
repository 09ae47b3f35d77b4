//! Runtime settings
//!
//! A [`Config`] gathers the knobs a client sets once per session: the time
//! zone assumed for columns that do not declare one, the block framing
//! applied to the byte stream, and the bounds of the pipe between a producer
//! and a consumer thread.
//!
//! ```
//! use std::time::Duration;
//! use rowbin::config::Config;
//! use rowbin::block::CompressionMethod;
//!
//! let config = Config::default()
//!     .with_block_size(0)
//!     .with_compression(CompressionMethod::None)
//!     .with_pipe_timeout(Duration::from_millis(250));
//! assert_eq!(config.block_size(), 1);
//! ```

use std::time::Duration;

use chrono_tz::Tz;

use crate::block::CompressionMethod;
use crate::codec::Codec;

/// Default capacity of the write-side block buffer.
pub const DEFAULT_BLOCK_SIZE: usize = 8192;

/// Largest write-side block buffer.
pub const MAX_BLOCK_SIZE: usize = 128 * DEFAULT_BLOCK_SIZE;

/// Default number of buffers the pipe holds before writers wait.
pub const DEFAULT_PIPE_CAPACITY: usize = 512;

/// Default time a pipe operation waits before giving up.
pub const DEFAULT_PIPE_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde_impls", serde(default))]
pub struct Config {
    timezone: Option<Tz>,
    block_size: usize,
    compression: CompressionMethod,
    pipe_capacity: usize,
    pipe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            block_size: DEFAULT_BLOCK_SIZE,
            compression: CompressionMethod::default(),
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
            pipe_timeout: DEFAULT_PIPE_TIMEOUT,
        }
    }
}

impl Config {
    /// Zone for `DateTime` columns without their own; `None` means UTC.
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Block buffer capacity, within `1..=MAX_BLOCK_SIZE`.
    pub fn block_size(&self) -> usize {
        self.block_size.clamp(1, MAX_BLOCK_SIZE)
    }

    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    /// Pipe capacity in buffers, at least one.
    pub fn pipe_capacity(&self) -> usize {
        self.pipe_capacity.max(1)
    }

    pub fn pipe_timeout(&self) -> Duration {
        self.pipe_timeout
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_pipe_capacity(mut self, pipe_capacity: usize) -> Self {
        self.pipe_capacity = pipe_capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_pipe_timeout(mut self, pipe_timeout: Duration) -> Self {
        self.pipe_timeout = pipe_timeout;
        self
    }

    /// Codec settings derived from this configuration.
    pub fn codec(&self) -> Codec {
        Codec::new().with_timezone(self.timezone)
    }
}

impl From<&Config> for Codec {
    fn from(config: &Config) -> Self {
        config.codec()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn config_threadsafe() {
        dummy::<Config>()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.timezone(), None);
        assert_eq!(config.block_size(), 8192);
        assert_eq!(config.compression(), CompressionMethod::Lz4);
        assert_eq!(config.pipe_capacity(), 512);
        assert_eq!(config.pipe_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn block_size_is_clamped() {
        assert_eq!(Config::default().with_block_size(0).block_size(), 1);
        assert_eq!(
            Config::default().with_block_size(usize::MAX).block_size(),
            1024 * 1024
        );
        assert_eq!(Config::default().with_pipe_capacity(0).pipe_capacity(), 1);
    }

    #[test]
    fn codec_follows_timezone() {
        let config = Config::default().with_timezone(Some(Tz::Asia__Tokyo));
        assert_eq!(Codec::from(&config).timezone(), Some(Tz::Asia__Tokyo));
    }
}
