// Delay engine configuration
//
// Builder in the esp_hal::Config style. Only the cycle-source frequency
// is tunable; it converts ns/us requests from embedded-hal drivers into
// cycle counts.

use core::fmt;

/// ESP32-C3 at `CpuClock::max()`.
pub const DEFAULT_CYCLE_HZ: u32 = 160_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoopConfig {
    cycle_hz: u32,
}

impl CoopConfig {
    pub const fn new() -> Self {
        Self {
            cycle_hz: DEFAULT_CYCLE_HZ,
        }
    }

    /// Frequency of the cycle source handed to the delay engine.
    pub const fn with_cycle_hz(mut self, hz: u32) -> Self {
        self.cycle_hz = hz;
        self
    }

    pub const fn cycle_hz(&self) -> u32 {
        self.cycle_hz
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_hz == 0 {
            return Err(ConfigError::ZeroCycleFrequency);
        }
        Ok(())
    }

    // ceil(ns * hz / 1e9); u64 so a full u32 of ns at 160 MHz fits
    pub(crate) fn ns_to_cycles(&self, ns: u32) -> u64 {
        (ns as u64 * self.cycle_hz as u64).div_ceil(1_000_000_000)
    }

    pub(crate) fn us_to_cycles(&self, us: u32) -> u64 {
        (us as u64 * self.cycle_hz as u64).div_ceil(1_000_000)
    }
}

impl Default for CoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Cycle source frequency of 0 Hz; sub-ms delays can't be converted.
    ZeroCycleFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCycleFrequency => write!(f, "cycle frequency must be > 0 Hz"),
        }
    }
}
