/// Default number of slots in the ring.
pub const DEFAULT_CAPACITY: usize = 64;

/// Default retrieval window: how many of the most recent slots `retrieve` scans.
pub const DEFAULT_WINDOW: usize = 4;

/// Runtime configuration for [`RtRing`](crate::RtRing).
///
/// Capacity and retrieval window are const generic parameters of the ring;
/// only behavior that may differ between instances of the same shape lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Enable metrics collection (slight overhead on every operation)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(enable_metrics: bool) -> Self {
        Self { enable_metrics }
    }

    /// Sets whether metrics are collected.
    pub const fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_metrics: false,
        }
    }
}

/// Configuration with metrics collection enabled.
pub const METRICS_CONFIG: Config = Config::new(true);
