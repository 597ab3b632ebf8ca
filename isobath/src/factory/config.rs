//! Factory tuning.

/// Default bound on vertices held by resident isolines.
pub const DEFAULT_MAX_CACHED_VERTICES: u64 = 5_000_000;

/// Configuration for an [`IsolineFactory`](super::IsolineFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Upper bound on the total vertex count of resident isolines.
    ///
    /// Isolines beyond the bound are evicted and transparently reloaded
    /// from the archive on the next request.
    pub max_cached_vertices: u64,
}

impl FactoryConfig {
    pub fn with_max_cached_vertices(mut self, max: u64) -> Self {
        self.max_cached_vertices = max;
        self
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_cached_vertices: DEFAULT_MAX_CACHED_VERTICES,
        }
    }
}
