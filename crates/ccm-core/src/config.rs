//! Engine tuning

use ccm_fs::RobustnessConfig;

/// Files larger than this stop an import unless the check is skipped.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Snapshots kept per project before the oldest are evicted.
pub const MAX_SNAPSHOTS: usize = 5;

/// Limits and retry policy used by the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub large_file_threshold: u64,
    pub max_snapshots: usize,
    pub copy: RobustnessConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            large_file_threshold: LARGE_FILE_THRESHOLD,
            max_snapshots: MAX_SNAPSHOTS,
            copy: RobustnessConfig::default(),
        }
    }
}
