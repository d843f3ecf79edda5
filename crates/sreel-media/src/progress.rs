//! Scan progress reporting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Progress of a full-source candidate scan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Windows scored so far.
    pub windows_scanned: usize,
    /// Total windows planned for this scan.
    pub windows_total: usize,
}

impl ScanProgress {
    /// Completion percentage in [0, 100].
    pub fn percentage(&self) -> f64 {
        if self.windows_total == 0 {
            return 0.0;
        }
        (self.windows_scanned as f64 / self.windows_total as f64 * 100.0).min(100.0)
    }
}

/// Observer invoked at coarse checkpoints during a scan.
///
/// Invoked from scoring workers: implementations must be cheap and must not
/// block. The observer is never required for correctness.
pub type ProgressObserver = Arc<dyn Fn(ScanProgress) + Send + Sync>;
