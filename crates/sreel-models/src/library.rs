//! Pre-cut, keyword-tagged footage clips from the external library.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named footage clip from the segment library.
///
/// The library is owned by the orchestrator; the core treats entries as
/// read-only. `source` is an opaque reference (path, object key, ...) that
/// only the downstream renderer interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LibrarySegment {
    /// Stable identifier within the library.
    pub id: String,
    /// Opaque reference to the source media.
    pub source: String,
    /// In-point within the source, seconds.
    pub in_time: f64,
    /// Out-point within the source, seconds. Always greater than `in_time`.
    pub out_time: f64,
    /// Free-text keywords used for narration matching.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl LibrarySegment {
    /// Usable footage duration in seconds.
    pub fn duration(&self) -> f64 {
        self.out_time - self.in_time
    }
}
