use thiserror::Error;

/// Error taxonomy for the tracking engine.
///
/// Only `AcquisitionFailed` is terminal for a session. Everything else is
/// recoverable and handled close to where it occurs: per-object failures are
/// logged and must never abort processing of the rest of the collection.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No fresh fetch succeeded and no cached copy exists. The caller must
    /// surface this to the user; no satellites are loaded.
    #[error("no element set available: fetch failed and no cached copy exists")]
    AcquisitionFailed,

    #[error("element set fetch failed: {0}")]
    Fetch(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The propagation library rejected a pair of element lines.
    #[error("element lines rejected for '{name}': {reason}")]
    ElementsRejected { name: String, reason: String },

    /// Propagation produced no usable state for this instant. The object
    /// keeps its stale position until a future tick succeeds.
    #[error("propagation unavailable for satellite {number}: {reason}")]
    PropagationUnavailable { number: String, reason: String },
}
