use thiserror::Error;

/// Failures that abort a discovery run.
///
/// Per-host problems (refused connections, timeouts, garbage replies) are
/// never represented here; they are recorded in the scan and query outcomes.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid network address: {input} ({reason})")]
    InvalidNetwork { input: String, reason: String },

    #[error("timeout {0:.3}s is outside of the allowed range")]
    TimeoutOutOfRange(f64),

    #[error("discovery interrupted")]
    Interrupted,
}

impl DiscoveryError {
    pub fn invalid_network(input: &str, reason: impl ToString) -> Self {
        Self::InvalidNetwork {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
