//! Classification error types

use thiserror::Error;

/// Failures on the upstream classification path.
///
/// None of these ever reach the subsystem's caller: the client degrades to
/// the local fallback classifier instead. The taxonomy exists so the retry
/// wrapper and logs can tell transient faults from permanent ones.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Network-level failure or timeout (transient)
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status (transient for 5xx)
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Upstream answered successfully but with no candidates (permanent)
    #[error("Upstream returned no candidates")]
    EmptyResponse,

    /// Upstream body did not match the expected shape (permanent)
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    /// The caller-supplied deadline for the whole retry loop elapsed
    #[error("Classification timed out")]
    Timeout,
}
