use thiserror::Error;

/// Failures of a single catalog operation.
///
/// All variants are fatal to the operation in progress; retry policy lives
/// with the caller, not here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode catalog response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
