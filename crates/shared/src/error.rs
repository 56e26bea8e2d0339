use thiserror::Error;

/// The only failure the catalog page distinguishes: the request did not produce a fragment.
///
/// Covers network failure, non-2xx status and an unreadable body alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestFailed {
    pub url: String,
    pub message: String,
}

impl RequestFailed {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}
