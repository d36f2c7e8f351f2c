use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the stats service client
///
/// These never propagate past the poll loop: a failed fetch is logged and the
/// next tick retries unconditionally.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request failed before a response arrived, or the body could not be
    /// read/decoded (reqwest folds JSON decode errors into this)
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service responded with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let error = ClientError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "http://localhost:8081/stats".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unexpected status 503 Service Unavailable from http://localhost:8081/stats"
        );
    }
}
