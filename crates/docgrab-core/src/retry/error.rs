//! Transfer error type, kept concrete so failures can be classified for retry.

use super::policy::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// libcurl reported a transport failure (timeout, DNS, reset, ...).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed. Never retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Curl(e) => classify_curl_error(e),
            FetchError::Http(code) => classify_http_status(*code),
            FetchError::Storage(_) => ErrorKind::Other,
        }
    }
}

/// 429 and 503 mean "slow down"; other 5xx are worth another try.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_statuses() {
        assert_eq!(FetchError::Http(429).kind(), ErrorKind::Throttled);
        assert_eq!(FetchError::Http(503).kind(), ErrorKind::Throttled);
    }

    #[test]
    fn server_errors_retryable_client_errors_not() {
        assert_eq!(FetchError::Http(502).kind(), ErrorKind::Http5xx(502));
        assert_eq!(FetchError::Http(404).kind(), ErrorKind::Other);
        assert_eq!(FetchError::Http(403).kind(), ErrorKind::Other);
    }

    #[test]
    fn storage_never_retried() {
        let e = FetchError::Storage(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(e.kind(), ErrorKind::Other);
        assert_eq!(e.to_string(), "storage: disk full");
    }
}
