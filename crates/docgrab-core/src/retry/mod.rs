//! Retry and backoff for HTTP transfers.
//!
//! Failures are classified (timeouts, throttling, connection failures) and
//! retried with capped exponential backoff; anything else fails at once.

mod error;
mod policy;

pub use error::{classify_curl_error, classify_http_status, FetchError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or `policy` says to stop, sleeping the backoff
/// delay between attempts. Returns the last error on give-up.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        let err = match f() {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        match policy.decide(attempt, err.kind()) {
            RetryDecision::NoRetry => return Err(err),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt, ?delay, "retrying after: {}", err);
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast(3), || {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Http(503))
            } else {
                Ok("page")
            }
        });
        assert_eq!(out.unwrap(), "page");
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(2), || {
            calls += 1;
            Err(FetchError::Http(500))
        });
        assert!(matches!(out, Err(FetchError::Http(500))));
        assert_eq!(calls, 2);
    }

    #[test]
    fn client_errors_fail_immediately() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(5), || {
            calls += 1;
            Err(FetchError::Http(404))
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }
}
