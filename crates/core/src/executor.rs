// Request executor
//
// One logical fetch = up to `max_attempts` physical GETs. Each attempt is timed
// on a monotonic clock, classified on failure, and followed by a fixed delay
// when attempts remain. The first decoded 2xx ends the loop. Every path returns
// an AttemptOutcome; nothing escapes as an error or panic.
//
// Cancellation is checked before each attempt and raced against the in-flight
// request and the retry delay. Whichever observes it resolves to Cancel, which
// is terminal (never retried).

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::classify::{classify, classify_status};
use crate::config::BenchConfig;
use crate::decode::{decode_sample, decode_sample_list};
use crate::outcome::{AttemptOutcome, ErrorKind, NetworkError, SamplePayload};
use crate::retry::RetryPolicy;
use crate::transport::{Transport, TransportError};

/// Performs logical fetches against one transport
pub struct RequestExecutor<T> {
    transport: T,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl<T: Transport> RequestExecutor<T> {
    /// Create an executor whose retry policy follows `config.enable_retry`
    pub fn new(transport: T, config: &BenchConfig) -> Self {
        Self {
            transport,
            policy: RetryPolicy::from_enable_retry(config.enable_retry),
            cancel: CancellationToken::new(),
        }
    }

    /// Observe an external cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a single item (bare object or first element of an array)
    pub async fn fetch(&self, path: &str) -> AttemptOutcome<SamplePayload> {
        self.execute(path, decode_sample).await
    }

    /// Fetch a collection (array, or a bare object wrapped into one element)
    pub async fn fetch_list(&self, path: &str) -> AttemptOutcome<Vec<SamplePayload>> {
        self.execute(path, decode_sample_list).await
    }

    async fn execute<P>(&self, path: &str, decode: fn(&str) -> Option<P>) -> AttemptOutcome<P> {
        let mut last_error: Option<NetworkError> = None;

        for attempt in 1..=self.policy.max_attempts {
            if self.cancel.is_cancelled() {
                return AttemptOutcome::NetworkError(NetworkError::cancelled(0));
            }

            let started = Instant::now();
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(TransportError::Cancelled),
                response = self.transport.get(path) => response,
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            let error = match result {
                Ok(response) => {
                    if response.is_success() {
                        if let Some(payload) = decode(&response.body) {
                            debug!(attempt, duration_ms, status = response.status, "GET ok");
                            return AttemptOutcome::Success {
                                payload,
                                status_code: response.status,
                                duration_ms,
                            };
                        }
                    }
                    NetworkError::new(classify_status(response.status), duration_ms)
                        .with_status(response.status)
                        .with_message(response.body)
                }
                Err(cause) => NetworkError::new(classify(&cause), duration_ms)
                    .with_message(cause.to_string()),
            };

            debug!(
                attempt,
                duration_ms,
                status = ?error.status_code,
                kind = %error.kind,
                "GET failed"
            );

            if error.kind == ErrorKind::Cancel {
                return AttemptOutcome::NetworkError(error);
            }

            let retry = self.policy.has_attempts_remaining(attempt);
            last_error = Some(error);

            if retry {
                let delay = self.policy.delay_for_attempt(attempt + 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        return AttemptOutcome::NetworkError(NetworkError::cancelled(0));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        AttemptOutcome::NetworkError(last_error.unwrap_or_else(NetworkError::no_result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted responses, one per call
    struct Scripted {
        script: Mutex<VecDeque<std::result::Result<RawResponse, TransportError>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(
            script: impl IntoIterator<Item = std::result::Result<RawResponse, TransportError>>,
        ) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn get(&self, _path: &str) -> std::result::Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
        }
    }

    fn ok_body() -> std::result::Result<RawResponse, TransportError> {
        Ok(RawResponse::new(200, r#"{"id":1,"title":"a","body":"b"}"#))
    }

    fn executor(script: Scripted, retry: bool) -> RequestExecutor<Scripted> {
        RequestExecutor::new(script, &BenchConfig::default().with_retry(retry))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_stops_immediately_even_with_retry() {
        let exec = executor(Scripted::new([ok_body(), ok_body()]), true);

        let outcome = exec.fetch("/posts/1").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(exec.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_retry_is_single_attempt() {
        let exec = executor(
            Scripted::new([Err(TransportError::Connect("refused".into())), ok_body()]),
            false,
        );

        let outcome = exec.fetch("/posts/1").await;

        assert_eq!(outcome.kind(), Some(ErrorKind::NoInternet));
        assert_eq!(outcome.status_code(), None);
        assert_eq!(exec.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_one_failure_with_fixed_delay() {
        let exec = executor(
            Scripted::new([Err(TransportError::Timeout("read".into())), ok_body()]),
            true,
        );

        let started = Instant::now();
        let outcome = exec.fetch("/posts/1").await;

        assert!(outcome.is_success());
        assert_eq!(exec.transport().calls(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_failure() {
        let exec = executor(
            Scripted::new([
                Ok(RawResponse::new(503, "busy")),
                Ok(RawResponse::new(404, "gone")),
            ]),
            true,
        );

        let outcome = exec.fetch("/posts/1").await;

        match outcome {
            AttemptOutcome::NetworkError(err) => {
                assert_eq!(err.kind, ErrorKind::Http4xx);
                assert_eq!(err.status_code, Some(404));
                assert_eq!(err.message.as_deref(), Some("gone"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(exec.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_2xx_is_unknown_with_status() {
        let exec = executor(Scripted::new([Ok(RawResponse::new(200, "<html/>"))]), false);

        let outcome = exec.fetch("/posts/1").await;

        assert_eq!(outcome.kind(), Some(ErrorKind::Unknown));
        assert_eq!(outcome.status_code(), Some(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_status_is_unknown() {
        let exec = executor(Scripted::new([Ok(RawResponse::new(302, ""))]), false);
        assert_eq!(exec.fetch("/").await.kind(), Some(ErrorKind::Unknown));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_list_wraps_object() {
        let exec = executor(Scripted::new([ok_body()]), false);

        let outcome = exec.fetch_list("/posts").await;

        assert_eq!(outcome.payload().map(Vec::len), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempt_policy_yields_no_result() {
        let mut exec = executor(Scripted::new([ok_body()]), false);
        exec.policy.max_attempts = 0;

        match exec.fetch("/").await {
            AttemptOutcome::NetworkError(err) => {
                assert_eq!(err, NetworkError::no_result());
            }
            other => panic!("expected no result, got {:?}", other),
        }
        assert_eq!(exec.transport().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_issues_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let exec = executor(Scripted::new([ok_body()]), true).with_cancellation(cancel);

        let outcome = exec.fetch("/").await;

        assert_eq!(outcome.kind(), Some(ErrorKind::Cancel));
        assert_eq!(exec.transport().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_retry_delay_resolves_to_cancel() {
        let cancel = CancellationToken::new();
        let exec = executor(
            Scripted::new([Err(TransportError::Io("reset".into())), ok_body()]),
            true,
        )
        .with_cancellation(cancel.clone());

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let outcome = exec.fetch("/").await;

        assert_eq!(outcome.kind(), Some(ErrorKind::Cancel));
        assert_eq!(exec.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_reported_cancel_is_not_retried() {
        let exec = executor(
            Scripted::new([Err(TransportError::Cancelled), ok_body()]),
            true,
        );

        let started = Instant::now();
        let outcome = exec.fetch("/").await;

        assert_eq!(outcome.kind(), Some(ErrorKind::Cancel));
        assert_eq!(exec.transport().calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
