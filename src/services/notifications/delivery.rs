//! Reliable message delivery over a chat transport.
//!
//! Each attempt sends the message directly, and on failure bootstraps the
//! conversation with the recipient and sends once more. Failed attempts are
//! retried with exponential backoff up to a fixed number of attempts; an
//! error that is not transient ends the delivery at once.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::renderer::take_chars;
use crate::config::DeliveryConfig;
use crate::error::{AppError, AppResult};
use crate::external::ChatTransport;
use crate::models::MessageRequest;

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles per attempt
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.max_retries, config.base_delay())
    }

    /// Delay after failed attempt `attempt` (0-based): `base_delay * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Schedule of attempts; the last one has no backoff
    pub fn attempts(&self) -> impl Iterator<Item = DeliveryAttempt> + '_ {
        (0..self.max_attempts).map(|index| DeliveryAttempt {
            index,
            backoff: (index + 1 < self.max_attempts).then(|| self.delay_for(index)),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}

/// One step of a delivery, scoped to a single `send` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryAttempt {
    pub index: u32,
    /// Sleep before the next attempt if this one fails
    pub backoff: Option<Duration>,
}

/// Characters of the encoded payload kept in failure logs
const PAYLOAD_LOG_CHARS: usize = 96;

fn payload_preview(data: &str) -> &str {
    take_chars(data, PAYLOAD_LOG_CHARS)
}

/// Sends messages with retries and conversation bootstrap
#[derive(Clone)]
pub struct DeliveryClient {
    transport: Arc<dyn ChatTransport>,
    policy: RetryPolicy,
}

impl DeliveryClient {
    pub fn new(transport: Arc<dyn ChatTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Delivers `request`, retrying until it succeeds or attempts run out
    ///
    /// # Errors
    /// `AppError::DeliveryExhausted` wrapping the last attempt's error. Its
    /// `attempts` is the number actually made, fewer than the policy allows
    /// when the error was not transient.
    pub async fn send(&self, request: &MessageRequest) -> AppResult<()> {
        let mut last_error = None;

        for attempt in self.policy.attempts() {
            match self.try_send(request).await {
                Ok(()) => {
                    if attempt.index > 0 {
                        info!(
                            message_id = %request.message_id,
                            recipient_id = %request.recipient_id,
                            attempt = attempt.index,
                            "Message delivered after retry"
                        );
                    }
                    return Ok(());
                }
                Err(e) => {
                    let retry = e.is_transient();
                    let backoff = attempt.backoff.filter(|_| retry);
                    warn!(
                        error = %e,
                        transport = self.transport.name(),
                        conversation_id = %request.conversation_id,
                        recipient_id = %request.recipient_id,
                        message_id = %request.message_id,
                        category = ?request.category,
                        attempt = attempt.index,
                        backoff_ms = backoff.map(|d| d.as_millis() as u64),
                        retry,
                        payload = payload_preview(&request.data),
                        payload_len = request.data.len(),
                        "Delivery attempt failed"
                    );
                    if !retry {
                        return Err(AppError::DeliveryExhausted {
                            attempts: attempt.index + 1,
                            source: Box::new(e),
                        });
                    }
                    last_error = Some(e);

                    if let Some(delay) = backoff {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let last_error = last_error
            .unwrap_or_else(|| AppError::transport("send_message", "no delivery attempt was made"));
        Err(AppError::DeliveryExhausted {
            attempts: self.policy.max_attempts,
            source: Box::new(last_error),
        })
    }

    /// Direct send, then bootstrap and resend once
    async fn try_send(&self, request: &MessageRequest) -> AppResult<()> {
        let Err(send_error) = self.transport.send_message(request).await else {
            return Ok(());
        };

        debug!(
            error = %send_error,
            recipient_id = %request.recipient_id,
            "Send failed, creating conversation"
        );
        self.transport
            .create_conversation(&request.recipient_id)
            .await?;
        self.transport.send_message(request).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::MessageCategory;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Transport with scripted results, recording every call
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        send_results: Mutex<VecDeque<AppResult<()>>>,
        create_results: Mutex<VecDeque<AppResult<String>>>,
        pub(crate) sends: Mutex<Vec<(MessageRequest, Instant)>>,
        pub(crate) creates: Mutex<Vec<String>>,
        fail_by_default: bool,
    }

    impl ScriptedTransport {
        pub(crate) fn succeeding() -> Self {
            Self::default()
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail_by_default: true,
                ..Default::default()
            }
        }

        pub(crate) fn with_sends(results: Vec<AppResult<()>>) -> Self {
            Self {
                send_results: Mutex::new(results.into()),
                ..Default::default()
            }
        }

        pub(crate) fn with_creates(self, results: Vec<AppResult<String>>) -> Self {
            *self.create_results.lock().unwrap() = results.into();
            self
        }

        pub(crate) fn send_count(&self) -> usize {
            self.sends.lock().unwrap().len()
        }

        fn default_result<T>(&self, operation: &str, ok: T) -> AppResult<T> {
            if self.fail_by_default {
                Err(AppError::transport(operation, "unavailable"))
            } else {
                Ok(ok)
            }
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send_message(&self, request: &MessageRequest) -> AppResult<()> {
            self.sends
                .lock()
                .unwrap()
                .push((request.clone(), Instant::now()));
            let scripted = self.send_results.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| self.default_result("send_message", ()))
        }

        async fn create_conversation(&self, recipient_id: &str) -> AppResult<String> {
            self.creates.lock().unwrap().push(recipient_id.to_string());
            let scripted = self.create_results.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| {
                self.default_result("create_conversation", format!("conv-{}", recipient_id))
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    pub(crate) fn request() -> MessageRequest {
        MessageRequest {
            conversation_id: "conv-1".to_string(),
            recipient_id: "user-1".to_string(),
            message_id: "trace-1".to_string(),
            category: MessageCategory::AppCard,
            data: "e30=".to_string(),
        }
    }

    fn client(transport: Arc<ScriptedTransport>, attempts: u32) -> DeliveryClient {
        DeliveryClient::new(
            transport,
            RetryPolicy::new(attempts, Duration::from_secs(1)),
        )
    }

    fn fail(operation: &str) -> AppResult<()> {
        Err(AppError::transport(operation, "boom"))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(8, Duration::from_millis(1000));
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn test_last_attempt_has_no_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let attempts: Vec<_> = policy.attempts().collect();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[0].backoff, Some(Duration::from_secs(1)));
        assert_eq!(attempts[1].backoff, Some(Duration::from_secs(2)));
        assert_eq!(attempts[2].backoff, None);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 8);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_payload_preview_is_bounded() {
        assert_eq!(payload_preview("e30="), "e30=");
        let long = "QUJD".repeat(100);
        assert_eq!(payload_preview(&long).len(), PAYLOAD_LOG_CHARS);
        assert!(long.starts_with(payload_preview(&long)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_send_succeeds() {
        let transport = Arc::new(ScriptedTransport::succeeding());
        client(transport.clone(), 8).send(&request()).await.unwrap();

        assert_eq!(transport.send_count(), 1);
        assert!(transport.creates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_then_resend() {
        let transport = Arc::new(ScriptedTransport::with_sends(vec![
            fail("send_message"),
            Ok(()),
        ]));
        let start = Instant::now();
        client(transport.clone(), 8).send(&request()).await.unwrap();

        // One logical delivery: the failed send and the resend, no backoff
        assert_eq!(transport.send_count(), 2);
        assert_eq!(*transport.creates.lock().unwrap(), vec!["user-1".to_string()]);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_failure_fails_attempt_and_retries() {
        let transport = Arc::new(
            ScriptedTransport::with_sends(vec![fail("send_message")])
                .with_creates(vec![Err(AppError::transport("create_conversation", "no"))]),
        );
        let start = Instant::now();
        client(transport.clone(), 8).send(&request()).await.unwrap();

        // Attempt 0: send fails, bootstrap fails. Attempt 1: send succeeds.
        assert_eq!(transport.send_count(), 2);
        assert_eq!(transport.creates.lock().unwrap().len(), 1);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_max_attempts() {
        let transport = Arc::new(ScriptedTransport::failing());
        let start = Instant::now();
        let err = client(transport.clone(), 4)
            .send(&request())
            .await
            .unwrap_err();

        match err {
            AppError::DeliveryExhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*source, AppError::Transport { .. }));
            }
            other => panic!("Expected DeliveryExhausted, got {:?}", other),
        }
        // Every attempt: one send, bootstrap fails before the resend
        assert_eq!(transport.send_count(), 4);
        assert_eq!(transport.creates.lock().unwrap().len(), 4);
        // 1 + 2 + 4 seconds, nothing after the last attempt
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_gaps_grow() {
        let transport = Arc::new(ScriptedTransport::failing());
        let _ = client(transport.clone(), 5).send(&request()).await;

        let sends = transport.sends.lock().unwrap();
        let gaps: Vec<Duration> = sends
            .windows(2)
            .map(|pair| pair[1].1 - pair[0].1)
            .collect();
        assert_eq!(gaps.len(), 4);
        assert!(gaps.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(gaps[0], Duration::from_secs(1));
        assert_eq!(gaps[3], Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_stops_retrying() {
        let transport = Arc::new(ScriptedTransport::with_sends(vec![Err(AppError::Validation {
            field: "data".to_string(),
            reason: "payload rejected".to_string(),
        })]));
        let start = Instant::now();
        let err = client(transport.clone(), 8)
            .send(&request())
            .await
            .unwrap_err();

        let AppError::DeliveryExhausted { attempts, source } = err else {
            panic!("Expected DeliveryExhausted");
        };
        assert_eq!(attempts, 1);
        assert!(!source.is_transient());
        // Neither a bootstrap resend nor a backoff
        assert_eq!(transport.send_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_bootstrap_error_stops_retrying() {
        let transport = Arc::new(
            ScriptedTransport::with_sends(vec![fail("send_message")]).with_creates(vec![Err(
                AppError::Validation {
                    field: "recipient_id".to_string(),
                    reason: "unknown user".to_string(),
                },
            )]),
        );
        let err = client(transport.clone(), 8)
            .send(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DeliveryExhausted { attempts: 1, .. }));
        assert_eq!(transport.send_count(), 1);
        assert_eq!(transport.creates.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_failure_is_last_error() {
        let transport = Arc::new(ScriptedTransport::with_sends(vec![
            fail("send_message"),
            Err(AppError::transport("send_message", "resend rejected")),
        ]));
        let err = client(transport.clone(), 1)
            .send(&request())
            .await
            .unwrap_err();

        let AppError::DeliveryExhausted { source, .. } = err else {
            panic!("Expected DeliveryExhausted");
        };
        assert_eq!(
            source.to_string(),
            "Transport send_message failed: resend rejected"
        );
    }
}
