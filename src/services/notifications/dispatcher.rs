//! Notification dispatch orchestration.
//!
//! A dispatch takes one event through link resolution, language lookup,
//! card rendering, encoding and delivery. It never returns an error to the
//! caller: every failure ends in a logged `DispatchOutcome`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};

use super::delivery::DeliveryClient;
use super::lang::LanguageCatalog;
use super::links::with_links;
use super::renderer::CardRenderer;
use crate::error::{AppError, AppResult};
use crate::external::SiteInfoProvider;
use crate::models::{MessageCategory, MessageRequest, NotificationEvent, RenderedCard};

/// Final state of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DispatchOutcome {
    Delivered,
    /// Delivery was attempted but every attempt failed or the deadline elapsed
    Exhausted,
    /// The message could not be built; nothing was sent
    Aborted,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Delivered => "delivered",
            DispatchOutcome::Exhausted => "exhausted",
            DispatchOutcome::Aborted => "aborted",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializes a card to JSON and encodes it as standard base64
pub fn encode_card(card: &RenderedCard) -> AppResult<String> {
    let json = serde_json::to_vec(card)?;
    Ok(STANDARD.encode(json))
}

/// Turns notification events into delivered app cards
///
/// Cheap to clone; all shared state is behind `Arc`.
#[derive(Clone)]
pub struct NotificationDispatcher {
    bot_client_id: String,
    catalog: Arc<LanguageCatalog>,
    renderer: Arc<CardRenderer>,
    site_info: Arc<dyn SiteInfoProvider>,
    delivery: DeliveryClient,
    timeout: Option<Duration>,
}

impl NotificationDispatcher {
    pub fn new(
        bot_client_id: impl Into<String>,
        catalog: Arc<LanguageCatalog>,
        renderer: Arc<CardRenderer>,
        site_info: Arc<dyn SiteInfoProvider>,
        delivery: DeliveryClient,
    ) -> Self {
        Self {
            bot_client_id: bot_client_id.into(),
            catalog,
            renderer,
            site_info,
            delivery,
            timeout: None,
        }
    }

    /// Bounds each whole dispatch, backoff included
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves links and language, then renders the card for `event`
    pub async fn render(&self, event: &NotificationEvent) -> AppResult<RenderedCard> {
        let site = self.site_info.site_general().await?;
        let seo = self.site_info.site_seo().await?;
        let event = with_links(event, &site, &seo);

        let text = self.catalog.resolve(&event.receiver.lang);
        Ok(self.renderer.render(&event, text))
    }

    /// Builds the outbound message for `event` without sending it
    pub async fn prepare(&self, event: &NotificationEvent) -> AppResult<MessageRequest> {
        let recipient_id = event.receiver.external_id.trim();
        if recipient_id.is_empty() {
            return Err(AppError::Validation {
                field: "receiver.external_id".to_string(),
                reason: "receiver has no chat network id".to_string(),
            });
        }

        let card = self.render(event).await?;
        let data = encode_card(&card)?;

        let conversation_id = self
            .delivery
            .transport()
            .conversation_id(&self.bot_client_id, recipient_id);

        Ok(MessageRequest {
            conversation_id,
            recipient_id: recipient_id.to_string(),
            message_id: uuid::Uuid::new_v4().to_string(),
            category: MessageCategory::AppCard,
            data,
        })
    }

    async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        let request = self.prepare(event).await?;
        self.delivery.send(&request).await
    }

    /// Dispatches one event
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        let span = info_span!(
            "dispatch",
            kind = %event.kind,
            receiver = %event.receiver.external_id,
        );

        async {
            let result = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, self.deliver(event))
                    .await
                    .unwrap_or(Err(AppError::DeadlineExceeded {
                        timeout_secs: limit.as_secs(),
                    })),
                None => self.deliver(event).await,
            };

            match result {
                Ok(()) => {
                    info!("Notification delivered");
                    DispatchOutcome::Delivered
                }
                Err(
                    e @ (AppError::DeliveryExhausted { .. } | AppError::DeadlineExceeded { .. }),
                ) => {
                    error!(error = %e, "Notification delivery exhausted");
                    DispatchOutcome::Exhausted
                }
                Err(e) => {
                    error!(error = %e, "Notification dispatch aborted");
                    DispatchOutcome::Aborted
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Dispatches on a separate task
    pub fn spawn(&self, event: NotificationEvent) -> JoinHandle<DispatchOutcome> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(&event).await })
    }

    /// Dispatches every event on its own task, outcomes in input order
    ///
    /// A task that panics or is cancelled counts as aborted.
    pub async fn dispatch_all(&self, events: &[NotificationEvent]) -> Vec<DispatchOutcome> {
        let handles = events.iter().map(|event| self.spawn(event.clone()));

        join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, joined)| {
                joined.unwrap_or_else(|e| {
                    error!(index, error = %e, "Dispatch task failed");
                    DispatchOutcome::Aborted
                })
            })
            .collect()
    }
}
