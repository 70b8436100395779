//! App card rendering.
//!
//! Turns a notification event into the card shown in the chat client:
//! a bounded title, a bounded body made of the excerpt and a localized
//! one-line description, and at most one action button.

use std::borrow::Cow;
use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use regex::Regex;
use tracing::debug;

use super::lang::LocalizedText;
use crate::config::CardConfig;
use crate::config::settings::DEFAULT_PALETTE;
use crate::models::{CardButton, NotificationEvent, RenderedCard};

/// Separator placed between the excerpt and the description
pub const BODY_SEPARATOR: &str = "\n\n\n";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());

/// Removes every `<...>` tag from the text
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    HTML_TAG.replace_all(text, "")
}

/// Returns the first `max` code points of `text`
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Truncates `text` to `max` code points, ending in `ellipsis` when cut
pub fn truncate_with_ellipsis(text: &str, max: usize, ellipsis: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ellipsis.chars().count());
    format!("{}{}", take_chars(text, keep), ellipsis)
}

/// Renders events into app cards
#[derive(Debug, Clone)]
pub struct CardRenderer {
    config: CardConfig,
    app_id: String,
}

impl CardRenderer {
    /// Creates a renderer for the bot identified by `app_id`
    pub fn new(config: CardConfig, app_id: impl Into<String>) -> Self {
        Self {
            config,
            app_id: app_id.into(),
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Builds the card for `event` in the language of `text`
    ///
    /// Links are used as they appear on the event; resolve them first.
    pub fn render(&self, event: &NotificationEvent, text: &dyn LocalizedText) -> RenderedCard {
        let title = self.render_title(&event.question_title);
        let description = text.describe(&event.kind, &event.actor_display_name);
        let body = self.render_body(&event.excerpt, &description);

        let actions = match event.action_url() {
            Some(url) => vec![CardButton {
                label: text.action_label().to_string(),
                action: url.to_string(),
                color: self.pick_color(),
            }],
            None => {
                debug!(
                    kind = %event.kind,
                    receiver = %event.receiver.external_id,
                    "No card action for notification kind, dropping button"
                );
                Vec::new()
            }
        };

        RenderedCard {
            app_id: self.app_id.clone(),
            icon_url: self.config.icon_url.clone(),
            title,
            description: body,
            shareable: true,
            actions,
        }
    }

    /// Prefixed title, cut to `max_title_length` code points
    pub fn render_title(&self, question_title: &str) -> String {
        let prefixed = format!("{}{}", self.config.title_prefix, question_title);
        truncate_with_ellipsis(
            &prefixed,
            self.config.max_title_length,
            &self.config.ellipsis,
        )
    }

    /// Card body: tag-stripped excerpt, separator, description
    ///
    /// The excerpt gives way to the description when both do not fit.
    pub fn render_body(&self, excerpt: &str, description: &str) -> String {
        let max = self.config.max_body_length;
        let ellipsis = self.config.ellipsis.as_str();
        let ellipsis_len = ellipsis.chars().count();

        let body = strip_tags(excerpt);
        let truncated = truncate_with_ellipsis(&body, max, ellipsis);
        let tail = format!("{}{}", BODY_SEPARATOR, description);
        let tail_len = tail.chars().count();

        if truncated.chars().count() + tail_len <= max {
            return truncated + &tail;
        }

        let available = max.saturating_sub(tail_len + ellipsis_len);
        format!("{}{}{}", take_chars(&body, available), ellipsis, tail)
    }

    /// Uniformly random palette color
    fn pick_color(&self) -> String {
        let mut rng = rand::rng();
        self.config
            .palette
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_PALETTE[0].to_string())
    }
}
