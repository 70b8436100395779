//! Render command handler
//!
//! Prints the card each event would produce, without contacting the relay.

use crate::cli::validation::EventSource;
use crate::error::AppResult;
use crate::state::AppState;

use super::events::read_events;

/// Handler for the render command
pub struct RenderCommandHandler {
    state: AppState,
}

impl RenderCommandHandler {
    /// Create a new render command handler
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Render every event from `source` and print one card per line
    ///
    /// # Errors
    /// - Unreadable or malformed event input
    /// - Site information needed for links is unavailable
    pub async fn execute(&self, source: &EventSource, pretty: bool) -> AppResult<()> {
        for line in self.render_all(source, pretty).await? {
            println!("{}", line);
        }
        Ok(())
    }

    async fn render_all(&self, source: &EventSource, pretty: bool) -> AppResult<Vec<String>> {
        let events = read_events(source).await?;
        let mut rendered = Vec::with_capacity(events.len());

        for event in &events {
            let card = self.state.dispatcher.render(event).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&card)?
            } else {
                serde_json::to_string(&card)?
            };
            rendered.push(json);
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::io::Write;

    const EVENT: &str = r#"{"kind":"notification.action.comment_answer","actor_display_name":"Ada","question_id":"101","answer_id":"202","comment_id":"303","question_title":"Why <b>borrow</b>?","excerpt":"<p>Because</p>","receiver":{"external_id":"a1b2c3d4-0000-4000-8000-000000000001","lang":"en_US"}}"#;

    fn handler() -> RenderCommandHandler {
        let mut settings = Settings::default();
        settings.bot.client_id = "6f0a6a4c-8b1e-4e8c-9f3c-1d2e3f4a5b6c".to_string();
        settings.site.url = "https://forum.example.com".to_string();
        RenderCommandHandler::new(AppState::from_settings(settings).unwrap())
    }

    #[tokio::test]
    async fn test_render_resolves_links_and_language() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{EVENT}").unwrap();

        let rendered = handler()
            .render_all(&EventSource::File(file.path().to_path_buf()), false)
            .await
            .unwrap();
        assert_eq!(rendered.len(), 1);

        let card: serde_json::Value = serde_json::from_str(&rendered[0]).unwrap();
        assert_eq!(card["app_id"], "6f0a6a4c-8b1e-4e8c-9f3c-1d2e3f4a5b6c");
        assert!(card["title"].as_str().unwrap().contains("Why"));
        assert!(card["description"].as_str().unwrap().contains("Ada"));
        assert_eq!(card["actions"][0]["label"], "Details");
        assert!(
            card["actions"][0]["action"]
                .as_str()
                .unwrap()
                .starts_with("https://forum.example.com/")
        );
    }

    #[tokio::test]
    async fn test_render_pretty_output() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{EVENT}").unwrap();

        let source = EventSource::File(file.path().to_path_buf());
        let handler = handler();
        assert!(handler.render_all(&source, true).await.unwrap()[0].contains('\n'));
        assert!(handler.execute(&source, false).await.is_ok());
    }
}
