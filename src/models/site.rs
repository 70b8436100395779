//! Site information used to build absolute links.

use serde::{Deserialize, Serialize};

/// General site settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteGeneral {
    /// Public base URL, e.g. `https://forum.example.com`
    pub site_url: String,
}

/// URL shape for question pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermalinkStyle {
    /// `/questions/{id}/{slug}`
    #[default]
    QuestionIdAndTitle,
    /// `/questions/{id}`
    QuestionId,
    /// `/questions/{short_id}/{slug}`
    QuestionIdAndTitleByShortId,
    /// `/questions/{short_id}`
    QuestionIdByShortId,
}

impl PermalinkStyle {
    /// Whether the title slug is part of question links
    pub fn includes_title(self) -> bool {
        matches!(
            self,
            PermalinkStyle::QuestionIdAndTitle | PermalinkStyle::QuestionIdAndTitleByShortId
        )
    }
}

/// SEO settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SiteSeo {
    pub permalink: PermalinkStyle,
}
