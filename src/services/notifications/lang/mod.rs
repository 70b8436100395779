//! Localized notification text.
//!
//! Each supported language is an immutable provider behind the
//! `LocalizedText` trait. `LanguageCatalog` maps receiver language tags to
//! providers and never fails to resolve: unknown tags get the fallback.

mod en_us;
mod zh_cn;

pub use en_us::EnUs;
pub use zh_cn::ZhCn;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::models::NotificationKind;

/// Placeholder substituted with the actor's display name
const ACTOR_PLACEHOLDER: &str = "%s";

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    EnUs,
    ZhCn,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::EnUs, Language::ZhCn];

    /// Canonical tag, e.g. `en_US`
    pub fn tag(&self) -> &'static str {
        match self {
            Language::EnUs => "en_US",
            Language::ZhCn => "zh_CN",
        }
    }

    /// Parses a language tag
    ///
    /// Case-insensitive, accepts `-` or `_` as separator.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Localized strings for one language
///
/// Implementations are stateless and shared read-only across dispatches.
pub trait LocalizedText: Send + Sync {
    fn language(&self) -> Language;

    /// Label of the card action button
    fn action_label(&self) -> &'static str;

    /// Template for `kind` with a single `%s` placeholder for the actor
    ///
    /// Returns `None` for kinds this language has no wording for.
    fn template(&self, kind: &NotificationKind) -> Option<&'static str>;

    /// One-line description of the event, e.g. "Alice replied to you"
    ///
    /// Empty for kinds without a template.
    fn describe(&self, kind: &NotificationKind, actor: &str) -> String {
        self.template(kind)
            .map(|template| template.replacen(ACTOR_PLACEHOLDER, actor, 1))
            .unwrap_or_default()
    }
}

/// Registry of localized text providers keyed by language
#[derive(Clone)]
pub struct LanguageCatalog {
    providers: HashMap<Language, Arc<dyn LocalizedText>>,
    fallback: Arc<dyn LocalizedText>,
}

impl LanguageCatalog {
    /// Builds a catalog with every supported language registered
    pub fn new(fallback: Language) -> Self {
        let providers: HashMap<Language, Arc<dyn LocalizedText>> = Language::ALL
            .into_iter()
            .map(|lang| (lang, Self::provider_for(lang)))
            .collect();
        let fallback = Self::provider_for(fallback);

        Self {
            providers,
            fallback,
        }
    }

    fn provider_for(language: Language) -> Arc<dyn LocalizedText> {
        match language {
            Language::EnUs => Arc::new(EnUs),
            Language::ZhCn => Arc::new(ZhCn),
        }
    }

    /// Language used when a tag is missing or unsupported
    pub fn fallback_language(&self) -> Language {
        self.fallback.language()
    }

    /// Resolves a receiver's language tag to a provider
    pub fn resolve(&self, tag: &str) -> &dyn LocalizedText {
        Language::from_tag(tag)
            .and_then(|lang| self.providers.get(&lang))
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new(Language::ZhCn)
    }
}

impl fmt::Debug for LanguageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageCatalog")
            .field("languages", &self.providers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.language())
            .finish()
    }
}
