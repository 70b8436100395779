//! Absolute link resolution for notification events.

use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::models::{NotificationEvent, PermalinkStyle, SiteGeneral, SiteSeo};

/// Longest slug kept in question links, in code points
const MAX_SLUG_LENGTH: usize = 150;

/// Slug used when a title has no alphanumeric characters
const EMPTY_SLUG: &str = "topic";

/// URL-safe slug of a question title
pub fn url_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    let slug: String = slug.chars().take(MAX_SLUG_LENGTH).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        return EMPTY_SLUG.to_string();
    }

    byte_serialize(slug.as_bytes()).collect()
}

/// Question page URL for the configured permalink style
pub fn question_url(
    style: PermalinkStyle,
    site_url: &str,
    question_id: &str,
    title: &str,
) -> String {
    let base = format!("{}/questions/{}", site_url.trim_end_matches('/'), question_id);
    if style.includes_title() {
        format!("{}/{}", base, url_slug(title))
    } else {
        base
    }
}

pub fn answer_url(question_url: &str, answer_id: &str) -> String {
    format!("{}/{}", question_url, answer_id)
}

pub fn comment_url(parent_url: &str, comment_id: &str) -> String {
    format!("{}?commentId={}", parent_url, comment_id)
}

/// Makes `url` absolute against `site_url`
///
/// Absolute URLs are returned unchanged. Returns `None` for empty input.
pub fn absolutize(site_url: &str, url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if Url::parse(url).is_ok() {
        return Some(url.to_string());
    }

    let site = site_url.trim_end_matches('/');
    if url.starts_with('/') {
        Some(format!("{}{}", site, url))
    } else {
        Some(format!("{}/{}", site, url))
    }
}

/// Returns a copy of `event` with absolute question, answer and comment links
///
/// Present links are made absolute. Missing links are built from ids:
/// the answer link falls back to the question link without an answer id,
/// the comment link hangs off the answer link when there is one.
pub fn with_links(event: &NotificationEvent, site: &SiteGeneral, seo: &SiteSeo) -> NotificationEvent {
    let site_url = site.site_url.as_str();

    let question = absolutize(site_url, &event.question_url).unwrap_or_else(|| {
        question_url(
            seo.permalink,
            site_url,
            &event.question_id,
            &event.question_title,
        )
    });

    let answer = absolutize(site_url, &event.answer_url).unwrap_or_else(|| {
        match event.answer_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => answer_url(&question, id),
            None => question.clone(),
        }
    });

    let comment = absolutize(site_url, &event.comment_url).unwrap_or_else(|| {
        let parent = if event.answer_id.as_deref().is_some_and(|id| !id.is_empty()) {
            answer.as_str()
        } else {
            question.as_str()
        };
        match event.comment_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => comment_url(parent, id),
            None => parent.to_string(),
        }
    });

    NotificationEvent {
        question_url: question,
        answer_url: answer,
        comment_url: comment,
        ..event.clone()
    }
}
