//! Outbound chat card notifications.
//!
//! Events flow through `NotificationDispatcher`: links are resolved against
//! the site, the receiver's language picks a `LocalizedText`, `CardRenderer`
//! builds the card and `DeliveryClient` pushes it over a `ChatTransport`.

mod delivery;
mod dispatcher;
pub mod lang;
pub mod links;
mod renderer;

pub use delivery::{DeliveryAttempt, DeliveryClient, RetryPolicy};
pub use dispatcher::{DispatchOutcome, NotificationDispatcher, encode_card};
pub use lang::{Language, LanguageCatalog, LocalizedText};
pub use renderer::{BODY_SEPARATOR, CardRenderer, strip_tags, take_chars, truncate_with_ellipsis};

#[cfg(test)]
pub(crate) use delivery::tests::ScriptedTransport;
