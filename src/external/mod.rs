//! Integrations with systems outside this crate.
//!
//! The chat network is reached through the `ChatTransport` trait, with the
//! HTTP relay as the shipped implementation. Site settings come through
//! `SiteInfoProvider`.

pub mod client;
mod relay;
mod site_info;
mod transport;

pub use relay::RelayTransport;
pub use site_info::{SiteInfoProvider, StaticSiteInfo};
pub use transport::{ChatTransport, unique_conversation_id};
