//! Settings: typed sections, layered loading and startup validation.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::{ConfigError, Section};
pub use loader::ConfigLoader;
pub use settings::{
    BotConfig, CardConfig, DeliveryConfig, Settings, SiteConfig, TransportConfig,
};
