mod card;
mod notification;
mod site;

pub use card::{CardButton, MessageCategory, MessageRequest, RenderedCard};
pub use notification::{ActionTarget, NotificationEvent, NotificationKind, Receiver};
pub use site::{PermalinkStyle, SiteGeneral, SiteSeo};
