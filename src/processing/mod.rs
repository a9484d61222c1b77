//! Downstream processing of subscribers: content refresh calls to the
//! content processor service, Telegram notification dispatch, and the
//! staleness policy deciding which subscribers need work.

mod http_content;
mod noop;
mod policy;
mod telegram;
mod trait_def;

pub use http_content::HttpContentProcessor;
pub use noop::{NoOpContentProcessor, NoOpNotifier};
pub use policy::{StalenessPolicy, UpdatePolicy};
pub use telegram::TelegramNotifier;
pub use trait_def::{ContentProcessor, NotificationProcessor, ProcessingError};
