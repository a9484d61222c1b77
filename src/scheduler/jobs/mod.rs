//! The four recurring jobs.

mod immediate_check;
mod midnight_refresh;
mod scheduled_content;
mod telegram;

pub use immediate_check::ImmediateCheckJob;
pub use midnight_refresh::MidnightRefreshJob;
pub use scheduled_content::ScheduledContentJob;
pub use telegram::TelegramJob;
