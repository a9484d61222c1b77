use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable unique identifier of a subscriber record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for SubscriberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subscriber record as returned by the directory service.
///
/// Treated as an immutable snapshot for the duration of one cycle; the
/// directory owns the authoritative state.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub is_pro: bool,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub watchlist: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub narratives: Vec<String>,
    #[serde(default)]
    pub preferences_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_content_update_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_telegram_sent_at: Option<DateTime<Utc>>,
}

/// Filter predicate for directory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriberFilter {
    pub is_pro: bool,
    pub notification_channel_not_null: bool,
}

impl SubscriberFilter {
    /// All pro subscribers.
    pub fn pro() -> Self {
        Self {
            is_pro: true,
            notification_channel_not_null: false,
        }
    }

    /// Pro subscribers that have a notification channel configured.
    pub fn pro_with_channel() -> Self {
        Self {
            is_pro: true,
            notification_channel_not_null: true,
        }
    }

    /// Whether a record satisfies this filter.
    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        if self.is_pro && !subscriber.is_pro {
            return false;
        }
        if self.notification_channel_not_null && subscriber.telegram_chat_id.is_none() {
            return false;
        }
        true
    }
}
