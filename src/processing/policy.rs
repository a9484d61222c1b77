//! Staleness rules deciding which subscribers need a refresh.

use crate::config::PolicySettings;
use crate::directory::Subscriber;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Decides whether a subscriber needs work in a given cycle.
pub trait UpdatePolicy: Send + Sync {
    /// Whether the subscriber's content is stale enough for the regular
    /// refresh.
    fn needs_scheduled_update(&self, subscriber: &Subscriber, now: DateTime<Utc>) -> bool;

    /// Whether the subscriber changed preferences recently enough to warrant
    /// an out-of-band refresh.
    fn needs_immediate_update(&self, subscriber: &Subscriber, now: DateTime<Utc>) -> bool;
}

/// Age-based policy.
///
/// Scheduled refresh triggers when content was never generated or is older
/// than `max_content_age`. Immediate refresh triggers when preferences were
/// updated after the last content update and within `immediate_window` of
/// now.
pub struct StalenessPolicy {
    max_content_age: ChronoDuration,
    immediate_window: ChronoDuration,
}

impl StalenessPolicy {
    pub fn new(max_content_age: ChronoDuration, immediate_window: ChronoDuration) -> Self {
        Self {
            max_content_age,
            immediate_window,
        }
    }

    pub fn from_settings(settings: &PolicySettings) -> Self {
        Self::new(
            ChronoDuration::hours(settings.max_content_age_hours as i64),
            ChronoDuration::minutes(settings.immediate_window_minutes as i64),
        )
    }
}

impl UpdatePolicy for StalenessPolicy {
    fn needs_scheduled_update(&self, subscriber: &Subscriber, now: DateTime<Utc>) -> bool {
        match subscriber.last_content_update_at {
            Some(updated_at) => now - updated_at >= self.max_content_age,
            None => true,
        }
    }

    fn needs_immediate_update(&self, subscriber: &Subscriber, now: DateTime<Utc>) -> bool {
        let Some(prefs_at) = subscriber.preferences_updated_at else {
            return false;
        };
        if now - prefs_at > self.immediate_window {
            return false;
        }
        match subscriber.last_content_update_at {
            Some(updated_at) => prefs_at > updated_at,
            None => true,
        }
    }
}
