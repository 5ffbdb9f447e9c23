//! Access stat entity recorded by each verification pass.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single write-once access record.
///
/// One is appended per verification pass, whether or not the observed status
/// changed, so analytics capture every access attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessStat {
    pub id: Uuid,
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
    pub status_code: u16,
}

/// Input data for appending an access stat.
///
/// The identity and timestamp are assigned by the caller, not the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessStat {
    pub id: Uuid,
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
    pub status_code: u16,
}

impl NewAccessStat {
    /// Builds a stat with a fresh identity stamped with the current time.
    pub fn now(link_id: i64, referrer: &str, user_agent: &str, status_code: u16) -> Self {
        Self {
            id: Uuid::new_v4(),
            link_id,
            created_at: Utc::now(),
            referrer: referrer.to_string(),
            user_agent: user_agent.to_string(),
            status_code,
        }
    }
}

impl From<NewAccessStat> for AccessStat {
    fn from(stat: NewAccessStat) -> Self {
        Self {
            id: stat.id,
            link_id: stat.link_id,
            created_at: stat.created_at,
            referrer: stat.referrer,
            user_agent: stat.user_agent,
            status_code: stat.status_code,
        }
    }
}
