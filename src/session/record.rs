use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one finished session, as stored on disk:
/// `{ "date": "2024-06-05T10:00:00.000Z", "duration": 1500 }`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionRecord {
    /// Moment the session ended.
    pub date: DateTime<Utc>,
    /// Seconds actually worked.
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
}

impl SessionRecord {
    pub fn new(date: DateTime<Utc>, duration_seconds: i64) -> Self {
        Self {
            date,
            duration_seconds,
        }
    }

    /// Only records with positive duration are ever persisted.
    pub fn is_storable(&self) -> bool {
        self.duration_seconds > 0
    }
}
