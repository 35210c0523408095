use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{record::SessionRecord, slot::SlotStorage};

/// Append-only collection of finished sessions.
///
/// Every failure here is swallowed and logged: an unreadable slot reads as "no sessions", a corrupt
/// entry is skipped, and a failed write loses only that session.
pub struct SessionStore<S: SlotStorage> {
    slot: S,
}

impl<S: SlotStorage> SessionStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Appends `record` if it has positive duration. Returns whether it was stored.
    ///
    /// Nothing is written when the slot can't be read as a JSON array, so an unreadable history is
    /// never replaced by a single session.
    #[instrument(skip(self))]
    pub async fn add(&self, record: SessionRecord) -> bool {
        if !record.is_storable() {
            info!("Session shorter than a second, not stored");
            return false;
        }

        let mut entries = match self.load_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored sessions are unreadable, not storing the new one {e:?}");
                return false;
            }
        };

        // Entries that don't parse as records are written back untouched.
        let result = match serde_json::to_value(&record) {
            Ok(value) => {
                entries.push(value);
                match serde_json::to_string(&entries) {
                    Ok(contents) => self.slot.save(&contents).await,
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                debug!("Stored session, {} in total", entries.len());
                true
            }
            Err(e) => {
                warn!("Failed to store session {e:?}");
                false
            }
        }
    }

    /// Snapshot of every stored session in insertion order. Entries that fail to parse are
    /// skipped one by one.
    pub async fn all(&self) -> Vec<SessionRecord> {
        let entries = match self.load_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read sessions, treating them as empty {e:?}");
                return vec![];
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<SessionRecord>(entry.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping corrupted session {entry}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Raw entries of the slot. A missing slot is empty; anything that isn't a JSON array is an
    /// error.
    async fn load_entries(&self) -> Result<Vec<Value>> {
        match self.slot.load().await? {
            Some(contents) => Ok(serde_json::from_str::<Vec<Value>>(&contents)?),
            None => Ok(vec![]),
        }
    }

    pub async fn count(&self) -> usize {
        self.all().await.len()
    }

    pub async fn clear(&self) {
        match self.slot.remove().await {
            Ok(()) => info!("Sessions cleared"),
            Err(e) => warn!("Failed to clear sessions {e:?}"),
        }
    }
}
