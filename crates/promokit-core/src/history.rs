//! Bounded, newest-first history of generated kits.
//!
//! Only the in-memory model lives here; where the serialized history is stored
//! is up to the caller.

use crate::error::Result;
use crate::types::{PromotionKit, ProviderKind, SongMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

/// Default number of kits retained
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// A generated kit together with the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedKit {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub form_data: SongMetadata,
    pub kit_data: PromotionKit,
    pub provider_used: ProviderKind,
}

impl SavedKit {
    pub fn new(form_data: SongMetadata, kit_data: PromotionKit, provider_used: ProviderKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            form_data,
            kit_data,
            provider_used,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KitHistory {
    entries: VecDeque<SavedKit>,
    limit: usize,
}

impl Default for KitHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl KitHistory {
    /// A zero limit is treated as one so the latest kit is always kept
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Add a kit as the newest entry, evicting the oldest beyond the limit
    pub fn record(&mut self, kit: SavedKit) -> Uuid {
        let id = kit.id;
        self.entries.push_front(kit);
        while self.entries.len() > self.limit {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(id = %evicted.id, "Evicted oldest kit from history");
            }
        }
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedKit> {
        self.entries.iter().find(|kit| kit.id == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<SavedKit> {
        let index = self.entries.iter().position(|kit| kit.id == id)?;
        self.entries.remove(index)
    }

    pub fn latest(&self) -> Option<&SavedKit> {
        self.entries.front()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &SavedKit> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Restore a serialized history; entries past the limit are dropped
    pub fn from_json(json: &str, limit: usize) -> Result<Self> {
        let saved: Vec<SavedKit> = serde_json::from_str(json)?;
        let mut history = Self::with_limit(limit);
        history.entries = saved.into_iter().take(history.limit).collect();
        Ok(history)
    }
}
