//! Typed record adapter over a [`KeyValueStore`].
//!
//! Each record kind lives under its own key as a JSON array, newest first.
//! Reads degrade to "no data": an unreadable list logs a warning and yields
//! an empty collection, a malformed element is skipped on its own. Writes
//! report failure to the caller and never overwrite a list they could not
//! decode.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use talktome_core::{
    Conversation, JournalEntry, JournalPatch, Message, Mood, MoodSnapshot, Pattern, PatternKind,
    Record, StoreError, ThoughtMapLink, ThoughtMapNode, ThoughtMapSnapshot,
};
use uuid::Uuid;

use crate::kv::{InMemoryKv, KeyValueStore};

pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles issued through this adapter.
    write_lock: tokio::sync::Mutex<()>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKv::new()))
    }

    // ------------------------------------------------------------------
    // Raw list access
    // ------------------------------------------------------------------

    async fn load<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let Some(raw) = self.kv.get(R::KIND.storage_key()).await? else {
            return Ok(Vec::new());
        };

        let values: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Serialization {
                kind: R::KIND,
                source,
            })?;

        let total = values.len();
        let records: Vec<R> = values
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<R>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} record #{}: {}", R::KIND, idx, e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            tracing::debug!(
                "Loaded {}/{} {} records",
                records.len(),
                total,
                R::KIND
            );
        }
        Ok(records)
    }

    async fn save<R: Record>(&self, records: &[R]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records).map_err(|source| StoreError::Serialization {
            kind: R::KIND,
            source,
        })?;
        self.kv.set(R::KIND.storage_key(), &json).await
    }

    // ------------------------------------------------------------------
    // Generic operations
    // ------------------------------------------------------------------

    /// All records of a kind, newest first. Empty if the list cannot be read.
    pub async fn query<R: Record>(&self) -> Vec<R> {
        match self.load::<R>().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to read {}, treating as empty: {}", R::KIND, e);
                Vec::new()
            }
        }
    }

    pub async fn query_filtered<R, F>(&self, filter: F) -> Vec<R>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        self.query::<R>().await.into_iter().filter(|r| filter(r)).collect()
    }

    pub async fn get<R: Record>(&self, id: Uuid) -> Option<R> {
        self.query::<R>().await.into_iter().find(|r| r.id() == id)
    }

    /// Insert at the front of the list and return the stored record.
    pub async fn append<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        records.insert(0, record.clone());
        self.save(&records).await?;
        tracing::debug!("Appended {} record {}", R::KIND, record.id());
        Ok(record)
    }

    /// Apply `change` to the record with `id` and refresh its modification time.
    /// Returns `Ok(None)` if no such record exists.
    pub async fn update<R, F>(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        change: F,
    ) -> Result<Option<R>, StoreError>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            tracing::debug!("Update of missing {} record {} ignored", R::KIND, id);
            return Ok(None);
        };
        change(record);
        record.touch(now);
        let updated = record.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    /// Delete by id. Returns whether a record was removed.
    pub async fn remove<R: Record>(&self, id: Uuid) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    /// Update the first record accepted by `matches`, or insert a new one at
    /// the front when none is.
    pub async fn upsert_by<R, M, I, U>(
        &self,
        matches: M,
        on_insert: I,
        on_update: U,
    ) -> Result<R, StoreError>
    where
        R: Record,
        M: Fn(&R) -> bool + Send,
        I: FnOnce() -> R + Send,
        U: FnOnce(&mut R) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;

        let result = match records.iter_mut().find(|r| matches(&**r)) {
            Some(existing) => {
                on_update(existing);
                existing.clone()
            }
            None => {
                let record = on_insert();
                records.insert(0, record.clone());
                record
            }
        };

        self.save(&records).await?;
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    pub async fn save_conversation(
        &self,
        messages: Vec<Message>,
        emotions: Vec<String>,
        insights: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Conversation, StoreError> {
        self.append(Conversation {
            id: Uuid::new_v4(),
            timestamp: now,
            messages,
            emotions,
            insights,
        })
        .await
    }

    pub async fn conversations(&self) -> Vec<Conversation> {
        self.query().await
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    pub async fn save_journal_entry(
        &self,
        content: impl Into<String>,
        mood: Option<MoodSnapshot>,
        tags: BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError> {
        self.append(JournalEntry {
            id: Uuid::new_v4(),
            content: content.into(),
            mood,
            tags,
            created_at: now,
            updated_at: now,
        })
        .await
    }

    pub async fn update_journal_entry(
        &self,
        id: Uuid,
        patch: JournalPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JournalEntry>, StoreError> {
        self.update(id, now, move |entry: &mut JournalEntry| patch.apply(entry))
            .await
    }

    pub async fn delete_journal_entry(&self, id: Uuid) -> Result<bool, StoreError> {
        self.remove::<JournalEntry>(id).await
    }

    pub async fn journal_entries(&self) -> Vec<JournalEntry> {
        self.query().await
    }

    // ------------------------------------------------------------------
    // Moods
    // ------------------------------------------------------------------

    pub async fn save_mood(
        &self,
        score: f32,
        label: impl Into<String>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Mood, StoreError> {
        self.append(Mood {
            id: Uuid::new_v4(),
            score,
            label: label.into(),
            notes: notes.into(),
            timestamp: now,
        })
        .await
    }

    pub async fn moods(&self) -> Vec<Mood> {
        self.query().await
    }

    /// Moods logged at or after `now - days`.
    pub async fn moods_since(&self, days: u32, now: DateTime<Utc>) -> Vec<Mood> {
        let cutoff = now - Duration::days(i64::from(days));
        self.query_filtered(|m: &Mood| m.timestamp >= cutoff).await
    }

    // ------------------------------------------------------------------
    // Thought maps
    // ------------------------------------------------------------------

    pub async fn save_thought_map(
        &self,
        nodes: Vec<ThoughtMapNode>,
        connections: Vec<ThoughtMapLink>,
        conversation_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<ThoughtMapSnapshot, StoreError> {
        self.append(ThoughtMapSnapshot {
            id: Uuid::new_v4(),
            conversation_id,
            nodes,
            connections,
            created_at: now,
        })
        .await
    }

    pub async fn thought_maps(&self) -> Vec<ThoughtMapSnapshot> {
        self.query().await
    }

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------

    /// Record a sighting of a pattern. A known description gains one
    /// occurrence and a fresh `last_seen`; a new one is stored with
    /// `frequency` as given.
    pub async fn save_pattern(
        &self,
        kind: PatternKind,
        description: &str,
        frequency: u32,
        now: DateTime<Utc>,
    ) -> Result<Pattern, StoreError> {
        let pattern = self
            .upsert_by(
                |p: &Pattern| p.description == description,
                || Pattern {
                    id: Uuid::new_v4(),
                    kind,
                    description: description.to_string(),
                    frequency: frequency.max(1),
                    first_detected: now,
                    last_seen: now,
                },
                |p: &mut Pattern| {
                    p.frequency = p.frequency.saturating_add(1);
                    p.last_seen = now;
                },
            )
            .await?;
        tracing::debug!(
            "Pattern '{}' now at frequency {}",
            pattern.description,
            pattern.frequency
        );
        Ok(pattern)
    }

    pub async fn patterns(&self) -> Vec<Pattern> {
        self.query().await
    }
}
