//! Wellness coordinator: ties the record store to the analysis engines.
//!
//! Hosts (the CLI, a chat session) talk to this type instead of the store
//! directly. It owns the rules that span several record kinds:
//! - a journal entry saved with a mood also lands in the mood log
//! - analysis runs persist their recurring counts as patterns
//! - a full thought-map rebuild stores a snapshot when the graph is non-empty
//!
//! Failed writes that are side effects of a read-style operation (pattern
//! persistence, snapshots) are logged and swallowed. Writes the caller asked
//! for directly are returned as errors.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use talktome_core::records::{is_valid_mood_score, mood_label};
use talktome_core::{
    collect_text_entries, Conversation, JournalEntry, JournalPatch, Message, Mood, MoodSnapshot,
    Record, StoreError, TalkConfig, TalkError, TextEntry,
};
use uuid::Uuid;

use crate::dashboard::{Dashboard, DashboardAggregator, DashboardInputs};
use crate::patterns::{Analysis, PatternAnalyzer, PatternSummary};
use crate::sqlite::SqliteKv;
use crate::store::RecordStore;
use crate::thought_map::ThoughtGraph;

pub struct WellnessCoordinator {
    store: Arc<RecordStore>,
    config: TalkConfig,
    analyzer: PatternAnalyzer,
    aggregator: DashboardAggregator,
}

impl WellnessCoordinator {
    pub fn new(store: Arc<RecordStore>, config: TalkConfig) -> Self {
        Self {
            analyzer: PatternAnalyzer::new(config.analysis.clone()),
            aggregator: DashboardAggregator::new(config.dashboard.clone()),
            store,
            config,
        }
    }

    /// Coordinator over a fresh in-memory store.
    pub fn in_memory(config: TalkConfig) -> Self {
        Self::new(Arc::new(RecordStore::in_memory()), config)
    }

    /// Coordinator over the SQLite database at `path`, created if missing.
    pub async fn open<P: AsRef<Path>>(path: P, config: TalkConfig) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory {}", parent.display())
            })?;
        }
        let kv = SqliteKv::new(path)
            .await
            .with_context(|| format!("Failed to open record database {}", path.display()))?;
        tracing::info!("Opened record database at {}", path.display());
        Ok(Self::new(Arc::new(RecordStore::new(Arc::new(kv))), config))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &TalkConfig {
        &self.config
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// User messages of every stored conversation, then every journal entry.
    pub async fn text_entries(&self) -> Vec<TextEntry> {
        let conversations = self.store.conversations().await;
        let journals = self.store.journal_entries().await;
        collect_text_entries(&conversations, &journals)
    }

    /// Analyze the full history and record recurring counts as patterns.
    pub async fn analyze_patterns(&self, now: DateTime<Utc>) -> Analysis {
        let entries = self.text_entries().await;
        let analysis = self.analyzer.analyze(&entries);

        let candidates = analysis.pattern_candidates(self.analyzer.config());
        for candidate in &candidates {
            let frequency = u32::try_from(candidate.count).unwrap_or(u32::MAX);
            if let Err(e) = self
                .store
                .save_pattern(candidate.kind, &candidate.description, frequency, now)
                .await
            {
                tracing::warn!(
                    "Failed to persist pattern '{}': {}",
                    candidate.description,
                    e
                );
            }
        }
        if !candidates.is_empty() {
            tracing::info!("Recorded {} recurring patterns", candidates.len());
        }

        analysis
    }

    pub async fn pattern_summary(&self, now: DateTime<Utc>) -> PatternSummary {
        self.analyze_patterns(now).await.summary()
    }

    /// Batch-build the thought map over the full history. A snapshot is
    /// stored whenever the graph has at least one node.
    pub async fn rebuild_thought_map(&self, now: DateTime<Utc>) -> ThoughtGraph {
        let entries = self.text_entries().await;
        let graph = ThoughtGraph::build(&entries, &self.config.graph);

        if !graph.is_empty() {
            match self
                .store
                .save_thought_map(graph.nodes.clone(), graph.links.clone(), None, now)
                .await
            {
                Ok(snapshot) => tracing::info!(
                    "Saved thought map snapshot {} ({} nodes, {} links)",
                    snapshot.id,
                    snapshot.nodes.len(),
                    snapshot.connections.len()
                ),
                Err(e) => tracing::warn!("Failed to save thought map snapshot: {}", e),
            }
        }

        graph
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        let conversations = self.store.conversations().await;
        let journals = self.store.journal_entries().await;
        let moods = self.store.moods().await;
        let patterns = self.store.patterns().await;

        self.aggregator.build(
            DashboardInputs {
                conversations: &conversations,
                journals: &journals,
                moods: &moods,
                patterns: &patterns,
            },
            now,
        )
    }

    // ========================================================================
    // Journal
    // ========================================================================

    /// Save a journal entry. A mood snapshot is also appended to the mood log.
    pub async fn write_journal<I, S>(
        &self,
        content: &str,
        mood: Option<MoodSnapshot>,
        tags: I,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, TalkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = content.trim();
        if content.is_empty() {
            return Err(TalkError::EmptyJournalEntry);
        }
        if let Some(m) = &mood {
            if !is_valid_mood_score(m.score) {
                return Err(TalkError::InvalidMoodScore(m.score));
            }
        }

        let entry = self
            .store
            .save_journal_entry(content, mood.clone(), normalize_tags(tags), now)
            .await?;

        if let Some(m) = mood {
            if let Err(e) = self.store.save_mood(m.score, m.label.as_str(), "", now).await {
                tracing::warn!("Journal entry {} saved but its mood was not: {}", entry.id, e);
            }
        }

        tracing::debug!("Saved journal entry {}", entry.id);
        Ok(entry)
    }

    pub async fn edit_journal(
        &self,
        id: Uuid,
        mut patch: JournalPatch,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, TalkError> {
        if let Some(content) = patch.content.as_mut() {
            *content = content.trim().to_string();
            if content.is_empty() {
                return Err(TalkError::EmptyJournalEntry);
            }
        }
        if let Some(Some(m)) = &patch.mood {
            if !is_valid_mood_score(m.score) {
                return Err(TalkError::InvalidMoodScore(m.score));
            }
        }
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(normalize_tags(tags));
        }

        self.store
            .update_journal_entry(id, patch, now)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: JournalEntry::KIND,
                    id,
                }
                .into()
            })
    }

    /// Returns whether an entry was removed.
    pub async fn delete_journal(&self, id: Uuid) -> Result<bool, TalkError> {
        Ok(self.store.delete_journal_entry(id).await?)
    }

    /// Case-insensitive search over content and tags, newest first.
    pub async fn search_journal(&self, query: &str) -> Vec<JournalEntry> {
        let query = query.trim();
        if query.is_empty() {
            return self.store.journal_entries().await;
        }
        self.store
            .query_filtered(|entry: &JournalEntry| entry.matches_query(query))
            .await
    }

    // ========================================================================
    // Moods and conversations
    // ========================================================================

    /// Append to the mood log. Without a label, the score's standard label is used.
    pub async fn log_mood(
        &self,
        score: f32,
        label: Option<&str>,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<Mood, TalkError> {
        if !is_valid_mood_score(score) {
            return Err(TalkError::InvalidMoodScore(score));
        }
        let label = label.unwrap_or_else(|| mood_label(score));
        Ok(self.store.save_mood(score, label, notes, now).await?)
    }

    /// Persist a finished chat. Nothing is stored unless the session holds
    /// more than the opening greeting.
    pub async fn record_conversation(
        &self,
        messages: Vec<Message>,
        emotions: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Conversation>, TalkError> {
        if messages.len() <= 1 {
            tracing::debug!("Session had no exchange, not stored");
            return Ok(None);
        }
        let conversation = self
            .store
            .save_conversation(messages, emotions, Vec::new(), now)
            .await?;
        tracing::info!(
            "Stored conversation {} with {} messages",
            conversation.id,
            conversation.messages.len()
        );
        Ok(Some(conversation))
    }
}

/// Trimmed, non-empty, deduplicated tags.
fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
