//! Persisted records and the analysis units derived from them.
//!
//! Field names serialize in camelCase so stored JSON keeps the shape the
//! browser version wrote (`createdAt`, `fullText`, ...).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Record kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Conversations,
    JournalEntries,
    Moods,
    ThoughtMaps,
    Patterns,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Conversations,
        RecordKind::JournalEntries,
        RecordKind::Moods,
        RecordKind::ThoughtMaps,
        RecordKind::Patterns,
    ];

    /// Key under which the list of records of this kind is stored.
    pub fn storage_key(&self) -> &'static str {
        match self {
            RecordKind::Conversations => "ttm_conversations",
            RecordKind::JournalEntries => "ttm_journal",
            RecordKind::Moods => "ttm_moods",
            RecordKind::ThoughtMaps => "ttm_maps",
            RecordKind::Patterns => "ttm_patterns",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// A value the record store can keep in one of its lists.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> Uuid;

    /// Refresh the record's modification time. Records without one ignore it.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

// ============================================================================
// Conversations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// A finished chat session. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl Conversation {
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_user())
    }
}

impl Record for Conversation {
    const KIND: RecordKind = RecordKind::Conversations;

    fn id(&self) -> Uuid {
        self.id
    }
}

// ============================================================================
// Journal and moods
// ============================================================================

/// Mood attached to a journal entry at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSnapshot {
    pub label: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub mood: Option<MoodSnapshot>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Case-insensitive match against content or any tag.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.content.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }
}

impl Record for JournalEntry {
    const KIND: RecordKind = RecordKind::JournalEntries;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Partial update for a journal entry. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalPatch {
    pub content: Option<String>,
    pub mood: Option<Option<MoodSnapshot>>,
    pub tags: Option<BTreeSet<String>>,
}

impl JournalPatch {
    pub fn apply(self, entry: &mut JournalEntry) {
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(mood) = self.mood {
            entry.mood = mood;
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
    }
}

/// Append-only mood log entry. Scores live in `[0, 10]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: Uuid,
    pub score: f32,
    pub label: String,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl Record for Mood {
    const KIND: RecordKind = RecordKind::Moods;

    fn id(&self) -> Uuid {
        self.id
    }
}

pub const MOOD_SCORE_MIN: f32 = 0.0;
pub const MOOD_SCORE_MAX: f32 = 10.0;

pub fn is_valid_mood_score(score: f32) -> bool {
    score.is_finite() && (MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(&score)
}

/// Dashboard wording for a numeric mood.
pub fn mood_label(score: f32) -> &'static str {
    if score >= 8.0 {
        "Great"
    } else if score >= 6.0 {
        "Good"
    } else if score >= 4.0 {
        "Okay"
    } else if score >= 2.0 {
        "Low"
    } else {
        "Struggling"
    }
}

/// One of the fixed choices offered when writing a journal entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodPreset {
    pub emoji: &'static str,
    pub label: &'static str,
    pub score: f32,
    pub color: &'static str,
}

impl MoodPreset {
    pub fn snapshot(&self) -> MoodSnapshot {
        MoodSnapshot {
            label: self.label.to_string(),
            score: self.score,
            emoji: Some(self.emoji.to_string()),
            color: Some(self.color.to_string()),
        }
    }
}

pub const MOOD_PRESETS: &[MoodPreset] = &[
    MoodPreset { emoji: "😊", label: "Great", score: 9.0, color: "#48bb78" },
    MoodPreset { emoji: "🙂", label: "Good", score: 7.0, color: "#68d391" },
    MoodPreset { emoji: "😐", label: "Okay", score: 5.0, color: "#ecc94b" },
    MoodPreset { emoji: "😔", label: "Low", score: 3.0, color: "#ed8936" },
    MoodPreset { emoji: "😢", label: "Sad", score: 2.0, color: "#fc8181" },
    MoodPreset { emoji: "😰", label: "Anxious", score: 2.0, color: "#f6ad55" },
];

pub fn mood_preset(label: &str) -> Option<&'static MoodPreset> {
    MOOD_PRESETS
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label))
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Emotion,
    Theme,
    Cognitive,
}

/// A recurring emotion, theme or distortion. At most one per description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub description: String,
    pub frequency: u32,
    pub first_detected: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Record for Pattern {
    const KIND: RecordKind = RecordKind::Patterns;

    fn id(&self) -> Uuid {
        self.id
    }
}

// ============================================================================
// Thought map
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Conversation,
    Journal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtMapNode {
    pub id: String,
    /// Truncated preview.
    pub text: String,
    pub full_text: String,
    pub emotion: String,
    pub color: String,
    pub source: EntrySource,
    pub size: u32,
    #[serde(default)]
    pub is_pattern: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Undirected edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThoughtMapLink {
    pub source: String,
    pub target: String,
}

impl ThoughtMapLink {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtMapSnapshot {
    pub id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub nodes: Vec<ThoughtMapNode>,
    pub connections: Vec<ThoughtMapLink>,
    pub created_at: DateTime<Utc>,
}

impl Record for ThoughtMapSnapshot {
    const KIND: RecordKind = RecordKind::ThoughtMaps;

    fn id(&self) -> Uuid {
        self.id
    }
}

// ============================================================================
// Text entries
// ============================================================================

/// Where a text entry came from. Doubles as the graph node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// N-th user message of the N-th stored conversation.
    Conversation { conversation: usize, message: usize },
    Journal { index: usize },
    /// Message typed during the session that is still open.
    Live { seq: u64 },
}

impl EntryKey {
    pub fn source(&self) -> EntrySource {
        match self {
            EntryKey::Journal { .. } => EntrySource::Journal,
            EntryKey::Conversation { .. } | EntryKey::Live { .. } => EntrySource::Conversation,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Conversation {
                conversation,
                message,
            } => write!(f, "conv-{}-{}", conversation, message),
            EntryKey::Journal { index } => write!(f, "journal-{}", index),
            EntryKey::Live { seq } => write!(f, "current-{}", seq),
        }
    }
}

/// Unit of analysis derived from a user message or a journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub key: EntryKey,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Label of the mood attached to a journal entry, if any.
    pub mood_label: Option<String>,
}

impl TextEntry {
    pub fn live(seq: u64, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: EntryKey::Live { seq },
            text: text.into(),
            timestamp,
            mood_label: None,
        }
    }

    pub fn source(&self) -> EntrySource {
        self.key.source()
    }
}

/// User messages of every conversation followed by every journal entry,
/// in stored order.
pub fn collect_text_entries(
    conversations: &[Conversation],
    journals: &[JournalEntry],
) -> Vec<TextEntry> {
    let mut entries = Vec::new();

    for (conv_idx, conv) in conversations.iter().enumerate() {
        for (msg_idx, msg) in conv.user_messages().enumerate() {
            entries.push(TextEntry {
                key: EntryKey::Conversation {
                    conversation: conv_idx,
                    message: msg_idx,
                },
                text: msg.text.clone(),
                timestamp: msg.timestamp,
                mood_label: None,
            });
        }
    }

    for (idx, journal) in journals.iter().enumerate() {
        entries.push(TextEntry {
            key: EntryKey::Journal { index: idx },
            text: journal.content.clone(),
            timestamp: journal.created_at,
            mood_label: journal.mood.as_ref().map(|m| m.label.clone()),
        });
    }

    entries
}
