//! # TalkToMe core
//!
//! Shared vocabulary of the journaling companion:
//! - `records`: conversations, journal entries, moods, patterns, thought maps
//! - `lexicon`: keyword tables for emotions, themes, distortions and crisis phrases
//! - `keywords`: tokenizer and substring matcher
//! - `signal`: per-message crisis / emotion detection
//! - `config`: TOML configuration with env overrides

pub mod config;
pub mod error;
pub mod keywords;
pub mod lexicon;
pub mod records;
pub mod signal;

pub use config::{
    AnalysisConfig, DashboardConfig, GraphConfig, ResponderConfig, StorageConfig, TalkConfig,
};
pub use error::{StoreError, TalkError};
pub use keywords::{analysis_tokens, count_matches, extract_keywords, matches_any, tokenize};
pub use lexicon::{Lexicon, LexiconEntry};
pub use records::{
    collect_text_entries, mood_label, Conversation, EntryKey, EntrySource, JournalEntry,
    JournalPatch, Message, Mood, MoodPreset, MoodSnapshot, Pattern, PatternKind, Record,
    RecordKind, Sender, TextEntry, ThoughtMapLink, ThoughtMapNode, ThoughtMapSnapshot,
};
pub use signal::{detect_emotion, detect_signal, Emotion, Signal};
