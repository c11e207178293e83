use thiserror::Error;
use uuid::Uuid;

use crate::records::RecordKind;

/// Failure reported by a storage backend or the record adapter on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to (de)serialize {kind}: {source}")]
    Serialization {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("{kind} record {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },
}

#[derive(Debug, Error)]
pub enum TalkError {
    #[error("mood score {0} is outside [0, 10]")]
    InvalidMoodScore(f32),

    #[error("journal entry content is empty")]
    EmptyJournalEntry,

    #[error(transparent)]
    Store(#[from] StoreError),
}
