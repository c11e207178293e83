//! Keyword lexicons for emotions, themes, cognitive distortions and crisis phrases.
//!
//! Lexicons are plain data. Every scan goes through [`Lexicon::first_match`]
//! (ordered, first entry wins) or [`Lexicon::hit_counts`] (accumulate all).
//! Matching is case-insensitive substring containment, so multi-word phrases
//! like "no point living" work without tokenizing.

use crate::keywords::{count_matches, matches_any};

/// One labelled keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Stable identifier used in persisted pattern descriptions.
    pub key: &'static str,
    /// Human-readable name used in insight titles.
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// An ordered table of [`LexiconEntry`]. Order is significant for tie-breaks.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub name: &'static str,
    pub entries: &'static [LexiconEntry],
}

impl Lexicon {
    /// First entry (in table order) with any keyword contained in `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static LexiconEntry> {
        self.entries
            .iter()
            .find(|entry| matches_any(text, entry.keywords))
    }

    /// Per-entry keyword hit counts for `text`, in table order.
    ///
    /// Each keyword counts at most once per text, so one text can add to
    /// several entries and several times to the same entry.
    pub fn hit_counts(&self, text: &str) -> Vec<usize> {
        self.entries
            .iter()
            .map(|entry| count_matches(text, entry.keywords))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&'static LexiconEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Emotion lexicon used by the live detector and the thought map.
pub const CHAT_EMOTIONS: Lexicon = Lexicon {
    name: "chat_emotions",
    entries: &[
        LexiconEntry {
            key: "anxiety",
            label: "Anxiety",
            keywords: &[
                "worried",
                "anxious",
                "stressed",
                "nervous",
                "panic",
                "overwhelmed",
                "scared",
                "fear",
            ],
        },
        LexiconEntry {
            key: "sadness",
            label: "Sadness",
            keywords: &[
                "sad", "depressed", "down", "lonely", "hopeless", "empty", "crying", "hurt",
            ],
        },
        LexiconEntry {
            key: "anger",
            label: "Anger",
            keywords: &[
                "angry",
                "frustrated",
                "mad",
                "annoyed",
                "irritated",
                "furious",
                "rage",
            ],
        },
        LexiconEntry {
            key: "joy",
            label: "Joy",
            keywords: &[
                "happy", "excited", "grateful", "content", "peaceful", "good", "great", "amazing",
            ],
        },
        LexiconEntry {
            key: "confusion",
            label: "Confusion",
            keywords: &[
                "confused",
                "lost",
                "uncertain",
                "unsure",
                "stuck",
                "don't know",
                "unclear",
            ],
        },
    ],
};

/// Broader emotion lexicon used for history-wide distribution counts.
pub const EMOTIONS: Lexicon = Lexicon {
    name: "emotions",
    entries: &[
        LexiconEntry {
            key: "anxiety",
            label: "Anxiety",
            keywords: &[
                "worried",
                "anxious",
                "stressed",
                "nervous",
                "panic",
                "overwhelmed",
                "scared",
                "fear",
                "tense",
            ],
        },
        LexiconEntry {
            key: "sadness",
            label: "Sadness",
            keywords: &[
                "sad",
                "depressed",
                "down",
                "lonely",
                "hopeless",
                "empty",
                "crying",
                "hurt",
                "miserable",
            ],
        },
        LexiconEntry {
            key: "anger",
            label: "Anger",
            keywords: &[
                "angry",
                "frustrated",
                "mad",
                "annoyed",
                "irritated",
                "furious",
                "rage",
                "hate",
            ],
        },
        LexiconEntry {
            key: "joy",
            label: "Joy",
            keywords: &[
                "happy",
                "excited",
                "grateful",
                "content",
                "peaceful",
                "good",
                "great",
                "amazing",
                "wonderful",
            ],
        },
        LexiconEntry {
            key: "confusion",
            label: "Confusion",
            keywords: &[
                "confused",
                "lost",
                "uncertain",
                "unsure",
                "stuck",
                "unclear",
                "puzzled",
            ],
        },
    ],
};

pub const COGNITIVE_DISTORTIONS: Lexicon = Lexicon {
    name: "cognitive_distortions",
    entries: &[
        LexiconEntry {
            key: "catastrophizing",
            label: "Catastrophizing",
            keywords: &[
                "worst",
                "disaster",
                "terrible",
                "horrible",
                "never going to",
                "always bad",
            ],
        },
        LexiconEntry {
            key: "black_and_white",
            label: "Black-and-white thinking",
            keywords: &[
                "always",
                "never",
                "everyone",
                "no one",
                "completely",
                "totally",
                "nothing",
            ],
        },
        LexiconEntry {
            key: "mind_reading",
            label: "Mind reading",
            keywords: &[
                "they think",
                "they hate",
                "they don't like",
                "everyone thinks",
                "people judge",
            ],
        },
        LexiconEntry {
            key: "should_statements",
            label: "Should statements",
            keywords: &[
                "should",
                "must",
                "have to",
                "need to",
                "supposed to",
                "ought to",
            ],
        },
        LexiconEntry {
            key: "personalization",
            label: "Personalization",
            keywords: &[
                "my fault",
                "because of me",
                "i caused",
                "i made them",
                "i'm responsible",
            ],
        },
    ],
};

pub const THEMES: Lexicon = Lexicon {
    name: "themes",
    entries: &[
        LexiconEntry {
            key: "relationships",
            label: "Relationships",
            keywords: &[
                "friend",
                "family",
                "parent",
                "mom",
                "dad",
                "boyfriend",
                "girlfriend",
                "partner",
                "relationship",
            ],
        },
        LexiconEntry {
            key: "work",
            label: "Work",
            keywords: &[
                "work", "job", "boss", "career", "office", "coworker", "meeting", "deadline",
                "project",
            ],
        },
        LexiconEntry {
            key: "school",
            label: "School",
            keywords: &[
                "school", "class", "teacher", "homework", "exam", "test", "grade", "college",
                "study",
            ],
        },
        LexiconEntry {
            key: "health",
            label: "Health",
            keywords: &[
                "sick", "tired", "sleep", "energy", "health", "body", "eating", "exercise",
            ],
        },
        LexiconEntry {
            key: "self_worth",
            label: "Self-worth",
            keywords: &[
                "worthless",
                "not good enough",
                "failure",
                "loser",
                "stupid",
                "ugly",
                "hate myself",
            ],
        },
    ],
};

/// Self-harm and suicide indicators. Any hit overrides every other signal.
pub const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end it all",
    "hurt myself",
    "self-harm",
    "no point living",
    "want to die",
];
