//! Per-message classification: crisis, emotion, or nothing.

use serde::{Deserialize, Serialize};

use crate::keywords::matches_any;
use crate::lexicon::{CHAT_EMOTIONS, CRISIS_PHRASES};

pub const NEUTRAL_LABEL: &str = "Neutral";
pub const NEUTRAL_COLOR: &str = "#a0aec0";
pub const CRISIS_LABEL: &str = "Crisis";
pub const CRISIS_COLOR: &str = "#e53e3e";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Anxiety,
    Sadness,
    Anger,
    Joy,
    Confusion,
}

impl Emotion {
    /// Detection order. Earlier emotions win ties.
    pub const ALL: [Emotion; 5] = [
        Emotion::Anxiety,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Joy,
        Emotion::Confusion,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Emotion::Anxiety => "anxiety",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Joy => "joy",
            Emotion::Confusion => "confusion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Anxiety => "Anxiety",
            Emotion::Sadness => "Sadness",
            Emotion::Anger => "Anger",
            Emotion::Joy => "Joy",
            Emotion::Confusion => "Confusion",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Emotion::Anxiety => "#f6ad55",
            Emotion::Sadness => "#63b3ed",
            Emotion::Anger => "#fc8181",
            Emotion::Joy => "#68d391",
            Emotion::Confusion => "#b794f4",
        }
    }

    pub fn from_key(key: &str) -> Option<Emotion> {
        Self::ALL.into_iter().find(|e| e.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Emotion> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }
}

/// Categorical result of scanning one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "emotion")]
pub enum Signal {
    Crisis,
    Emotion(Emotion),
    None,
}

impl Signal {
    pub fn is_crisis(&self) -> bool {
        matches!(self, Signal::Crisis)
    }

    pub fn emotion(&self) -> Option<Emotion> {
        match self {
            Signal::Emotion(e) => Some(*e),
            _ => None,
        }
    }

    /// Display label, `None` when nothing was detected.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Signal::Crisis => Some(CRISIS_LABEL),
            Signal::Emotion(e) => Some(e.label()),
            Signal::None => None,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Signal::Crisis => CRISIS_COLOR,
            Signal::Emotion(e) => e.color(),
            Signal::None => NEUTRAL_COLOR,
        }
    }
}

pub fn is_crisis(text: &str) -> bool {
    matches_any(text, CRISIS_PHRASES)
}

/// First matching emotion in detection order, ignoring crisis phrases.
pub fn detect_emotion(text: &str) -> Option<Emotion> {
    CHAT_EMOTIONS
        .first_match(text)
        .and_then(|entry| Emotion::from_key(entry.key))
}

/// Crisis takes precedence over every emotion.
pub fn detect_signal(text: &str) -> Signal {
    if is_crisis(text) {
        return Signal::Crisis;
    }
    match detect_emotion(text) {
        Some(emotion) => Signal::Emotion(emotion),
        None => Signal::None,
    }
}

/// Color for an arbitrary emotion or mood label; unknown labels are neutral.
pub fn color_for_label(label: &str) -> &'static str {
    Emotion::from_label(label)
        .map(|e| e.color())
        .unwrap_or(NEUTRAL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_overrides_emotion() {
        let signal = detect_signal("I feel so anxious I want to end it all");
        assert_eq!(signal, Signal::Crisis);
        assert!(signal.is_crisis());
        assert_eq!(signal.label(), Some("Crisis"));
        assert_eq!(signal.color(), CRISIS_COLOR);
    }

    #[test]
    fn test_kill_myself_is_crisis() {
        assert_eq!(detect_signal("I want to kill myself"), Signal::Crisis);
    }

    #[test]
    fn test_emotion_detection() {
        assert_eq!(
            detect_signal("I'm really frustrated with everything"),
            Signal::Emotion(Emotion::Anger)
        );
        assert_eq!(
            detect_signal("I just don't know anymore"),
            Signal::Emotion(Emotion::Confusion)
        );
    }

    #[test]
    fn test_first_emotion_wins() {
        // joy ("happy") and anxiety ("nervous"); anxiety comes first
        assert_eq!(
            detect_signal("happy but nervous"),
            Signal::Emotion(Emotion::Anxiety)
        );
    }

    #[test]
    fn test_no_signal() {
        let signal = detect_signal("The weather is cloudy today");
        assert_eq!(signal, Signal::None);
        assert_eq!(signal.label(), None);
        assert_eq!(signal.color(), NEUTRAL_COLOR);
    }

    #[test]
    fn test_color_for_label() {
        assert_eq!(color_for_label("Joy"), "#68d391");
        assert_eq!(color_for_label("Great"), NEUTRAL_COLOR);
    }

    #[test]
    fn test_signal_serde_shape() {
        let json = serde_json::to_string(&Signal::Emotion(Emotion::Joy)).unwrap();
        assert_eq!(json, r#"{"type":"emotion","emotion":"joy"}"#);
        let json = serde_json::to_string(&Signal::Crisis).unwrap();
        assert_eq!(json, r#"{"type":"crisis"}"#);
    }
}
