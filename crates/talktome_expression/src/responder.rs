use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use talktome_core::{detect_signal, Emotion, Message, ResponderConfig, Signal};

use crate::pools::{
    emotion_pool, pick, CRISIS_RESPONSE, DEEPENING_PROMPTS, GREETINGS, PATTERN_PROMPTS,
    VALIDATIONS,
};

/// The companion's answer to one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub signal: Signal,
    /// Detected emotion or crisis label, if any.
    pub label: Option<&'static str>,
    pub color: &'static str,
    /// Set on every crisis message, not only the first.
    pub crisis: bool,
}

impl Reply {
    fn new(text: impl Into<String>, signal: Signal) -> Self {
        Self {
            text: text.into(),
            label: signal.label(),
            color: signal.color(),
            crisis: signal.is_crisis(),
            signal,
        }
    }
}

/// Scripted reply selector. Randomness comes from `R` so tests can seed it.
pub struct Responder<R: Rng = StdRng> {
    rng: R,
    config: ResponderConfig,
}

impl Responder<StdRng> {
    /// Seeded from `config.seed` when present, from entropy otherwise.
    pub fn from_config(config: ResponderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Responder<R> {
    pub fn with_rng(config: ResponderConfig, rng: R) -> Self {
        Self { rng, config }
    }

    pub fn greeting(&mut self) -> &'static str {
        pick(&mut self.rng, GREETINGS)
    }

    /// Reply to `text` given the messages exchanged before it.
    ///
    /// Rules, first match wins:
    /// 1. crisis phrase: fixed safety message
    /// 2. no history: greeting
    /// 3. every `validation_every`-th prior user turn: validation plus follow-up
    /// 4. past `pattern_prompt_after` user turns, on a random draw: pattern prompt
    /// 5. detected emotion: that emotion's pool
    /// 6. otherwise a deepening prompt
    pub fn next_response(&mut self, text: &str, history: &[Message]) -> Reply {
        let signal = detect_signal(text);

        if signal.is_crisis() {
            return Reply::new(CRISIS_RESPONSE, signal);
        }

        if history.is_empty() {
            return Reply::new(self.greeting(), signal);
        }

        let user_turns = history.iter().filter(|m| m.is_user()).count();
        let every = self.config.validation_every;

        if every > 0 && user_turns > 0 && user_turns % every == 0 {
            let validation = pick(&mut self.rng, VALIDATIONS);
            let follow_up = match signal.emotion() {
                Some(emotion) => pick(&mut self.rng, emotion_pool(emotion)),
                None => DEEPENING_PROMPTS[0],
            };
            return Reply::new(format!("{} {}", validation, follow_up), signal);
        }

        if user_turns > self.config.pattern_prompt_after
            && self.rng.gen::<f64>() > self.config.pattern_prompt_threshold
        {
            tracing::debug!("Pattern prompt after {} user turns", user_turns);
            return Reply::new(pick(&mut self.rng, PATTERN_PROMPTS), signal);
        }

        let text = match signal.emotion() {
            Some(emotion) => self.emotion_response(emotion),
            None => pick(&mut self.rng, DEEPENING_PROMPTS),
        };
        Reply::new(text, signal)
    }

    fn emotion_response(&mut self, emotion: Emotion) -> &'static str {
        pick(&mut self.rng, emotion_pool(emotion))
    }
}
