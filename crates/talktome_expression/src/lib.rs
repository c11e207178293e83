mod affirmations;
mod pools;
mod responder;
mod session;

pub use affirmations::{affirmation, journal_prompt, AFFIRMATIONS, JOURNAL_PROMPTS};
pub use pools::{CRISIS_RESPONSE, GREETINGS};
pub use responder::{Reply, Responder};
pub use session::{ChatSession, EndedSession, SessionMood};
