//! Fixed reply pools.

use rand::seq::SliceRandom;
use rand::Rng;
use talktome_core::Emotion;

pub const CRISIS_RESPONSE: &str = "I'm really concerned about what you've shared. You're not alone, and there are people who want to help. Please reach out to a crisis line - you matter and your life has value.";

pub const GREETINGS: &[&str] = &[
    "Hi there. I'm here to listen and help you explore what's on your mind. What's been weighing on you lately?",
    "Welcome to your safe space. Take a moment to breathe. When you're ready, tell me what's going on in your world.",
    "Hello. I'm glad you're here. What thoughts or feelings would you like to explore today?",
];

pub const ANXIETY_RESPONSES: &[&str] = &[
    "I hear that you're feeling anxious. That tension in your body and racing thoughts - they're real and valid. What specifically is triggering these feelings?",
    "Anxiety can feel overwhelming, but you're not alone in this. Let's slow down together. Can you describe what the anxiety feels like in your body?",
    "It sounds like worry is taking up a lot of space right now. What's the main thing your mind keeps returning to?",
];

pub const SADNESS_RESPONSES: &[&str] = &[
    "I'm sorry you're feeling this way. Sadness often comes when something important to us is hurting. What do you think is at the root of this feeling?",
    "It takes courage to acknowledge when we're sad. I'm here with you. Can you tell me more about when these feelings started?",
    "That heaviness you're describing - I want you to know it's okay to feel it. What would help you feel even a little lighter right now?",
];

pub const ANGER_RESPONSES: &[&str] = &[
    "It sounds like something has really upset you. Anger often protects us from deeper feelings. What's underneath this anger for you?",
    "Your frustration is completely valid. Let's explore what's driving it. What happened that sparked these feelings?",
    "I can sense the intensity of what you're feeling. Sometimes anger is a messenger. What is it trying to tell you?",
];

pub const JOY_RESPONSES: &[&str] = &[
    "It's wonderful to hear you're feeling positive! What's contributing to this good energy?",
    "I love that you're experiencing joy. Let's capture this moment. What made today special?",
    "That happiness you're feeling - it's worth celebrating. What else in your life brings you this kind of peace?",
];

pub const CONFUSION_RESPONSES: &[&str] = &[
    "Feeling uncertain is uncomfortable, but it's also where growth happens. What decision or situation is causing this confusion?",
    "Being stuck can feel frustrating. Let's untangle this together. What are the different parts of what you're trying to figure out?",
    "Not knowing is okay. Sometimes clarity comes from exploring. What would help you see things more clearly?",
];

pub const DEEPENING_PROMPTS: &[&str] = &[
    "Tell me more about that. What comes up for you when you think about it?",
    "That's really insightful. How long have you been carrying this feeling?",
    "I'm curious - when you imagine this situation resolved, what does that look like?",
    "What would you say to a friend going through the same thing?",
    "Where do you feel this emotion in your body right now?",
];

pub const PATTERN_PROMPTS: &[&str] = &[
    "I notice this theme coming up again. Do you see a pattern here?",
    "It sounds like this connects to something deeper. What do you think is at the core?",
    "This reminds me of something you mentioned earlier. Do you see a connection?",
    "I'm noticing a thread here. What belief about yourself might be underneath this?",
];

pub const VALIDATIONS: &[&str] = &[
    "That makes complete sense given what you've been through.",
    "Your feelings are valid. Anyone in your situation would feel similarly.",
    "Thank you for sharing that with me. It takes courage to be this open.",
    "I hear you. What you're experiencing is real and it matters.",
];

pub fn emotion_pool(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Anxiety => ANXIETY_RESPONSES,
        Emotion::Sadness => SADNESS_RESPONSES,
        Emotion::Anger => ANGER_RESPONSES,
        Emotion::Joy => JOY_RESPONSES,
        Emotion::Confusion => CONFUSION_RESPONSES,
    }
}

/// Uniform pick. Pools are non-empty constants; an empty slice yields "".
pub fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}
