//! Affirmations and journaling prompts.

use rand::Rng;

use crate::pools::pick;

pub const AFFIRMATIONS: &[&str] = &[
    "You are stronger than you know, braver than you believe, and worthy of all the good things coming your way.",
    "It's okay to take things one day at a time. You're doing better than you think.",
    "Your feelings are valid, and it's okay to ask for help.",
    "You don't have to be perfect. You just have to be you, and that's enough.",
    "Every step forward, no matter how small, is progress worth celebrating.",
    "You deserve kindness, especially from yourself.",
    "It's okay to rest. You don't have to earn your place in this world.",
    "Your story isn't over yet. Tomorrow is a new page.",
    "You are not a burden. Your presence matters.",
    "Even on your hardest days, you are worthy of love and care.",
    "I deserve a love that feels like home and uplifts my spirit.",
    "My capacity to love is a gift, and I choose to give it to those who are deserving.",
    "I am worthy of being chosen, cherished, and loved exactly as I am.",
    "I allow myself to be my authentic self while maintaining healthy boundaries.",
    "I release the need for external validation; my worth is inherent.",
    "It is safe for me to give and receive love in abundance.",
    "I honor my needs and prioritize my own peace of mind in every relationship.",
    "I am enough, and I don't have to change or fix anything to be worthy of love.",
    "I trust my intuition to guide me toward relationships built on mutual respect.",
    "I am valuable and worthy of respect, even when I am not productive.",
    "It is okay to feel sad today; tomorrow is a fresh start for me.",
    "I am overcoming this one step at a time, and I am proud of how I got through today.",
    "Asking for help is a sign of strength and self-respect, not weakness.",
    "I am resilient and have the inner strength to handle whatever this day brings.",
    "I choose to be gentle with myself as I navigate my healing journey.",
    "My self-worth is not determined by my grades or academic achievements.",
    "I am allowed to set boundaries that protect my peace and well-being.",
    "I forgive myself for the times I ignored red flags; I am learning to trust myself again.",
    "I am no longer available for toxic patterns and choose thoughts that empower me.",
    "My healing is not linear, and it is okay to struggle as I grow.",
    "I am a survivor, unyielding and strong, transforming pain into wisdom.",
    "I am free to live authentically and unapologetically, moving at my own pace.",
    "You are capable of amazing things",
    "Your potential is limitless",
    "You deserve love and happiness",
    "Today is full of possibilities",
    "You are stronger than you think",
    "Your dreams are within reach",
    "You radiate positivity and confidence",
    "You are exactly where you need to be",
    "Your journey is unique and beautiful",
    "You have the power to create change",
    "You are worthy of all good things",
    "Your presence makes a difference",
    "You are growing and evolving every day",
    "You attract positive energy",
    "You are enough, just as you are",
];

pub const JOURNAL_PROMPTS: &[&str] = &[
    "What made you smile today?",
    "What's been weighing on your mind?",
    "Describe a moment of peace you experienced recently.",
    "What are you grateful for right now?",
    "If you could tell your younger self one thing, what would it be?",
    "What's a challenge you overcame recently?",
    "How are you really feeling beneath the surface?",
    "What would you do if you weren't afraid?",
    "What patterns have you noticed in your thoughts lately?",
    "What does your ideal day look like?",
];

pub fn affirmation<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, AFFIRMATIONS)
}

pub fn journal_prompt<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, JOURNAL_PROMPTS)
}
