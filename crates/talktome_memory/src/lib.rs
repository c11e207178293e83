pub mod coordinator;
pub mod dashboard;
pub mod kv;
pub mod patterns;
pub mod sqlite;
pub mod store;
pub mod thought_map;

pub use coordinator::WellnessCoordinator;
pub use dashboard::{
    build_mood_series, Dashboard, DashboardAggregator, DashboardInputs, DashboardStats, MoodBucket,
};
pub use kv::{InMemoryKv, KeyValueStore};
pub use patterns::{
    Analysis, CategoryCount, EmotionShare, Insight, InsightKind, KeywordCount, PatternAnalyzer,
    PatternCandidate, PatternSummary, TimeOfDay, TimePatterns,
};
pub use sqlite::SqliteKv;
pub use store::RecordStore;
pub use thought_map::{preview, ThoughtGraph};

#[cfg(test)]
mod tests;
