use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkConfig {
    pub storage: StorageConfig,
    pub graph: GraphConfig,
    pub analysis: AnalysisConfig,
    pub dashboard: DashboardConfig,
    pub responder: ResponderConfig,
}

impl TalkConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: TalkConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("TALKTOME_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Ok(v) = std::env::var("TALKTOME_RANGE_DAYS") {
            if let Ok(n) = v.parse() {
                self.dashboard.range_days = n;
            }
        }
        if let Ok(v) = std::env::var("TALKTOME_SEED") {
            if let Ok(n) = v.parse() {
                self.responder.seed = Some(n);
            }
        }
        if let Ok(v) = std::env::var("TALKTOME_PREVIEW_CHARS") {
            if let Ok(n) = v.parse() {
                self.graph.preview_chars = n;
            }
        }
        self.clamp_ranges();
    }

    fn clamp_ranges(&mut self) {
        let days = self.dashboard.range_days;
        if days > DashboardConfig::MAX_RANGE_DAYS {
            tracing::warn!(
                "dashboard.range_days {} too large, clamping to {}",
                days,
                DashboardConfig::MAX_RANGE_DAYS
            );
            self.dashboard.range_days = DashboardConfig::MAX_RANGE_DAYS;
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "talktome.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Characters kept in a node preview before the ellipsis.
    pub preview_chars: usize,
    pub base_node_size: u32,
    /// Size of nodes added during the open session.
    pub live_node_size: u32,
    pub pattern_node_size: u32,
    /// Links a node needs before it is flagged as a recurring pattern.
    pub recurring_min_links: usize,
    /// Cap on nodes paired per keyword bucket. `None` pairs every node.
    pub max_nodes_per_keyword: Option<usize>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            preview_chars: 60,
            base_node_size: 6,
            live_node_size: 10,
            pattern_node_size: 12,
            recurring_min_links: 3,
            max_nodes_per_keyword: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_keyword_limit: usize,
    /// Share (percent) above which the top emotion gets its own insight.
    pub prominent_emotion_percent: u32,
    pub cognitive_insight_min: usize,
    /// Counts strictly above this are persisted as patterns.
    pub pattern_persist_above: usize,
    pub persisted_theme_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_keyword_limit: 20,
            prominent_emotion_percent: 40,
            cognitive_insight_min: 3,
            pattern_persist_above: 2,
            persisted_theme_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub range_days: u32,
    pub consistent_journaling_min: usize,
    pub mood_trend_delta: f32,
}

impl DashboardConfig {
    /// Ten years of daily buckets.
    pub const MAX_RANGE_DAYS: u32 = 3660;
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            range_days: 7,
            consistent_journaling_min: 5,
            mood_trend_delta: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Every N-th user turn opens with a validation phrase.
    pub validation_every: usize,
    /// Pattern-noticing prompts only appear after this many user turns.
    pub pattern_prompt_after: usize,
    /// A uniform draw above this picks a pattern prompt.
    pub pattern_prompt_threshold: f64,
    pub seed: Option<u64>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            validation_every: 3,
            pattern_prompt_after: 4,
            pattern_prompt_threshold: 0.6,
            seed: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
