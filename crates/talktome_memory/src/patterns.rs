//! History-wide pattern analysis.
//!
//! Counts lexicon hits (emotions, themes, cognitive distortions) over every
//! text entry, buckets entries by weekday and time of day, ranks frequent
//! keywords, and turns the result into a short list of insights. Pure: the
//! coordinator decides what gets persisted.

use chrono::{Datelike, Local, TimeZone, Timelike};
use serde::Serialize;
use std::collections::HashMap;
use talktome_core::lexicon::{COGNITIVE_DISTORTIONS, EMOTIONS, THEMES};
use talktome_core::{analysis_tokens, AnalysisConfig, Lexicon, PatternKind, TextEntry};

// ============================================================================
// Analysis output
// ============================================================================

/// Hits for one emotion and its share of all emotion hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionShare {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    /// Rounded percentage of total emotion hits.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Enumeration order, also the tie-break order.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimePatterns {
    /// Entry counts, Sunday first.
    pub by_day_of_week: [usize; 7],
    /// Entry counts in [`TimeOfDay::ALL`] order.
    pub by_time_of_day: [usize; 4],
}

impl TimePatterns {
    pub fn day_count(&self, day: &str) -> usize {
        DAY_NAMES
            .iter()
            .position(|d| *d == day)
            .map(|idx| self.by_day_of_week[idx])
            .unwrap_or(0)
    }

    pub fn time_count(&self, slot: TimeOfDay) -> usize {
        self.by_time_of_day[slot.index()]
    }

    /// Busiest time of day. The earlier bucket wins a tie.
    pub fn busiest_time(&self) -> (TimeOfDay, usize) {
        let mut best = (TimeOfDay::Morning, self.by_time_of_day[0]);
        for slot in TimeOfDay::ALL.into_iter().skip(1) {
            let count = self.time_count(slot);
            if count > best.1 {
                best = (slot, count);
            }
        }
        best
    }

    pub fn total(&self) -> usize {
        self.by_day_of_week.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Emotion,
    Theme,
    Cognitive,
    Time,
    MoodTrend,
    Journaling,
    Pattern,
    Encouragement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Fallback shown when nothing else has been learned yet.
    pub fn keep_going() -> Self {
        Self::new(
            InsightKind::Encouragement,
            "Keep Going",
            "Continue tracking your thoughts and mood to unlock personalized insights.",
        )
    }
}

/// A count high enough to be recorded as a [`talktome_core::Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCandidate {
    pub kind: PatternKind,
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Every emotion in lexicon order, zero counts included.
    pub emotions: Vec<EmotionShare>,
    /// Non-zero themes, most frequent first.
    pub themes: Vec<CategoryCount>,
    /// Non-zero cognitive distortions, most frequent first.
    pub cognitive: Vec<CategoryCount>,
    pub time: TimePatterns,
    pub keywords: Vec<KeywordCount>,
    pub insights: Vec<Insight>,
}

impl Analysis {
    /// Emotion with the most hits; `None` when there were no hits at all.
    /// Lexicon order breaks ties.
    pub fn top_emotion(&self) -> Option<&EmotionShare> {
        let mut top: Option<&EmotionShare> = None;
        for share in self.emotions.iter().filter(|e| e.count > 0) {
            if top.map_or(true, |t| share.count > t.count) {
                top = Some(share);
            }
        }
        top
    }

    pub fn emotion(&self, key: &str) -> Option<&EmotionShare> {
        self.emotions.iter().find(|e| e.key == key)
    }

    pub fn theme(&self, key: &str) -> Option<&CategoryCount> {
        self.themes.iter().find(|t| t.key == key)
    }

    /// Counts worth persisting as recurring patterns.
    pub fn pattern_candidates(&self, config: &AnalysisConfig) -> Vec<PatternCandidate> {
        let above = config.pattern_persist_above;
        let mut candidates = Vec::new();

        for share in self.emotions.iter().filter(|e| e.count > above) {
            candidates.push(PatternCandidate {
                kind: PatternKind::Emotion,
                description: format!("Frequent {} expressions", stored_key(share.key)),
                count: share.count,
            });
        }
        for theme in self
            .themes
            .iter()
            .take(config.persisted_theme_limit)
            .filter(|t| t.count > above)
        {
            candidates.push(PatternCandidate {
                kind: PatternKind::Theme,
                description: format!("{} is a recurring topic", stored_key(theme.key)),
                count: theme.count,
            });
        }
        for pattern in self.cognitive.iter().filter(|c| c.count > above) {
            candidates.push(PatternCandidate {
                kind: PatternKind::Cognitive,
                description: format!("{} thinking pattern", stored_key(pattern.key)),
                count: pattern.count,
            });
        }

        candidates
    }

    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            top_emotion: self.top_emotion().cloned(),
            top_theme: self.themes.first().cloned(),
            top_cognitive: self.cognitive.first().cloned(),
            insight_count: self.insights.len(),
            keyword_cloud: self
                .keywords
                .iter()
                .take(KEYWORD_CLOUD_SIZE)
                .cloned()
                .collect(),
        }
    }
}

const KEYWORD_CLOUD_SIZE: usize = 10;

/// Condensed view of one analysis run for the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub top_emotion: Option<EmotionShare>,
    pub top_theme: Option<CategoryCount>,
    pub top_cognitive: Option<CategoryCount>,
    pub insight_count: usize,
    pub keyword_cloud: Vec<KeywordCount>,
}

// ============================================================================
// Analyzer
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    config: AnalysisConfig,
}

impl PatternAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze with weekday and hour taken in the machine's local time zone.
    pub fn analyze(&self, entries: &[TextEntry]) -> Analysis {
        self.analyze_in(entries, &Local)
    }

    pub fn analyze_in<Tz: TimeZone>(&self, entries: &[TextEntry], tz: &Tz) -> Analysis {
        let emotion_counts = lexicon_counts(&EMOTIONS, entries);
        let total: usize = emotion_counts.iter().sum();
        let denominator = if total == 0 { 1 } else { total };

        let emotions = EMOTIONS
            .entries
            .iter()
            .zip(&emotion_counts)
            .map(|(entry, &count)| EmotionShare {
                key: entry.key,
                label: entry.label,
                count,
                percentage: ((count as f64 / denominator as f64) * 100.0).round() as u32,
            })
            .collect();

        let mut analysis = Analysis {
            emotions,
            themes: ranked_counts(&THEMES, entries),
            cognitive: ranked_counts(&COGNITIVE_DISTORTIONS, entries),
            time: time_patterns(entries, tz),
            keywords: top_keywords(entries, self.config.top_keyword_limit),
            insights: Vec::new(),
        };
        analysis.insights = self.insights(&analysis);

        tracing::debug!(
            "Analyzed {} entries: {} emotion hits, {} themes, {} insights",
            entries.len(),
            total,
            analysis.themes.len(),
            analysis.insights.len()
        );
        analysis
    }

    fn insights(&self, analysis: &Analysis) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(top) = analysis.top_emotion() {
            if top.percentage > self.config.prominent_emotion_percent {
                insights.push(Insight::new(
                    InsightKind::Emotion,
                    format!("{} is prominent", top.label),
                    format!(
                        "{}% of your expressions relate to {}. This is a strong pattern worth exploring.",
                        top.percentage, top.key
                    ),
                ));
            }
        }

        if let Some(theme) = analysis.themes.first() {
            insights.push(Insight::new(
                InsightKind::Theme,
                format!("{} is on your mind", theme.label),
                format!(
                    "You've mentioned {}-related topics {} times. This seems important to you.",
                    theme.label.to_lowercase(),
                    theme.count
                ),
            ));
        }

        if let Some(pattern) = analysis.cognitive.first() {
            if pattern.count >= self.config.cognitive_insight_min {
                insights.push(Insight::new(
                    InsightKind::Cognitive,
                    format!("Thought pattern detected: {}", pattern.label),
                    distortion_advice(pattern.key),
                ));
            }
        }

        let (slot, count) = analysis.time.busiest_time();
        if count > 0 {
            insights.push(Insight::new(
                InsightKind::Time,
                format!("Most active in the {}", slot.name()),
                format!(
                    "You tend to reflect and journal most during the {}. This might be when you have the most mental space.",
                    slot.name()
                ),
            ));
        }

        if insights.is_empty() {
            insights.push(Insight::keep_going());
        }
        insights
    }
}

fn distortion_advice(key: &str) -> &'static str {
    match key {
        "catastrophizing" => {
            "You tend to expect the worst. Try challenging these thoughts with evidence."
        }
        "black_and_white" => "You may think in extremes. Consider the gray areas and nuances.",
        "mind_reading" => {
            "You might assume you know what others think. Try asking instead of assuming."
        }
        "should_statements" => {
            "You put pressure on yourself with \"should\" statements. Be kinder to yourself."
        }
        "personalization" => {
            "You may take too much responsibility. Not everything is about you."
        }
        _ => "This is a common thinking pattern worth examining.",
    }
}

// ============================================================================
// Counting helpers
// ============================================================================

/// Summed per-entry keyword hits, in lexicon order.
fn lexicon_counts(lexicon: &Lexicon, entries: &[TextEntry]) -> Vec<usize> {
    let mut totals = vec![0; lexicon.len()];
    for entry in entries {
        for (total, hits) in totals.iter_mut().zip(lexicon.hit_counts(&entry.text)) {
            *total += hits;
        }
    }
    totals
}

/// Non-zero lexicon counts, most frequent first, lexicon order on ties.
fn ranked_counts(lexicon: &Lexicon, entries: &[TextEntry]) -> Vec<CategoryCount> {
    let mut ranked: Vec<CategoryCount> = lexicon
        .entries
        .iter()
        .zip(lexicon_counts(lexicon, entries))
        .filter(|(_, count)| *count > 0)
        .map(|(entry, count)| CategoryCount {
            key: entry.key,
            label: entry.label,
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn time_patterns<Tz: TimeZone>(entries: &[TextEntry], tz: &Tz) -> TimePatterns {
    let mut time = TimePatterns::default();
    for entry in entries {
        let local = entry.timestamp.with_timezone(tz);
        time.by_day_of_week[local.weekday().num_days_from_sunday() as usize] += 1;
        time.by_time_of_day[TimeOfDay::from_hour(local.hour()).index()] += 1;
    }
    time
}

/// Lexicon key as spelled in stored pattern descriptions: `self_worth`
/// becomes `selfWorth`.
fn stored_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Most frequent tokens. Ties keep first-encountered order.
fn top_keywords(entries: &[TextEntry], limit: usize) -> Vec<KeywordCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<KeywordCount> = Vec::new();

    for entry in entries {
        for word in analysis_tokens(&entry.text) {
            match positions.get(&word) {
                Some(&idx) => counts[idx].count += 1,
                None => {
                    positions.insert(word.clone(), counts.len());
                    counts.push(KeywordCount { word, count: 1 });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use talktome_core::EntryKey;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        // 2024-06-02 is a Sunday
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn entries(texts: &[&str]) -> Vec<TextEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| TextEntry {
                key: EntryKey::Journal { index: idx },
                text: text.to_string(),
                timestamp: at(3, 9),
                mood_label: None,
            })
            .collect()
    }

    fn analyze(texts: &[&str]) -> Analysis {
        PatternAnalyzer::default().analyze_in(&entries(texts), &Utc)
    }

    #[test]
    fn test_empty_history_zero_state() {
        let analysis = analyze(&[]);
        assert!(analysis.emotions.iter().all(|e| e.count == 0 && e.percentage == 0));
        assert_eq!(analysis.emotions.len(), 5);
        assert!(analysis.themes.is_empty());
        assert!(analysis.cognitive.is_empty());
        assert!(analysis.keywords.is_empty());
        assert_eq!(analysis.insights, vec![Insight::keep_going()]);
        assert!(analysis.top_emotion().is_none());
    }

    #[test]
    fn test_anxious_exam_scenario() {
        let analysis = analyze(&["I am so anxious about my exam", "worried about school work"]);

        let anxiety = analysis.emotion("anxiety").unwrap();
        assert_eq!(anxiety.count, 2);
        assert_eq!(anxiety.percentage, 100);

        assert_eq!(analysis.themes[0].key, "school");
        assert_eq!(analysis.themes[0].count, 2);
        assert_eq!(analysis.theme("work").unwrap().count, 1);

        let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Anxiety is prominent",
                "School is on your mind",
                "Most active in the morning"
            ]
        );
    }

    #[test]
    fn test_percentages_use_total_hits() {
        // anxiety 1, sadness 1, joy 2
        let analysis = analyze(&["worried and sad", "happy and grateful"]);
        assert_eq!(analysis.emotion("anxiety").unwrap().percentage, 25);
        assert_eq!(analysis.emotion("joy").unwrap().percentage, 50);
        assert_eq!(analysis.insights[0].title, "Joy is prominent");
    }

    #[test]
    fn test_prominence_is_strictly_above_threshold() {
        // anxiety 2 of 5 hits = 40%
        let analysis = analyze(&["worried anxious", "sad", "happy", "confused"]);
        assert_eq!(analysis.emotion("anxiety").unwrap().percentage, 40);
        assert!(analysis
            .insights
            .iter()
            .all(|i| i.kind != InsightKind::Emotion));
    }

    #[test]
    fn test_cognitive_insight_needs_three_hits() {
        let two = analyze(&["I should rest", "I must go"]);
        assert_eq!(two.cognitive[0].key, "should_statements");
        assert!(two.insights.iter().all(|i| i.kind != InsightKind::Cognitive));

        let three = analyze(&["I should rest", "I must go", "supposed to call"]);
        let insight = three
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Cognitive)
            .unwrap();
        assert_eq!(insight.title, "Thought pattern detected: Should statements");
        assert!(insight.description.contains("Be kinder to yourself"));
    }

    #[test]
    fn test_time_buckets_and_tie_break() {
        let mut list = entries(&["one", "two", "three", "four"]);
        list[0].timestamp = at(2, 7); // Sunday morning
        list[1].timestamp = at(3, 13); // Monday afternoon
        list[2].timestamp = at(4, 23); // Tuesday night
        list[3].timestamp = at(5, 3); // Wednesday night
        let analysis = PatternAnalyzer::default().analyze_in(&list, &Utc);

        assert_eq!(analysis.time.day_count("Sunday"), 1);
        assert_eq!(analysis.time.day_count("Wednesday"), 1);
        assert_eq!(analysis.time.time_count(TimeOfDay::Night), 2);
        assert_eq!(analysis.time.busiest_time(), (TimeOfDay::Night, 2));

        list.truncate(2);
        let analysis = PatternAnalyzer::default().analyze_in(&list, &Utc);
        assert_eq!(analysis.time.busiest_time(), (TimeOfDay::Morning, 1));
    }

    #[test]
    fn test_hour_boundaries() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
    }

    #[test]
    fn test_top_keywords_order_and_limit() {
        let analysis = analyze(&["river stone river", "stone forest river"]);
        let words: Vec<(&str, usize)> = analysis
            .keywords
            .iter()
            .map(|k| (k.word.as_str(), k.count))
            .collect();
        assert_eq!(words, vec![("river", 3), ("stone", 2), ("forest", 1)]);

        let analyzer = PatternAnalyzer::new(AnalysisConfig {
            top_keyword_limit: 2,
            ..AnalysisConfig::default()
        });
        let limited = analyzer.analyze_in(&entries(&["alpha beta gamma delta"]), &Utc);
        let words: Vec<&str> = limited.keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_pattern_candidates_thresholds() {
        let analysis = analyze(&[
            "worried about work",
            "anxious about the work project",
            "stressed, always at work",
            "never enough time, always behind",
        ]);
        let candidates = analysis.pattern_candidates(&AnalysisConfig::default());
        let descriptions: Vec<&str> = candidates.iter().map(|c| c.description.as_str()).collect();

        assert!(descriptions.contains(&"Frequent anxiety expressions"));
        assert!(descriptions.contains(&"work is a recurring topic"));
        assert!(descriptions.contains(&"blackAndWhite thinking pattern"));
        assert!(candidates.iter().all(|c| c.count > 2));
    }

    #[test]
    fn test_stored_keys_use_camel_case() {
        assert_eq!(stored_key("self_worth"), "selfWorth");
        assert_eq!(stored_key("should_statements"), "shouldStatements");
        assert_eq!(stored_key("anxiety"), "anxiety");

        let analysis = analyze(&[
            "I feel worthless",
            "such a failure, worthless again",
            "not good enough, a failure",
        ]);
        let candidates = analysis.pattern_candidates(&AnalysisConfig::default());
        assert!(candidates
            .iter()
            .any(|c| c.description == "selfWorth is a recurring topic"));
    }

    #[test]
    fn test_summary_keyword_cloud() {
        let text = "alpha beta gamma delta epsilon zeta theta iota kappa lambda sigma omega";
        let summary = analyze(&[text]).summary();
        assert_eq!(summary.keyword_cloud.len(), 10);
        assert!(summary.top_emotion.is_none());
        assert_eq!(summary.insight_count, 1);
    }
}
