//! Mood time series, headline stats and dashboard insights.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use talktome_core::records::is_valid_mood_score;
use talktome_core::{Conversation, DashboardConfig, JournalEntry, Mood, Pattern};

use crate::patterns::{Insight, InsightKind};

/// Samples compared on each side of the mood trend.
const TREND_WINDOW: usize = 3;
const JOURNALING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodBucket {
    pub date: NaiveDate,
    /// `None` when nothing was logged that day.
    pub average_mood: Option<f32>,
    pub sample_count: usize,
}

impl MoodBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            average_mood: None,
            sample_count: 0,
        }
    }

    fn add_sample(&mut self, score: f32) {
        let count = self.sample_count as f32;
        self.average_mood = Some(match self.average_mood {
            None => score,
            Some(avg) => (avg * count + score) / (count + 1.0),
        });
        self.sample_count += 1;
    }
}

/// One bucket per calendar day for the trailing `range_days` days ending at
/// `today`, oldest first. Mood log entries and journal mood snapshots both
/// count as samples. Scores outside `[0, 10]` are skipped.
pub fn build_mood_series<Tz: TimeZone>(
    moods: &[Mood],
    journals: &[JournalEntry],
    range_days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<MoodBucket> {
    let range_days = range_days.min(DashboardConfig::MAX_RANGE_DAYS);
    let Some(first_day) = window_start(today, range_days) else {
        return Vec::new();
    };
    let mut series: Vec<MoodBucket> = first_day
        .iter_days()
        .take(range_days as usize)
        .map(MoodBucket::empty)
        .collect();

    let samples = moods.iter().map(|m| (m.timestamp, m.score)).chain(
        journals
            .iter()
            .filter_map(|j| j.mood.as_ref().map(|mood| (j.created_at, mood.score))),
    );

    for (timestamp, score) in samples {
        if !is_valid_mood_score(score) {
            tracing::debug!("Skipping out-of-range mood score {}", score);
            continue;
        }
        let day = timestamp.with_timezone(tz).date_naive();
        let offset = (day - first_day).num_days();
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = series.get_mut(offset as usize) {
            bucket.add_sample(score);
        }
    }

    series
}

/// First day of a `range_days` window ending at `today`. `None` for an empty
/// window or one reaching past the calendar's lower bound.
fn window_start(today: NaiveDate, range_days: u32) -> Option<NaiveDate> {
    if range_days == 0 {
        return None;
    }
    today.checked_sub_signed(Duration::days(i64::from(range_days) - 1))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_conversations: usize,
    pub total_journal_entries: usize,
    /// Mean of in-range mood log scores, 0 when there are none.
    pub average_mood: f32,
    /// 1 if the latest conversation or journal entry is from today.
    pub streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub mood_series: Vec<MoodBucket>,
    pub stats: DashboardStats,
    pub insights: Vec<Insight>,
}

/// Everything the dashboard reads, as loaded from the store.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInputs<'a> {
    pub conversations: &'a [Conversation],
    pub journals: &'a [JournalEntry],
    pub moods: &'a [Mood],
    pub patterns: &'a [Pattern],
}

#[derive(Debug, Clone, Default)]
pub struct DashboardAggregator {
    config: DashboardConfig,
}

impl DashboardAggregator {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, inputs: DashboardInputs<'_>, now: DateTime<Utc>) -> Dashboard {
        self.build_in(inputs, now, &Local)
    }

    pub fn build_in<Tz: TimeZone>(
        &self,
        inputs: DashboardInputs<'_>,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Dashboard {
        let today = now.with_timezone(tz).date_naive();
        let range_days = self.config.range_days;

        let mood_series =
            build_mood_series(inputs.moods, inputs.journals, range_days, today, tz);
        let recent_moods = moods_in_range(inputs.moods, range_days, today, tz);

        let average_mood = if recent_moods.is_empty() {
            0.0
        } else {
            recent_moods.iter().map(|m| m.score).sum::<f32>() / recent_moods.len() as f32
        };

        let stats = DashboardStats {
            total_conversations: inputs.conversations.len(),
            total_journal_entries: inputs.journals.len(),
            average_mood,
            streak_days: active_today(inputs.conversations, inputs.journals, today, tz),
        };

        let insights = self.insights(&recent_moods, inputs.journals, inputs.patterns, now);

        tracing::debug!(
            "Dashboard: {} days, {} moods in range, {} insights",
            mood_series.len(),
            recent_moods.len(),
            insights.len()
        );

        Dashboard {
            mood_series,
            stats,
            insights,
        }
    }

    fn insights(
        &self,
        recent_moods: &[&Mood],
        journals: &[JournalEntry],
        patterns: &[Pattern],
        now: DateTime<Utc>,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(trend) = mood_trend(recent_moods) {
            if trend > self.config.mood_trend_delta {
                insights.push(Insight::new(
                    InsightKind::MoodTrend,
                    "Mood Improving",
                    "Your mood has been trending upward recently. Keep doing what works!",
                ));
            } else if trend < -self.config.mood_trend_delta {
                insights.push(Insight::new(
                    InsightKind::MoodTrend,
                    "Check In With Yourself",
                    "Your mood has dipped recently. Consider what might be contributing to this.",
                ));
            }
        }

        let window = Duration::days(JOURNALING_WINDOW_DAYS);
        let this_week = journals
            .iter()
            .filter(|j| now - j.created_at <= window)
            .count();
        if this_week > 0 && this_week >= self.config.consistent_journaling_min {
            insights.push(Insight::new(
                InsightKind::Journaling,
                "Consistent Journaling",
                format!(
                    "You've written {} entries this week. Reflection is powerful!",
                    this_week
                ),
            ));
        }

        if let Some(top) = most_frequent(patterns) {
            insights.push(Insight::new(
                InsightKind::Pattern,
                "Pattern Detected",
                format!("\"{}\" appears frequently in your thoughts.", top.description),
            ));
        }

        if insights.is_empty() {
            insights.push(Insight::keep_going());
        }
        insights
    }
}

/// Valid moods whose local date falls inside the series window, newest first.
fn moods_in_range<'a, Tz: TimeZone>(
    moods: &'a [Mood],
    range_days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Mood> {
    let Some(first_day) = window_start(today, range_days.min(DashboardConfig::MAX_RANGE_DAYS))
    else {
        return Vec::new();
    };
    let mut in_range: Vec<&Mood> = moods
        .iter()
        .filter(|m| is_valid_mood_score(m.score))
        .filter(|m| {
            let day = m.timestamp.with_timezone(tz).date_naive();
            day >= first_day && day <= today
        })
        .collect();
    in_range.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    in_range
}

/// Mean of the newest three samples minus the mean of the three before them.
/// `None` until there is at least one older sample to compare against.
fn mood_trend(newest_first: &[&Mood]) -> Option<f32> {
    if newest_first.len() <= TREND_WINDOW {
        return None;
    }
    let recent = &newest_first[..TREND_WINDOW];
    let older = &newest_first[TREND_WINDOW..newest_first.len().min(TREND_WINDOW * 2)];
    let mean = |slice: &[&Mood]| slice.iter().map(|m| m.score).sum::<f32>() / slice.len() as f32;
    Some(mean(recent) - mean(older))
}

fn active_today<Tz: TimeZone>(
    conversations: &[Conversation],
    journals: &[JournalEntry],
    today: NaiveDate,
    tz: &Tz,
) -> u32 {
    let latest = conversations
        .iter()
        .map(|c| c.timestamp)
        .chain(journals.iter().map(|j| j.created_at))
        .max();
    match latest {
        Some(ts) if ts.with_timezone(tz).date_naive() == today => 1,
        _ => 0,
    }
}

/// Highest frequency; the earlier stored pattern wins a tie.
fn most_frequent(patterns: &[Pattern]) -> Option<&Pattern> {
    let mut top: Option<&Pattern> = None;
    for pattern in patterns {
        if top.map_or(true, |t| pattern.frequency > t.frequency) {
            top = Some(pattern);
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use talktome_core::records::MOOD_PRESETS;
    use talktome_core::PatternKind;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap()
    }

    fn mood(days_ago: i64, hours_ago: i64, score: f32) -> Mood {
        Mood {
            id: Uuid::new_v4(),
            score,
            label: "test".to_string(),
            notes: String::new(),
            timestamp: now() - Duration::days(days_ago) - Duration::hours(hours_ago),
        }
    }

    fn journal(days_ago: i64, with_mood: bool) -> JournalEntry {
        let ts = now() - Duration::days(days_ago);
        JournalEntry {
            id: Uuid::new_v4(),
            content: "entry".to_string(),
            mood: with_mood.then(|| MOOD_PRESETS[0].snapshot()),
            tags: BTreeSet::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn pattern(description: &str, frequency: u32) -> Pattern {
        Pattern {
            id: Uuid::new_v4(),
            kind: PatternKind::Theme,
            description: description.to_string(),
            frequency,
            first_detected: now(),
            last_seen: now(),
        }
    }

    fn build(
        config: DashboardConfig,
        conversations: &[Conversation],
        journals: &[JournalEntry],
        moods: &[Mood],
        patterns: &[Pattern],
    ) -> Dashboard {
        DashboardAggregator::new(config).build_in(
            DashboardInputs {
                conversations,
                journals,
                moods,
                patterns,
            },
            now(),
            &Utc,
        )
    }

    #[test]
    fn test_series_has_one_bucket_per_day() {
        let today = now().date_naive();
        let series = build_mood_series(&[], &[], 7, today, &Utc);
        assert_eq!(series.len(), 7);
        assert_eq!(series[6].date, today);
        assert_eq!(series[0].date, today - Duration::days(6));
        assert!(series.iter().all(|b| b.average_mood.is_none() && b.sample_count == 0));
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_series_running_mean_and_journal_moods() {
        let moods = vec![mood(0, 1, 4.0), mood(0, 2, 6.0), mood(2, 0, 3.0)];
        let journals = vec![journal(0, true), journal(1, false)];
        let series = build_mood_series(&moods, &journals, 7, now().date_naive(), &Utc);

        let today = &series[6];
        // 4, 6 and the journal's 9
        assert_eq!(today.sample_count, 3);
        assert!((today.average_mood.unwrap() - 19.0 / 3.0).abs() < 1e-5);

        assert!(series[5].average_mood.is_none());
        assert_eq!(series[4].average_mood, Some(3.0));
    }

    #[test]
    fn test_series_ignores_out_of_window_and_invalid() {
        let moods = vec![mood(10, 0, 5.0), mood(0, 1, 42.0), mood(0, 1, f32::NAN)];
        let series = build_mood_series(&moods, &[], 7, now().date_naive(), &Utc);
        assert!(series.iter().all(|b| b.sample_count == 0));
        assert!(build_mood_series(&moods, &[], 0, now().date_naive(), &Utc).is_empty());
    }

    #[test]
    fn test_zero_mood_is_not_missing() {
        let series = build_mood_series(&[mood(0, 1, 0.0)], &[], 3, now().date_naive(), &Utc);
        assert_eq!(series[2].average_mood, Some(0.0));
    }

    #[test]
    fn test_huge_range_is_capped_instead_of_panicking() {
        let config = DashboardConfig {
            range_days: 200_000_000,
            ..DashboardConfig::default()
        };
        let dash = build(config, &[], &[], &[mood(0, 1, 6.0)], &[]);
        assert_eq!(dash.mood_series.len(), DashboardConfig::MAX_RANGE_DAYS as usize);
        assert_eq!(dash.mood_series.last().unwrap().average_mood, Some(6.0));
        assert!((dash.stats.average_mood - 6.0).abs() < 1e-5);

        assert!(window_start(NaiveDate::MIN, 2).is_none());
        assert!(build_mood_series(&[], &[], 2, NaiveDate::MIN, &Utc).is_empty());
    }

    #[test]
    fn test_empty_dashboard() {
        let dash = build(DashboardConfig::default(), &[], &[], &[], &[]);
        assert_eq!(dash.stats, DashboardStats::default());
        assert_eq!(dash.insights, vec![Insight::keep_going()]);
        assert_eq!(dash.mood_series.len(), 7);
    }

    #[test]
    fn test_stats_average_and_streak() {
        let moods = vec![mood(0, 1, 8.0), mood(1, 0, 6.0), mood(30, 0, 1.0)];
        let journals = vec![journal(0, false), journal(3, false)];
        let dash = build(DashboardConfig::default(), &[], &journals, &moods, &[]);

        assert_eq!(dash.stats.total_journal_entries, 2);
        assert!((dash.stats.average_mood - 7.0).abs() < 1e-5);
        assert_eq!(dash.stats.streak_days, 1);

        let stale = vec![journal(2, false)];
        let dash = build(DashboardConfig::default(), &[], &stale, &[], &[]);
        assert_eq!(dash.stats.streak_days, 0);
    }

    #[test]
    fn test_mood_trend_insights() {
        let rising = vec![
            mood(0, 1, 8.0),
            mood(0, 2, 8.0),
            mood(0, 3, 8.0),
            mood(1, 0, 4.0),
            mood(1, 1, 4.0),
        ];
        let dash = build(DashboardConfig::default(), &[], &[], &rising, &[]);
        assert_eq!(dash.insights[0].title, "Mood Improving");

        let falling: Vec<Mood> = rising
            .iter()
            .map(|m| Mood {
                score: 10.0 - m.score,
                ..m.clone()
            })
            .collect();
        let dash = build(DashboardConfig::default(), &[], &[], &falling, &[]);
        assert_eq!(dash.insights[0].title, "Check In With Yourself");
    }

    #[test]
    fn test_three_moods_give_no_trend() {
        let moods = vec![mood(0, 1, 9.0), mood(0, 2, 9.0), mood(0, 3, 9.0)];
        let dash = build(DashboardConfig::default(), &[], &[], &moods, &[]);
        assert_eq!(dash.insights, vec![Insight::keep_going()]);
    }

    #[test]
    fn test_consistent_journaling_and_top_pattern() {
        let journals: Vec<JournalEntry> = (0..5).map(|d| journal(d, false)).collect();
        let patterns = vec![
            pattern("work is a recurring topic", 3),
            pattern("Frequent anxiety expressions", 5),
            pattern("school is a recurring topic", 5),
        ];
        let dash = build(DashboardConfig::default(), &[], &journals, &[], &patterns);

        let titles: Vec<&str> = dash.insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Consistent Journaling", "Pattern Detected"]);
        assert!(dash.insights[0].description.contains("5 entries"));
        assert!(dash.insights[1]
            .description
            .contains("Frequent anxiety expressions"));
    }
}
