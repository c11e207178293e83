//! Terminal output: plain text for people, pretty JSON with `--json`.

use anyhow::Result;
use serde::Serialize;
use talktome_core::{JournalEntry, Mood};
use talktome_memory::{preview, Analysis, Dashboard, Insight, ThoughtGraph, TimeOfDay};

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn line(&self, text: &str) -> Result<()> {
        if self.json {
            return self.emit(&serde_json::json!({ "text": text }));
        }
        println!("{}", text);
        Ok(())
    }

    pub fn journal_entries(&self, entries: &[JournalEntry]) -> Result<()> {
        if self.json {
            return self.emit(entries);
        }
        if entries.is_empty() {
            println!("No journal entries.");
        }
        for entry in entries {
            let mood = entry
                .mood
                .as_ref()
                .map(|m| format!(" [{}]", m.label))
                .unwrap_or_default();
            println!(
                "{}  {}{}",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.id,
                mood
            );
            println!("  {}", entry.content);
            if !entry.tags.is_empty() {
                let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
                println!("  #{}", tags.join(" #"));
            }
        }
        Ok(())
    }

    pub fn moods(&self, moods: &[Mood]) -> Result<()> {
        if self.json {
            return self.emit(moods);
        }
        if moods.is_empty() {
            println!("No moods logged.");
        }
        for mood in moods {
            print!(
                "{}  {:>4.1}  {}",
                mood.timestamp.format("%Y-%m-%d %H:%M"),
                mood.score,
                mood.label
            );
            if mood.notes.is_empty() {
                println!();
            } else {
                println!("  ({})", mood.notes);
            }
        }
        Ok(())
    }

    pub fn analysis(&self, analysis: &Analysis) -> Result<()> {
        if self.json {
            return self.emit(analysis);
        }

        println!("Emotions");
        for share in &analysis.emotions {
            println!("  {:<10} {:>3}  {:>3}%", share.label, share.count, share.percentage);
        }

        println!("\nThemes");
        for theme in analysis.themes.iter().filter(|t| t.count > 0) {
            println!("  {:<14} {:>3}", theme.label, theme.count);
        }

        println!("\nThinking patterns");
        for pattern in analysis.cognitive.iter().filter(|c| c.count > 0) {
            println!("  {:<22} {:>3}", pattern.label, pattern.count);
        }

        println!("\nTime of day");
        for slot in TimeOfDay::ALL {
            println!("  {:<10} {:>3}", slot.name(), analysis.time.time_count(slot));
        }

        if !analysis.keywords.is_empty() {
            let words: Vec<String> = analysis
                .keywords
                .iter()
                .map(|k| format!("{} ({})", k.word, k.count))
                .collect();
            println!("\nKeywords\n  {}", words.join(", "));
        }

        print_insights(&analysis.insights);
        Ok(())
    }

    pub fn thought_map(&self, graph: &ThoughtGraph) -> Result<()> {
        if self.json {
            return self.emit(graph);
        }
        if graph.is_empty() {
            println!("Nothing to map yet. Chat or write a journal entry first.");
            return Ok(());
        }

        println!(
            "{} thoughts, {} connections",
            graph.nodes.len(),
            graph.links.len()
        );
        for node in &graph.nodes {
            let marker = if node.is_pattern { "*" } else { " " };
            println!(
                "{} {:<14} {:<9} {:>2} links  {}",
                marker,
                node.id,
                node.emotion,
                graph.degree(&node.id),
                preview(&node.full_text, 48)
            );
        }
        if graph.pattern_nodes().next().is_some() {
            println!("\n* recurring thought");
        }
        Ok(())
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> Result<()> {
        if self.json {
            return self.emit(dashboard);
        }

        let stats = &dashboard.stats;
        println!("Conversations   {}", stats.total_conversations);
        println!("Journal entries {}", stats.total_journal_entries);
        println!("Average mood    {:.1}", stats.average_mood);
        println!("Streak          {} day(s)", stats.streak_days);

        println!("\nMood");
        for bucket in &dashboard.mood_series {
            let day = bucket.date.format("%a %m-%d");
            match bucket.average_mood {
                Some(avg) => {
                    let bar = "#".repeat(avg.round().clamp(0.0, 10.0) as usize);
                    println!("  {}  {:<10} {:.1}", day, bar, avg);
                }
                None => println!("  {}  -", day),
            }
        }

        print_insights(&dashboard.insights);
        Ok(())
    }
}

fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        return;
    }
    println!("\nInsights");
    for insight in insights {
        println!("  {}", insight.title);
        println!("    {}", insight.description);
    }
}
