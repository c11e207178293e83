//! Thought map: entries as nodes, shared significant keywords as links.
//!
//! Two ways to grow a graph:
//! - [`ThoughtGraph::build`] over a full history: inverted keyword index,
//!   every pair inside a keyword bucket linked once, then highly connected
//!   nodes flagged as recurring patterns.
//! - [`ThoughtGraph::add_entry`] during a live session: the new node is
//!   compared against existing nodes only, one link per overlapping node,
//!   and pattern flags are left untouched.
//!
//! The two produce different link sets for the same entries (the live path is
//! sparser and order-dependent).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use talktome_core::signal::{color_for_label, detect_emotion, NEUTRAL_LABEL};
use talktome_core::{
    extract_keywords, EntryKey, GraphConfig, TextEntry, ThoughtMapLink, ThoughtMapNode,
    ThoughtMapSnapshot,
};
use uuid::Uuid;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThoughtGraph {
    pub nodes: Vec<ThoughtMapNode>,
    pub links: Vec<ThoughtMapLink>,
    /// Significant keywords per node, parallel to `nodes`.
    #[serde(skip)]
    keywords: Vec<BTreeSet<String>>,
}

impl ThoughtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch build over a whole history.
    pub fn build(entries: &[TextEntry], config: &GraphConfig) -> Self {
        let mut graph = Self::new();

        // keyword -> node indices, buckets kept in first-seen order
        let mut bucket_index: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();

        for entry in entries {
            let idx = graph.nodes.len();
            let keywords = extract_keywords(&entry.text);
            for word in &keywords {
                let bucket = *bucket_index.entry(word.clone()).or_insert_with(|| {
                    buckets.push(Vec::new());
                    buckets.len() - 1
                });
                buckets[bucket].push(idx);
            }
            graph.nodes.push(make_node(entry, config));
            graph.keywords.push(keywords);
        }

        let mut linked: HashSet<(usize, usize)> = HashSet::new();
        for bucket in &buckets {
            if bucket.len() < 2 {
                continue;
            }
            let members = match config.max_nodes_per_keyword {
                Some(cap) if bucket.len() > cap => {
                    tracing::debug!(
                        "Keyword bucket of {} nodes capped at {}",
                        bucket.len(),
                        cap
                    );
                    &bucket[..cap]
                }
                _ => &bucket[..],
            };

            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    let pair = if a < b { (a, b) } else { (b, a) };
                    if linked.insert(pair) {
                        graph.links.push(ThoughtMapLink {
                            source: graph.nodes[a].id.clone(),
                            target: graph.nodes[b].id.clone(),
                        });
                    }
                }
            }
        }

        graph.mark_recurring(config);
        tracing::debug!(
            "Built thought map: {} nodes, {} links",
            graph.nodes.len(),
            graph.links.len()
        );
        graph
    }

    /// Append one entry, linking it to every existing node it shares a
    /// keyword with. Returns the number of links added.
    pub fn add_entry(&mut self, entry: &TextEntry, config: &GraphConfig) -> usize {
        let node = make_node(entry, config);
        let keywords = extract_keywords(&entry.text);

        let mut added = 0;
        for (existing, existing_keywords) in self.nodes.iter().zip(&self.keywords) {
            if !keywords.is_disjoint(existing_keywords) {
                self.links.push(ThoughtMapLink {
                    source: node.id.clone(),
                    target: existing.id.clone(),
                });
                added += 1;
            }
        }

        self.nodes.push(node);
        self.keywords.push(keywords);
        added
    }

    fn mark_recurring(&mut self, config: &GraphConfig) {
        let degrees = link_degrees(&self.links);
        for node in &mut self.nodes {
            if degrees.get(node.id.as_str()).copied().unwrap_or(0) >= config.recurring_min_links {
                node.is_pattern = true;
                node.size = node.size.max(config.pattern_node_size);
            }
        }
    }

    pub fn degree(&self, id: &str) -> usize {
        self.links
            .iter()
            .filter(|l| l.source == id || l.target == id)
            .count()
    }

    pub fn node(&self, id: &str) -> Option<&ThoughtMapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn keywords_of(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .map(|idx| &self.keywords[idx])
    }

    /// Keywords two nodes have in common (empty if either is unknown).
    pub fn shared_keywords(&self, a: &str, b: &str) -> BTreeSet<String> {
        match (self.keywords_of(a), self.keywords_of(b)) {
            (Some(ka), Some(kb)) => ka.intersection(kb).cloned().collect(),
            _ => BTreeSet::new(),
        }
    }

    pub fn pattern_nodes(&self) -> impl Iterator<Item = &ThoughtMapNode> {
        self.nodes.iter().filter(|n| n.is_pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_snapshot(
        &self,
        conversation_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> ThoughtMapSnapshot {
        ThoughtMapSnapshot {
            id: Uuid::new_v4(),
            conversation_id,
            nodes: self.nodes.clone(),
            connections: self.links.clone(),
            created_at: now,
        }
    }
}

fn link_degrees(links: &[ThoughtMapLink]) -> HashMap<&str, usize> {
    let mut degrees: HashMap<&str, usize> = HashMap::new();
    for link in links {
        *degrees.entry(link.source.as_str()).or_default() += 1;
        *degrees.entry(link.target.as_str()).or_default() += 1;
    }
    degrees
}

fn make_node(entry: &TextEntry, config: &GraphConfig) -> ThoughtMapNode {
    let emotion = detect_emotion(&entry.text)
        .map(|e| e.label().to_string())
        .or_else(|| entry.mood_label.clone())
        .unwrap_or_else(|| NEUTRAL_LABEL.to_string());
    let size = match entry.key {
        EntryKey::Live { .. } => config.live_node_size,
        _ => config.base_node_size,
    };

    ThoughtMapNode {
        id: entry.key.to_string(),
        text: preview(&entry.text, config.preview_chars),
        full_text: entry.text.clone(),
        color: color_for_label(&emotion).to_string(),
        emotion,
        source: entry.source(),
        size,
        is_pattern: false,
        timestamp: Some(entry.timestamp),
    }
}

/// First `max_chars` characters, with an ellipsis if anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
