//! One open chat: message list, live thought map and crisis flag.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use talktome_core::{
    Conversation, Emotion, GraphConfig, Message, Sender, Signal, TalkConfig,
    TalkError, TextEntry,
};
use talktome_memory::{ThoughtGraph, WellnessCoordinator};

use crate::responder::{Reply, Responder};

pub struct ChatSession<R: Rng = StdRng> {
    responder: Responder<R>,
    messages: Vec<Message>,
    graph: ThoughtGraph,
    graph_config: GraphConfig,
    last_signal: Signal,
    /// Label of each user turn that had one, in order.
    labels: Vec<&'static str>,
    crisis_active: bool,
    next_seq: u64,
}

impl ChatSession<StdRng> {
    /// Start a session over past `history` using the configured responder.
    pub fn start(config: &TalkConfig, history: &[TextEntry], now: DateTime<Utc>) -> Self {
        Self::with_responder(
            Responder::from_config(config.responder.clone()),
            config.graph.clone(),
            history,
            now,
        )
    }
}

impl<R: Rng> ChatSession<R> {
    /// Opens with a greeting and the batch thought map of `history`.
    pub fn with_responder(
        mut responder: Responder<R>,
        graph_config: GraphConfig,
        history: &[TextEntry],
        now: DateTime<Utc>,
    ) -> Self {
        let graph = ThoughtGraph::build(history, &graph_config);
        let greeting = Message::new(Sender::Ai, responder.greeting(), now);
        tracing::debug!(
            "Chat session started over {} past entries",
            graph.nodes.len()
        );

        Self {
            responder,
            messages: vec![greeting],
            graph,
            graph_config,
            last_signal: Signal::None,
            labels: Vec::new(),
            crisis_active: false,
            next_seq: 1,
        }
    }

    /// Add a user message, extend the live graph and produce the reply.
    /// Blank input is ignored.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Option<Reply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let entry = TextEntry::live(self.next_seq, text, now);
        self.next_seq += 1;
        let linked = self.graph.add_entry(&entry, &self.graph_config);

        let reply = self.responder.next_response(text, &self.messages);
        self.messages.push(Message::new(Sender::User, text, now));
        self.messages.push(Message::new(Sender::Ai, reply.text.clone(), now));

        self.last_signal = reply.signal;
        self.labels.extend(reply.label);
        if reply.crisis {
            self.crisis_active = true;
            tracing::warn!("Crisis flag raised in chat session");
        }
        tracing::debug!(
            "User turn linked to {} earlier thoughts, signal {:?}",
            linked,
            reply.signal
        );

        Some(reply)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn graph(&self) -> &ThoughtGraph {
        &self.graph
    }

    pub fn last_signal(&self) -> Signal {
        self.last_signal
    }

    /// Stays set until the user acknowledges the safety notice.
    pub fn crisis_active(&self) -> bool {
        self.crisis_active
    }

    pub fn acknowledge_crisis(&mut self) {
        self.crisis_active = false;
    }

    pub fn end(self) -> EndedSession {
        let emotions = self.labels.iter().map(|l| l.to_string()).collect();

        let mood = self.last_signal.label().map(|label| SessionMood {
            score: session_mood_score(self.last_signal),
            label: label.to_string(),
        });

        EndedSession {
            messages: self.messages,
            emotions,
            mood,
        }
    }
}

/// Mood recorded for a session from its last detected signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMood {
    pub score: f32,
    pub label: String,
}

fn session_mood_score(signal: Signal) -> f32 {
    match signal.emotion() {
        Some(Emotion::Joy) => 8.0,
        Some(Emotion::Sadness) => 3.0,
        _ => 5.0,
    }
}

#[derive(Debug, Clone)]
pub struct EndedSession {
    pub messages: Vec<Message>,
    /// Label detected in each user message, messages without one skipped.
    pub emotions: Vec<String>,
    pub mood: Option<SessionMood>,
}

impl EndedSession {
    /// Store the conversation and, if a signal was detected, its mood.
    /// Sessions with no exchange store nothing.
    pub async fn persist(
        self,
        coordinator: &WellnessCoordinator,
        now: DateTime<Utc>,
    ) -> Result<Option<Conversation>, TalkError> {
        let stored = coordinator
            .record_conversation(self.messages, self.emotions, now)
            .await?;

        if stored.is_some() {
            if let Some(mood) = self.mood {
                coordinator
                    .log_mood(mood.score, Some(mood.label.as_str()), "", now)
                    .await?;
            }
        }
        Ok(stored)
    }
}
