use anyhow::{Context, Result};
use chrono::Utc;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use talktome_expression::ChatSession;
use talktome_memory::WellnessCoordinator;
use tracing::{debug, error, info};

const SAFETY_NOTICE: &str = "\
------------------------------------------------------------
  You're not alone.
  Please know that you matter, and there are people who want
  to help you through this.

  988  Suicide & Crisis Lifeline (24/7)
  Call or text 988 to speak with someone who cares.
------------------------------------------------------------
Type /ok to continue the conversation.";

/// The notice to show before the next prompt. It stays up until `/ok`.
fn pending_notice(session: &ChatSession) -> Option<&'static str> {
    session.crisis_active().then_some(SAFETY_NOTICE)
}

/// Interactive session. Past conversations and journal entries seed the
/// thought map; the finished chat is stored on exit.
pub async fn run(coordinator: &WellnessCoordinator) -> Result<()> {
    let history = coordinator.text_entries().await;
    let mut session = ChatSession::start(coordinator.config(), &history, Utc::now());
    let mut editor = DefaultEditor::new().context("Failed to open terminal line editor")?;

    println!("TalkToMe. Type 'quit' to end the session, '/map' to see today's thought map.\n");
    if let Some(greeting) = session.messages().first() {
        println!("TalkToMe: {}\n", greeting.text);
    }

    loop {
        if let Some(notice) = pending_notice(&session) {
            println!("{}\n", notice);
        }
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(trimmed) {
            debug!("Failed to record line in editor history: {}", e);
        }

        match trimmed {
            "quit" | "exit" => break,
            "/ok" => {
                if session.crisis_active() {
                    session.acknowledge_crisis();
                    println!("Thank you. I'm still here whenever you want to talk.\n");
                }
                continue;
            }
            "/map" => {
                let graph = session.graph();
                println!(
                    "{} thoughts, {} connections, {} recurring\n",
                    graph.nodes.len(),
                    graph.links.len(),
                    graph.pattern_nodes().count()
                );
                continue;
            }
            _ => {}
        }

        let Some(reply) = session.send(trimmed, Utc::now()) else {
            continue;
        };
        match reply.label {
            Some(label) => println!("\nTalkToMe ({}): {}\n", label, reply.text),
            None => println!("\nTalkToMe: {}\n", reply.text),
        }
    }

    match session.end().persist(coordinator, Utc::now()).await? {
        Some(conversation) => {
            info!("Session saved as conversation {}", conversation.id);
            println!("Session saved. Take care of yourself.");
        }
        None => println!("Nothing to save. Come back any time."),
    }
    Ok(())
}
