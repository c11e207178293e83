use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use talktome_core::records::{mood_preset, MOOD_PRESETS};
use talktome_core::{JournalPatch, MoodSnapshot, StorageConfig, TalkConfig};
use talktome_expression::{affirmation, journal_prompt};
use talktome_memory::WellnessCoordinator;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

mod chat;
mod render;

use render::Output;

#[derive(Parser, Debug)]
#[command(name = "talktome", author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "talktome.toml")]
    config: PathBuf,

    /// Path to the record database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Also write daily log files into this directory
    #[arg(long, global = true, env = "TALKTOME_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Format of log lines on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Talk through what's on your mind
    Chat,
    /// Write, browse and search journal entries
    #[command(subcommand)]
    Journal(JournalCommand),
    /// Log and review mood scores
    #[command(subcommand)]
    Mood(MoodCommand),
    /// Emotions, themes and thinking patterns across your history
    Analyze,
    /// Rebuild the thought map from your history
    Map,
    /// Mood chart, stats and insights
    Dashboard,
    /// Print a random affirmation
    Affirm,
    /// Print a random journaling prompt
    Prompt,
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    /// Save a new entry
    Add {
        content: String,
        /// Mood preset: Great, Good, Okay, Low, Sad or Anxious
        #[arg(long)]
        mood: Option<String>,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Most recent entries first
    List {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Case-insensitive search over content and tags
    Search { query: String },
    /// Change the content, mood or tags of an entry
    Edit {
        id: Uuid,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "clear_mood")]
        mood: Option<String>,
        #[arg(long)]
        clear_mood: bool,
        /// Replaces every existing tag
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum MoodCommand {
    /// Record a score from 0 to 10
    Log {
        score: f32,
        /// Defaults to the standard label for the score
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Logged moods, newest first
    List {
        /// Only moods from the last N days
        #[arg(long)]
        days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_format, cli.log_dir.as_deref())?;
    let out = Output::new(cli.json);

    // Commands that never touch stored records
    match cli.command {
        Command::Affirm => return out.line(affirmation(&mut rand::thread_rng())),
        Command::Prompt => return out.line(journal_prompt(&mut rand::thread_rng())),
        _ => {}
    }

    let config = TalkConfig::load_or_default(&cli.config);
    let db_path = resolve_db_path(cli.db, &config);
    let coordinator = WellnessCoordinator::open(&db_path, config).await?;

    match cli.command {
        Command::Chat => chat::run(&coordinator).await,
        Command::Journal(cmd) => journal(&coordinator, cmd, &out).await,
        Command::Mood(cmd) => mood(&coordinator, cmd, &out).await,
        Command::Analyze => {
            let analysis = coordinator.analyze_patterns(Utc::now()).await;
            out.analysis(&analysis)
        }
        Command::Map => {
            let graph = coordinator.rebuild_thought_map(Utc::now()).await;
            out.thought_map(&graph)
        }
        Command::Dashboard => {
            let dashboard = coordinator.dashboard(Utc::now()).await;
            out.dashboard(&dashboard)
        }
        Command::Affirm | Command::Prompt => Ok(()),
    }
}

/// Stderr logging filtered by `RUST_LOG` (default `info`), plus an optional
/// daily-rolling file. The returned guard flushes the file writer on drop.
fn init_tracing(format: LogFormat, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = match format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "talktome.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

/// `--db` wins, then a path set through config or `TALKTOME_DB_PATH`,
/// then the platform data directory.
fn resolve_db_path(flag: Option<PathBuf>, config: &TalkConfig) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if config.storage.db_path != StorageConfig::default().db_path {
        return PathBuf::from(&config.storage.db_path);
    }
    match dirs::data_dir() {
        Some(dir) => dir.join("talktome").join("talktome.db"),
        None => PathBuf::from(&config.storage.db_path),
    }
}

fn preset_snapshot(label: &str) -> Result<MoodSnapshot> {
    match mood_preset(label) {
        Some(preset) => Ok(preset.snapshot()),
        None => {
            let choices: Vec<&str> = MOOD_PRESETS.iter().map(|p| p.label).collect();
            bail!("Unknown mood '{}', expected one of {}", label, choices.join(", "))
        }
    }
}

async fn journal(coord: &WellnessCoordinator, cmd: JournalCommand, out: &Output) -> Result<()> {
    let now = Utc::now();
    match cmd {
        JournalCommand::Add {
            content,
            mood,
            tags,
        } => {
            let mood = mood.as_deref().map(preset_snapshot).transpose()?;
            let entry = coord.write_journal(&content, mood, tags, now).await?;
            info!("Journal entry {} written", entry.id);
            out.journal_entries(std::slice::from_ref(&entry))
        }
        JournalCommand::List { limit } => {
            let entries = coord.store().journal_entries().await;
            let shown = &entries[..entries.len().min(limit)];
            out.journal_entries(shown)
        }
        JournalCommand::Search { query } => {
            let entries = coord.search_journal(&query).await;
            out.journal_entries(&entries)
        }
        JournalCommand::Edit {
            id,
            content,
            mood,
            clear_mood,
            tags,
        } => {
            let mood = if clear_mood {
                Some(None)
            } else {
                mood.as_deref().map(preset_snapshot).transpose()?.map(Some)
            };
            let patch = JournalPatch {
                content,
                mood,
                tags: (!tags.is_empty()).then(|| tags.into_iter().collect()),
            };
            let entry = coord.edit_journal(id, patch, now).await?;
            out.journal_entries(std::slice::from_ref(&entry))
        }
        JournalCommand::Delete { id } => {
            if !coord.delete_journal(id).await? {
                bail!("No journal entry with id {}", id);
            }
            out.line(&format!("Deleted journal entry {}", id))
        }
    }
}

async fn mood(coord: &WellnessCoordinator, cmd: MoodCommand, out: &Output) -> Result<()> {
    let now = Utc::now();
    match cmd {
        MoodCommand::Log {
            score,
            label,
            notes,
        } => {
            let mood = coord.log_mood(score, label.as_deref(), &notes, now).await?;
            out.moods(std::slice::from_ref(&mood))
        }
        MoodCommand::List { days } => {
            let moods = match days {
                Some(days) => coord.store().moods_since(days, now).await,
                None => coord.store().moods().await,
            };
            out.moods(&moods)
        }
    }
}
