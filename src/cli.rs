use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::models::{
    format_relative, Conversation, ConversationQuery, ConversationStatus, StatusFilter,
};
use crate::services::{ArchiveUndoService, PreferencesStore, UndoWindow};
use crate::storage::{
    load_store, share, ConversationListStore, DemoSeed, JsonSeedFile, SeedSource, StoreError,
};

pub const DELETE_PROMPT: &str =
    "Supprimer la conversation ? Cette action est irréversible. La conversation et tous ses messages seront définitivement supprimés.";

#[derive(Debug, Parser)]
#[command(name = "linguaflow", version, about = "Manage LinguaFlow conversations")]
pub struct Cli {
    /// JSON seed file (overrides `seed_path` from the configuration)
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List conversations
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        language: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Count conversations per status
    Stats,
    /// Archive a conversation, offering an undo until the window closes
    Archive {
        id: String,
    },
    /// Restore an archived conversation to the status it had before
    UndoArchive {
        id: String,
        previous: ConversationStatus,
    },
    Complete {
        id: String,
    },
    Resume {
        id: String,
    },
    /// Permanently delete a conversation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show or set immersive mode
    Immersive {
        state: Option<Toggle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::List { .. } | Command::Stats | Command::Immersive { .. }
        )
    }
}

pub async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    if let Command::Immersive { state } = cli.command {
        let prefs = PreferencesStore::new(&config.preferences_path);
        let pref = match state {
            Some(toggle) => prefs.set_enabled(toggle == Toggle::On).await?,
            None => prefs.load().await,
        };
        writeln!(stdout, "immersive: {}", if pref.enabled { "on" } else { "off" })?;
        return Ok(());
    }

    let source: Box<dyn SeedSource> = match cli.seed.or_else(|| config.seed_path()) {
        Some(path) => Box::new(JsonSeedFile::new(path)),
        None => Box::new(DemoSeed),
    };

    let mut store = load_store(source.as_ref(), config.event_capacity)
        .await
        .context("Failed to load conversations")?;

    if let Command::Archive { id } = &cli.command {
        let service = ArchiveUndoService::new(share(store), UndoWindow::new(config.undo_window()));
        let changed = archive_with_undo(&service, id, &mut stdout, prompt_undo()).await?;
        if changed && source.is_persistent() {
            source.save(service.store().read().await.conversations()).await?;
        }
        return Ok(());
    }

    let mut confirm = |conv: &Conversation| prompt_delete(conv).unwrap_or(false);
    let changed = execute(&cli.command, &mut store, &mut stdout, &mut confirm)?;

    if changed && cli.command.mutates() && source.is_persistent() {
        source.save(store.conversations()).await?;
    }

    Ok(())
}

/// Runs one command against the store. Returns whether the store changed.
pub fn execute<W: Write>(
    command: &Command,
    store: &mut ConversationListStore,
    out: &mut W,
    confirm_delete: &mut dyn FnMut(&Conversation) -> bool,
) -> anyhow::Result<bool> {
    match command {
        Command::List {
            search,
            status,
            language,
            json,
        } => {
            let mut query = ConversationQuery::new(search.as_str(), *status);
            if let Some(language) = language {
                query = query.with_language(language.as_str());
            }
            let view = store.query(query);

            if *json {
                serde_json::to_writer_pretty(&mut *out, &view.to_vec())?;
                writeln!(out)?;
            } else {
                let now = Utc::now();
                for conv in &view {
                    print_conversation(out, conv, now)?;
                }
                let n = view.count();
                writeln!(
                    out,
                    "{} conversation{} trouvée{}",
                    n,
                    if n == 1 { "" } else { "s" },
                    if n == 1 { "" } else { "s" }
                )?;
            }
            Ok(false)
        }
        Command::Stats => {
            let counts = store.status_counts();
            for status in ConversationStatus::ALL {
                writeln!(out, "{:<10} {}", status.label(), counts.get(status))?;
            }
            writeln!(out, "{:<10} {}", "Total", counts.total())?;
            Ok(false)
        }
        Command::Archive { id } => {
            let previous = match store.archive(id) {
                Ok(previous) => previous,
                Err(e) => return benign(Err(e)),
            };
            writeln!(out, "Conversation {} archivée (était: {})", id, previous)?;
            Ok(previous != ConversationStatus::Archived)
        }
        Command::UndoArchive { id, previous } => {
            let restored = store.undo_archive(id, *previous);
            if restored {
                writeln!(out, "Conversation {} restaurée ({})", id, previous)?;
            } else {
                tracing::warn!("Nothing to undo for conversation {}", id);
            }
            Ok(restored && *previous != ConversationStatus::Archived)
        }
        Command::Complete { id } => {
            let changed = benign(store.complete(id).map(|p| p != ConversationStatus::Completed))?;
            if changed {
                writeln!(out, "Conversation {} marquée comme terminée", id)?;
            }
            Ok(changed)
        }
        Command::Resume { id } => {
            let changed = benign(store.resume(id).map(|p| p != ConversationStatus::Active))?;
            if changed {
                writeln!(out, "Conversation {} reprise", id)?;
            }
            Ok(changed)
        }
        Command::Delete { id, yes } => {
            let token = match store.mark_delete_pending(id) {
                Ok(token) => token,
                Err(e) => return benign(Err(e)),
            };

            let conv = store.get(id)?.clone();
            if *yes || confirm_delete(&conv) {
                let deleted = benign(store.confirm_delete(token).map(|_| true))?;
                if deleted {
                    writeln!(out, "Conversation \"{}\" supprimée", conv.title)?;
                }
                Ok(deleted)
            } else {
                store.cancel_delete(token);
                writeln!(out, "Suppression annulée")?;
                Ok(false)
            }
        }
        Command::Immersive { .. } => Ok(false),
    }
}

/// Archives through the service and keeps the undo open until either the
/// window closes or `undo_requested` resolves. Returns whether the store
/// changed.
pub async fn archive_with_undo<W, F>(
    service: &ArchiveUndoService,
    id: &str,
    out: &mut W,
    undo_requested: F,
) -> anyhow::Result<bool>
where
    W: Write,
    F: Future<Output = bool>,
{
    let handle = match service.archive(id).await {
        Ok(handle) => handle,
        Err(e) => return benign(Err(e)),
    };
    let previous = handle.ticket().previous_status;
    writeln!(out, "Conversation {} archivée (était: {})", id, previous)?;

    if previous == ConversationStatus::Archived {
        return Ok(false);
    }

    writeln!(out, "Annuler ? [o/N] ({}s)", handle.remaining().as_secs())?;
    out.flush()?;

    let clicked = tokio::select! {
        _ = handle.expired() => false,
        clicked = undo_requested => clicked,
    };

    if clicked && service.undo(handle).await {
        writeln!(out, "Archivage annulé, conversation {} restaurée ({})", id, previous)?;
    }

    // An undone archive still moved the conversation to the back
    Ok(true)
}

/// NotFound and StaleToken mean "already resolved": log and carry on.
fn benign(result: Result<bool, StoreError>) -> anyhow::Result<bool> {
    match result {
        Ok(changed) => Ok(changed),
        Err(e) if e.is_benign() => {
            tracing::warn!("{}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_conversation<W: Write>(
    out: &mut W,
    conv: &Conversation,
    now: chrono::DateTime<Utc>,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>3}  {} {}  [{}]  {}  {}",
        conv.id,
        conv.language_flag,
        conv.title,
        conv.status.label(),
        conv.language,
        format_relative(conv.timestamp, now)
    )?;
    if !conv.last_message.is_empty() {
        writeln!(out, "     {}", conv.last_message)?;
    }
    Ok(())
}

/// Reads the undo answer on a detached thread so an expired window never
/// waits on stdin.
fn prompt_undo() -> impl Future<Output = bool> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut answer = String::new();
        let accepted = std::io::stdin()
            .read_line(&mut answer)
            .map(|_| is_yes(&answer))
            .unwrap_or(false);
        let _ = tx.send(accepted);
    });
    async move { rx.await.unwrap_or(false) }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "o" | "oui" | "y" | "yes")
}

fn prompt_delete(conv: &Conversation) -> std::io::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}\n\"{}\" [o/N] ", DELETE_PROMPT, conv.title)?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}
