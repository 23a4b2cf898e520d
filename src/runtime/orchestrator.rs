use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    app::{load_config, load_config_from, WidgetConfig},
    cli::{handle_command, Cli},
    session::{ChatSession, RejectReason, SessionBuilder, SubmitOutcome},
    shell::{
        parse_input, render_help, render_launcher, render_message, render_transcript,
        render_typing, ShellInput,
    },
};

/// Resolve the configuration: explicit file or layered sources, then flags
pub fn resolve_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut config = if let Some(path) = &cli.config {
        load_config_from(path)?
    } else {
        match load_config() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {:#}. Using defaults.", e);
                WidgetConfig::default()
            }
        }
    };
    cli.apply_to(&mut config);
    Ok(config)
}

/// Main runtime orchestrator for the interactive shell
pub struct Orchestrator {
    cli: Cli,
    config: WidgetConfig,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
        }

        let session = SessionBuilder::new(self.config.clone())
            .on_toggle(|is_open| debug!(is_open, "widget visibility changed"))
            .on_message_sent(|text| debug!(chars = text.chars().count(), "message sent"))
            .build()?;

        println!(
            "Starting {} ({} responder)",
            session.config().title.green(),
            session.strategy_kind()
        );
        println!("{}", "Type /help for commands.".dimmed());
        draw(&session);

        let mut in_flight: Option<JoinHandle<SubmitOutcome>> = None;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_input(&line) {
                ShellInput::Quit => {
                    if let Some(task) = in_flight.take() {
                        task.abort();
                    }
                    return Ok(());
                }
                ShellInput::Open => {
                    session.open();
                    draw(&session);
                }
                ShellInput::Close => {
                    session.close();
                    draw(&session);
                }
                ShellInput::Toggle => {
                    session.toggle();
                    draw(&session);
                }
                ShellInput::Greeting(text) => {
                    if !session.set_greeting(&text) {
                        println!("{}", "Greeting unchanged.".dimmed());
                    }
                    draw(&session);
                }
                ShellInput::History => {
                    for message in session.messages() {
                        println!("{}", render_message(&message));
                    }
                }
                ShellInput::Help => println!("{}", render_help()),
                ShellInput::Unknown(name) => {
                    println!("{} /{}", "Unknown command:".red(), name);
                }
                ShellInput::Message(text) => {
                    if let Some(task) = send(&session, &text) {
                        in_flight = Some(task);
                    }
                }
            }
        }

        // Input ended; let the last reply land before exiting
        if let Some(task) = in_flight {
            if let Err(e) = task.await {
                warn!("Reply task failed: {}", e);
            }
        }
        Ok(())
    }
}

fn draw(session: &ChatSession) {
    let snapshot = session.snapshot();
    if snapshot.is_open {
        println!("{}", render_transcript(&snapshot));
    } else {
        println!("{}", render_launcher(&snapshot));
    }
}

/// Submit `text` in the background so the input loop keeps running
///
/// Returns `None` when nothing was started.
fn send(session: &ChatSession, text: &str) -> Option<JoinHandle<SubmitOutcome>> {
    if !session.is_open() {
        println!("{}", "The widget is closed. Use /open first.".dimmed());
        return None;
    }
    if text.trim().is_empty() {
        return None;
    }
    if session.config().is_maintenance_mode {
        report_rejection(RejectReason::MaintenanceMode);
        return None;
    }
    if session.is_typing() {
        report_rejection(RejectReason::ResponsePending);
        return None;
    }

    println!("{}", render_typing());
    let session = session.clone();
    let text = text.to_string();
    Some(tokio::spawn(async move {
        let outcome = session.submit(&text).await;
        match &outcome {
            SubmitOutcome::Completed { reply, .. } => println!("{}", render_message(reply)),
            SubmitOutcome::Rejected(reason) => report_rejection(*reason),
        }
        outcome
    }))
}

fn report_rejection(reason: RejectReason) {
    match reason {
        RejectReason::MaintenanceMode => {
            println!("{}", "Chat unavailable during maintenance".yellow());
        }
        RejectReason::ResponsePending => {
            println!("{}", "Still waiting for the previous reply.".dimmed());
        }
        RejectReason::EmptyInput => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responders::message_handler;
    use crate::storage::MemoryMessageStore;
    use clap::Parser;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    #[test]
    fn test_resolve_config_from_file_then_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widget.toml");
        std::fs::write(&path, "title = \"Help Desk\"\nmax_messages = 10\n").unwrap();

        let cli = Cli::parse_from([
            "eloquent-chat",
            "--config",
            path.to_str().unwrap(),
            "--max-messages",
            "3",
        ]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.title, "Help Desk");
        assert_eq!(config.max_messages, 3);
    }

    #[tokio::test]
    async fn test_send_leaves_shell_responsive_while_waiting() {
        let release = Arc::new(Notify::new());
        let gate = release.clone();
        let session = SessionBuilder::new(WidgetConfig {
            default_open: true,
            ..WidgetConfig::default()
        })
        .store(MemoryMessageStore::new("test"))
        .custom_handler(message_handler(move |text| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok(format!("echo: {}", text))
            }
        }))
        .build()
        .unwrap();

        let task = send(&session, "Hello").unwrap();
        for _ in 0..200 {
            if session.is_typing() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(session.is_typing());

        // Shell commands still apply while the reply is outstanding
        assert!(!session.toggle());
        assert!(session.toggle());
        assert!(send(&session, "Again").is_none());

        release.notify_one();
        let outcome = task.await.unwrap();
        match outcome {
            SubmitOutcome::Completed { reply, failed, .. } => {
                assert!(!failed);
                assert_eq!(reply.content, "echo: Hello");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!session.is_typing());
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_send_skips_closed_blank_and_maintenance() {
        let closed = SessionBuilder::new(WidgetConfig::default())
            .store(MemoryMessageStore::new("test"))
            .build()
            .unwrap();
        assert!(send(&closed, "Hello").is_none());

        let maintenance = SessionBuilder::new(WidgetConfig {
            default_open: true,
            is_maintenance_mode: true,
            ..WidgetConfig::default()
        })
        .store(MemoryMessageStore::new("test"))
        .build()
        .unwrap();
        assert!(send(&maintenance, "Hello").is_none());
        assert!(send(&maintenance, "   ").is_none());
        assert_eq!(maintenance.messages().len(), 1);
    }
}
