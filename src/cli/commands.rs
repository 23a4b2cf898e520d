use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{init_config, WidgetConfig},
    shell::render_message,
    storage::{FileMessageStore, MessageStore},
};

use super::Commands;

/// Handle CLI subcommands
///
/// Returns `true` when the command is complete and the program should exit.
pub async fn handle_command(command: &Commands, config: &WidgetConfig) -> Result<bool> {
    match command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display());
            Ok(true)
        }
        Commands::History => {
            show_history(config)?;
            Ok(true)
        }
        Commands::Clear => {
            clear_history(config)?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Print the stored conversation for the configured key
pub fn show_history(config: &WidgetConfig) -> Result<()> {
    let store = FileMessageStore::for_config(config)?;
    match store.load() {
        Some(messages) => {
            println!(
                "{} messages stored in {}",
                messages.len(),
                store.path().display()
            );
            for message in &messages {
                println!("{}", render_message(message));
            }
        }
        None => println!("No stored conversation for '{}'", config.storage_key),
    }
    Ok(())
}

/// Erase the stored conversation for the configured key
pub fn clear_history(config: &WidgetConfig) -> Result<()> {
    let store = FileMessageStore::for_config(config)?;
    store.clear()?;
    println!("Cleared stored conversation '{}'", config.storage_key.green());
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("eloquent-chat v{}", env!("CARGO_PKG_VERSION"));
    println!("   Embeddable chat widget core with a terminal front end");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clear_removes_stored_log() {
        let dir = TempDir::new().unwrap();
        let config = WidgetConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            ..WidgetConfig::default()
        };
        let store = FileMessageStore::for_config(&config).unwrap();
        store.save(&[Message::greeting("Hi")]).unwrap();

        assert!(handle_command(&Commands::Clear, &config).await.unwrap());
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_chat_continues_to_session() {
        let config = WidgetConfig::default();
        assert!(!handle_command(&Commands::Chat, &config).await.unwrap());
    }
}
