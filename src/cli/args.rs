use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::WidgetConfig;

#[derive(Parser, Debug)]
#[command(name = "eloquent-chat")]
#[command(version)]
#[command(about = "Terminal front end for the eloquent chat widget", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Endpoint that answers messages (POST {"message": ...})
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Greeting shown in a fresh conversation
    #[arg(short, long)]
    pub greeting: Option<String>,

    /// Start in maintenance mode (submissions are rejected)
    #[arg(long)]
    pub maintenance: bool,

    /// Do not load or save the message log
    #[arg(long)]
    pub no_persist: bool,

    /// Maximum number of messages kept in storage
    #[arg(long)]
    pub max_messages: Option<usize>,

    /// Namespace the message log is stored under
    #[arg(long)]
    pub storage_key: Option<String>,

    /// Directory holding stored message logs
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Start with the widget open
    #[arg(long)]
    pub open: bool,

    /// Send one message, print the reply and exit
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Layer command-line flags over a loaded configuration
    pub fn apply_to(&self, config: &mut WidgetConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.api_endpoint = Some(endpoint.clone());
        }
        if let Some(greeting) = &self.greeting {
            config.greeting_message = greeting.clone();
        }
        if self.maintenance {
            config.is_maintenance_mode = true;
        }
        if self.no_persist {
            config.persist_messages = false;
        }
        if let Some(max) = self.max_messages {
            config.max_messages = max;
        }
        if let Some(key) = &self.storage_key {
            config.storage_key = key.clone();
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir = Some(dir.clone());
        }
        if self.open {
            config.default_open = true;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Print the stored conversation
    History,
    /// Erase the stored conversation
    Clear,
    /// Start a chat session (default)
    Chat,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
