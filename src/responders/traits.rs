use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Which response strategy a session is using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Custom,
    Remote,
    Simulated,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Custom => f.write_str("custom"),
            StrategyKind::Remote => f.write_str("remote"),
            StrategyKind::Simulated => f.write_str("simulated"),
        }
    }
}

/// Core trait that every response strategy implements
#[async_trait]
pub trait Responder: Send + Sync {
    /// Turn the user's (already trimmed) text into a reply
    async fn respond(&self, user_text: &str) -> Result<String>;

    fn kind(&self) -> StrategyKind;
}
