use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{
    app::WidgetConfig,
    cli::OutputFormat,
    session::{ChatSession, RejectReason, SessionBuilder, SubmitOutcome},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was sent
    pub prompt: String,
    /// The bot's reply, absent when the prompt was rejected
    pub response: Option<String>,
    /// The reply is the apology because the responder failed
    pub failed: bool,
    /// Why the prompt was rejected, if it was
    pub rejected: Option<String>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Responder that produced the reply
    pub strategy: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

impl NonInteractiveResult {
    pub fn is_success(&self) -> bool {
        self.rejected.is_none() && !self.failed
    }
}

/// Non-interactive runner for sending a single message
pub struct NonInteractiveRunner {
    session: ChatSession,
}

impl NonInteractiveRunner {
    pub fn new(config: WidgetConfig) -> Result<Self> {
        Ok(Self {
            session: SessionBuilder::new(config).build()?,
        })
    }

    /// Use an already assembled session
    pub fn with_session(session: ChatSession) -> Self {
        Self { session }
    }

    pub async fn execute(&self, prompt: String) -> NonInteractiveResult {
        let start = Instant::now();
        let outcome = self.session.submit(&prompt).await;

        let (response, failed, rejected) = match outcome {
            SubmitOutcome::Completed { reply, failed, .. } => (Some(reply.content), failed, None),
            SubmitOutcome::Rejected(reason) => {
                let reason = match reason {
                    RejectReason::EmptyInput => "empty message",
                    RejectReason::MaintenanceMode => "maintenance mode",
                    RejectReason::ResponsePending => "response pending",
                };
                (None, false, Some(reason.to_string()))
            }
        };

        NonInteractiveResult {
            prompt,
            response,
            failed,
            rejected,
            metadata: ExecutionMetadata {
                strategy: self.session.strategy_kind().to_string(),
                duration_ms: start.elapsed().as_millis(),
            },
        }
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => match (&result.response, &result.rejected) {
                (Some(response), _) => response.clone(),
                (None, Some(reason)) => format!("Message not sent: {}", reason),
                (None, None) => String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responders::message_handler;
    use crate::storage::MemoryMessageStore;

    fn runner(config: WidgetConfig) -> NonInteractiveRunner {
        let session = SessionBuilder::new(config)
            .store(MemoryMessageStore::new("test"))
            .custom_handler(message_handler(|text| async move {
                Ok(format!("you said {}", text))
            }))
            .build()
            .unwrap();
        NonInteractiveRunner::with_session(session)
    }

    #[tokio::test]
    async fn test_text_output_is_the_reply() {
        let runner = runner(WidgetConfig::default());
        let result = runner.execute("hi".to_string()).await;

        assert!(result.is_success());
        assert_eq!(runner.format_result(&result, OutputFormat::Text), "you said hi");
        assert_eq!(result.metadata.strategy, "custom");
    }

    #[tokio::test]
    async fn test_rejection_is_reported() {
        let runner = runner(WidgetConfig {
            is_maintenance_mode: true,
            ..WidgetConfig::default()
        });
        let result = runner.execute("hi".to_string()).await;

        assert!(!result.is_success());
        assert_eq!(
            runner.format_result(&result, OutputFormat::Text),
            "Message not sent: maintenance mode"
        );

        let json: serde_json::Value =
            serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["rejected"], "maintenance mode");
        assert!(json["response"].is_null());
    }
}
