use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::traits::{Responder, StrategyKind};
use crate::constants::UNPROCESSABLE_MESSAGE;
use crate::utils::WidgetError;

/// Fields a reply is read from, in order of preference
const REPLY_FIELDS: &[&str] = &["response", "message"];

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Posts each message to an HTTP endpoint
///
/// Request body is `{"message": ...}`; the reply is taken from the
/// `response` field, else `message`, else a fixed fallback.
pub struct RemoteResponder {
    client: Client,
    endpoint: String,
}

impl RemoteResponder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pick the reply text out of a decoded response body
fn extract_reply(body: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .find_map(|field| {
            body.get(*field)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
        })
        .unwrap_or(UNPROCESSABLE_MESSAGE)
        .to_string()
}

#[async_trait]
impl Responder for RemoteResponder {
    async fn respond(&self, user_text: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message: user_text })
            .send()
            .await
            .map_err(|e| {
                WidgetError::TransportError(format!("request to {} failed: {}", self.endpoint, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::TransportError(format!(
                "{} returned status {}",
                self.endpoint, status
            ))
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| WidgetError::TransportError(format!("failed to read body: {}", e)))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| WidgetError::InvalidResponse(format!("body is not JSON: {}", e)))?;
        if !json.is_object() {
            return Err(WidgetError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                body.trim()
            ))
            .into());
        }

        debug!(endpoint = %self.endpoint, "received reply");
        Ok(extract_reply(&json))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Remote
    }
}
