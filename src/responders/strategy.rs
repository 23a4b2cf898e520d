use anyhow::Result;

use super::custom::CustomResponder;
use super::remote::RemoteResponder;
use super::simulated::SimulatedResponder;
use super::traits::{Responder, StrategyKind};
use crate::constants::UNPROCESSABLE_MESSAGE;

/// The one response strategy a session uses, fixed at mount
pub enum ResponseStrategy {
    Custom(CustomResponder),
    Remote(RemoteResponder),
    Simulated(SimulatedResponder),
}

impl ResponseStrategy {
    pub fn kind(&self) -> StrategyKind {
        self.responder().kind()
    }

    fn responder(&self) -> &dyn Responder {
        match self {
            ResponseStrategy::Custom(r) => r,
            ResponseStrategy::Remote(r) => r,
            ResponseStrategy::Simulated(r) => r,
        }
    }

    /// Ask the active strategy for a reply
    ///
    /// A blank reply is replaced with the "could not process" text so the
    /// log never gains an empty bot message.
    pub async fn respond(&self, user_text: &str) -> Result<String> {
        let reply = self.responder().respond(user_text).await?;
        if reply.trim().is_empty() {
            Ok(UNPROCESSABLE_MESSAGE.to_string())
        } else {
            Ok(reply)
        }
    }
}
