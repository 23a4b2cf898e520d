use anyhow::Result;
use std::time::Duration;
use tracing::debug;

use super::custom::{CustomResponder, MessageHandler};
use super::remote::RemoteResponder;
use super::simulated::SimulatedResponder;
use super::strategy::ResponseStrategy;
use crate::app::WidgetConfig;

/// Factory for choosing a session's response strategy
pub struct ResponderFactory;

impl ResponderFactory {
    /// Select the strategy for a session
    ///
    /// A custom handler wins over an endpoint; an endpoint wins over the
    /// simulated responder.
    pub fn select(
        config: &WidgetConfig,
        handler: Option<MessageHandler>,
    ) -> Result<ResponseStrategy> {
        let strategy = if let Some(handler) = handler {
            ResponseStrategy::Custom(CustomResponder::new(handler))
        } else if let Some(endpoint) = config.endpoint() {
            let timeout = Duration::from_secs(config.request_timeout_secs);
            ResponseStrategy::Remote(RemoteResponder::new(endpoint, timeout)?)
        } else {
            ResponseStrategy::Simulated(SimulatedResponder::new(
                config.simulated_delay_min_ms,
                config.simulated_delay_max_ms,
            ))
        };

        debug!(strategy = %strategy.kind(), "selected response strategy");
        Ok(strategy)
    }
}
