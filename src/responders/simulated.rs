use anyhow::Result;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Duration;

use super::traits::{Responder, StrategyKind};
use crate::constants::{CANNED_RESPONSES, SIMULATED_DELAY_MAX_MS, SIMULATED_DELAY_MIN_MS};

/// Offline stand-in that answers with a canned acknowledgement
pub struct SimulatedResponder {
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl Default for SimulatedResponder {
    fn default() -> Self {
        Self::new(SIMULATED_DELAY_MIN_MS, SIMULATED_DELAY_MAX_MS)
    }
}

impl SimulatedResponder {
    /// Delay is drawn uniformly from `min_delay_ms..=max_delay_ms`
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        }
    }

    fn plan(&self) -> (Duration, &'static str) {
        let mut rng = rand::rng();
        let delay = rng.random_range(self.min_delay_ms..=self.max_delay_ms);
        let reply = CANNED_RESPONSES
            .choose(&mut rng)
            .copied()
            .unwrap_or(CANNED_RESPONSES[0]);
        (Duration::from_millis(delay), reply)
    }
}

#[async_trait]
impl Responder for SimulatedResponder {
    async fn respond(&self, _user_text: &str) -> Result<String> {
        let (delay, reply) = self.plan();
        tokio::time::sleep(delay).await;
        Ok(reply.to_string())
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Simulated
    }
}
