use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::traits::{Responder, StrategyKind};
use crate::utils::WidgetError;

/// Caller-supplied async function that answers a user message
pub type MessageHandler = Arc<dyn Fn(String) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Wrap an async closure as a [`MessageHandler`]
pub fn message_handler<F, Fut>(handler: F) -> MessageHandler
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    Arc::new(move |text| handler(text).boxed())
}

/// Delegates every message to a [`MessageHandler`]
///
/// Handler errors pass through untouched. A panic inside the handler is
/// caught and reported as [`WidgetError::HandlerError`].
#[derive(Clone)]
pub struct CustomResponder {
    handler: MessageHandler,
}

impl CustomResponder {
    pub fn new(handler: MessageHandler) -> Self {
        Self { handler }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[async_trait]
impl Responder for CustomResponder {
    async fn respond(&self, user_text: &str) -> Result<String> {
        let text = user_text.to_string();
        let future = std::panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(text)))
            .map_err(|payload| WidgetError::HandlerError(panic_message(payload)))?;

        AssertUnwindSafe(future)
            .catch_unwind()
            .await
            .map_err(|payload| WidgetError::HandlerError(panic_message(payload)))?
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Custom
    }
}
