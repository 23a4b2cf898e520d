use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use super::controller::ChatSession;
use super::hooks::SessionHooks;
use crate::app::WidgetConfig;
use crate::responders::{MessageHandler, ResponderFactory};
use crate::storage::{FileMessageStore, MessageStore};

/// Assembles a [`ChatSession`] from configuration, hooks and storage
pub struct SessionBuilder {
    config: WidgetConfig,
    hooks: SessionHooks,
    handler: Option<MessageHandler>,
    store: Option<Arc<dyn MessageStore>>,
    request_timeout: Option<Duration>,
}

impl SessionBuilder {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            hooks: SessionHooks::default(),
            handler: None,
            store: None,
            request_timeout: None,
        }
    }

    /// Persist into `store` instead of the default file store
    pub fn store(self, store: impl MessageStore + 'static) -> Self {
        self.shared_store(Arc::new(store))
    }

    pub fn shared_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_toggle(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.hooks.on_toggle = Some(Arc::new(callback));
        self
    }

    pub fn on_message_sent(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.hooks.on_message_sent = Some(Arc::new(callback));
        self
    }

    /// Answer messages with `handler`; takes precedence over `api_endpoint`
    pub fn custom_handler(mut self, handler: MessageHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Override `request_timeout_secs` with a finer-grained bound
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validate the configuration, pick the strategy and hydrate the log
    pub fn build(self) -> Result<ChatSession> {
        self.config.validate()?;

        let strategy = ResponderFactory::select(&self.config, self.handler)?;

        let store: Option<Arc<dyn MessageStore>> = if self.config.persist_messages {
            match self.store {
                Some(store) => Some(store),
                None => Some(Arc::new(FileMessageStore::for_config(&self.config)?)),
            }
        } else {
            None
        };

        let timeout = self
            .request_timeout
            .unwrap_or_else(|| Duration::from_secs(self.config.request_timeout_secs));

        Ok(ChatSession::mount(
            self.config,
            strategy,
            store,
            self.hooks,
            timeout,
        ))
    }
}
