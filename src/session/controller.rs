use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::hooks::SessionHooks;
use super::message::{Message, MessageIdGenerator, Sender};
use super::snapshot::SessionSnapshot;
use crate::app::WidgetConfig;
use crate::constants::APOLOGY_MESSAGE;
use crate::responders::{ResponseStrategy, StrategyKind};
use crate::storage::{retained_tail, MessageStore};
use crate::utils::WidgetError;

/// Why a submission was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    MaintenanceMode,
    /// Another exchange is still waiting for its reply
    ResponsePending,
}

/// What `submit` did with a piece of text
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no strategy ran
    Rejected(RejectReason),
    /// One user message and one bot reply were appended
    Completed {
        request_id: u64,
        user: Message,
        reply: Message,
        /// The reply is the apology because the strategy failed
        failed: bool,
    },
}

impl SubmitOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

struct SessionState {
    messages: Vec<Message>,
    is_typing: bool,
    is_open: bool,
    greeting: String,
    ids: MessageIdGenerator,
    last_request_id: u64,
    pending_request: Option<u64>,
}

struct SessionInner {
    config: WidgetConfig,
    strategy: ResponseStrategy,
    store: Option<Arc<dyn MessageStore>>,
    hooks: SessionHooks,
    request_timeout: Duration,
    state: Mutex<SessionState>,
}

impl SessionInner {
    /// Write the retained tail of the log through to storage
    ///
    /// Called with the state lock held so stored logs land in mutation order.
    fn persist(&self, state: &SessionState) {
        let Some(store) = &self.store else {
            return;
        };
        let tail = retained_tail(&state.messages, self.config.max_messages);
        if let Err(e) = store.save(tail) {
            warn!(error = %e, "failed to persist messages");
        }
    }
}

/// Clears the typing flag if a `submit` future is dropped mid-exchange
struct PendingExchange<'a> {
    inner: &'a SessionInner,
    request_id: u64,
    settled: bool,
}

impl<'a> PendingExchange<'a> {
    fn settle(mut self, content: &str) -> Message {
        let mut state = self.inner.state.lock();
        let reply = state.ids.message(Sender::Bot, content);
        state.messages.push(reply.clone());
        state.is_typing = false;
        state.pending_request = None;
        self.inner.persist(&state);
        self.settled = true;
        reply
    }
}

impl Drop for PendingExchange<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.inner.state.lock();
        if state.pending_request == Some(self.request_id) {
            state.is_typing = false;
            state.pending_request = None;
            warn!(request_id = self.request_id, "exchange abandoned before a reply arrived");
        }
    }
}

/// One widget's conversation: message log, typing and visibility state
///
/// Cloning yields another handle to the same session, so a shell can keep
/// toggling and rendering while a `submit` is awaiting its reply.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

impl ChatSession {
    pub(crate) fn mount(
        config: WidgetConfig,
        strategy: ResponseStrategy,
        store: Option<Arc<dyn MessageStore>>,
        hooks: SessionHooks,
        request_timeout: Duration,
    ) -> Self {
        let hydrated = store.as_ref().and_then(|store| store.load());
        let greeting = config.greeting_message.trim().to_string();

        let (messages, ids) = match hydrated {
            Some(messages) => {
                info!(count = messages.len(), "restored stored conversation");
                let ids = MessageIdGenerator::seeded_from(&messages);
                (messages, ids)
            }
            None => (
                vec![Message::greeting(greeting.as_str())],
                MessageIdGenerator::new(),
            ),
        };

        let state = SessionState {
            messages,
            is_typing: false,
            is_open: config.default_open,
            greeting,
            ids,
            last_request_id: 0,
            pending_request: None,
        };

        let inner = SessionInner {
            config,
            strategy,
            store,
            hooks,
            request_timeout,
            state: Mutex::new(state),
        };

        {
            let state = inner.state.lock();
            inner.persist(&state);
        }

        debug!(strategy = %inner.strategy.kind(), "chat session mounted");
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn open(&self) -> bool {
        self.set_open(true)
    }

    pub fn close(&self) -> bool {
        self.set_open(false)
    }

    /// Flip visibility and return the new value
    pub fn toggle(&self) -> bool {
        let is_open = {
            let mut state = self.inner.state.lock();
            state.is_open = !state.is_open;
            state.is_open
        };
        self.inner.hooks.toggled(is_open);
        is_open
    }

    fn set_open(&self, is_open: bool) -> bool {
        self.inner.state.lock().is_open = is_open;
        self.inner.hooks.toggled(is_open);
        is_open
    }

    /// Send user text to the active strategy and record the exchange
    ///
    /// Blank text, maintenance mode and an exchange already in flight are
    /// silent rejections. Strategy failures and timeouts produce the apology
    /// reply. This never returns an error.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let content = text.trim();
        if content.is_empty() {
            debug!("ignoring empty submission");
            return SubmitOutcome::Rejected(RejectReason::EmptyInput);
        }
        if self.inner.config.is_maintenance_mode {
            debug!("ignoring submission during maintenance");
            return SubmitOutcome::Rejected(RejectReason::MaintenanceMode);
        }

        let (request_id, user) = {
            let mut state = self.inner.state.lock();
            if state.is_typing {
                debug!("ignoring submission while a reply is pending");
                return SubmitOutcome::Rejected(RejectReason::ResponsePending);
            }
            state.last_request_id += 1;
            let request_id = state.last_request_id;
            let user = state.ids.message(Sender::User, content);
            state.messages.push(user.clone());
            state.is_typing = true;
            state.pending_request = Some(request_id);
            self.inner.persist(&state);
            (request_id, user)
        };

        let exchange = PendingExchange {
            inner: &self.inner,
            request_id,
            settled: false,
        };

        self.inner.hooks.message_sent(content);

        let span = info_span!("exchange", request_id, strategy = %self.inner.strategy.kind());
        let result = tokio::time::timeout(
            self.inner.request_timeout,
            self.inner.strategy.respond(content),
        )
        .instrument(span)
        .await;

        let (reply_text, failed) = match result {
            Ok(Ok(reply)) => (reply, false),
            Ok(Err(e)) => {
                error!(request_id, "failed to get a response: {:#}", e);
                (APOLOGY_MESSAGE.to_string(), true)
            }
            Err(_) => {
                let e = WidgetError::Timeout(self.inner.request_timeout);
                error!(request_id, "failed to get a response: {}", e);
                (APOLOGY_MESSAGE.to_string(), true)
            }
        };

        let reply = exchange.settle(&reply_text);
        SubmitOutcome::Completed {
            request_id,
            user,
            reply,
            failed,
        }
    }

    /// Apply a new greeting text
    ///
    /// Rewrites the first message only while it is still the greeting.
    /// Returns whether the log changed.
    pub fn set_greeting(&self, greeting: &str) -> bool {
        let greeting = greeting.trim();
        if greeting.is_empty() {
            return false;
        }

        let mut state = self.inner.state.lock();
        if state.greeting == greeting {
            return false;
        }
        state.greeting = greeting.to_string();

        match state.messages.first_mut() {
            Some(first) if first.is_greeting() => {
                first.content = greeting.to_string();
            }
            _ => return false,
        }
        self.inner.persist(&state);
        true
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.inner.state.lock().is_typing
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().is_open
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let config = &self.inner.config;
        let state = self.inner.state.lock();
        SessionSnapshot {
            messages: state.messages.clone(),
            is_typing: state.is_typing,
            is_open: state.is_open,
            is_online: config.is_online,
            is_maintenance_mode: config.is_maintenance_mode,
            maintenance_message: config.maintenance_message.clone(),
            title: config.title.clone(),
            position: config.position,
            brand_color: config.brand_color.clone(),
            avatar_url: config.avatar_url.clone(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.inner.strategy.kind()
    }
}
