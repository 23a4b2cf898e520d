use std::sync::Arc;

/// Called with the new visibility after every open/close/toggle
pub type ToggleCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Called with the trimmed text of every accepted submission
pub type MessageSentCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Notifications the session sends back to the presentation shell
#[derive(Clone, Default)]
pub struct SessionHooks {
    pub on_toggle: Option<ToggleCallback>,
    pub on_message_sent: Option<MessageSentCallback>,
}

impl SessionHooks {
    pub(crate) fn toggled(&self, is_open: bool) {
        if let Some(callback) = &self.on_toggle {
            callback(is_open);
        }
    }

    pub(crate) fn message_sent(&self, text: &str) {
        if let Some(callback) = &self.on_message_sent {
            callback(text);
        }
    }
}
