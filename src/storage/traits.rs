use crate::session::Message;
use crate::utils::WidgetError;

/// Key-value persistence for one message log
///
/// Implementations are bound to a single namespace key at construction.
#[cfg_attr(test, mockall::automock)]
pub trait MessageStore: Send + Sync {
    /// Read the stored log
    ///
    /// Missing, corrupt or empty data all come back as `None`; this never fails.
    fn load(&self) -> Option<Vec<Message>>;

    /// Replace the stored log with `messages`
    fn save(&self, messages: &[Message]) -> Result<(), WidgetError>;

    /// Remove the stored log
    fn clear(&self) -> Result<(), WidgetError>;
}
