/// Session management module - Gateway

mod builder;
mod controller;
mod hooks;
mod message;
mod snapshot;

pub use builder::SessionBuilder;
pub use controller::{ChatSession, RejectReason, SubmitOutcome};
pub use hooks::{MessageSentCallback, SessionHooks, ToggleCallback};
pub use message::{Message, MessageIdGenerator, Sender};
pub use snapshot::SessionSnapshot;
