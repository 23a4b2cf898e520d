pub mod app;
pub mod cli;
pub mod constants;
pub mod responders;
pub mod runtime;
pub mod session;
pub mod shell;
pub mod storage;
pub mod utils;

pub use app::{load_config, Position, WidgetConfig};
pub use responders::{message_handler, MessageHandler, ResponseStrategy, StrategyKind};
pub use session::{ChatSession, Message, Sender, SessionBuilder, SessionSnapshot, SubmitOutcome};
pub use storage::{FileMessageStore, MemoryMessageStore, MessageStore};
pub use utils::WidgetError;
