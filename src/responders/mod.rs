// Gateway module for responders - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod custom;
mod factory;
mod remote;
mod simulated;
mod strategy;
mod traits;

// Public re-exports - the ONLY way to access responder functionality
pub use custom::{message_handler, CustomResponder, MessageHandler};
pub use factory::ResponderFactory;
pub use remote::RemoteResponder;
pub use simulated::SimulatedResponder;
pub use strategy::ResponseStrategy;
pub use traits::{Responder, StrategyKind};
