// Gateway module for storage - follows the Train Station Pattern
// All external access must go through this gateway

mod codec;
mod file_store;
mod memory_store;
mod traits;

pub use codec::{decode_log, encode_log, retained_tail};
pub use file_store::FileMessageStore;
pub use memory_store::MemoryMessageStore;
pub use traits::MessageStore;

#[cfg(test)]
pub use traits::MockMessageStore;
