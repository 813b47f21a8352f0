//! Persistent conversation sessions.
//!
//! A session is a caller-named history of user/model text turns. The
//! [`SessionService`] loads it, runs one exchange through the
//! orchestrator and writes the extended history back.

mod locks;
mod redis_store;
mod service;
mod store;
mod types;


pub use locks::SessionLocks;
pub use redis_store::RedisStore;
pub use service::{Reply, SessionLimits, SessionService};
pub use store::{HistoryStore, MemoryStore, StoreError};
pub use types::ConversationMessage;
