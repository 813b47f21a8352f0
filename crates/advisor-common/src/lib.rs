pub mod errors;
pub mod id;

pub use errors::{AdvisorError, ConfigError};
pub use id::{new_correlation_id, SessionId};

pub type Result<T> = std::result::Result<T, AdvisorError>;
