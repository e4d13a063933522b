pub mod errors;
pub mod id;

pub use errors::{ConfigError, WebTtyError};
pub use id::{SessionId, SessionLabels};

pub type Result<T> = std::result::Result<T, WebTtyError>;
