pub mod error;
pub mod handlers;
pub mod outcome;

pub use error::{RpcError, RpcResult};
pub use handlers::TaskHandler;
pub use outcome::{OutcomeStatus, TaskOutcome};

// Re-export types needed by clients
pub use operator_service;
pub use operator_service::{ExpansionSettings, NameEncoding, TaskRequest};
