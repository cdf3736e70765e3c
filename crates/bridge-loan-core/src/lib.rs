pub mod error;
pub mod types;

#[cfg(feature = "bridge")]
pub mod bridge;

pub use error::BridgeLoanError;
pub use types::*;

/// Standard result type for all bridge-loan operations
pub type BridgeLoanResult<T> = Result<T, BridgeLoanError>;
