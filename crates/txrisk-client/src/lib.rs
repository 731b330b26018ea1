pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod export;
pub mod load;
pub mod risk;

pub use contracts::envelope::{CONTRACT_VERSION, SuccessEnvelope, failure_from_error};
pub use error::{ClientError, ClientResult};
