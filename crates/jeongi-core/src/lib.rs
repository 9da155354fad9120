pub mod config;
pub mod error;
pub mod types;

pub use config::JeongiConfig;
pub use error::{JeongiError, Result};
pub use types::*;
