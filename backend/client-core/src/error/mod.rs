pub mod config;
pub mod fizzy;

pub use config::ConfigError;
pub use fizzy::{ErrorKind, FizzyError};
