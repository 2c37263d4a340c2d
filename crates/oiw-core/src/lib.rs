pub mod config;
pub mod error;

pub use config::OiwConfig;
pub use error::CoreError;
