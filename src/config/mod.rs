pub mod environment;
pub mod logging;

pub use environment::{Config, ConfigError};
pub use logging::init_tracing;
