pub mod engine;
pub mod parser;
pub mod strategy;
pub mod types;

pub use engine::{MonitorEngine, TickOutcome};
pub use parser::parse_status;
pub use strategy::RetryPeriod;
pub use types::{Homework, HomeworkVerdict, MonitorError, StatusReport};
