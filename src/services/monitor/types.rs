use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Answer of the homework status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub homeworks: Vec<Homework>,
    /// Server time of the answer, usable as the next `from_date`
    #[serde(default)]
    pub current_date: Option<i64>,
}

/// A single homework record; only `status` and `homework_name` are interpreted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Homework {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homework_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Homework {
    pub fn new(status: &str, homework_name: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            homework_name: Some(homework_name.to_string()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Review verdicts the notifier knows how to describe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkVerdict {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkVerdict {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Sentence shown to the recipient
    pub fn description(&self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkVerdict {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(MonitorError::UnknownVerdict(other.to_string())),
        }
    }
}

/// Recoverable failures of a single poll
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum MonitorError {
    #[error("Endpoint {endpoint} unreachable: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },
    #[error("Endpoint {endpoint} returned status {status}{}", format_detail(.detail))]
    UnexpectedStatusCode {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Missing field '{0}' in homework record")]
    MissingField(&'static str),
    #[error("Unknown homework status '{0}'")]
    UnknownVerdict(String),
}

fn format_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}
