use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::services::monitor::types::{MonitorError, StatusReport};

/// Source of homework status reports
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Query statuses changed since `from_date` (unix seconds)
    async fn fetch(&self, from_date: i64) -> Result<StatusReport, MonitorError>;
}

/// Practicum homework status API client
pub struct PracticumClient {
    client: Client,
    token: String,
    endpoint: String,
}

impl PracticumClient {
    pub fn new(token: String, endpoint: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            token,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<StatusReport, MonitorError> {
        tracing::debug!("Requesting {} with from_date={}", self.endpoint, from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| MonitorError::EndpointUnreachable {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            // Practicum describes API errors as {"code": ..., "error"/"message": ...}
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| error_detail(&body));

            return Err(MonitorError::UnexpectedStatusCode {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                detail,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MonitorError::MalformedResponse(e.to_string()))?;

        decode_report(body)
    }
}

/// Validate the response shape and decode it
pub fn decode_report(body: serde_json::Value) -> Result<StatusReport, MonitorError> {
    let homeworks = body
        .get("homeworks")
        .ok_or_else(|| MonitorError::MalformedResponse("Missing 'homeworks' key".to_string()))?;

    if !homeworks.is_array() {
        return Err(MonitorError::MalformedResponse(format!(
            "'homeworks' is {}, expected a list",
            json_type(homeworks)
        )));
    }

    serde_json::from_value(body).map_err(|e| MonitorError::MalformedResponse(e.to_string()))
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

fn error_detail(body: &serde_json::Value) -> Option<String> {
    let parts: Vec<String> = ["code", "error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}
