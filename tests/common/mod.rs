use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use homework_notifier::services::monitor::{Homework, MonitorError, StatusReport};
use homework_notifier::services::practicum::StatusSource;
use homework_notifier::services::telegram::{Notifier, NotifyError};

/// Replays queued answers; repeats the last one once the queue runs dry
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedSource {
    answers: Mutex<VecDeque<Result<StatusReport, MonitorError>>>,
    last: Mutex<Option<Result<StatusReport, MonitorError>>>,
    pub cursors: Mutex<Vec<i64>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(answers: Vec<Result<StatusReport, MonitorError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self, from_date: i64) -> Result<StatusReport, MonitorError> {
        self.cursors.lock().unwrap().push(from_date);

        let mut last = self.last.lock().unwrap();
        if let Some(answer) = self.answers.lock().unwrap().pop_front() {
            *last = Some(answer);
        }
        last.clone().unwrap_or_else(|| Ok(StatusReport::default()))
    }
}

/// Keeps every delivered message; the first `failures` sends fail
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    failures: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures: AtomicUsize::new(failures),
            ..Default::default()
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(NotifyError::DeliveryFailed("chat unavailable".to_string()));
        }

        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[allow(dead_code)]
pub fn report(status: &str, name: &str) -> StatusReport {
    StatusReport {
        homeworks: vec![Homework::new(status, name)],
        current_date: None,
    }
}

#[allow(dead_code)]
pub fn server_error() -> MonitorError {
    MonitorError::UnexpectedStatusCode {
        endpoint: "http://practicum.test/".to_string(),
        status: 500,
        detail: None,
    }
}

/// Serve `app` on an ephemeral local port, returning its base URL
#[allow(dead_code)]
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
