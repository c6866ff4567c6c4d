// =============================================================================
// INTEGRATION TESTS - TELEGRAM NOTIFIER
// =============================================================================

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use homework_notifier::services::telegram::{Notifier, NotifyError, TelegramNotifier};

use crate::common::spawn_server;

#[derive(Clone, Default)]
struct Inbox {
    messages: Arc<Mutex<Vec<Value>>>,
}

async fn send_message(State(inbox): State<Inbox>, Json(body): Json<Value>) -> Json<Value> {
    inbox.messages.lock().unwrap().push(body);
    Json(json!({"ok": true, "result": {"message_id": 1}}))
}

fn notifier(base: &str) -> TelegramNotifier {
    TelegramNotifier::new(
        base.to_string(),
        "TEST_TOKEN".to_string(),
        "424242".to_string(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_message_posted_to_chat() {
    let inbox = Inbox::default();
    let app = Router::new()
        .route("/botTEST_TOKEN/sendMessage", post(send_message))
        .with_state(inbox.clone());
    let base = spawn_server(app).await;

    notifier(&base).send("Работа взята на проверку ревьюером.").await.unwrap();

    let messages = inbox.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["chat_id"], "424242");
    assert_eq!(messages[0]["text"], "Работа взята на проверку ревьюером.");
}

#[tokio::test]
async fn test_rejected_message_is_delivery_failure() {
    let app = Router::new().route(
        "/botTEST_TOKEN/sendMessage",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
            )
        }),
    );
    let base = spawn_server(app).await;

    let err = notifier(&base).send("hello").await.unwrap_err();

    let NotifyError::DeliveryFailed(reason) = err;
    assert!(reason.contains("chat not found"));
}

#[tokio::test]
async fn test_ok_false_is_delivery_failure() {
    let app = Router::new().route(
        "/botTEST_TOKEN/sendMessage",
        post(|| async { Json(json!({"ok": false, "description": "Forbidden"})) }),
    );
    let base = spawn_server(app).await;

    assert!(notifier(&base).send("hello").await.is_err());
}

#[tokio::test]
async fn test_unreachable_api_is_delivery_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = notifier(&format!("http://{}", addr)).send("hello").await.unwrap_err();

    // The bot token is part of the URL and must not leak into logs
    assert!(!err.to_string().contains("TEST_TOKEN"));
}
