//! End-to-end submission lifecycle against a mock chat service.

use std::time::Duration;

use serde_json::{json, Value};
use tickle::{App, ChatClient, Message, Role};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> App {
    App::new(ChatClient::new(&format!("{}/chat", server.uri()), None).unwrap())
}

/// Poll until the pending request has been folded into the conversation
async fn settle(app: &mut App) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while app.conversation.is_in_flight() {
            app.poll_pending().await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("request should settle");
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_successful_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Added!"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.conversation.set_draft("Add a task");
    app.submit();

    assert_eq!(app.conversation.messages(), &[Message::user("Add a task")]);
    assert!(app.conversation.is_in_flight());

    settle(&mut app).await;

    assert_eq!(
        app.conversation.messages(),
        &[Message::user("Add a task"), Message::assistant("Added!")]
    );
    assert_eq!(app.conversation.draft(), "");
    assert!(app.pending.is_none());

    let bodies = sent_bodies(&server).await;
    assert_eq!(
        bodies,
        vec![json!({"messages": [{"role": "user", "content": "Add a task"}]})]
    );
}

#[tokio::test]
async fn test_failed_exchange_uses_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"detail": "Task service unavailable"})),
        )
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.conversation.set_draft("Add a task");
    app.submit();
    settle(&mut app).await;

    assert_eq!(
        app.conversation.messages(),
        &[
            Message::user("Add a task"),
            Message::error("Task service unavailable")
        ]
    );
    assert!(!app.conversation.can_submit());

    // Input re-enables once there is something to send
    app.conversation.set_draft("retry");
    assert!(app.conversation.can_submit());
}

#[tokio::test]
async fn test_blank_and_concurrent_submits_send_nothing_extra() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "ok"}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.conversation.set_draft("   ");
    app.submit();
    assert!(app.conversation.messages().is_empty());

    app.conversation.set_draft("first");
    app.submit();
    app.conversation.set_draft("second");
    app.submit();
    assert_eq!(app.conversation.messages().len(), 1);

    settle(&mut app).await;
    assert_eq!(app.conversation.messages().len(), 2);
    assert_eq!(sent_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn test_history_grows_by_one_per_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "noted"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    for text in ["one", "two", "three"] {
        app.conversation.set_draft(text);
        app.submit();
        settle(&mut app).await;
    }

    let roles: Vec<Role> = app.conversation.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Error, Role::User, Role::Error]
    );

    let bodies = sent_bodies(&server).await;
    let lengths: Vec<usize> = bodies
        .iter()
        .map(|b| b["messages"].as_array().unwrap().len())
        .collect();
    assert_eq!(lengths, vec![1, 3, 5]);
    assert_eq!(bodies[2]["messages"][3]["role"], "error");
    assert_eq!(bodies[2]["messages"][4]["content"], "three");
}
