use super::*;
use serde_json::json;
use ultima_types::{FetchErrorKind, StatusKind, TaskPriority};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_status_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 2,
            "status_counts": {"completed": 1, "failed": 1},
            "agent_counts": {"coder": 2},
            "type_counts": {},
            "ultima_status": {"running": true, "pid": 99}
        })))
        .mount(&server)
        .await;

    let status = backend(&server).fetch_status().await.unwrap();
    assert!(status.running);
    assert_eq!(status.pid, Some(99));
    assert_eq!(status.status_count(StatusKind::Failed), 1);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend(&server).fetch_tasks().await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Parse);
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend(&server).fetch_tasks().await.unwrap_err();
    assert_eq!(err, FetchError::Http { status: 503, message: None });
    assert_eq!(err.kind(), FetchErrorKind::Network);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let err = backend.fetch_status().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_slow_backend_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = backend.fetch_status().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn test_detail_and_log_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42", "status": "in_progress", "agent": "coder", "description": "Build API",
            "priority": "high"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task/42/log"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"log": ["line one\n", "line two\n"]})),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    let detail = backend.fetch_detail("42").await.unwrap();
    assert_eq!(detail.status, StatusKind::InProgress);
    assert_eq!(detail.metadata["priority"], json!("high"));

    let log = backend.fetch_log("42").await.unwrap();
    assert_eq!(log.text(), "line one\nline two\n");
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "task not found"})))
        .mount(&server)
        .await;

    let err = backend(&server).fetch_detail("gone").await.unwrap_err();
    assert_eq!(err, FetchError::NotFound("task not found".into()));
}

#[tokio::test]
async fn test_create_task_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/create"))
        .and(body_json(json!({
            "description": "Build API",
            "type": "api_development",
            "priority": "high"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc", "description": "Build API", "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = NewTask::new("Build API", "api_development", TaskPriority::High);
    assert!(backend(&server).create_task(&task).await.is_ok());
}

#[tokio::test]
async fn test_rejected_command_carries_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ultima/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "already running"})),
        )
        .mount(&server)
        .await;

    let err = backend(&server).start_orchestrator().await.unwrap_err();
    assert_eq!(err, CommandError::Rejected("already running".into()));
    assert_eq!(err.user_message(), "already running");
}

#[tokio::test]
async fn test_stop_command_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ultima/stop"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ULTIMA stopped"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = backend(&server).stop_orchestrator().await.unwrap();
    assert_eq!(message.as_deref(), Some("ULTIMA stopped"));
}
