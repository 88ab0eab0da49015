//! HTTP API integration tests

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cogassess_app::{AppState, create_router};
use cogassess_core::Stage;
use cogassess_experiment::SessionConfig;
use cogassess_timing::ManualClock;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_state(config: SessionConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config, Some(42)).unwrap())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn new_session(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/session/new", None).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = test_state(SessionConfig::default());
    let app = create_router(state);

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sessions_active"], 0);
    assert_eq!(json["tick_interval_ms"], 500);
}

#[tokio::test]
async fn test_new_session_starts_at_consent() {
    let app = create_router(test_state(SessionConfig::default()));
    let id = new_session(&app).await;

    let (status, json) = send(&app, "GET", &format!("/session/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "consent");
    assert_eq!(json["screen"], "consent");
}

#[tokio::test]
async fn test_unknown_session() {
    let app = create_router(test_state(SessionConfig::default()));
    let (status, json) = send(&app, "GET", "/session/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_consent_is_required() {
    let app = create_router(test_state(SessionConfig::default()));
    let id = new_session(&app).await;
    let uri = format!("/session/{id}/start");

    let (status, json) = send(&app, "POST", &uri, Some(json!({"consent": false, "name": "A"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "You must provide consent to proceed.");

    let (status, json) = send(&app, "POST", &uri, Some(json!({"consent": true, "name": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Please enter your name.");

    let (status, json) = send(
        &app,
        "POST",
        &uri,
        Some(json!({"consent": true, "name": "A", "device": "Tablet"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "instructions");
    assert_eq!(json["tasks"].as_array().unwrap().len(), 3);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/session/{id}/respond"),
        Some(json!({"type": "select", "question": 1, "option": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_trials_over_http() {
    let config = SessionConfig {
        instructions_delay_ms: 0,
        ..Default::default()
    };
    let app = create_router(test_state(config));
    let id = new_session(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{id}/start"),
        Some(json!({"consent": true, "name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "math");
    assert_eq!(json["screen"], "trial");
    assert_eq!(json["question"], 1);
    assert_eq!(json["response_mode"], "entry");
    assert_eq!(json["stimulus"]["type"], "equation");
    assert!(json["options"].as_array().unwrap().is_empty());

    let respond = format!("/session/{id}/respond");
    let select = json!({"type": "select", "question": 1, "option": 0});
    let (status, _) = send(&app, "POST", &respond, Some(select)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let answer = json!({"type": "entry", "question": 1, "value": "x"});
    let (status, json) = send(&app, "POST", &respond, Some(answer.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question"], 2);

    // a repeated answer to question 1 must not land on question 2
    let (status, json) = send(&app, "POST", &respond, Some(answer)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("question 1"));

    let (status, json) = send(&app, "GET", &format!("/session/{id}/report"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "math");
    assert_eq!(json["demographics"]["name"], "A");
    assert_eq!(json["demographics"]["age_category"], "18-25");
    assert!(json["summaries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tick_all_fires_gates_and_deadlines() {
    let clock = ManualClock::new();
    let state = Arc::new(
        AppState::with_clock(SessionConfig::default(), clock.clone(), Some(42)).unwrap(),
    );
    let app = create_router(Arc::clone(&state));
    let id = new_session(&app).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/session/{id}/start"),
        Some(json!({"consent": true, "name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = state.session(&id).await.unwrap();

    clock.advance(Duration::from_secs(5));
    assert_eq!(session.lock().await.machine.stage(), Stage::Instructions);
    state.tick_all().await;
    {
        let session = session.lock().await;
        assert_eq!(session.machine.stage(), Stage::Math);
        let math = session.machine.record().math.as_ref().unwrap();
        assert!(math.trial_started_at.is_some());
        assert!(math.outcomes.is_empty());
    }

    clock.advance(Duration::from_secs(15));
    state.tick_all().await;
    state.tick_all().await;
    let session = session.lock().await;
    let math = session.machine.record().math.as_ref().unwrap();
    assert_eq!(math.current_index, 1);
    assert_eq!(math.outcomes.len(), 1);
    assert!(math.outcomes[0].timed_out);
    assert!(!math.outcomes[0].correct);
}

#[tokio::test]
async fn test_sessions_are_isolated_and_closable() {
    let state = test_state(SessionConfig::default());
    let app = create_router(Arc::clone(&state));
    let a = new_session(&app).await;
    let b = new_session(&app).await;
    assert_ne!(a, b);

    send(
        &app,
        "POST",
        &format!("/session/{a}/start"),
        Some(json!({"consent": true, "name": "A"})),
    )
    .await;
    let (_, json) = send(&app, "GET", &format!("/session/{b}"), None).await;
    assert_eq!(json["stage"], "consent");

    let (status, _) = send(&app, "DELETE", &format!("/session/{a}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/session/{a}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(state.session_count().await, 1);
}
