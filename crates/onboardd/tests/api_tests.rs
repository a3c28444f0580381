//! End-to-end flows through the HTTP router.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use onboard_common::resolver::NO_ANSWER_TEXT;
use onboard_common::{QuestionResolver, TaskGenerator};
use onboardd::delivery::{ChatDelivery, Delivered, DisabledDelivery, RecordingDelivery};
use onboardd::{router, AppState, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(delivery: Arc<dyn ChatDelivery>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Store::open_in_memory().unwrap(),
        TaskGenerator::default(),
        QuestionResolver::default(),
        delivery,
    ));
    (router(state.clone()), state)
}

fn app() -> (Router, Arc<AppState>) {
    app_with(Arc::new(DisabledDelivery))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn create(app: &Router, role: &str, grade: &str, start: &str, lang: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/v1/onboardings",
        Some(json!({
            "employee_name": "Aiko Tanaka",
            "manager_name": "Ken Sato",
            "role": role,
            "grade": grade,
            "start_date": start,
            "language": lang,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_catalog_sizes() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["templates"], 4);
    assert_eq!(body["knowledge_topics"], 6);
    assert_eq!(body["chat_delivery"], false);
}

#[tokio::test]
async fn approve_materializes_tasks_with_resolved_owners() {
    let (app, _) = app();
    let id = create(&app, "eng", "newgrad", "2024-01-15", "en").await;

    let approve_uri = format!("/v1/onboardings/{}/approve", id);
    let (status, detail) = call(&app, "POST", &approve_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["onboarding"]["status"], "APPROVED");
    assert_eq!(detail["template_used"], "eng_newgrad");

    // Ordered by due date: offsets 0, 1, 7
    let tasks = detail["tasks"].as_array().unwrap();
    let dues: Vec<&str> = tasks.iter().map(|t| t["due_date"].as_str().unwrap()).collect();
    assert_eq!(dues, vec!["2024-01-15", "2024-01-16", "2024-01-22"]);
    assert_eq!(tasks[0]["owner"], "Aiko Tanaka");
    assert_eq!(tasks[1]["owner"], "Ken Sato");
    assert_eq!(tasks[2]["owner"], "Aiko Tanaka");
    assert!(tasks.iter().all(|t| t["is_done"] == false));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_approvals_run_off_the_async_workers() {
    let (app, _) = app();
    let id = create(&app, "eng", "newgrad", "2024-01-15", "en").await;
    let uri = format!("/v1/onboardings/{}/approve", id);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let uri = uri.clone();
        handles.push(tokio::spawn(async move { call(&app, "POST", &uri, None).await }));
    }
    // Health needs no store and answers while approvals are in flight
    let (status, _) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    for handle in handles {
        let (status, detail) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["onboarding"]["status"], "APPROVED");
        assert_eq!(detail["tasks"].as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn second_approve_does_not_duplicate_tasks() {
    let (app, _) = app();
    let id = create(&app, "general", "mid", "2024-06-03", "ja").await;

    let uri = format!("/v1/onboardings/{}/approve", id);
    let (_, first) = call(&app, "POST", &uri, None).await;
    let (status, second) = call(&app, "POST", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["tasks"], second["tasks"]);
    assert_eq!(second["tasks"].as_array().unwrap().len(), 2);
    // Japanese text was stored
    assert_eq!(second["tasks"][0]["title"], "役割期待値を確認");
}

#[tokio::test]
async fn rejected_request_cannot_be_approved() {
    let (app, _) = app();
    let id = create(&app, "cs", "mid", "2024-04-01", "en").await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("/v1/onboardings/{}/reject", id),
        Some(json!({ "reason": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rejected) = call(
        &app,
        "POST",
        &format!("/v1/onboardings/{}/reject", id),
        Some(json!({ "reason": "Headcount frozen" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");
    assert_eq!(rejected["rejection_reason"], "Headcount frozen");

    let (_, detail) = call(&app, "POST", &format!("/v1/onboardings/{}/approve", id), None).await;
    assert_eq!(detail["onboarding"]["status"], "REJECTED");
    assert!(detail["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn pending_detail_previews_plan() {
    let (app, _) = app();
    let id = create(&app, "sales", "senior", "2024-04-01", "fr").await;

    let (status, detail) = call(&app, "GET", &format!("/v1/onboardings/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["template_used"], "general_newgrad");
    assert!(detail["tasks"].as_array().unwrap().is_empty());
    assert!(detail["plan"]["employee"]["day30"].is_string());

    let (_, list) = call(&app, "GET", "/v1/onboardings", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_input_and_unknown_ids() {
    let (app, _) = app();

    let (status, _) = call(
        &app,
        "POST",
        "/v1/onboardings",
        Some(json!({
            "employee_name": " ",
            "manager_name": "M",
            "role": "eng",
            "grade": "newgrad",
            "start_date": "2024-01-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/v1/onboardings/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/v1/onboardings/missing/approve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/v1/tasks/missing/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/v1/tickets/missing/resolve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_task_round_trip() {
    let (app, _) = app();
    let id = create(&app, "eng", "newgrad", "2024-01-15", "en").await;
    let (_, detail) = call(&app, "POST", &format!("/v1/onboardings/{}/approve", id), None).await;
    let task_id = detail["tasks"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/v1/tasks/{}/toggle", task_id);
    let (_, once) = call(&app, "POST", &uri, None).await;
    assert_eq!(once["is_done"], true);
    let (_, twice) = call(&app, "POST", &uri, None).await;
    assert_eq!(twice["is_done"], false);
}

#[tokio::test]
async fn reminders_run_once_per_day() {
    let (app, state) = app();
    let today = state.clock.today();
    let start = today.format("%Y-%m-%d").to_string();

    // eng_newgrad offsets 0, 7, 1: tasks due today and in 7 days get reminders
    let id = create(&app, "eng", "newgrad", &start, "en").await;
    call(&app, "POST", &format!("/v1/onboardings/{}/approve", id), None).await;

    let (status, listing) = call(&app, "GET", "/v1/reminders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"].as_array().unwrap().len(), 3);
    assert!(listing["messages"].as_array().unwrap().is_empty());

    let (_, run) = call(&app, "POST", "/v1/reminders/run", None).await;
    let messages = run["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    // Longest lead first
    let due_in_week = (today + Duration::days(7)).format("%Y-%m-%d").to_string();
    assert_eq!(messages[0]["title"], "Reminder: Complete security training");
    assert!(messages[0]["body"]
        .as_str()
        .unwrap()
        .starts_with(&format!("Due: {} — ", due_in_week)));
    assert_eq!(messages[1]["to"], "Aiko Tanaka");
    assert_eq!(messages[1]["title"], "Reminder: Set up dev environment");

    let (_, again) = call(&app, "POST", "/v1/reminders/run", None).await;
    assert!(again["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn done_tasks_are_not_reminded() {
    let (app, state) = app();
    let start = state.clock.today().format("%Y-%m-%d").to_string();
    let id = create(&app, "eng", "newgrad", &start, "en").await;
    let (_, detail) = call(&app, "POST", &format!("/v1/onboardings/{}/approve", id), None).await;

    for task in detail["tasks"].as_array().unwrap() {
        let uri = format!("/v1/tasks/{}/toggle", task["id"].as_str().unwrap());
        call(&app, "POST", &uri, None).await;
    }

    let (_, run) = call(&app, "POST", "/v1/reminders/run", None).await;
    assert!(run["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn template_preview() {
    let (app, _) = app();

    let (status, body) = call(
        &app,
        "GET",
        "/v1/templates/preview?role=eng&grade=newgrad&start_date=2024-01-15&lang=ja",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template_used"], "eng_newgrad");
    assert_eq!(body["language"], "ja");
    assert_eq!(body["tasks"][2]["owner"], "manager");
    assert_eq!(body["tasks"][2]["due_date"], "2024-01-16");

    let (status, _) = call(
        &app,
        "GET",
        "/v1/templates/preview?role=eng&grade=newgrad&start_date=15/01/2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ask_returns_answer_and_blocks() {
    let (app, _) = app();

    let (status, body) = call(
        &app,
        "POST",
        "/v1/chat/ask",
        Some(json!({ "question": "How do I apply for leave?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["confidence"], "high");
    assert_eq!(body["escalate"], false);
    assert_eq!(body["user_blocks"][0]["text"]["text"], "*You:*\nHow do I apply for leave?");
    assert_eq!(body["bot_blocks"].as_array().unwrap().len(), 2);

    let (_, unsure) = call(
        &app,
        "POST",
        "/v1/chat/ask",
        Some(json!({ "question": "what is the weather" })),
    )
    .await;
    assert_eq!(unsure["escalate"], true);
    assert_eq!(unsure["result"]["answer_text"], NO_ANSWER_TEXT);
    assert_eq!(unsure["result"]["suggested_actions"], json!(["escalate"]));
    let last = unsure["bot_blocks"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["type"], "actions");
    assert_eq!(last["elements"][0]["action_id"], "escalate");
}

#[tokio::test]
async fn escalation_creates_ticket_and_resolves() {
    let (app, _) = app();

    let (status, created) = call(
        &app,
        "POST",
        "/v1/chat/escalate",
        Some(json!({ "question": "Can I split parental leave?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["ticket"]["status"], "OPEN");
    assert_eq!(created["ticket"]["source"], "web");
    let id = created["ticket"]["id"].as_str().unwrap().to_string();
    assert!(created["message"]
        .as_str()
        .unwrap()
        .contains(&format!("Ticket #{} created", &id[..8])));

    let body = json!({ "question": "" });
    let (status, _) = call(&app, "POST", "/v1/chat/escalate", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, slack) = call(
        &app,
        "POST",
        "/v1/chat/escalate",
        Some(json!({ "source": "slack", "user_ref": "U42", "channel_ref": "C7" })),
    )
    .await;
    assert_eq!(slack["ticket"]["question"], "Escalated from Slack");

    let (_, tickets) = call(&app, "GET", "/v1/tickets", None).await;
    assert_eq!(tickets.as_array().unwrap().len(), 2);

    let (status, resolved) = call(&app, "POST", &format!("/v1/tickets/{}/resolve", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "RESOLVED");
}

#[tokio::test]
async fn enabled_delivery_is_notified_in_background() {
    let recorder = RecordingDelivery::new();
    let (app, _) = app_with(Arc::new(recorder.clone()));

    let (_, created) = call(
        &app,
        "POST",
        "/v1/chat/escalate",
        Some(json!({ "question": "Special visa case" })),
    )
    .await;
    let id = created["ticket"]["id"].as_str().unwrap().to_string();

    call(
        &app,
        "POST",
        "/v1/chat/ask",
        Some(json!({ "question": "benefits", "channel": "C9" })),
    )
    .await;

    let mut sent = Vec::new();
    for _ in 0..50 {
        sent = recorder.sent();
        if sent.len() == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    assert!(sent.contains(&Delivered::Escalation { ticket_id: id }));
    assert!(sent
        .iter()
        .any(|d| matches!(d, Delivered::Response { channel, .. } if channel == "C9")));
}
