//! HTTP API tests through the full router (no socket)

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use chit_server::{Config, FixtureStore, ServerState, build_router};
use chit_sms::SimulatedGateway;

fn app_with(gateway: SimulatedGateway, settle: Duration) -> Router {
    let mut config = Config::for_tests();
    config.settle_delay = settle;
    let store = FixtureStore::embedded().unwrap();
    build_router(ServerState::with_parts(config, store, Arc::new(gateway)))
}

fn app() -> Router {
    app_with(SimulatedGateway::new(), Duration::ZERO)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn open_session(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gateway_online"], true);
}

#[tokio::test]
async fn test_health_degraded_when_gateway_offline() {
    let app = app_with(SimulatedGateway::new().offline(), Duration::ZERO);
    let (_, body) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_groups"], 3);
    assert_eq!(body["total_members"], 5);
}

#[tokio::test]
async fn test_group_listing_and_search() {
    let app = app();
    let (_, body) = call(&app, Method::GET, "/api/groups", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["amount_display"], "₹1,00,000");

    let (_, body) = call(&app, Method::GET, "/api/groups?q=alpha", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "g1");
}

#[tokio::test]
async fn test_group_detail_and_members() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/groups/g1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alpha Savings Circle");
    assert_eq!(body["enrolled_members"], 3);

    let (_, body) = call(&app, Method::GET, "/api/groups/g1/members", None).await;
    let ids: Vec<_> = body.as_array().unwrap().iter().map(|m| m["id"].clone()).collect();
    assert_eq!(ids, vec![json!("m1"), json!("m2"), json!("m3")]);

    let (status, body) = call(&app, Method::GET, "/api/groups/g9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_update_reminder_settings_validates() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/groups/g1/reminder-settings",
        Some(json!({"due_day": 0, "place": "", "message_template": "Hi {{nme}}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    let fields = &body["details"]["fields"];
    assert!(fields.get("due_day").is_some());
    assert!(fields.get("place").is_some());
    assert!(fields.get("message_template").is_some());

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/groups/g1/reminder-settings",
        Some(json!({"due_day": 12, "place": "New Hall", "message_template": "Hi {{name}}, due {{date}}"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["due_day"], 12);

    let (_, body) = call(&app, Method::GET, "/api/groups/g1/reminder-preview?member_id=m2", None).await;
    assert!(body["message"].as_str().unwrap().starts_with("Hi Priya Sundaram, due "));
    assert_eq!(body["segments"], 1);
}

#[tokio::test]
async fn test_preview_rejects_member_of_other_group() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/groups/g1/reminder-preview?member_id=m4", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 2004);

    let (status, body) = call(&app, Method::GET, "/api/groups/g3/reminder-preview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Member, please pay"));
    assert_eq!(body["member_id"], Value::Null);
}

#[tokio::test]
async fn test_member_detail_and_payments() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/members/m1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group_name"], "Alpha Savings Circle");

    let (_, body) = call(&app, Method::GET, "/api/members/m1/payments", None).await;
    assert_eq!(body["entries"][0]["date"], "10/09/2026");
    assert_eq!(body["entries"][0]["amount_display"], "₹5,000");

    let (status, _) = call(&app, Method::GET, "/api/members/m99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_edit_member() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/members",
        Some(json!({
            "group_id": "g3",
            "name": "Kavya Nair",
            "primary_phone": "+91 99887 76655",
            "alternate_phone": "",
            "joining_date": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "m6");
    assert_eq!(body["primary_phone"], "9988776655");
    assert_eq!(body["alternate_phone"], Value::Null);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/members/m6",
        Some(json!({
            "group_id": "g3",
            "name": "Kavya N",
            "primary_phone": "9988776655",
            "alternate_phone": "9988776655"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_create_member_requires_phone() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/members",
        Some(json!({"group_id": "g1", "name": "No Phone", "primary_phone": "", "alternate_phone": null})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);
    assert!(body["details"]["fields"].get("primary_phone").is_some());
}

#[tokio::test]
async fn test_reminder_settings_single_field_codes() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/groups/g2/reminder-settings",
        Some(json!({"due_day": 32, "place": "Hall", "message_template": "Hi {{name}}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1002);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/groups/g2/reminder-settings",
        Some(json!({"due_day": 5, "place": "Hall", "message_template": "Hi {{nmae}}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1003);
    assert!(body["details"]["fields"].get("message_template").is_some());
}

#[tokio::test]
async fn test_session_navigation() {
    let app = app();
    let id = open_session(&app).await;

    let (_, body) = call(&app, Method::GET, &format!("/api/sessions/{id}/navigation"), None).await;
    assert_eq!(body["screen"], "dashboard");

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/navigation"),
        Some(json!({"screen": "members", "group_id": "g2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screen"], "members");
    assert_eq!(body["params"]["group_id"], "g2");

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/navigation"),
        Some(json!({"screen": "edit_member"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = app();
    let uri = format!("/api/sessions/{}/reminders", uuid::Uuid::new_v4());
    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3005);
}

#[tokio::test]
async fn test_dispatch_without_group_is_rejected() {
    let app = app();
    let id = open_session(&app).await;
    let (status, body) = call(&app, Method::POST, &format!("/api/sessions/{id}/reminders/dispatch"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 3001);

    let (_, body) = call(&app, Method::GET, &format!("/api/sessions/{id}/reminders"), None).await;
    assert_eq!(body["status"], "idle");
}

#[tokio::test(start_paused = true)]
async fn test_reminder_flow_over_http() {
    let app = app_with(SimulatedGateway::new(), Duration::from_millis(500));
    let id = open_session(&app).await;
    let base = format!("/api/sessions/{id}/reminders");

    let (_, view) = call(&app, Method::PUT, &format!("{base}/group"), Some(json!({"group_id": "g1"}))).await;
    assert_eq!(view["total"], 3);
    assert_eq!(view["recipient_count"], 3);

    let (_, view) = call(&app, Method::PUT, &format!("{base}/mode"), Some(json!({"mode": "multi"}))).await;
    assert_eq!(view["recipient_count"], 0);

    let (_, view) = call(&app, Method::PUT, &format!("{base}/search"), Some(json!({"query": "98"}))).await;
    assert_eq!(view["found"], 1);
    assert_eq!(view["members"][0]["id"], "m1");

    call(&app, Method::PUT, &format!("{base}/search"), Some(json!({"query": ""}))).await;
    call(&app, Method::POST, &format!("{base}/toggle/m1"), None).await;
    let (_, view) = call(&app, Method::POST, &format!("{base}/toggle/m3"), None).await;
    assert_eq!(view["chosen"], json!(["m1", "m3"]));

    let (status, body) = call(&app, Method::POST, &format!("{base}/toggle/m4"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 3004);

    let (status, body) = call(&app, Method::POST, &format!("{base}/dispatch"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "started");
    assert_eq!(body["recipients"], 2);
    assert_eq!(body["view"]["status"], "running");

    let (status, body) = call(&app, Method::POST, &format!("{base}/dispatch"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3003);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let (_, view) = call(&app, Method::GET, &base, None).await;
    assert_eq!(view["status"], "complete");
    assert_eq!(view["run"]["recipients"][0]["status"]["state"], "sent");
    assert_eq!(view["members"][0]["sent"], true);
    assert_eq!(view["members"][1]["sent"], false);

    let (_, body) = call(&app, Method::POST, &format!("{base}/dispatch"), None).await;
    assert_eq!(body["outcome"], "already_complete");

    let (_, nav) = call(&app, Method::POST, &format!("{base}/close"), None).await;
    assert_eq!(nav["screen"], "members");
    assert_eq!(nav["params"]["group_id"], "g1");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_and_delete_session() {
    let app = app_with(SimulatedGateway::new(), Duration::from_millis(500));
    let id = open_session(&app).await;
    let base = format!("/api/sessions/{id}/reminders");
    call(&app, Method::PUT, &format!("{base}/group"), Some(json!({"group_id": "g1"}))).await;
    call(&app, Method::POST, &format!("{base}/dispatch"), None).await;

    tokio::time::sleep(Duration::from_millis(750)).await;
    let (_, body) = call(&app, Method::POST, &format!("{base}/cancel"), None).await;
    assert_eq!(body["cancelled"], true);
    assert_eq!(body["view"]["status"], "cancelled");
    assert_eq!(body["view"]["run"]["recipients"][0]["status"]["state"], "sent");
    assert_eq!(body["view"]["run"]["recipients"][1]["status"]["state"], "pending");

    let (_, body) = call(&app, Method::POST, &format!("{base}/dispatch"), None).await;
    assert_eq!(body["outcome"], "resumed");
    assert_eq!(body["remaining"], 2);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
