//! Router tests against a mock provider.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use socratic_core::{Relay, RelaySettings, StudentLogStore};
use socratic_providers::mock::{MockFailure, MockProvider};
use socratic_providers::{ProviderConfig, SocraticConfig};
use socratic_server::http::{HealthResponse, LogIndexResponse, LogListResponse, LogResponse};
use socratic_server::{build_app, create_router, AppState, RELAY_STATUS_HEADER};

const ASSESSMENT_KEYS: [&str; 6] = [
    "concept",
    "assessment",
    "score",
    "strengths",
    "weaknesses",
    "recommendation",
];

fn server_with(provider: Arc<MockProvider>) -> TestServer {
    let relay = Relay::new(provider, RelaySettings::default());
    let state = Arc::new(AppState::new(relay, StudentLogStore::new()));
    TestServer::new(create_router(state)).unwrap()
}

fn fixed(reply: &str) -> Arc<MockProvider> {
    Arc::new(MockProvider::with_fixed_response(reply))
}

fn turn_body() -> Value {
    json!({"grade": 4, "topic": "fractions", "transcript": "a half is one of two equal parts"})
}

fn relay_status(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(RELAY_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// --- /turn ---

#[tokio::test]
async fn turn_returns_embedded_object_ignoring_prose() {
    let server = server_with(fixed(
        r#"Here you go: {"concept":"fractions","assessment":"ok","score":3,"strengths":"effort","weaknesses":"speed","recommendation":"practice"} Thanks!"#,
    ));

    let response = server.post("/turn").json(&turn_body()).await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "ok");

    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "concept": "fractions",
            "assessment": "ok",
            "score": 3,
            "strengths": "effort",
            "weaknesses": "speed",
            "recommendation": "practice"
        })
    );
}

#[tokio::test]
async fn turn_reply_without_braces_returns_nulls_and_raw() {
    let server = server_with(fixed("Sorry, I cannot help."));

    let response = server.post("/turn").json(&turn_body()).await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "parse_error");

    let body: Value = response.json();
    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 7);
    for key in ASSESSMENT_KEYS {
        assert!(obj[key].is_null(), "{key} should be null");
    }
    assert_eq!(obj["raw"], "Sorry, I cannot help.");
}

#[tokio::test]
async fn turn_network_failure_still_answers_200_with_null_fields() {
    let server = server_with(Arc::new(MockProvider::failing(MockFailure::Network)));

    let response = server.post("/turn").json(&turn_body()).await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "network_error");

    let body: Value = response.json();
    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 6);
    assert!(obj.values().all(Value::is_null));
}

#[tokio::test]
async fn turn_upstream_failure_is_reported_in_header() {
    let server = server_with(Arc::new(MockProvider::failing(MockFailure::Upstream)));
    let response = server.post("/turn").json(&turn_body()).await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "upstream_error");
}

#[tokio::test]
async fn turn_always_has_exactly_the_assessment_keys() {
    let server = server_with(fixed(
        r#"{"concept": "area", "score": 9, "mood": "cheerful"}"#,
    ));

    let body: Value = server.post("/turn").json(&turn_body()).await.json();
    let obj = body.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = ASSESSMENT_KEYS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
    assert_eq!(obj["score"], 5);
}

#[tokio::test]
async fn turn_forwards_grade_topic_and_transcript() {
    let provider = Arc::new(MockProvider::demo());
    let server = server_with(provider.clone());

    server.post("/turn").json(&turn_body()).await.assert_status_ok();

    let request = provider.last_request().unwrap();
    assert!(request.system_prompt.contains("Grade 4"));
    assert!(request.system_prompt.contains("\"fractions\""));
    assert_eq!(
        request.user_message,
        "Transcript: a half is one of two equal parts"
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn turn_missing_field_is_client_error() {
    let provider = fixed("{}");
    let server = server_with(provider.clone());

    let response = server
        .post("/turn")
        .json(&json!({"grade": 4, "topic": "fractions"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("transcript"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn turn_wrong_type_is_client_error() {
    let server = server_with(fixed("{}"));
    let response = server
        .post("/turn")
        .json(&json!({"grade": "four", "topic": "fractions", "transcript": "x"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn turn_non_json_body_is_client_error() {
    let server = server_with(fixed("{}"));
    let response = server.post("/turn").text("grade=4").await;
    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- /log ---

#[tokio::test]
async fn log_counts_per_grade() {
    let server = server_with(fixed("{}"));

    for n in 1..=3 {
        let response: LogResponse = server.post("/log").json(&turn_body()).await.json();
        assert_eq!(response.status, "logged");
        assert_eq!(response.entries, n);
    }

    let other: LogResponse = server
        .post("/log")
        .json(&json!({"grade": 7, "topic": "ratios", "transcript": "two to one"}))
        .await
        .json();
    assert_eq!(other.entries, 1);

    let again: LogResponse = server.post("/log").json(&turn_body()).await.json();
    assert_eq!(again.entries, 4);
}

#[tokio::test]
async fn log_does_not_call_provider() {
    let provider = fixed("{}");
    let server = server_with(provider.clone());
    server.post("/log").json(&turn_body()).await.assert_status_ok();
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn log_listing_keeps_insertion_order() {
    let server = server_with(fixed("{}"));
    server
        .post("/log")
        .json(&json!({"grade": 2, "topic": "shapes", "transcript": "first"}))
        .await;
    server
        .post("/log")
        .json(&json!({"grade": 2, "topic": "shapes", "transcript": "second"}))
        .await;

    let listing: LogListResponse = server.get("/log/2").await.json();
    assert_eq!(listing.grade, 2);
    assert_eq!(listing.entries.len(), 2);
    assert_eq!(listing.entries[0].transcript, "first");
    assert_eq!(listing.entries[1].transcript, "second");
    assert_ne!(listing.entries[0].id, Uuid::nil());

    let empty: LogListResponse = server.get("/log/11").await.json();
    assert!(empty.entries.is_empty());
}

#[tokio::test]
async fn log_index_counts_each_grade_in_order() {
    let server = server_with(fixed("{}"));
    let empty: LogIndexResponse = server.get("/log").await.json();
    assert!(empty.grades.is_empty());

    for grade in [9, 2, 9] {
        server
            .post("/log")
            .json(&json!({"grade": grade, "topic": "t", "transcript": "x"}))
            .await;
    }

    let response = server.get("/log").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "grades": [
            {"grade": 2, "entries": 1},
            {"grade": 9, "entries": 2}
        ]
    }));
}

#[tokio::test]
async fn log_listing_rejects_non_integer_grade() {
    let server = server_with(fixed("{}"));
    let response = server.get("/log/third").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn separate_apps_have_separate_logs() {
    let a = server_with(fixed("{}"));
    let b = server_with(fixed("{}"));
    a.post("/log").json(&turn_body()).await;
    let response: LogResponse = b.post("/log").json(&turn_body()).await.json();
    assert_eq!(response.entries, 1);
}

// --- /lesson_plan ---

#[tokio::test]
async fn lesson_plan_returns_parsed_object() {
    let provider = fixed(
        r#"Sure! {"topic": "fractions", "objectives": ["name parts"], "activities": ["strips"], "materials": ["paper"], "homework": "fold a sheet"}"#,
    );
    let server = server_with(provider.clone());

    let response = server
        .post("/lesson_plan")
        .json(&json!({
            "grade": 3,
            "topic": "fractions",
            "assessments": [{"concept": "fractions", "score": 2, "weaknesses": "vocabulary"}]
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "ok");

    let body: Value = response.json();
    assert_eq!(body["objectives"], json!(["name parts"]));
    assert_eq!(body["homework"], "fold a sheet");

    let request = provider.last_request().unwrap();
    assert!(request.user_message.contains("\"weaknesses\":\"vocabulary\""));
    assert_eq!(request.max_tokens, 500);
}

#[tokio::test]
async fn lesson_plan_failure_returns_topic_and_raw() {
    let server = server_with(fixed("No plan today."));
    let body: Value = server
        .post("/lesson_plan")
        .json(&json!({"grade": 3, "topic": "fractions", "assessments": []}))
        .await
        .json();
    assert_eq!(body, json!({"topic": "fractions", "raw": "No plan today."}));
}

#[tokio::test]
async fn lesson_plan_requires_assessment_list() {
    let server = server_with(fixed("{}"));
    let response = server
        .post("/lesson_plan")
        .json(&json!({"grade": 3, "topic": "fractions", "assessments": "none"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- /parent_view ---

#[tokio::test]
async fn parent_view_default_language_has_no_translation() {
    let provider = Arc::new(MockProvider::demo());
    let server = server_with(provider.clone());

    let response = server
        .post("/parent_view")
        .json(&json!({"grade": 3, "topic": "fractions", "assessments": []}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["progress_summary"].is_string());

    let request = provider.last_request().unwrap();
    assert!(!request.system_prompt.contains("Translate"));
}

#[tokio::test]
async fn parent_view_spanish_appends_translation() {
    let provider = Arc::new(MockProvider::demo());
    let server = server_with(provider.clone());

    server
        .post("/parent_view")
        .json(&json!({
            "grade": 3,
            "topic": "fractions",
            "assessments": [],
            "language": "Spanish"
        }))
        .await
        .assert_status_ok();

    let request = provider.last_request().unwrap();
    assert!(request
        .system_prompt
        .ends_with(" Translate the final JSON output into Spanish."));
}

#[tokio::test]
async fn parent_view_network_failure_returns_topic_only() {
    let server = server_with(Arc::new(MockProvider::failing(MockFailure::Network)));
    let response = server
        .post("/parent_view")
        .json(&json!({"grade": 3, "topic": "fractions", "assessments": []}))
        .await;
    response.assert_status_ok();
    assert_eq!(relay_status(&response), "network_error");
    let body: Value = response.json();
    assert_eq!(body, json!({"topic": "fractions"}));
}

// --- supporting endpoints ---

#[tokio::test]
async fn languages_lists_options() {
    let server = server_with(fixed("{}"));
    let body: Value = server.get("/languages").await.json();
    let languages = body["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 11);
    assert_eq!(languages[0], json!({"name": "English", "code": "en"}));
}

#[tokio::test]
async fn health_reports_provider() {
    let server = server_with(fixed("{}"));
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
    assert_eq!(body.provider, "mock");
}

// --- CORS ---

fn mock_config() -> SocraticConfig {
    SocraticConfig {
        provider: ProviderConfig::Mock { reply: None },
        ..Default::default()
    }
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/turn")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_allows_configured_origins() {
    for origin in ["http://localhost:3000", "http://localhost:5000"] {
        let app = build_app(&mock_config()).unwrap();
        let response = app.oneshot(preflight(origin)).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], origin);
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "POST");
    }
}

#[tokio::test]
async fn cors_ignores_other_origins() {
    let app = build_app(&mock_config()).unwrap();
    let response = app
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn built_app_serves_demo_turn() {
    let app = build_app(&mock_config()).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/turn")
        .header("content-type", "application/json")
        .header("origin", "http://localhost:3000")
        .body(Body::from(turn_body().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[RELAY_STATUS_HEADER], "ok");
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], 3);
}
