// REST API tests: the axum router driven through tower's oneshot

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use biodash_core::ConnectionParameters;
use biodash_server::create_router;
use biodash_session::{InMemorySessionService, SessionService};
use serde_json::{Value as Json, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    router: Router,
    params: ConnectionParameters,
}

async fn app() -> TestApp {
    let (dir, params) = common::research_db().await;
    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    let router = create_router(common::sqlite_store(), sessions, params.clone());
    TestApp {
        _dir: dir,
        router,
        params,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Json) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn new_session(router: &Router) -> String {
    let (status, body) = send(router, post("/api/v1/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    body["id"].as_str().unwrap().to_string()
}

async fn connected_session(router: &Router) -> String {
    let id = new_session(router).await;
    let (status, body) = send(router, post(&format!("/api/v1/sessions/{id}/connect"), json!({}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    id
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = app().await;

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(get("/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_lists_roles_pages_and_domains() {
    let app = app().await;

    let (status, body) = send(&app.router, get("/api/v1/catalog")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"].as_array().unwrap().len(), 3);
    assert_eq!(body["roles"][2]["queries"].as_array().unwrap().len(), 5);
    assert_eq!(body["pages"][3]["label"], "Organism Profiles");
    assert_eq!(body["domains"], json!(["Archaea", "Bacteria", "Eukarya"]));
}

#[tokio::test]
async fn test_queries_rejected_before_connecting() {
    let app = app().await;
    let id = new_session(&app.router).await;

    let (status, body) = send(&app.router, get(&format!("/api/v1/sessions/{id}/organisms"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Please connect to the database to proceed.");
}

#[tokio::test]
async fn test_connect_success_and_failure() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (_, body) = send(&app.router, get(&format!("/api/v1/sessions/{id}"))).await;
    assert_eq!(body["connected"], true);
    assert!(body["connection"].get("password").is_none());

    let (status, body) = send(
        &app.router,
        post(
            &format!("/api/v1/sessions/{id}/connect"),
            json!({ "database": format!("{}.missing", app.params.database) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Failed to connect to the database. Check your credentials."
    );

    let (_, body) = send(&app.router, get(&format!("/api/v1/sessions/{id}"))).await;
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app().await;

    let (status, _) = send(&app.router, get("/api/v1/sessions/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_by_key_with_domain_filter() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (status, body) = send(
        &app.router,
        post(
            &format!("/api/v1/sessions/{id}/views/student"),
            json!({ "query": "taxonomy-ecosystem", "domains": ["Archaea"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["heading"], "Student View");
    assert_eq!(body["sections"][0]["kind"], "table");
    assert_eq!(body["sections"][0]["data"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["sections"][1]["kind"], "chart");
    assert_eq!(body["sections"][1]["title"], "Organism Count by Domain");

    let (_, session) = send(&app.router, get(&format!("/api/v1/sessions/{id}"))).await;
    assert_eq!(session["page"], "student");
}

#[tokio::test]
async fn test_view_by_label_with_project_details() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (status, body) = send(
        &app.router,
        post(
            &format!("/api/v1/sessions/{id}/views/administrator"),
            json!({ "query": "High-funded projects and associated organisms" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let details = &body["sections"][2];
    assert_eq!(details["kind"], "project_details");
    assert_eq!(details["title"], "Project Details");
    assert_eq!(details["projects"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_query_is_bad_request() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (status, _) = send(
        &app.router,
        post(
            &format!("/api/v1/sessions/{id}/views/researcher"),
            json!({ "query": "high-funded-projects" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (status, body) = send(
        &app.router,
        get(&format!("/api/v1/sessions/{id}/search?term=vent")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["Type", "Result"]));
    assert_eq!(body["rows"], json!([["Project", "Hydrothermal Vent Metagenomics"]]));
}

#[tokio::test]
async fn test_organism_endpoints() {
    let app = app().await;
    let id = connected_session(&app.router).await;

    let (status, body) = send(&app.router, get(&format!("/api/v1/sessions/{id}/organisms"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["names"].as_array().unwrap().len(), 5);

    let (status, body) = send(
        &app.router,
        get(&format!("/api/v1/sessions/{id}/organisms/Pyrococcus%20furiosus")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["heading"], "Organism Profiles");
    assert_eq!(body["sections"][0]["title"], "Organism Profile: Pyrococcus furiosus");
    assert_eq!(body["sections"][2]["title"], "Associated Projects");

    let (status, _) = send(
        &app.router,
        get(&format!("/api/v1/sessions/{id}/organisms/Nobody")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
