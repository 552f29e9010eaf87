//! End-to-end tests of the HTTP surface over in-memory repositories.
//!
//! Requests go through the real router (visit logging, static assets,
//! handlers, views) with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use jotter_api::{create_router, AppState};
use jotter_core::{
    CreateNoteRequest, Error, NewVisit, NoteRepository, PageViews, Visit, VisitRepository,
};
use jotter_db::{MemoryNoteRepository, MemoryVisitRepository};

struct TestApp {
    router: Router,
    notes: Arc<MemoryNoteRepository>,
    visits: Arc<MemoryVisitRepository>,
    _assets: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let assets = TempDir::new().expect("temp dir should be created");
        std::fs::write(assets.path().join("style.css"), "body { color: red; }")
            .expect("asset should be written");

        let notes = Arc::new(MemoryNoteRepository::new());
        let visits = Arc::new(MemoryVisitRepository::new());
        let state = AppState::new(notes.clone(), visits.clone()).expect("views should compile");

        Self {
            router: create_router(state, assets.path()),
            notes,
            visits,
            _assets: assets,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .header(header::USER_AGENT, "router-test")
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    async fn form(&self, method: Method, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
    }

    async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    async fn create(&self, title: &str, body: &str) -> Uuid {
        self.notes
            .insert(CreateNoteRequest {
                title: Some(title.to_string()),
                body: Some(body.to_string()),
            })
            .await
            .expect("insert should succeed")
            .id
    }

    async fn visited_paths(&self) -> Vec<String> {
        self.visits.all().await.into_iter().map(|v| v.path).collect()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8_lossy(&bytes).into_owned()
}

// =============================================================================
// PAGES
// =============================================================================

#[tokio::test]
async fn index_lists_notes_with_summaries() {
    let app = TestApp::new();
    app.create("Groceries", &"milk ".repeat(30)).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("Groceries"));
    assert!(html.contains(" ..."));
}

#[tokio::test]
async fn new_note_page_renders_form() {
    let app = TestApp::new();
    let response = app.get("/notes/new").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/notes""#));
}

#[tokio::test]
async fn show_renders_markdown_body() {
    let app = TestApp::new();
    let id = app.create("Hello", "**World**").await;

    let response = app.get(&format!("/notes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("Hello"));
    assert!(html.contains("<strong>World</strong>"));
}

#[tokio::test]
async fn edit_page_prefills_fields() {
    let app = TestApp::new();
    let id = app.create("Draft", "first take").await;

    let response = app.get(&format!("/notes/{}/edit", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains(r#"value="Draft""#));
    assert!(html.contains("first take"));
}

#[tokio::test]
async fn show_unknown_note_is_404() {
    let app = TestApp::new();
    let response = app.get(&format!("/notes/{}", Uuid::now_v7())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_note_id_is_400() {
    let app = TestApp::new();

    let response = app.get("/notes/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Invalid note id"));

    let response = app.form(Method::PATCH, "/notes/123", "title=x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.get("/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// MUTATIONS
// =============================================================================

#[tokio::test]
async fn create_redirects_home_and_persists() {
    let app = TestApp::new();

    let response = app
        .form(Method::POST, "/notes", "title=Hello&body=World")
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let notes = app.notes.list().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title.as_deref(), Some("Hello"));
    assert_eq!(notes[0].body.as_deref(), Some("World"));
}

#[tokio::test]
async fn create_without_form_content_type_makes_empty_note() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/notes")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let notes = app.notes.list().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, None);
    assert_eq!(notes[0].body, None);
}

#[tokio::test]
async fn patch_without_form_content_type_clears_note() {
    let app = TestApp::new();
    let id = app.create("X1", "Y1").await;

    let response = app
        .send(
            Request::builder()
                .method(Method::PATCH)
                .uri(format!("/notes/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let note = app.notes.fetch(id).await.unwrap();
    assert_eq!(note.title, None);
    assert_eq!(note.body, None);
}

#[tokio::test]
async fn malformed_form_body_is_400() {
    let app = TestApp::new();
    let response = app
        .form(Method::POST, "/notes", "title=a&title=b")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.notes.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn patch_replaces_title_and_body() {
    let app = TestApp::new();
    let id = app.create("X1", "Y1").await;

    let response = app
        .form(Method::PATCH, &format!("/notes/{}", id), "title=X2&body=Y2")
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_text(response).await.is_empty());

    let note = app.notes.fetch(id).await.unwrap();
    assert_eq!(note.title.as_deref(), Some("X2"));
    assert_eq!(note.body.as_deref(), Some("Y2"));
}

#[tokio::test]
async fn patch_without_body_field_clears_it() {
    let app = TestApp::new();
    let id = app.create("X1", "Y1").await;

    let response = app
        .form(Method::PATCH, &format!("/notes/{}", id), "title=X2")
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let note = app.notes.fetch(id).await.unwrap();
    assert_eq!(note.title.as_deref(), Some("X2"));
    assert_eq!(note.body, None);
}

#[tokio::test]
async fn patch_unknown_note_is_404() {
    let app = TestApp::new();
    let response = app
        .form(Method::PATCH, &format!("/notes/{}", Uuid::now_v7()), "title=x")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = TestApp::new();
    let id = app.create("gone", "soon").await;

    let response = app.delete(&format!("/notes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(matches!(
        app.notes.fetch(id).await,
        Err(Error::NoteNotFound(_))
    ));
    let response = app.get(&format!("/notes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_note_is_204() {
    let app = TestApp::new();
    let response = app.delete(&format!("/notes/{}", Uuid::now_v7())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// VISIT LOGGING AND ANALYTICS
// =============================================================================

#[tokio::test]
async fn get_requests_are_logged_with_user_agent() {
    let app = TestApp::new();
    app.get("/").await;

    let visits = app.visits.all().await;
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].path, "/");
    assert_eq!(visits[0].user_agent.as_deref(), Some("router-test"));
}

#[tokio::test]
async fn failed_gets_are_still_logged() {
    let app = TestApp::new();
    app.get("/notes/not-a-uuid").await;
    app.get("/nowhere").await;

    assert_eq!(app.visited_paths().await, vec!["/notes/not-a-uuid", "/nowhere"]);
}

#[tokio::test]
async fn non_get_requests_are_not_logged() {
    let app = TestApp::new();
    let id = app.create("a", "b").await;

    app.form(Method::POST, "/notes", "title=t&body=b").await;
    app.form(Method::PATCH, &format!("/notes/{}", id), "title=t")
        .await;
    app.delete(&format!("/notes/{}", id)).await;

    assert!(app.visits.all().await.is_empty());
}

#[tokio::test]
async fn assets_are_served_and_not_logged() {
    let app = TestApp::new();

    let response = app.get("/assets/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "body { color: red; }");

    assert!(app.visits.all().await.is_empty());
}

#[tokio::test]
async fn analytics_groups_and_sorts_page_views() {
    let app = TestApp::new();
    for _ in 0..3 {
        app.get("/").await;
    }
    app.get("/notes/new").await;

    assert_eq!(
        app.visits.page_views().await.unwrap(),
        vec![
            PageViews {
                path: "/".to_string(),
                count: 3
            },
            PageViews {
                path: "/notes/new".to_string(),
                count: 1
            },
        ]
    );

    // The analytics request itself is logged before the aggregate runs.
    let response = app.get("/analytics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    // Paths are HTML-escaped, so '/' renders as "&#x2f;".
    let home = html.find("<td>&#x2f;</td><td>3</td>").expect("home row");
    let analytics = html
        .find("<td>&#x2f;analytics</td><td>1</td>")
        .expect("analytics row");
    let new = html
        .find("<td>&#x2f;notes&#x2f;new</td><td>1</td>")
        .expect("new note row");
    assert!(home < analytics);
    assert!(analytics < new);
    assert!(html.contains("5 visits recorded"));
}

/// Visit store that always fails to write.
struct FailingVisits;

#[async_trait]
impl VisitRepository for FailingVisits {
    async fn record(&self, _visit: NewVisit) -> jotter_core::Result<Visit> {
        Err(Error::Internal("visit log unavailable".to_string()))
    }

    async fn page_views(&self) -> jotter_core::Result<Vec<PageViews>> {
        Ok(Vec::new())
    }

    async fn count(&self) -> jotter_core::Result<i64> {
        Ok(0)
    }
}

#[tokio::test]
async fn visit_log_failure_fails_the_request() {
    let assets = TempDir::new().unwrap();
    let notes = Arc::new(MemoryNoteRepository::new());
    let state = AppState::new(notes.clone(), Arc::new(FailingVisits)).unwrap();
    let router = create_router(state, assets.path());

    let response = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("visit log unavailable"));

    // Writes are not GETs, so they still go through.
    let response = router
        .oneshot(
            Request::post("/notes")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("title=a&body=b"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(notes.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert!(response.headers().contains_key("x-request-id"));
}
