use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use userbase::UserStore;
use userbase::server::build_router;

fn app() -> Router {
    build_router(UserStore::open_in_memory().unwrap())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_says_hello() {
    let app = app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello, world!");
}

#[tokio::test]
async fn create_fetch_and_list_scenario() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/users", json!({"name": "John Doe", "email": "john@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"id": 1}));

    let expected = json!({"id": 1, "name": "John Doe", "email": "john@example.com"});

    let (status, body) = send(&app, get("/api/users/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), expected);

    let (status, body) = send(&app, get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!([expected]));

    let (status, body) = send(&app, get("/api/users/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "User not found");
}

#[tokio::test]
async fn list_is_empty_array_when_no_users() {
    let app = app();
    let (status, body) = send(&app, get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!([]));
}

#[tokio::test]
async fn id_uses_leading_integer() {
    let app = app();
    let (status, _) = send(&app, post_json("/api/users", json!({"name": "A", "email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in ["/api/users/1", "/api/users/01", "/api/users/1.5", "/api/users/1abc"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["email"], "a@x.com", "{}", uri);
    }

    for uri in ["/api/users/abc", "/api/users/-1", "/api/users/.5", "/api/users/2"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, "User not found");
    }
}

#[tokio::test]
async fn duplicate_email_conflicts_and_keeps_one_row() {
    let app = app();
    let user = json!({"name": "A", "email": "a@x.com"});

    let (status, _) = send(&app, post_json("/api/users", user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_json("/api/users", json!({"name": "B", "email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "User with this email already exists");

    let (_, body) = send(&app, get("/api/users")).await;
    let users: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "A");
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let app = app();

    for body in [json!({"name": "A"}), json!({"email": "a@x.com"}), json!({"name": "", "email": "a@x.com"}), json!({})] {
        let (status, text) = send(&app, post_json("/api/users", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Name and email are required");
    }

    let (_, body) = send(&app, get("/api/users")).await;
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!([]));
}

#[tokio::test]
async fn unparsable_body_is_bad_request() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ids_increase_across_requests() {
    let app = app();
    let mut last = 0;
    for i in 0..4 {
        let (status, body) = send(
            &app,
            post_json("/api/users", json!({"name": "user", "email": format!("u{}@x.com", i)})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = serde_json::from_str::<Value>(&body).unwrap()["id"].as_i64().unwrap();
        assert!(id > last);
        last = id;
    }
}

/// Router over a file-backed store whose table was dropped behind its back
fn app_with_missing_table(dir: &tempfile::TempDir) -> Router {
    let path = dir.path().join("database.sqlite");
    let store = UserStore::open(&path).unwrap();
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute("DROP TABLE users", [])
        .unwrap();
    build_router(store)
}

#[tokio::test]
async fn storage_failures_return_static_500_bodies() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_missing_table(&dir);

    let (status, body) = send(&app, get("/api/users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error fetching users");

    let (status, body) = send(&app, get("/api/users/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error fetching user");

    let (status, body) = send(
        &app,
        post_json("/api/users", json!({"name": "A", "email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error creating user");
}
