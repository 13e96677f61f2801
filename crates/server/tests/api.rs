//! Router-level tests over the in-memory store.
//!
//! Every request goes through the full middleware stack via `oneshot`.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use weather_dashboard_server::config::ServerConfig;
use weather_dashboard_server::{AppState, app};

const SECRET: &str = "q8Vt2LmZ7xRk4NpW9cYh3JsB6dFg1TuE5oAi0Hz";

fn test_app() -> Router {
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let config = ServerConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_owned()),
        "BCRYPT_COST" => Some("4".to_owned()),
        "STATIC_DIR" => Some(static_dir.to_owned()),
        _ => None,
    })
    .unwrap();

    app(AppState::in_memory(config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let credentials = json!({ "email": email, "password": password });

    let (status, _) = send(app, post_json("/register", &credentials, None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, post_json("/login", &credentials, None)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_full_favorites_flow() {
    let app = test_app();

    let (status, user) = send(
        &app,
        post_json("/register", &json!({ "email": "a@x.com", "password": "pw1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "a@x.com");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());
    let user_id = user["id"].clone();

    let (status, body) = send(
        &app,
        post_json("/register", &json!({ "email": "a@x.com", "password": "pw2" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User already exists" }));

    let (status, body) = send(
        &app,
        post_json("/login", &json!({ "email": "a@x.com", "password": "pw1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_owned();

    let (status, favorite) = send(
        &app,
        post_json("/favorites", &json!({ "city": "Lagos" }), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["city"], "Lagos");
    assert_eq!(favorite["ownerUserId"], user_id);

    let (status, favorites) = send(
        &app,
        get_with_auth("/favorites", Some(&format!("Bearer {token}"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let favorites = favorites.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["city"], "Lagos");
    assert_eq!(favorites[0]["ownerUserId"], user_id);
}

#[tokio::test]
async fn test_favorites_without_token() {
    let app = test_app();

    let (status, body) = send(&app, get_with_auth("/favorites", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "No token provided" }));

    let (status, body) = send(&app, get_with_auth("/favorites", Some("Bearer"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "No token provided" }));
}

#[tokio::test]
async fn test_favorites_with_bad_token() {
    let app = test_app();

    let (status, body) = send(&app, get_with_auth("/favorites", Some("Bearer not.a.jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid token" }));

    let token = register_and_login(&app, "a@x.com", "pw1").await;
    let (status, body) = send(
        &app,
        get_with_auth("/favorites", Some(&format!("Token {token}"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_accepted() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "pw1").await;

    for scheme in ["bearer", "BEARER"] {
        let (status, body) = send(
            &app,
            get_with_auth("/favorites", Some(&format!("{scheme} {token}"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{scheme}");
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn test_favorites_are_isolated_per_user() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@x.com", "pw").await;
    let bob = register_and_login(&app, "bob@x.com", "pw").await;

    for city in ["Paris", "Paris", "Lima"] {
        let (status, _) = send(
            &app,
            post_json("/favorites", &json!({ "city": city }), Some(&alice)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    send(
        &app,
        post_json("/favorites", &json!({ "city": "Oslo" }), Some(&bob)),
    )
    .await;

    let (_, favorites) = send(
        &app,
        get_with_auth("/favorites", Some(&format!("Bearer {alice}"))),
    )
    .await;
    let cities: Vec<&str> = favorites
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["city"].as_str().unwrap())
        .collect();
    assert_eq!(cities, ["Paris", "Paris", "Lima"]);

    let (_, favorites) = send(
        &app,
        get_with_auth("/favorites", Some(&format!("Bearer {bob}"))),
    )
    .await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    assert_eq!(favorites[0]["city"], "Oslo");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    register_and_login(&app, "a@x.com", "pw1").await;

    let attempts = [
        json!({ "email": "a@x.com", "password": "wrong" }),
        json!({ "email": "nobody@x.com", "password": "pw1" }),
        json!({ "email": "a@x.com", "password": "" }),
        json!({}),
    ];

    for attempt in attempts {
        let (status, body) = send(&app, post_json("/login", &attempt, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid email or password" }));
    }
}

#[tokio::test]
async fn test_register_requires_fields() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json("/register", &json!({ "password": "pw" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "email is required" }));

    let (status, body) = send(
        &app,
        post_json("/register", &json!({ "email": "a@x.com" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "password is required" }));
}

#[tokio::test]
async fn test_blank_city_rejected() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        post_json("/favorites", &json!({ "city": "  " }), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "city is required" }));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();

    let request = Request::post("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_shell_views_render() {
    let app = test_app();

    for path in ["/", "/login", "/register"] {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Weather Dashboard"));
        assert!(html.contains(r#"href="/register""#));
    }
}

#[tokio::test]
async fn test_stylesheet_served() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/static/styles.css").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let app = test_app();

    let (status, body) = send(&app, get_with_auth("/nope", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}
