use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::controllers::paste;
use crate::models::Language;
use crate::types::api::{CreatePaste, CreatedPaste, LanguageEntry, PasteView};
use crate::App;

/// The manual for the service in man page form.
const USAGE_PAGE: &str = include_str!("../../assets/usage.txt");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::new(app.config.host, app.config.port);
    let router = router(app);

    info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(index).post(create_paste))
        .route("/languages", get(languages))
        .route("/v/:id", get(get_paste))
        .route("/v/:id/raw", get(get_paste_raw))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            app.config.limits.max_upload_size,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn shutdown_signal() {
    _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

async fn index() -> &'static str {
    USAGE_PAGE
}

async fn languages() -> Json<Vec<LanguageEntry>> {
    Json(Language::ALL.into_iter().map(LanguageEntry::from).collect())
}

async fn create_paste(
    State(mut app): State<App>,
    payload: Result<Json<CreatePaste>, JsonRejection>,
) -> crate::AppResult<impl IntoResponse> {
    let Json(payload) = payload?;

    let record = paste::create(&mut app, &payload.code, &payload.lang).await?;

    let path = format!("/v/{}", record.id);
    let url = app.config.paste_url(&record.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(CreatedPaste {
            id: record.id,
            url,
            expires_at: record.expires_at,
        }),
    ))
}

async fn get_paste(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::AppResult<Json<PasteView>> {
    let record = paste::retrieve(&mut app, &id).await?;
    Ok(Json(record.into()))
}

async fn get_paste_raw(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::AppResult<impl IntoResponse> {
    let record = paste::retrieve(&mut app, &id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        record.code,
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::models::PasteRecord;
    use crate::storage::file::FileStorage;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::put_paste;

    fn test_app() -> (App, MemoryStorage) {
        let memory = MemoryStorage::default();
        let mut config = Config::default();
        config.base_url = "https://paste.example.com".to_owned();
        config.limits.max_upload_size = 256;
        let app = App {
            config,
            storage: memory.clone().into(),
        };
        (app, memory)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(body: &Value) -> Request<Body> {
        let body = serde_json::to_vec(body).unwrap();
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn create_and_view() {
        let (app, _) = test_app();
        let router = router(app);

        let response = router
            .clone()
            .oneshot(post_json(&json!({"code": "SELECT 1;", "lang": "sql"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_owned();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let created: Value = serde_json::from_slice(&body).unwrap();
        let id = created["id"].as_str().unwrap();

        assert_eq!(location, format!("/v/{id}"));
        assert_eq!(created["url"], format!("https://paste.example.com/v/{id}"));

        let (status, body) = send(&router, get_request(&location)).await;
        assert_eq!(status, StatusCode::OK);
        let view: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["code"], "SELECT 1;");
        assert_eq!(view["lang"], "sql");
        assert_eq!(view["language_name"], "SQL");
        assert_eq!(view["expires_at"], created["expires_at"]);

        let (status, body) = send(&router, get_request(&format!("/v/{id}/raw"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"SELECT 1;");
    }

    #[tokio::test]
    async fn lang_defaults_to_text() {
        let (app, _) = test_app();
        let router = router(app);

        let (status, body) = send(&router, post_json(&json!({"code": "hello"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();

        let uri = format!("/v/{}", created["id"].as_str().unwrap());
        let (_, body) = send(&router, get_request(&uri)).await;
        let view: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["lang"], "text");
        assert_eq!(view["language_name"], "Plain Text");
    }

    #[tokio::test]
    async fn empty_snippet_is_rejected() {
        let (app, memory) = test_app();
        let router = router(app);

        let (status, _) = send(&router, post_json(&json!({"code": "  ", "lang": "sql"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (app, _) = test_app();
        let router = router(app);

        let (status, _) = send(&router, post_json(&json!({"lang": "sql"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (app, memory) = test_app();
        let router = router(app);

        let (status, _) = send(&router, post_json(&json!({"code": "x".repeat(1024)}))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn missing_and_expired_look_the_same() {
        let (app, mut memory) = test_app();
        let router = router(app);

        let record = PasteRecord {
            id: "abc12345".into(),
            code: "SELECT 1;".into(),
            lang: "sql".into(),
            expires_at: Utc::now() - Duration::days(1),
        };
        put_paste(&mut memory, &record).await.unwrap();

        let (expired_status, expired_body) = send(&router, get_request("/v/abc12345")).await;
        let (missing_status, missing_body) = send(&router, get_request("/v/doesnotexist")).await;

        assert_eq!(expired_status, StatusCode::NOT_FOUND);
        assert_eq!(missing_status, StatusCode::NOT_FOUND);
        assert_eq!(expired_body, missing_body);

        let (status, _) = send(&router, get_request("/v/abc12345/raw")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_languages() {
        let (app, _) = test_app();
        let router = router(app);

        let (status, body) = send(&router, get_request("/languages")).await;
        assert_eq!(status, StatusCode::OK);
        let langs: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(langs.as_array().unwrap().len(), 5);
        assert_eq!(langs[2], json!({"label": "yaml", "name": "Terraform / YAML"}));
    }

    #[tokio::test]
    async fn index_serves_usage() {
        let (app, _) = test_app();
        let router = router(app);

        let (status, body) = send(&router, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/v/<id>"));
    }

    #[tokio::test]
    async fn storage_failures_are_service_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let pastes = dir.path().join("pastes");
        let app = App {
            config: Config::default(),
            storage: FileStorage::new(&pastes).await.unwrap().into(),
        };
        let router = router(app);

        std::fs::create_dir(pastes.join("abc12345.json")).unwrap();
        let (status, _) = send(&router, get_request("/v/abc12345")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        std::fs::remove_dir_all(&pastes).unwrap();
        let (status, _) = send(&router, post_json(&json!({"code": "SELECT 1;"}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
