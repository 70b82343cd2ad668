//! Router composition.
//!
//! The shutdown endpoint is registered on its own and never sees the file
//! middleware. Everything else falls through to the file responder, decorated
//! as `logging(cors(files))`: CORS sits directly around the responder and
//! logging is outermost, each only when enabled.

pub mod shutdown;

use axum::{middleware, routing::any, Router};

use crate::config::{ServerConfig, SHUTDOWN_PATH};
use crate::http::static_files::create_file_service;
use crate::middleware::{cors_layer, log_request};
use crate::state::AppState;

/// Creates the Axum router for `config`.
pub fn create_router(config: &ServerConfig, state: AppState) -> Router {
    let mut files = Router::new().fallback_service(create_file_service(&config.root_dir));

    if config.cors {
        files = files.layer(cors_layer());
    }

    // Added last so it wraps outermost
    if !config.silent {
        files = files.layer(middleware::from_fn(log_request));
    }

    Router::new()
        .route(SHUTDOWN_PATH, any(shutdown::shutdown))
        .with_state(state)
        .merge(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SHUTDOWN_TOKEN_HEADER;
    use crate::http::shutdown::{channel, ShutdownSignal};
    use axum::body::Body;
    use axum::response::Response;
    use http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    struct Fixture {
        dir: tempfile::TempDir,
        signal: ShutdownSignal,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.txt"), b"some data").unwrap();
        let (signal, _waiter) = channel();
        Fixture { dir, signal }
    }

    fn router(fixture: &Fixture, cors: bool, token: Option<&str>) -> Router {
        let config = ServerConfig {
            root_dir: fixture.dir.path().to_path_buf(),
            cors,
            shutdown_token: token.map(str::to_string),
            ..Default::default()
        };
        let state = AppState::new(fixture.signal.clone(), config.shutdown_token.clone());
        create_router(&config, state)
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_root_route_serves_files() {
        let fixture = fixture();
        let response = send(
            router(&fixture, false, None),
            Request::get("/data.txt").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(body_bytes(response).await, b"some data");
    }

    #[tokio::test]
    async fn test_cors_header_on_root_route() {
        let fixture = fixture();

        let found = send(
            router(&fixture, true, None),
            Request::get("/data.txt").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(found.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let missing = send(
            router(&fixture, true, None),
            Request::get("/missing.txt").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_not_applied_to_shutdown_route() {
        let fixture = fixture();
        let response = send(
            router(&fixture, true, None),
            Request::get(SHUTDOWN_PATH).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_shutdown_without_token_closes_signal() {
        let fixture = fixture();
        let response = send(
            router(&fixture, false, None),
            Request::builder()
                .method(Method::POST)
                .uri(SHUTDOWN_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(fixture.signal.is_closed());
    }

    #[tokio::test]
    async fn test_shutdown_shadows_file_with_same_path() {
        let fixture = fixture();
        std::fs::create_dir(fixture.dir.path().join("__internal")).unwrap();
        std::fs::write(fixture.dir.path().join("__internal/__shutdown"), b"file").unwrap();

        let response = send(
            router(&fixture, false, None),
            Request::get(SHUTDOWN_PATH).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
        assert!(fixture.signal.is_closed());
    }

    #[tokio::test]
    async fn test_shutdown_token_missing_is_forbidden() {
        let fixture = fixture();
        let app = router(&fixture, false, Some("sekrit"));

        let response = send(
            app.clone(),
            Request::get(SHUTDOWN_PATH).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_bytes(response).await, b"403 Forbidden");
        assert!(!fixture.signal.is_closed());

        // Still serving afterwards
        let response = send(app, Request::get("/data.txt").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_shutdown_token_mismatch_is_forbidden() {
        let fixture = fixture();
        let response = send(
            router(&fixture, false, Some("sekrit")),
            Request::get(SHUTDOWN_PATH)
                .header(SHUTDOWN_TOKEN_HEADER, "guess")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!fixture.signal.is_closed());
    }

    #[tokio::test]
    async fn test_shutdown_token_match_closes_signal() {
        let fixture = fixture();
        let response = send(
            router(&fixture, false, Some("sekrit")),
            Request::get(SHUTDOWN_PATH)
                .header("Static-Server-Testing-Key", "sekrit")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(fixture.signal.is_closed());
    }

    #[tokio::test]
    async fn test_concurrent_shutdown_requests_both_answered() {
        let fixture = fixture();
        let app = router(&fixture, false, None);

        let (first, second) = tokio::join!(
            send(
                app.clone(),
                Request::get(SHUTDOWN_PATH).body(Body::empty()).unwrap()
            ),
            send(app, Request::get(SHUTDOWN_PATH).body(Body::empty()).unwrap()),
        );

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert!(fixture.signal.is_closed());
        assert!(!fixture.signal.close());
    }

    #[tokio::test]
    async fn test_silent_router_still_serves() {
        let fixture = fixture();
        let config = ServerConfig {
            root_dir: fixture.dir.path().to_path_buf(),
            silent: true,
            cors: true,
            ..Default::default()
        };
        let app = create_router(&config, AppState::new(fixture.signal.clone(), None));

        let response = send(app, Request::get("/data.txt").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
