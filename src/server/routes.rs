//! HTTP routes
//!
//! `GET /generate_bit` draws a bit; every other request target gets the
//! informational text with status 200. The target is compared as an exact
//! string, query included, so `/generate_bit?x=1` is not a bit request.

use crate::audit::AuditEntry;
use crate::constants::http::{GENERATE_BIT_PATH, INFO_TEXT};
use crate::oracle::BitResult;
use crate::server::state::AppState;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, warn};

/// Create the router
///
/// Expects to be served with `into_make_service_with_connect_info::<SocketAddr>()`
/// so handlers can see the client address.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(GENERATE_BIT_PATH, get(generate_bit_handler))
        .fallback(info_handler)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Draw one bit
///
/// GET /generate_bit
async fn generate_bit_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> Response {
    if uri.path_and_query().map(|target| target.as_str()) != Some(GENERATE_BIT_PATH) {
        return info_handler().await.into_response();
    }

    // axum routes HEAD to GET handlers; only GET draws a bit
    if method != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET")]).into_response();
    }

    let client = addr.ip();

    match state.draw_bit().await {
        Ok(bit) => {
            state.record(AuditEntry::generated(client, bit)).await;
            debug!(%client, %bit, "Bit generated");

            (
                StatusCode::OK,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(BitResult::new(bit)),
            )
                .into_response()
        }
        Err(e) => {
            warn!(%client, "Oracle failed: {}", e);
            state.record(AuditEntry::failed(client, &e)).await;

            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Fixed informational text for every other path
async fn info_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        INFO_TEXT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::error::OracleError;
    use crate::oracle::{Bit, RandomnessOracle};
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct FixedOracle(Bit);

    impl RandomnessOracle for FixedOracle {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn generate_bit(&self) -> Result<Bit, OracleError> {
            Ok(self.0)
        }
    }

    /// Fails the first `failures` draws, then returns ones
    struct FlakyOracle {
        failures: usize,
        calls: AtomicUsize,
    }

    impl RandomnessOracle for FlakyOracle {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn generate_bit(&self) -> Result<Bit, OracleError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(OracleError::Simulation("forced failure".to_string()))
            } else {
                Ok(Bit::One)
            }
        }
    }

    struct PanickingOracle;

    impl RandomnessOracle for PanickingOracle {
        fn name(&self) -> &'static str {
            "panicking"
        }
        fn generate_bit(&self) -> Result<Bit, OracleError> {
            panic!("simulator crashed")
        }
    }

    fn test_app(oracle: impl RandomnessOracle + 'static) -> (Router, AuditLog, TempDir) {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path().join("audit.txt")).unwrap();
        let state = Arc::new(AppState::new(Arc::new(oracle), audit.clone()));
        let app = create_router(state)
            .layer(MockConnectInfo(SocketAddr::from(([192, 0, 2, 44], 50000))));
        (app, audit, dir)
    }

    async fn send(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        send_with(app, Method::GET, uri).await
    }

    async fn send_with(
        app: &Router,
        method: Method,
        uri: &str,
    ) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn audit_lines(audit: &AuditLog) -> Vec<String> {
        std::fs::read_to_string(audit.path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_generate_bit_success() {
        let (app, audit, _dir) = test_app(FixedOracle(Bit::One));

        let (status, headers, body) = send(&app, "/generate_bit").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let result: BitResult = serde_json::from_str(&body).unwrap();
        assert!(result.success);
        assert_eq!(result.value, Bit::One);
        assert_eq!(result.source, "quantum_simulation");
        assert_eq!(result.timestamp.len(), 8);

        let lines = audit_lines(&audit);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("| Petición Cuántica desde 192.0.2.44 | Resultado: 1"));
    }

    #[tokio::test]
    async fn test_root_and_unknown_paths_get_info_text() {
        let (app, audit, _dir) = test_app(FixedOracle(Bit::Zero));

        for uri in ["/", "/foo", "/generate_bit/extra", "/GENERATE_BIT"] {
            let (status, headers, body) = send(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "uri {}", uri);
            assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
            assert_eq!(body, INFO_TEXT);
            assert!(serde_json::from_str::<BitResult>(&body).is_err());
        }

        // Only the bit route is audited
        assert!(audit_lines(&audit).is_empty());
    }

    #[tokio::test]
    async fn test_oracle_failure_returns_500_and_keeps_serving() {
        let (app, audit, _dir) = test_app(FlakyOracle {
            failures: 1,
            calls: AtomicUsize::new(0),
        });

        let (status, _, body) = send(&app, "/generate_bit").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "simulation failed: forced failure");

        let (status, _, body) = send(&app, "/generate_bit").await;
        assert_eq!(status, StatusCode::OK);
        let result: BitResult = serde_json::from_str(&body).unwrap();
        assert_eq!(result.value, Bit::One);

        let lines = audit_lines(&audit);
        assert_eq!(lines.len(), 2);
        assert!(lines[0]
            .ends_with("| Error Cuántico desde 192.0.2.44: simulation failed: forced failure"));
        assert!(lines[1].ends_with("| Resultado: 1"));
    }

    #[tokio::test]
    async fn test_oracle_panic_is_contained() {
        let (app, audit, _dir) = test_app(PanickingOracle);

        let (status, _, body) = send(&app, "/generate_bit").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("oracle worker aborted"));

        let (status, _, _) = send(&app, "/").await;
        assert_eq!(status, StatusCode::OK);

        let lines = audit_lines(&audit);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Error Cuántico desde 192.0.2.44: oracle worker aborted"));
    }

    #[tokio::test]
    async fn test_query_string_is_not_a_bit_request() {
        let (app, audit, _dir) = test_app(FixedOracle(Bit::One));

        for uri in ["/generate_bit?x=1", "/generate_bit?"] {
            let (status, headers, body) = send(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "uri {}", uri);
            assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
            assert_eq!(body, INFO_TEXT);
        }

        assert!(audit_lines(&audit).is_empty());
    }

    #[tokio::test]
    async fn test_only_get_draws_a_bit() {
        let (app, audit, _dir) = test_app(FixedOracle(Bit::One));

        let (status, headers, _) = send_with(&app, Method::HEAD, "/generate_bit").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ALLOW], "GET");

        let (status, _, _) = send_with(&app, Method::POST, "/generate_bit").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        assert!(audit_lines(&audit).is_empty());

        let (status, _, _) = send(&app, "/generate_bit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(audit_lines(&audit).len(), 1);
    }
}
