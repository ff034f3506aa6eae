//! HTTP exposition endpoint for the metric registry.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::{Encoder, Registry, TextEncoder};
use tokio::net::ToSocketAddrs;

async fn serve_metrics(State(registry): State<Registry>) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = String::new();
    if let Err(err) = encoder.encode_utf8(&registry.gather(), &mut buffer) {
        log::error!("failed to encode metric families: {err}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to encode metrics",
        )
            .into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type())],
        buffer,
    )
        .into_response()
}

/// Serves the metric registry over HTTP.
pub struct ExporterServer {
    router: axum::Router,
}

impl ExporterServer {
    /// Builds the router exposing `registry` at `metrics_path`.
    pub fn new(registry: Registry, metrics_path: &str) -> Self {
        let router = axum::Router::new()
            .route(metrics_path, get(serve_metrics))
            .with_state(registry);
        Self { router }
    }

    /// Binds `addr` and serves until the process exits.
    pub async fn listen(self, addr: impl ToSocketAddrs) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router.into_make_service()).await
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::metrics::Metrics;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_encoded_registry_at_configured_path() {
        let registry = Registry::new();
        let metrics = Metrics::register(&registry).unwrap();
        metrics.set_scrape_success(true);
        let server = ExporterServer::new(registry, "/metrics");

        let response = server
            .router
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("wireguard_scrape_success 1"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let registry = Registry::new();
        let server = ExporterServer::new(registry, "/metrics");

        let response = server
            .router
            .oneshot(Request::builder().uri("/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn honors_a_custom_metrics_path() {
        let registry = Registry::new();
        Metrics::register(&registry).unwrap();
        let server = ExporterServer::new(registry, "/wg");

        let response = server
            .router
            .oneshot(Request::builder().uri("/wg").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("wireguard_collector_running"));
    }
}
