// HTTP transport: stateless JSON-RPC dispatch at POST /mcp.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use fxgate_core::AuthSettings;
use fxgate_mcp::protocol::JsonRpcRequest;
use fxgate_mcp::McpServer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AccessGuard};

/// Bind `addr` and serve the MCP endpoint until the process exits.
pub async fn serve(addr: &str, server: McpServer, auth: Option<AuthSettings>) -> Result<()> {
    let app = create_router(Arc::new(server), auth)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP transport listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router. The access guard, when configured, wraps only the MCP
/// endpoint; health stays open for probes.
pub fn create_router(server: Arc<McpServer>, auth: Option<AuthSettings>) -> Result<Router> {
    let mut mcp = Router::new()
        .route("/mcp", post(handle_mcp))
        .with_state(server);
    if let Some(auth) = auth {
        let guard = Arc::new(AccessGuard::new(auth)?);
        mcp = mcp.layer(axum::middleware::from_fn_with_state(
            guard,
            auth::require_bearer,
        ));
    }

    Ok(Router::new()
        .route("/health", get(health_check))
        .merge(mcp)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}

/// One JSON-RPC message per POST; notifications are accepted with no body.
async fn handle_mcp(
    State(server): State<Arc<McpServer>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    match server.handle_request(request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fxgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use fxgate_core::Settings;
    use fxgate_core::FrankfurterClient;
    use fxgate_mcp::tools::{AvailableCurrenciesTool, ToolRegistry};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use url::Url;

    fn test_server() -> Arc<McpServer> {
        let settings = Settings::from_vars(|_| None).unwrap();
        let gateway = FrankfurterClient::new(&settings).unwrap();
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(AvailableCurrenciesTool::new(gateway)));
        Arc::new(McpServer::new(registry))
    }

    fn rpc_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn initialize_over_http() {
        let app = create_router(test_server(), None).unwrap();
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"});

        let response = app.oneshot(rpc_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        assert_eq!(payload["result"]["serverInfo"]["name"], "fxgate");
    }

    #[tokio::test]
    async fn notifications_are_accepted_without_body() {
        let app = create_router(test_server(), None).unwrap();
        let body = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});

        let response = app.oneshot(rpc_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = create_router(test_server(), None).unwrap();
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn guarded_mcp_requires_a_bearer_token() {
        let auth = AuthSettings {
            client_id: "iv1.client".to_string(),
            client_secret: "secret".to_string(),
            base_url: Url::parse("https://fx.example.com").unwrap(),
        };
        let app = create_router(test_server(), Some(auth)).unwrap();
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});

        let response = app.oneshot(rpc_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_string();
        assert!(challenge.contains("fx.example.com"));
    }

    #[tokio::test]
    async fn health_stays_open_when_guard_is_on() {
        let auth = AuthSettings {
            client_id: "iv1.client".to_string(),
            client_secret: "secret".to_string(),
            base_url: Url::parse("https://fx.example.com").unwrap(),
        };
        let app = create_router(test_server(), Some(auth)).unwrap();
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
