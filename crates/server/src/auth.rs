// Access guard: GitHub-backed bearer token verification for the HTTP
// transport. The OAuth authorization flow itself stays with GitHub; this
// only checks presented tokens and their scopes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fxgate_core::AuthSettings;
use serde::Deserialize;

/// Scope every presented token must carry.
pub const REQUIRED_SCOPE: &str = "user:email";

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("fxgate/", env!("CARGO_PKG_VERSION"));

/// Verifies bearer tokens against GitHub's token-check endpoint using the
/// configured OAuth app credentials.
pub struct AccessGuard {
    settings: AuthSettings,
    http: reqwest::Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct TokenCheck {
    #[serde(default)]
    scopes: Option<Vec<String>>,
}

impl AccessGuard {
    pub fn new(settings: AuthSettings) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            settings,
            http,
            api_base: GITHUB_API.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Check a token with GitHub and require [`REQUIRED_SCOPE`].
    async fn verify_token(&self, token: &str) -> Result<(), String> {
        let url = format!(
            "{}/applications/{}/token",
            self.api_base, self.settings.client_id
        );
        let response = self
            .http
            .post(url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&serde_json::json!({ "access_token": token }))
            .send()
            .await
            .map_err(|err| format!("token verification failed: {err}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "GitHub rejected token: status {}",
                response.status().as_u16()
            ));
        }

        let check: TokenCheck = response
            .json()
            .await
            .map_err(|err| format!("token verification failed: {err}"))?;
        let has_scope = check
            .scopes
            .unwrap_or_default()
            .iter()
            .any(|scope| scope == REQUIRED_SCOPE);
        if has_scope {
            Ok(())
        } else {
            Err(format!("token is missing required scope {REQUIRED_SCOPE}"))
        }
    }

    fn unauthorized(&self, reason: &str) -> Response {
        let challenge = format!("Bearer realm=\"{}\"", self.settings.base_url);
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, challenge)],
            Json(serde_json::json!({ "error": reason })),
        )
            .into_response()
    }
}

/// Middleware gating every tool invocation behind a verified bearer token.
pub async fn require_bearer(
    State(guard): State<Arc<AccessGuard>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_bearer(request.headers()) else {
        return Err(guard.unauthorized("missing bearer token"));
    };

    if let Err(reason) = guard.verify_token(&token).await {
        tracing::warn!(reason = %reason, "rejected tool invocation");
        return Err(guard.unauthorized(&reason));
    }

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
