//! Session resolution.
//!
//! The authentication provider is an external collaborator; this module
//! models it as a trait and resolves the session on every request. The
//! resulting [`Principal`] is injected into request extensions, so identity
//! is explicit per-request context rather than ambient state — and because
//! nothing caches a session across requests, provider-side revocation is
//! effective on the caller's next request.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use permit_core::{Principal, SessionsConfig};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// A resolved session: a stable user identity.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
}

/// External session lookup.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve a bearer token to a session, or `None` if the token is
    /// unknown, expired, or revoked.
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<Session>>;
}

/// Config-backed token map, used in development and tests and as the shim
/// in front of the real provider.
pub struct StaticSessionProvider {
    tokens: HashMap<String, Session>,
}

impl StaticSessionProvider {
    pub fn new(config: &SessionsConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|(token, entry)| {
                (
                    token.clone(),
                    Session {
                        user_id: entry.user_id,
                        email: entry.email.clone(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<Session>> {
        Ok(self.tokens.get(token).cloned())
    }
}

/// Middleware: resolve the caller's session and attach a [`Principal`] to
/// the request. Requests without a token proceed as anonymous; a token
/// that fails to resolve is rejected outright.
pub async fn attach_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match extract_bearer(req.headers()) {
        None => Principal::anonymous(),
        Some(token) => match state.sessions.resolve(&token).await? {
            Some(session) => {
                state
                    .store
                    .principal_for(session.user_id, &session.email)
                    .await?
            }
            None => {
                tracing::debug!("presented session token did not resolve");
                return Err(ApiError::AuthenticationRequired);
            }
        },
    };

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer dev-alice".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("dev-alice".to_string()));

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }

    #[tokio::test]
    async fn static_provider_resolves_configured_tokens() {
        let yaml = r#"
tokens:
  dev-alice:
    user_id: "00000000-0000-0000-0000-000000000001"
    email: "alice@example.com"
"#;
        let config: SessionsConfig = serde_yaml::from_str(yaml).unwrap();
        let provider = StaticSessionProvider::new(&config);

        let session = provider.resolve("dev-alice").await.unwrap().unwrap();
        assert_eq!(session.email, "alice@example.com");
        assert!(provider.resolve("unknown").await.unwrap().is_none());
    }
}
