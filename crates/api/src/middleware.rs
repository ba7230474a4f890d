use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use stockledger_auth::{CredentialStore, Principal};

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialStore>,
}

/// HTTP Basic authentication against the credential store.
///
/// On success a [`PrincipalContext`] is inserted into the request extensions.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some((username, password)) = extract_basic(req.headers()) else {
        return unauthenticated("missing or malformed Basic credentials");
    };

    // The credential store may block (SQLite), so keep it off the async workers.
    let credentials = state.credentials.clone();
    let lookup_user = username.clone();
    let role = tokio::task::spawn_blocking(move || credentials.authenticate(&lookup_user, &password)).await;

    let role = match role {
        Ok(Some(role)) => role,
        Ok(None) => {
            tracing::info!(%username, "authentication failed");
            return unauthenticated("invalid username or password");
        }
        Err(err) => {
            tracing::error!(error = %err, "credential check panicked or was cancelled");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "credential check failed");
        }
    };

    req.extensions_mut()
        .insert(PrincipalContext::new(Principal::new(username, role)));

    next.run(req).await
}

fn unauthenticated(message: &'static str) -> Response {
    let mut res = json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message);
    res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"stockledger\""),
    );
    res
}

fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();
    if encoded.is_empty() {
        return None;
    }

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }

    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn parses_basic_credentials() {
        // "admin:admin123"
        let h = headers("Basic YWRtaW46YWRtaW4xMjM=");
        assert_eq!(
            extract_basic(&h),
            Some(("admin".to_string(), "admin123".to_string()))
        );
    }

    #[test]
    fn password_may_contain_colons() {
        let encoded = STANDARD.encode("staff:a:b");
        let h = headers(&format!("Basic {encoded}"));
        assert_eq!(extract_basic(&h), Some(("staff".to_string(), "a:b".to_string())));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(extract_basic(&headers("Bearer abc")), None);
        assert_eq!(extract_basic(&headers("Basic !!!")), None);
        assert_eq!(extract_basic(&headers("Basic ")), None);
        assert_eq!(extract_basic(&HeaderMap::new()), None);
        // ":nopassword" has an empty username
        assert_eq!(extract_basic(&headers("Basic Om5vcGFzc3dvcmQ=")), None);
    }
}
