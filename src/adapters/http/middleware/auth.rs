//! Bearer authentication for axum.
//!
//! `auth_middleware` runs on every route. It leaves anonymous requests alone
//! so `/health` stays open, and stores the verified `AuthenticatedUser` in
//! the request extensions otherwise. Handlers that need a caller take
//! `RequireAuth`, which turns a missing identity into 401.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

pub type AuthState = Arc<dyn SessionValidator>;

/// Token from `Authorization: Bearer <token>`, scheme matched without case.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let (scheme, token) = headers.get(AUTHORIZATION)?.to_str().ok()?.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn rejection(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

fn auth_failure(err: &AuthError) -> Response {
    match err {
        AuthError::TokenExpired => {
            rejection(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "token expired")
        }
        AuthError::InvalidToken | AuthError::UserNotFound => {
            rejection(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "invalid token")
        }
        AuthError::ServiceUnavailable(reason) => {
            tracing::error!(%reason, "session validation unavailable");
            rejection(
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_UNAVAILABLE",
                "authentication is temporarily unavailable",
            )
        }
    }
}

pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    let user = match validator.validate(token).await {
        Ok(user) => user,
        Err(err) => return auth_failure(&err),
    };
    tracing::debug!(uid = %user.id, "request authenticated");
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Extracts the caller verified by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => rejection(
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "authentication required",
            ),
        }
    }
}
