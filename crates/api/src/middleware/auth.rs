//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_shared::JwtError;
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiError;

/// The authenticated caller, resolved from a validated token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// User ID from the subject claim.
    pub id: Uuid,
    /// Role carried in the token.
    pub role: UserRole,
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// Validates the bearer token, parses the role claim, and stores an
/// [`AuthUser`] in request extensions for handlers to extract. A token
/// whose role string no longer names a known role is rejected outright.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::from(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return ApiError::from(AppError::Unauthorized("token has expired".to_string()))
                .into_response();
        }
        Err(_) => {
            return ApiError::from(AppError::Unauthorized(
                "invalid or malformed token".to_string(),
            ))
            .into_response();
        }
    };

    let Some(role) = UserRole::parse(&claims.role) else {
        return ApiError::from(AppError::Unauthorized(format!(
            "unknown role '{}' in token",
            claims.role
        )))
        .into_response();
    };

    request.extensions_mut().insert(AuthUser {
        id: claims.user_id(),
        role,
    });
    next.run(request).await
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().copied().ok_or_else(|| {
            ApiError::from(AppError::Unauthorized(
                "authentication required".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Basic dXNlcg==", None)]
    #[case("BearerNoSpace", None)]
    #[case("", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }
}
