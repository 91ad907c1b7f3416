//! User JWT authentication extractor.
//!
//! Provides an Axum extractor for validating JWT tokens from requests.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::{extract_user_id, JwtKeys};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user information from JWT.
///
/// This extractor validates the Bearer token in the Authorization header
/// and provides access to the authenticated user's details.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
    /// Phone number carried by the identity provider, unnormalized.
    pub phone: Option<String>,
}

impl UserAuth {
    /// Validates a bearer token and returns user authentication info.
    pub fn validate(keys: &JwtKeys, token: &str) -> Result<Self, ApiError> {
        let claims = keys.verify(token)?;
        let user_id = extract_user_id(&claims)?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
            phone: claims.phone.filter(|p| !p.trim().is_empty()),
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        UserAuth::validate(&state.jwt, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn keys() -> JwtKeys {
        JwtKeys::from_secret("test_secret_key_for_jwt_testing_12345", 0).unwrap()
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_validate_carries_phone() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, Some("+91 98765 43210"), 3600).unwrap();

        let auth = UserAuth::validate(&keys, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.phone.as_deref(), Some("+91 98765 43210"));
        assert!(!auth.jti.is_empty());
    }

    #[test]
    fn test_validate_blank_phone_is_none() {
        let keys = keys();
        let token = keys.sign(Uuid::new_v4(), Some("  "), 3600).unwrap();
        assert!(UserAuth::validate(&keys, &token).unwrap().phone.is_none());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(matches!(
            UserAuth::validate(&keys(), "not-a-token"),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(None)).unwrap(), None);
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))).unwrap(), Some("abc"));
        assert!(bearer_token(&parts(Some("Basic abc"))).is_err());
    }
}
