//! # Token Issuance & Verification
//!
//! HS256 bearer tokens over a server-held secret. Issuance signs whatever
//! identity payload the caller sends, with a 7-day expiry. Verification is
//! an extractor, so a missing or unverifiable token rejects the request
//! before any handler logic runs.

use crate::handlers::{api_error_to_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::Json;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stay_core::{ApiError, ApiResult};

/// Token lifetime: 7 days
const TOKEN_TTL_DAYS: i64 = 7;

/// Decoded request identity.
///
/// Tokens carrying no `email` claim fail extraction; every authorized
/// operation is scoped to an email identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: usize,
}

/// Sign an arbitrary identity payload with a 7-day expiry
pub fn issue_token(secret: &str, payload: &Value) -> ApiResult<String> {
    let mut claims: Map<String, Value> = payload
        .as_object()
        .cloned()
        .ok_or_else(|| ApiError::InvalidRequest("token payload must be an object".into()))?;

    let exp = (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp();
    claims.insert("exp".to_string(), Value::from(exp));

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// Verify a bearer token and decode its claims
pub fn verify_token(secret: &str, token: &str) -> ApiResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

impl FromRequestParts<AppState> for Claims {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| api_error_to_response(ApiError::Unauthorized))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| api_error_to_response(ApiError::Unauthorized))?;

        verify_token(&state.config.jwt_secret, token).map_err(api_error_to_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_then_verify_round_trip() {
        let token = issue_token(SECRET, &json!({ "email": "sam@example.com" })).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.email, "sam@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(SECRET, &json!({ "email": "sam@example.com" })).unwrap();
        let err = verify_token("other-secret", &token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_token_without_email_rejected() {
        let token = issue_token(SECRET, &json!({ "role": "host" })).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let stale = Claims {
            email: "sam@example.com".to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(issue_token(SECRET, &json!("just-a-string")).is_err());
    }
}
