//! API key gate
//!
//! Evaluated before the request payload is interpreted, so an unauthorized
//! caller gets a 401 regardless of how malformed the body is.

use axum::http::HeaderMap;
use constant_time_eq::constant_time_eq;
use tracing::warn;

use crate::infrastructure::http::{errors::ApiError, state::AppConfig};

/// Header carrying the caller's access credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Admit or reject a request.
///
/// With no key configured every caller is admitted.
pub fn require_api_key(config: &AppConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = config.api_key.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if constant_time_eq(key.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => {
            warn!("API key authentication failed");
            Err(ApiError::new_401("Unauthorized: Invalid or missing API key"))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};

    use crate::domain::communication::email_address::EmailAddress;

    use super::*;

    fn config(api_key: Option<&str>) -> AppConfig {
        AppConfig {
            sender: EmailAddress::new_unchecked("noreply@example.com"),
            api_key: api_key.map(String::from),
        }
    }

    fn headers(api_key: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert("x-api-key", HeaderValue::from_str(key).unwrap());
        }
        headers
    }

    #[test]
    fn test_no_configured_key_admits_everyone() {
        assert!(require_api_key(&config(None), &headers(None)).is_ok());
        assert!(require_api_key(&config(None), &headers(Some("anything"))).is_ok());
    }

    #[test]
    fn test_matching_key_is_admitted() {
        assert!(require_api_key(&config(Some("secret")), &headers(Some("secret"))).is_ok());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = require_api_key(&config(Some("secret")), &headers(None));

        let error = result.unwrap_err();
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.message, "Unauthorized: Invalid or missing API key");
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let result = require_api_key(&config(Some("secret")), &headers(Some("wrong")));

        assert!(result.is_err());
    }
}
