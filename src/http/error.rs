//! Errors reported by the release API.

use reqwest::StatusCode;
use serde::Deserialize;

/// Error body GitHub returns alongside a failure status.
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    message: Option<String>,
}

/// A non-success HTTP response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Build the error from a failed response.
    ///
    /// Uses the `message` field of a JSON error body when there is one,
    /// otherwise `HTTP <code>: <reason>`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            });

        Self {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            || (self.status == StatusCode::FORBIDDEN.as_u16()
                && self.message.to_lowercase().contains("rate limit"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if self.is_rate_limited() {
            write!(f, ". Try again later or set the GITHUB_TOKEN environment variable.")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, r#"{"message": "Not Found"}"#);
        assert_eq!(err.status, 404);
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_message_fallback_on_invalid_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.message, "HTTP 502: Bad Gateway");
        assert_eq!(err.status, 502);
    }

    #[test]
    fn test_message_fallback_on_empty_message() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message": ""}"#);
        assert_eq!(err.message, "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_rate_limit_hint() {
        let err = ApiError::from_response(
            StatusCode::FORBIDDEN,
            r#"{"message": "API rate limit exceeded for 127.0.0.1."}"#,
        );
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("GITHUB_TOKEN"));

        let err = ApiError::from_response(StatusCode::FORBIDDEN, r#"{"message": "Forbidden"}"#);
        assert!(!err.is_rate_limited());
        assert_eq!(err.to_string(), "Forbidden");
    }
}
