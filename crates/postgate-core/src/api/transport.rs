use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::not_json(self.status, &self.body, &e))
    }
}

/// Sends a JSON body to a backend path and hands back whatever came back.
///
/// Non-2xx statuses are not errors at this level; only failures to obtain
/// a response at all are.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<RawResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_success() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(401, "").is_success());
    }

    #[test]
    fn test_json_decodes_error_status_body() {
        let resp = RawResponse::new(401, r#"{"error":"Invalid credentials"}"#);
        let value: Value = resp.json().expect("valid JSON");
        assert_eq!(value, json!({"error": "Invalid credentials"}));
    }

    #[test]
    fn test_json_rejects_non_json() {
        let resp = RawResponse::new(200, "Internal Server Error");
        assert!(matches!(resp.json::<Value>(), Err(ApiError::InvalidResponse(_))));
    }
}
