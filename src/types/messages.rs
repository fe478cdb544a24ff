//! NATS message types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Generic request wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Identity of the authenticated caller, resolved by the gateway
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Role of the caller (e.g. ADMIN, FNB_MANAGER, STUDENT)
    #[serde(default)]
    pub role: Option<String>,
    pub payload: T,
}

impl<T> Request<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: None,
            role: None,
            payload,
        }
    }

    /// True if the caller's role is one of `allowed`
    pub fn has_role(&self, allowed: &[&str]) -> bool {
        self.role
            .as_deref()
            .map(|r| allowed.contains(&r))
            .unwrap_or(false)
    }
}

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(request_id: Uuid, payload: T) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Empty payload that accepts both `null` and `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyPayload {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_missing_role() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000001",
                       "timestamp":"2026-01-01T00:00:00Z",
                       "payload":{}}"#;
        let request: Request<EmptyPayload> = serde_json::from_str(json).unwrap();
        assert!(request.role.is_none());
        assert!(!request.has_role(&["ADMIN"]));
    }

    #[test]
    fn test_has_role_matches_listed_roles() {
        let mut request = Request::new(EmptyPayload {});
        request.role = Some("FNB_MANAGER".to_string());
        assert!(request.has_role(&["ADMIN", "FNB_MANAGER"]));
        assert!(!request.has_role(&["ADMIN"]));
    }

    #[test]
    fn test_error_response_serializes_camel_case() {
        let error = ErrorResponse::new(Uuid::nil(), "FORBIDDEN", "role not allowed");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"FORBIDDEN\""));
        assert!(json.contains("timestamp"));
    }
}
