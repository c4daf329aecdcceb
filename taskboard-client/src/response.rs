//! The uniform `{success, data, message}` envelope and response normalization

use crate::error::ClientError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized result of every API call, whatever the backend returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Best human-readable explanation of a failed response
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Request failed".to_string())
    }
}

impl ApiResponse<Value> {
    /// Decode `data` into the type a resource module promises.
    ///
    /// A `null` or missing payload becomes `None`. Failed envelopes keep their
    /// message and drop whatever data they carried.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, ClientError> {
        let data = match (self.success, self.data) {
            (true, Some(value)) if !value.is_null() => Some(
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(ApiResponse {
            success: self.success,
            data,
            message: self.message,
            error: self.error,
        })
    }
}

/// Pull a message out of a JSON error body.
///
/// Tries `detail` (a string, or a list of `{msg}` validation entries), then
/// `message`, then `error`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Turn a raw HTTP response into the uniform envelope.
///
/// - non-2xx: `success: false` with a message from the body, or
///   `"HTTP error! status: <code>"`
/// - 2xx JSON carrying `success`: passed through
/// - 2xx JSON without `success`: wrapped as `{success: true, data: body}`
/// - 2xx empty body: `{success: true, data: null}`
/// - 2xx non-JSON body: [`ClientError::InvalidBody`]
pub fn normalize(
    status: StatusCode,
    is_json: bool,
    body: &[u8],
) -> Result<ApiResponse<Value>, ClientError> {
    if !status.is_success() {
        let parsed = if is_json {
            serde_json::from_slice::<Value>(body).ok()
        } else {
            None
        };
        let message = parsed
            .as_ref()
            .and_then(extract_error_message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        let error = parsed
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Ok(ApiResponse {
            success: false,
            data: None,
            message: Some(message),
            error,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiResponse {
            success: true,
            data: None,
            message: None,
            error: None,
        });
    }

    if !is_json {
        return Err(ClientError::InvalidBody(format!(
            "expected JSON, got {} bytes of another content type",
            body.len()
        )));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ClientError::InvalidBody(e.to_string()))?;

    match value.get("success") {
        Some(Value::Bool(_)) => {
            serde_json::from_value(value).map_err(|e| ClientError::InvalidBody(e.to_string()))
        }
        _ => Ok(ApiResponse::success(value)),
    }
}
