// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidJsonBody,
    InvalidPathParameter,
    ValidationFailed,
    NotFound,
    StorageFailure,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidJsonBody => "InvalidJsonBody",
            Self::InvalidPathParameter => "InvalidPathParameter",
            Self::ValidationFailed => "ValidationFailed",
            Self::NotFound => "NotFound",
            Self::StorageFailure => "StorageFailure",
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The body of every error response, serialized under an `"error"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::StorageFailure, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn invalid_json_body(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidJsonBody, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn invalid_path_parameter(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPathParameter,
            format!("invalid path parameter: {name}"),
            json!({"parameter": name, "value": value}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}
