// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
}

/// The single place HTTP status codes are decided. Client faults map to
/// 400, a missing entity to 404 (including deletes of unknown ids),
/// store faults to 500.
#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::InvalidJsonBody
        | ApiErrorCode::InvalidPathParameter
        | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::StorageFailure => 500,
    };
    ApiErrorMapping { status_code }
}
