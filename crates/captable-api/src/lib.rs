// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! The HTTP wire contract: request/response DTOs, the error envelope,
//! and the error-to-status mapping table. Depends on the domain model
//! only; the server crate owns transport concerns.

pub mod convert;
pub mod dto;
pub mod error_mapping;
mod errors;

pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "captable-api";
