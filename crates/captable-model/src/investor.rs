// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Applied when a caller supplies no share or one outside (0, 100] at
/// creation time. Updates reject instead; see `validate_share_percent`.
pub const DEFAULT_SHARE_PERCENT: f64 = 50.0;
pub const SHARE_PERCENT_MAX: f64 = 100.0;

/// A party holding a principal stake and a profit-share percentage.
///
/// Invariants: `invested_amount >= 0` and `0 < share_percent <= 100`
/// at all times; `id` and `created_at` are assigned by the store and
/// never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Investor {
    pub id: i64,
    pub full_name: String,
    pub invested_amount: f64,
    pub share_percent: f64,
    pub created_at: DateTime<Utc>,
}

/// A partial update: only present fields are validated and applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestorUpdate {
    pub full_name: Option<String>,
    pub invested_amount: Option<f64>,
    pub share_percent: Option<f64>,
}

impl InvestorUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.invested_amount.is_none() && self.share_percent.is_none()
    }
}

#[must_use]
pub fn share_percent_in_range(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= SHARE_PERCENT_MAX
}

/// Creation-time policy: an absent or out-of-range share is silently
/// replaced with `DEFAULT_SHARE_PERCENT`.
#[must_use]
pub fn coerce_share_percent(value: Option<f64>) -> f64 {
    match value {
        Some(share) if share_percent_in_range(share) => share,
        _ => DEFAULT_SHARE_PERCENT,
    }
}

/// Update-time policy: out-of-range shares are rejected.
pub fn validate_share_percent(value: f64) -> Result<(), ParseError> {
    if share_percent_in_range(value) {
        Ok(())
    } else {
        Err(ParseError::OutOfRange("share_percent", "(0, 100]"))
    }
}

pub fn validate_invested_amount(value: f64) -> Result<(), ParseError> {
    if !value.is_finite() {
        return Err(ParseError::NotFinite("invested_amount"));
    }
    if value < 0.0 {
        return Err(ParseError::OutOfRange("invested_amount", "0.."));
    }
    Ok(())
}
