// SPDX-License-Identifier: Apache-2.0

use crate::{ParseError, Period};
use chrono::{DateTime, NaiveDate, Utc};

/// One ledger movement against an investor: a profit distribution, a
/// capital withdrawal, or a principal top-up. Immutable once recorded.
///
/// Sign convention: positive `payout_amount` is an inflow to the
/// investor's position or a profit payment; negative is capital
/// withdrawn from the position.
#[derive(Debug, Clone, PartialEq)]
pub struct Payout {
    pub id: i64,
    pub investor_id: i64,
    pub period: Period,
    pub payout_amount: f64,
    /// Set on distribution-run rows only: the revenue figure the run was
    /// computed from.
    pub company_revenue: Option<f64>,
    pub reinvest: bool,
    pub is_withdrawal_profit: bool,
    pub is_withdrawal_capital: bool,
    pub is_topup: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated single-event payout ready for insertion. Produced by the
/// engine after the zero check and sign normalization; never built from
/// raw caller input directly.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayout {
    pub investor_id: i64,
    pub date: NaiveDate,
    pub payout_amount: f64,
    pub reinvest: bool,
    pub is_withdrawal_profit: bool,
    pub is_withdrawal_capital: bool,
}

/// Forces the stored sign regardless of what the caller supplied:
/// capital withdrawals are negative, everything else non-negative.
/// Idempotent, and applied unconditionally after the zero check.
#[must_use]
pub fn normalize_payout_amount(amount: f64, is_withdrawal_capital: bool) -> f64 {
    if is_withdrawal_capital {
        -amount.abs()
    } else {
        amount.abs()
    }
}

pub fn validate_payout_amount(amount: f64) -> Result<(), ParseError> {
    if !amount.is_finite() {
        return Err(ParseError::NotFinite("payout_amount"));
    }
    if amount == 0.0 {
        return Err(ParseError::Zero("payout_amount"));
    }
    Ok(())
}

/// Top-ups are strictly positive principal inflows.
pub fn validate_topup_amount(amount: f64) -> Result<(), ParseError> {
    if !amount.is_finite() {
        return Err(ParseError::NotFinite("amount"));
    }
    if amount <= 0.0 {
        return Err(ParseError::OutOfRange("amount", "0.. (exclusive)"));
    }
    Ok(())
}
