// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Domain types for the captable investor ledger: investors, payouts,
//! accounting periods, and the validation policy shared by the store and
//! the HTTP layer.

use std::fmt::{Display, Formatter};

mod investor;
mod payout;
mod period;

pub use investor::{
    coerce_share_percent, share_percent_in_range, validate_invested_amount,
    validate_share_percent, Investor, InvestorUpdate, DEFAULT_SHARE_PERCENT, SHARE_PERCENT_MAX,
};
pub use payout::{
    normalize_payout_amount, validate_payout_amount, validate_topup_amount, NewPayout, Payout,
};
pub use period::{parse_calendar_date, Period, PeriodMonth};

pub const CRATE_NAME: &str = "captable-model";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    InvalidFormat(&'static str),
    OutOfRange(&'static str, &'static str),
    NotFinite(&'static str),
    Zero(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::InvalidFormat(msg) => f.write_str(msg),
            Self::OutOfRange(name, range) => write!(f, "{name} must be in {range}"),
            Self::NotFinite(name) => write!(f, "{name} must be a finite number"),
            Self::Zero(name) => write!(f, "{name} must not be zero"),
        }
    }
}

impl std::error::Error for ParseError {}
