// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateInvestorRequest {
    pub full_name: String,
    #[serde(default)]
    pub invested_amount: f64,
    /// Absent behaves exactly like out-of-range: the store coerces it to
    /// the default share.
    #[serde(default)]
    pub share_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateInvestorRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub invested_amount: Option<f64>,
    #[serde(default)]
    pub share_percent: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePayoutRequest {
    pub investor_id: i64,
    /// Calendar date, `"YYYY-MM-DD"`.
    pub date: String,
    pub payout_amount: f64,
    #[serde(default)]
    pub reinvest: bool,
    #[serde(default)]
    pub is_withdrawal_profit: bool,
    #[serde(default)]
    pub is_withdrawal_capital: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTopupRequest {
    pub investor_id: i64,
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributeRequest {
    /// Month granularity, `"YYYY-MM"`.
    pub period_month: String,
    pub company_revenue: f64,
}

/// A payout as it appears on the wire: the period union flattened back
/// into two nullable fields, exactly one of which is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayoutWire {
    pub id: i64,
    pub investor_id: i64,
    pub period_month: Option<String>,
    pub period_date: Option<String>,
    pub company_revenue: Option<f64>,
    pub payout_amount: f64,
    pub reinvest: bool,
    pub is_withdrawal_profit: bool,
    pub is_withdrawal_capital: bool,
    pub is_topup: bool,
    pub created_at: DateTime<Utc>,
}
