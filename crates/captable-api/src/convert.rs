// SPDX-License-Identifier: Apache-2.0

use crate::dto::{PayoutWire, UpdateInvestorRequest};
use captable_model::{InvestorUpdate, Payout, Period};

#[must_use]
pub fn payout_to_wire(payout: &Payout) -> PayoutWire {
    let (period_month, period_date) = match payout.period {
        Period::Month(month) => (Some(month.canonical_string()), None),
        Period::Date(date) => (None, Some(date.format("%Y-%m-%d").to_string())),
    };
    PayoutWire {
        id: payout.id,
        investor_id: payout.investor_id,
        period_month,
        period_date,
        company_revenue: payout.company_revenue,
        payout_amount: payout.payout_amount,
        reinvest: payout.reinvest,
        is_withdrawal_profit: payout.is_withdrawal_profit,
        is_withdrawal_capital: payout.is_withdrawal_capital,
        is_topup: payout.is_topup,
        created_at: payout.created_at,
    }
}

#[must_use]
pub fn payouts_to_wire(payouts: &[Payout]) -> Vec<PayoutWire> {
    payouts.iter().map(payout_to_wire).collect()
}

#[must_use]
pub fn investor_update_from_request(request: &UpdateInvestorRequest) -> InvestorUpdate {
    InvestorUpdate {
        full_name: request.full_name.clone(),
        invested_amount: request.invested_amount,
        share_percent: request.share_percent,
    }
}
