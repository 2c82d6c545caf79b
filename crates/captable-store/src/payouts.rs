use crate::{LedgerError, LedgerStore};
use captable_model::{
    normalize_payout_amount, validate_payout_amount, validate_topup_amount, NewPayout, ParseError,
    Payout, Period, PeriodMonth,
};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

const PAYOUT_SELECT: &str = "SELECT id, investor_id, period_month, period_date, company_revenue,
        payout_amount, reinvest, is_withdrawal_profit, is_withdrawal_capital, is_topup, created_at
 FROM payouts";

fn map_payout_row(row: &Row<'_>) -> rusqlite::Result<Payout> {
    let period_month: Option<String> = row.get(2)?;
    let period_date: Option<String> = row.get(3)?;
    let period = match (period_month, period_date) {
        (Some(month), None) => Period::Month(
            PeriodMonth::parse(&month)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        ),
        (None, Some(date)) => Period::Date(
            NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })?,
        ),
        _ => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                Box::new(ParseError::InvalidFormat(
                    "payout row must carry exactly one of period_month/period_date",
                )),
            ))
        }
    };
    Ok(Payout {
        id: row.get(0)?,
        investor_id: row.get(1)?,
        period,
        company_revenue: row.get(4)?,
        payout_amount: row.get(5)?,
        reinvest: row.get(6)?,
        is_withdrawal_profit: row.get(7)?,
        is_withdrawal_capital: row.get(8)?,
        is_topup: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn read_payout(conn: &Connection, id: i64) -> Result<Payout, LedgerError> {
    conn.query_row(
        &format!("{PAYOUT_SELECT} WHERE id = ?1"),
        params![id],
        map_payout_row,
    )
    .map_err(LedgerError::storage)
}

fn require_investor(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    let exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM investors WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(LedgerError::storage)?;
    if exists == 0 {
        return Err(LedgerError::NotFound(format!(
            "investor {id} does not exist"
        )));
    }
    Ok(())
}

impl LedgerStore {
    /// A single explicit payout against one investor for one calendar
    /// date. The zero check runs first; sign normalization is then
    /// applied unconditionally, so the caller-supplied sign never
    /// reaches the store.
    pub fn create_payout(&self, new: &NewPayout) -> Result<Payout, LedgerError> {
        validate_payout_amount(new.payout_amount)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let amount = normalize_payout_amount(new.payout_amount, new.is_withdrawal_capital);
        require_investor(&self.conn, new.investor_id)?;
        self.conn
            .execute(
                "INSERT INTO payouts (investor_id, period_date, payout_amount, reinvest,
                     is_withdrawal_profit, is_withdrawal_capital, is_topup)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
                params![
                    new.investor_id,
                    new.date.format("%Y-%m-%d").to_string(),
                    amount,
                    new.reinvest,
                    new.is_withdrawal_profit,
                    new.is_withdrawal_capital,
                ],
            )
            .map_err(LedgerError::storage)?;
        read_payout(&self.conn, self.conn.last_insert_rowid())
    }

    /// Principal added by the investor; always positive, every other
    /// classification flag stays false.
    pub fn create_topup(
        &self,
        investor_id: i64,
        date: NaiveDate,
        amount: f64,
    ) -> Result<Payout, LedgerError> {
        validate_topup_amount(amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
        require_investor(&self.conn, investor_id)?;
        self.conn
            .execute(
                "INSERT INTO payouts (investor_id, period_date, payout_amount, is_topup)
                 VALUES (?1, ?2, ?3, 1)",
                params![investor_id, date.format("%Y-%m-%d").to_string(), amount],
            )
            .map_err(LedgerError::storage)?;
        read_payout(&self.conn, self.conn.last_insert_rowid())
    }

    /// One transactional distribution run: reads every investor's share
    /// and inserts one payout per investor, proportional to that share.
    /// Either every investor gets a row or none do.
    pub fn distribute_for_month(
        &mut self,
        month: PeriodMonth,
        company_revenue: f64,
    ) -> Result<Vec<Payout>, LedgerError> {
        if !company_revenue.is_finite() {
            return Err(LedgerError::Validation(
                "company_revenue must be a finite number".to_string(),
            ));
        }
        let period = month.canonical_string();
        let tx = self.conn.transaction().map_err(LedgerError::storage)?;
        let shares: Vec<(i64, f64)> = {
            let mut stmt = tx
                .prepare("SELECT id, share_percent FROM investors ORDER BY id")
                .map_err(LedgerError::storage)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(LedgerError::storage)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(LedgerError::storage)?
        };
        let mut created = Vec::with_capacity(shares.len());
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO payouts (investor_id, period_month, company_revenue, payout_amount)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(LedgerError::storage)?;
            for (investor_id, share) in shares {
                let amount = company_revenue * share / 100.0;
                insert
                    .execute(params![investor_id, period, company_revenue, amount])
                    .map_err(LedgerError::storage)?;
                created.push(read_payout(&tx, tx.last_insert_rowid())?);
            }
        }
        tx.commit().map_err(LedgerError::storage)?;
        Ok(created)
    }

    /// All payouts ordered by period ascending, whichever period field
    /// is populated; a month sorts as its first day. Unbounded.
    pub fn list_payouts(&self) -> Result<Vec<Payout>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{PAYOUT_SELECT} ORDER BY COALESCE(period_date, period_month || '-01'), id"
            ))
            .map_err(LedgerError::storage)?;
        let rows = stmt
            .query_map([], map_payout_row)
            .map_err(LedgerError::storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(LedgerError::storage)
    }
}
