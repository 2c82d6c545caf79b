use crate::{LedgerError, LedgerStore};
use captable_model::{
    coerce_share_percent, validate_invested_amount, validate_share_percent, Investor,
    InvestorUpdate,
};
use rusqlite::{params, Row};

fn map_investor_row(row: &Row<'_>) -> rusqlite::Result<Investor> {
    Ok(Investor {
        id: row.get(0)?,
        full_name: row.get(1)?,
        invested_amount: row.get(2)?,
        share_percent: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl LedgerStore {
    /// All investors, id ascending. Unbounded; no pagination.
    pub fn list_investors(&self) -> Result<Vec<Investor>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, full_name, invested_amount, share_percent, created_at
                 FROM investors ORDER BY id",
            )
            .map_err(LedgerError::storage)?;
        let rows = stmt
            .query_map([], map_investor_row)
            .map_err(LedgerError::storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(LedgerError::storage)
    }

    /// A missing or out-of-range share is coerced to the default rather
    /// than rejected; negative principal is rejected. The inserted row is
    /// re-read so the caller sees the store-assigned id and timestamp.
    pub fn create_investor(
        &self,
        full_name: &str,
        invested_amount: f64,
        share_percent: Option<f64>,
    ) -> Result<Investor, LedgerError> {
        validate_invested_amount(invested_amount)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let share = coerce_share_percent(share_percent);
        self.conn
            .execute(
                "INSERT INTO investors (full_name, invested_amount, share_percent)
                 VALUES (?1, ?2, ?3)",
                params![full_name, invested_amount, share],
            )
            .map_err(LedgerError::storage)?;
        self.get_investor(self.conn.last_insert_rowid())
    }

    pub fn get_investor(&self, id: i64) -> Result<Investor, LedgerError> {
        self.conn
            .query_row(
                "SELECT id, full_name, invested_amount, share_percent, created_at
                 FROM investors WHERE id = ?1",
                params![id],
                map_investor_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::NotFound(format!("investor {id} does not exist"))
                }
                other => LedgerError::storage(other),
            })
    }

    /// Applies only the fields present in `update`, each validated
    /// independently; a share outside (0, 100] is rejected here, unlike
    /// at creation. One single-column UPDATE per present field, then the
    /// refreshed row is re-read.
    pub fn update_investor(
        &self,
        id: i64,
        update: &InvestorUpdate,
    ) -> Result<Investor, LedgerError> {
        if let Some(amount) = update.invested_amount {
            validate_invested_amount(amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
        }
        if let Some(share) = update.share_percent {
            validate_share_percent(share).map_err(|e| LedgerError::Validation(e.to_string()))?;
        }
        self.get_investor(id)?;
        if let Some(full_name) = &update.full_name {
            self.conn
                .execute(
                    "UPDATE investors SET full_name = ?1 WHERE id = ?2",
                    params![full_name, id],
                )
                .map_err(LedgerError::storage)?;
        }
        if let Some(amount) = update.invested_amount {
            self.conn
                .execute(
                    "UPDATE investors SET invested_amount = ?1 WHERE id = ?2",
                    params![amount, id],
                )
                .map_err(LedgerError::storage)?;
        }
        if let Some(share) = update.share_percent {
            self.conn
                .execute(
                    "UPDATE investors SET share_percent = ?1 WHERE id = ?2",
                    params![share, id],
                )
                .map_err(LedgerError::storage)?;
        }
        self.get_investor(id)
    }

    /// Zero rows affected is an error, not a no-op.
    pub fn delete_investor(&self, id: i64) -> Result<(), LedgerError> {
        let affected = self
            .conn
            .execute("DELETE FROM investors WHERE id = ?1", params![id])
            .map_err(LedgerError::storage)?;
        if affected == 0 {
            return Err(LedgerError::NotFound(format!(
                "investor {id} does not exist"
            )));
        }
        Ok(())
    }
}
