use api_types::transaction::{
    Transaction, TransactionFilters, TransactionNew, TransactionPatch, TransactionSummary,
};
use chrono::NaiveDate;

use crate::{
    error::Result,
    resource::{Resource, ResourceClient},
};

pub struct Transactions;

impl Resource for Transactions {
    const PATH: &'static str = "transactions";

    type Record = Transaction;
    type New = TransactionNew;
    type Patch = TransactionPatch;
    type Filters = TransactionFilters;
}

pub type TransactionsClient<'a> = ResourceClient<'a, Transactions>;

impl ResourceClient<'_, Transactions> {
    /// Income/expense totals over `[start, end]`.
    ///
    /// Bounds that are not supplied are not sent; the server then falls back
    /// to the current calendar month.
    pub async fn summary(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<TransactionSummary> {
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("start_date", start.to_string()));
        }
        if let Some(end) = end {
            query.push(("end_date", end.to_string()));
        }

        let summary: TransactionSummary = self
            .transport()
            .get(&format!("/{}/summary/", Transactions::PATH), &query)
            .await?;
        if !summary.is_balanced() {
            tracing::warn!(
                balance = %summary.balance,
                income = %summary.total_income,
                expenses = %summary.total_expenses,
                "summary balance does not match its totals"
            );
        }
        Ok(summary)
    }
}
