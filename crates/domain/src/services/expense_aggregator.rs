use crate::entities::{DateRange, TransactionRecord};
use crate::errors::DomainError;
use crate::repositories::{IncentiveRepository, PurchaseRepository};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Expense Aggregator - sums purchases and realized incentives for a group
/// within a range, and merges both record kinds into one chronological
/// stream. Both reads are independent and run concurrently.
#[derive(Clone)]
pub struct ExpenseAggregator {
    purchases: Arc<dyn PurchaseRepository>,
    incentives: Arc<dyn IncentiveRepository>,
}

impl ExpenseAggregator {
    pub fn new(
        purchases: Arc<dyn PurchaseRepository>,
        incentives: Arc<dyn IncentiveRepository>,
    ) -> Self {
        Self {
            purchases,
            incentives,
        }
    }

    /// Total group expense: purchase amounts plus realized incentive
    /// amounts. Zero when nothing matches, never null.
    pub async fn group_expense_total(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, DomainError> {
        let range = DateRange::new(from, to)?;
        self.total_in(group_id, &range).await
    }

    pub(crate) async fn total_in(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Decimal, DomainError> {
        let (purchases, realized) = tokio::try_join!(
            self.purchases.find_in_range(group_id, range),
            self.incentives.find_realized_in_range(group_id, range),
        )?;

        let purchase_total: Decimal = purchases.iter().map(|p| p.amount).sum();
        let incentive_total: Decimal = realized.iter().map(|r| r.amount).sum();
        Ok(purchase_total + incentive_total)
    }

    /// Merged chronological sequence of both record kinds, tagged by kind.
    /// Recomputed on every call, never cached.
    pub async fn transaction_records(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TransactionRecord>, DomainError> {
        let range = DateRange::new(from, to)?;
        self.records_in(group_id, &range).await
    }

    pub(crate) async fn records_in(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<TransactionRecord>, DomainError> {
        let (purchases, realized) = tokio::try_join!(
            self.purchases.find_in_range(group_id, range),
            self.incentives.find_realized_in_range(group_id, range),
        )?;

        let mut records: Vec<TransactionRecord> = purchases
            .iter()
            .map(TransactionRecord::from_purchase)
            .chain(realized.iter().map(TransactionRecord::from_realized))
            .collect();
        // Stable sort: same-day records keep purchase-before-incentive order.
        records.sort_by_key(|record| record.date);
        Ok(records)
    }
}
