//! Business logic helpers for managing transactions.

use uuid::Uuid;

use crate::core::services::{resolve_id, ServiceError, ServiceResult};
use crate::domain::Transaction;
use crate::ledger::TransactionLedger;

/// Provides validated add/remove helpers for the ledger.
pub struct TransactionService;

impl TransactionService {
    /// Adds a new transaction and returns its identifier.
    pub fn add(ledger: &mut TransactionLedger, transaction: Transaction) -> ServiceResult<Uuid> {
        transaction.validate().map_err(ServiceError::Invalid)?;
        let id = ledger.add(transaction);
        tracing::debug!(%id, "transaction recorded");
        Ok(id)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(ledger: &mut TransactionLedger, id: Uuid) -> ServiceResult<Transaction> {
        ledger
            .remove(id)
            .ok_or_else(|| ServiceError::Invalid("Transaction not found".into()))
    }

    /// Resolves a full id or short prefix typed by the user.
    pub fn resolve(ledger: &TransactionLedger, needle: &str) -> ServiceResult<Uuid> {
        resolve_id(ledger.iter(), needle, "transaction")
    }

    /// Transactions newest first.
    pub fn list(ledger: &TransactionLedger) -> Vec<&Transaction> {
        let mut items: Vec<&Transaction> = ledger.iter().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::short_id;
    use chrono::{TimeZone, Utc};

    fn sample_transaction() -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Transaction::expense(42.0, "Transport", date)
    }

    #[test]
    fn add_rejects_negative_amount() {
        let mut ledger = TransactionLedger::new();
        let mut txn = sample_transaction();
        txn.amount = -1.0;
        let err = TransactionService::add(&mut ledger, txn).expect_err("negative amount");
        assert!(matches!(err, ServiceError::Invalid(ref message) if message.contains("negative")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_fails_for_missing_transaction() {
        let mut ledger = TransactionLedger::new();
        let err = TransactionService::remove(&mut ledger, Uuid::new_v4())
            .expect_err("remove must fail for unknown id");
        assert!(
            matches!(err, ServiceError::Invalid(ref message) if message.contains("not found")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn resolve_accepts_short_prefix() {
        let mut ledger = TransactionLedger::new();
        let id = TransactionService::add(&mut ledger, sample_transaction()).unwrap();
        let resolved = TransactionService::resolve(&ledger, &short_id(id)).unwrap();
        assert_eq!(resolved, id);
        assert!(TransactionService::resolve(&ledger, "zzzz").is_err());
    }
}
