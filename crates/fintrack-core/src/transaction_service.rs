//! Collection helpers for transactions.

use fintrack_domain::{DateWindow, FinanceSnapshot, Transaction, TransactionPatch};
use uuid::Uuid;

use crate::position_of;

/// Stateless CRUD and filtering helpers over the transaction collection.
pub struct TransactionService;

impl TransactionService {
    /// Appends the transaction and returns a copy of what was stored.
    pub fn add(snapshot: &mut FinanceSnapshot, transaction: Transaction) -> Transaction {
        snapshot.transactions.push(transaction.clone());
        transaction
    }

    /// Applies `patch` to the transaction identified by `id`. Unknown ids are a no-op.
    pub fn update(
        snapshot: &mut FinanceSnapshot,
        id: Uuid,
        patch: TransactionPatch,
    ) -> Option<Transaction> {
        let txn = snapshot.transactions.iter_mut().find(|txn| txn.id == id)?;
        patch.apply(txn);
        Some(txn.clone())
    }

    /// Removes the transaction identified by `id`, returning it when present.
    pub fn remove(snapshot: &mut FinanceSnapshot, id: Uuid) -> Option<Transaction> {
        let index = position_of(&snapshot.transactions, id)?;
        Some(snapshot.transactions.remove(index))
    }

    pub fn find(snapshot: &FinanceSnapshot, id: Uuid) -> Option<&Transaction> {
        snapshot.transactions.iter().find(|txn| txn.id == id)
    }

    /// Transactions whose category equals `category` exactly, in insertion order.
    pub fn by_category<'a>(snapshot: &'a FinanceSnapshot, category: &str) -> Vec<&'a Transaction> {
        snapshot
            .transactions
            .iter()
            .filter(|txn| txn.category == category)
            .collect()
    }

    /// Transactions inside `window`, or all of them when no window is given.
    pub fn in_window(
        snapshot: &FinanceSnapshot,
        window: Option<DateWindow>,
    ) -> impl Iterator<Item = &Transaction> {
        snapshot
            .transactions
            .iter()
            .filter(move |txn| window.map_or(true, |w| w.contains(txn.date)))
    }

    /// Up to `limit` transactions, newest date first. Equal dates list the most
    /// recently added transaction first.
    pub fn recent(snapshot: &FinanceSnapshot, limit: usize) -> Vec<&Transaction> {
        let mut ordered: Vec<(usize, &Transaction)> =
            snapshot.transactions.iter().enumerate().collect();
        ordered.sort_by(|(idx_a, a), (idx_b, b)| b.date.cmp(&a.date).then(idx_b.cmp(idx_a)));
        ordered.into_iter().take(limit).map(|(_, txn)| txn).collect()
    }
}
