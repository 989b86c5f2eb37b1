//! Append-only point ledger.
//!
//! Every point-affecting action appends exactly one immutable transaction;
//! nothing is ever edited or removed. The balance is not stored anywhere --
//! it is recomputed as `max(0, sum)` on every read, so an overshooting
//! debit records its full amount while the observable balance clamps at
//! zero.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a ledger transaction.
pub type TransactionId = String;

/// One immutable ledger entry. Positive amounts earn, negative spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: TransactionId,
    pub amount: i64,
    pub description: String,
    pub timestamp: NaiveDateTime,
}

/// The append-only transaction log and its derived balance.
#[derive(Debug, Clone, Default)]
pub struct PointLedger {
    transactions: Vec<PointTransaction>,
}

impl PointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a persisted transaction log.
    pub fn from_transactions(transactions: Vec<PointTransaction>) -> Self {
        Self { transactions }
    }

    /// Append a positive transaction.
    pub fn credit(
        &mut self,
        amount: u32,
        description: impl Into<String>,
        at: NaiveDateTime,
    ) -> TransactionId {
        self.append(i64::from(amount), description.into(), at)
    }

    /// Append a negative transaction of the full requested amount.
    ///
    /// The ledger never partial-applies: debiting past zero records the
    /// whole amount and the balance clamps on read.
    pub fn debit(
        &mut self,
        amount: u32,
        description: impl Into<String>,
        at: NaiveDateTime,
    ) -> TransactionId {
        self.append(-i64::from(amount), description.into(), at)
    }

    /// Current balance: `max(0, sum of all amounts)`.
    pub fn balance(&self) -> i64 {
        self.transactions.iter().map(|t| t.amount).sum::<i64>().max(0)
    }

    pub fn transactions(&self) -> &[PointTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn append(&mut self, amount: i64, description: String, at: NaiveDateTime) -> TransactionId {
        let id = Uuid::new_v4().to_string();
        self.transactions.push(PointTransaction {
            id: id.clone(),
            amount,
            description,
            timestamp: at,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn credit_raises_balance() {
        let mut ledger = PointLedger::new();
        ledger.credit(20, "Goal completed: report", at());
        assert_eq!(ledger.balance(), 20);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn overshooting_debit_clamps_balance_but_records_full_amount() {
        let mut ledger = PointLedger::new();
        ledger.credit(30, "seed", at());
        ledger.debit(100, "Penalty: big one", at());

        assert_eq!(ledger.balance(), 0);
        assert_eq!(ledger.transactions()[1].amount, -100);
    }

    #[test]
    fn paired_credit_debit_round_trips_balance() {
        let mut ledger = PointLedger::new();
        ledger.credit(50, "seed", at());
        let before = ledger.balance();

        ledger.credit(20, "Goal completed: report", at());
        ledger.debit(20, "Goal unchecked: report", at());
        assert_eq!(ledger.balance(), before);
    }

    proptest! {
        /// balance() == max(0, sum of amounts) after any operation sequence.
        #[test]
        fn balance_is_clamped_sum(ops in proptest::collection::vec((any::<bool>(), 0u32..10_000), 0..64)) {
            let mut ledger = PointLedger::new();
            let mut sum: i64 = 0;
            for (is_credit, amount) in ops {
                if is_credit {
                    ledger.credit(amount, "credit", at());
                    sum += i64::from(amount);
                } else {
                    ledger.debit(amount, "debit", at());
                    sum -= i64::from(amount);
                }
                prop_assert_eq!(ledger.balance(), sum.max(0));
                prop_assert!(ledger.balance() >= 0);
            }
        }
    }
}
