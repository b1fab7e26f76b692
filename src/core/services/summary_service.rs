use std::{cmp::Ordering, collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionKind};

/// Balances within this distance of zero are reported as break-even.
pub const BREAK_EVEN_DEADBAND: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceStatus {
    Profit,
    Loss,
    BreakEven,
}

impl BalanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BalanceStatus::Profit => "profit",
            BalanceStatus::Loss => "loss",
            BalanceStatus::BreakEven => "break-even",
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub status: BalanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Cumulative balance immediately after one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub balance: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
        let (total_income, total_expense) = totals_by_kind(transactions);
        let balance = total_income - total_expense;
        FinancialSummary {
            total_income,
            total_expense,
            balance,
            status: Self::classify(balance),
        }
    }

    pub fn classify(balance: f64) -> BalanceStatus {
        if balance > BREAK_EVEN_DEADBAND {
            BalanceStatus::Profit
        } else if balance < -BREAK_EVEN_DEADBAND {
            BalanceStatus::Loss
        } else {
            BalanceStatus::BreakEven
        }
    }

    /// Expense totals per category, largest first.
    pub fn expense_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for txn in transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::Expense)
        {
            *totals.entry(txn.category.as_str()).or_insert(0.0) += txn.amount;
        }
        let mut rows: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        rows
    }

    /// Balance after each transaction, in date order.
    pub fn running_balance(transactions: &[Transaction]) -> Vec<BalancePoint> {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|txn| txn.date);
        let mut balance = 0.0;
        ordered
            .into_iter()
            .map(|txn| {
                balance += txn.signed_amount();
                BalancePoint {
                    date: txn.date,
                    amount: txn.amount,
                    balance,
                }
            })
            .collect()
    }
}

/// Income and expense sums over the whole slice.
pub(crate) fn totals_by_kind(transactions: &[Transaction]) -> (f64, f64) {
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
            TransactionKind::Income => (income + txn.amount, expense),
            TransactionKind::Expense => (income, expense + txn.amount),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn empty_ledger_is_break_even() {
        let summary = SummaryService::summarize(&[]);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.status, BalanceStatus::BreakEven);
    }

    #[test]
    fn deadband_edges() {
        assert_eq!(SummaryService::classify(100.0), BalanceStatus::BreakEven);
        assert_eq!(SummaryService::classify(-100.0), BalanceStatus::BreakEven);
        assert_eq!(SummaryService::classify(100.01), BalanceStatus::Profit);
        assert_eq!(SummaryService::classify(-100.01), BalanceStatus::Loss);
    }

    #[test]
    fn summarize_nets_income_against_expense() {
        let transactions = vec![
            Transaction::income(2500.0, "Salary", at(0)),
            Transaction::expense(900.0, "Rent", at(1)),
            Transaction::expense(350.5, "Groceries", at(2)),
        ];
        let summary = SummaryService::summarize(&transactions);
        assert_eq!(summary.total_income, 2500.0);
        assert_eq!(summary.total_expense, 1250.5);
        assert_eq!(summary.balance, 1249.5);
        assert_eq!(summary.status, BalanceStatus::Profit);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&BalanceStatus::BreakEven).unwrap();
        assert_eq!(json, "\"break-even\"");
    }

    #[test]
    fn category_breakdown_ignores_income() {
        let transactions = vec![
            Transaction::income(1000.0, "Groceries", at(0)),
            Transaction::expense(40.0, "Groceries", at(1)),
            Transaction::expense(60.0, "Groceries", at(2)),
            Transaction::expense(250.0, "Transport", at(3)),
        ];
        let rows = SummaryService::expense_by_category(&transactions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Transport");
        assert_eq!(rows[1].amount, 100.0);
    }

    #[test]
    fn running_balance_follows_dates() {
        let transactions = vec![
            Transaction::expense(30.0, "Food", at(2)),
            Transaction::income(100.0, "Gift", at(0)),
            Transaction::expense(20.0, "Bus", at(1)),
        ];
        let series: Vec<f64> = SummaryService::running_balance(&transactions)
            .into_iter()
            .map(|point| point.balance)
            .collect();
        assert_eq!(series, vec![100.0, 80.0, 50.0]);
    }
}
