//! Normalizes an irregular ledger into average monthly rates.

use serde::Serialize;

use crate::domain::Transaction;

use super::summary_service::totals_by_kind;

/// Length of the nominal month used for every rate in the crate.
pub const DAYS_PER_MONTH: f64 = 30.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Average monthly income, expense and their difference over the ledger's span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateProjection {
    pub avg_monthly_income: f64,
    pub avg_monthly_expense: f64,
    pub monthly_surplus: f64,
}

pub struct ProjectionService;

impl ProjectionService {
    /// Projects the full transaction set into monthly rates. Rescans the whole
    /// slice on every call.
    pub fn project(transactions: &[Transaction]) -> RateProjection {
        let months = Self::months_span(transactions);
        let (income, expense) = totals_by_kind(transactions);
        let avg_monthly_income = income / months;
        let avg_monthly_expense = expense / months;
        RateProjection {
            avg_monthly_income,
            avg_monthly_expense,
            monthly_surplus: avg_monthly_income - avg_monthly_expense,
        }
    }

    /// Months covered by the ledger, never less than one.
    ///
    /// The day span between the earliest and latest entry is floored at one
    /// day, and the resulting month count at one month, so an empty or
    /// single-day ledger divides by exactly one.
    pub fn months_span(transactions: &[Transaction]) -> f64 {
        let mut dates = transactions.iter().map(|txn| txn.date);
        let Some(first) = dates.next() else {
            return 1.0;
        };
        let (min, max) = dates.fold((first, first), |(min, max), date| {
            (min.min(date), max.max(date))
        });
        let days = ((max - min).num_milliseconds() as f64 / MILLIS_PER_DAY).max(1.0);
        (days / DAYS_PER_MONTH).max(1.0)
    }

    /// Current monthly burn rate, the projected average expense.
    pub fn burn_rate(transactions: &[Transaction]) -> f64 {
        Self::project(transactions).avg_monthly_expense
    }
}
