use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::models::{Classification, PlanningStatus, Transaction};

/// Monthly (or arbitrary-period) reduction of a transaction set.
///
/// Pure over its input: the same transactions always produce the same
/// aggregates, and every split of expenses (classification, planning,
/// weekday/weekend) sums back to `expense_total`.
#[derive(Debug, Clone, Default)]
pub(crate) struct MonthlyAggregates {
    pub spent_by_category: HashMap<String, Decimal>,
    pub fixed_total: Decimal,
    pub variable_total: Decimal,
    pub planned_total: Decimal,
    pub unplanned_total: Decimal,
    pub weekday_total: Decimal,
    pub weekend_total: Decimal,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

impl MonthlyAggregates {
    pub(crate) fn surplus(&self) -> Decimal {
        self.income_total - self.expense_total
    }
}

pub(crate) fn aggregate(transactions: &[Transaction]) -> MonthlyAggregates {
    let mut agg = MonthlyAggregates::default();

    for txn in transactions {
        if txn.is_income() {
            agg.income_total += txn.amount;
            continue;
        }

        agg.expense_total += txn.amount;
        *agg
            .spent_by_category
            .entry(txn.category.clone())
            .or_insert(Decimal::ZERO) += txn.amount;

        // Unclassified spending is treated as variable: it is
        // discretionary until the user says otherwise.
        match txn.classification {
            Some(Classification::Fixed) => agg.fixed_total += txn.amount,
            Some(Classification::Variable) | None => agg.variable_total += txn.amount,
        }

        // Untagged spending counts as planned; only explicit impulse
        // purchases feed the unplanned bucket.
        match txn.planning {
            Some(PlanningStatus::Unplanned) => agg.unplanned_total += txn.amount,
            Some(PlanningStatus::Planned) | None => agg.planned_total += txn.amount,
        }

        if is_weekend(&txn.date) {
            agg.weekend_total += txn.amount;
        } else {
            agg.weekday_total += txn.amount;
        }
    }

    agg
}

/// Percentage of `part` over `whole` in [0, 100]-ish decimal form.
/// A zero or negative base yields 0, never a division error.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part / whole * Decimal::from(100)
}

fn is_weekend(date: &str) -> bool {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => matches!(d.weekday(), Weekday::Sat | Weekday::Sun),
        // Unparsable dates land in the weekday bucket so the split
        // still sums to the expense total.
        Err(_) => false,
    }
}
