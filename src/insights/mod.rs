mod rules;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::MonthlyAggregates;
use crate::models::{Budget, Goal};

/// Ranked urgency of an insight. Ordering matters: the ranker sorts
/// descending, so `Critical` outranks everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum InsightKind {
    BudgetSurplus,
    BudgetNearLimit,
    BudgetOverrun,
    SurplusContribution,
    GoalAlmostThere,
    UnplannedLeak,
    WeekendPattern,
}

/// A single ranked, explainable recommendation derived from aggregated
/// financial data. `impact_amount` is the user-facing dollar figure the
/// rule's arithmetic produced; it must be exactly reproducible.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Insight {
    pub id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact_amount: Decimal,
    pub action_label: String,
    /// Abstract navigation target for the consuming UI ("budgets",
    /// "goals", "transactions").
    pub action_target: &'static str,
    pub priority: Priority,
}

/// A budget row joined with what was actually spent in its category.
#[derive(Debug, Clone)]
pub(crate) struct BudgetStatus {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
}

/// Everything a rule may look at. Built once per evaluation; rules never
/// touch the database.
pub(crate) struct RuleContext<'a> {
    pub aggregates: &'a MonthlyAggregates,
    pub budgets: &'a [BudgetStatus],
    pub goals: &'a [Goal],
}

pub(crate) trait InsightRule {
    /// Evaluates against the context. Most rules emit zero or one
    /// insight; per-budget and per-goal rules may emit one per row.
    /// Missing data (no budgets, no goals, zero income) emits nothing.
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight>;
}

/// The rule catalog, in evaluation order. Order is part of the contract:
/// the ranker's sort is stable, so rules earlier in this list win full
/// ties.
fn catalog() -> Vec<Box<dyn InsightRule>> {
    vec![
        Box::new(rules::BudgetSurplusToGoal),
        Box::new(rules::BudgetNearLimit),
        Box::new(rules::BudgetOverrun),
        Box::new(rules::SurplusContribution),
        Box::new(rules::GoalAlmostThere),
        Box::new(rules::UnplannedLeak),
        Box::new(rules::WeekendPattern),
    ]
}

/// Evaluates every rule and returns the ranked results.
pub(crate) fn generate(ctx: &RuleContext) -> Vec<Insight> {
    let mut insights: Vec<Insight> = catalog()
        .iter()
        .flat_map(|rule| rule.evaluate(ctx))
        .collect();
    rank(&mut insights);
    insights
}

/// Stable sort: priority descending, then impact descending. Remaining
/// ties keep rule-evaluation order.
pub(crate) fn rank(insights: &mut [Insight]) {
    insights.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.impact_amount.cmp(&a.impact_amount))
    });
}

/// Joins budget rows with the spent-by-category aggregate.
pub(crate) fn budget_statuses(
    budgets: &[Budget],
    aggregates: &MonthlyAggregates,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| BudgetStatus {
            category: b.category.clone(),
            budgeted: b.limit_amount,
            spent: aggregates
                .spent_by_category
                .get(&b.category)
                .copied()
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

#[cfg(test)]
mod tests;
