use rust_decimal::Decimal;

use crate::aggregate::percent_of;
use crate::util::format_amount;

use super::{Insight, InsightKind, InsightRule, Priority, RuleContext};

const MONTHS_PER_YEAR: i64 = 12;

fn dollars(n: i64) -> Decimal {
    Decimal::from(n)
}

/// A budget with more than this much headroom left is surplus worth
/// redirecting to a goal.
fn surplus_floor() -> Decimal {
    dollars(50)
}

/// spent/budgeted percentage at which the near-limit alert starts.
fn near_limit_pct() -> Decimal {
    dollars(85)
}

/// Monthly surplus must exceed this before suggesting a contribution.
fn suggestion_floor() -> Decimal {
    dollars(100)
}

/// Share of the monthly surplus suggested as a goal contribution.
fn surplus_share() -> Decimal {
    Decimal::new(30, 2) // 0.30
}

/// Goal progress percentage at which the celebration fires.
fn celebration_pct() -> Decimal {
    dollars(90)
}

/// Unplanned spending above this share of income is a leak.
fn unplanned_income_share() -> Decimal {
    Decimal::new(15, 2) // 0.15
}

/// Weekend spending above this share of weekday spending is a pattern.
fn weekend_weekday_ratio() -> Decimal {
    Decimal::new(60, 2) // 0.60
}

/// Share of weekend spending assumed trimmable in the estimate.
fn weekend_trim_share() -> Decimal {
    Decimal::new(20, 2) // 0.20
}

/// Budget surplus → goal opportunity: a budget with more than $50 of
/// headroom plus an active underfunded goal suggests moving the surplus.
pub(super) struct BudgetSurplusToGoal;

impl InsightRule for BudgetSurplusToGoal {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        let Some(goal) = ctx.goals.iter().find(|g| g.is_underfunded()) else {
            return Vec::new();
        };

        ctx.budgets
            .iter()
            .filter(|b| b.budgeted - b.spent > surplus_floor())
            .map(|b| {
                let surplus = b.budgeted - b.spent;
                Insight {
                    id: format!("budget-surplus:{}", b.category),
                    kind: InsightKind::BudgetSurplus,
                    title: format!("Room left in {}", b.category),
                    description: format!(
                        "Your {} budget has {} unspent this month. Contributing it to '{}' would bring the goal {} closer.",
                        b.category,
                        format_amount(surplus),
                        goal.name,
                        format_amount(surplus),
                    ),
                    impact_amount: surplus,
                    action_label: format!("Contribute to '{}'", goal.name),
                    action_target: "goals",
                    priority: Priority::High,
                }
            })
            .collect()
    }
}

/// Budget near-limit alert: 85% ≤ spent/budgeted < 100%.
pub(super) struct BudgetNearLimit;

impl InsightRule for BudgetNearLimit {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        ctx.budgets
            .iter()
            .filter(|b| {
                let used = percent_of(b.spent, b.budgeted);
                used >= near_limit_pct() && used < dollars(100)
            })
            .map(|b| {
                let remaining = b.budgeted - b.spent;
                Insight {
                    id: format!("budget-near-limit:{}", b.category),
                    kind: InsightKind::BudgetNearLimit,
                    title: format!("{} budget almost used up", b.category),
                    description: format!(
                        "You've used {}% of your {} budget; only {} remains for the rest of the month.",
                        percent_of(b.spent, b.budgeted).round_dp(0),
                        b.category,
                        format_amount(remaining),
                    ),
                    impact_amount: remaining,
                    action_label: "Review spending".into(),
                    action_target: "transactions",
                    priority: Priority::High,
                }
            })
            .collect()
    }
}

/// Budget overrun alert: spent/budgeted ≥ 100%.
pub(super) struct BudgetOverrun;

impl InsightRule for BudgetOverrun {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        ctx.budgets
            .iter()
            .filter(|b| b.budgeted > Decimal::ZERO && b.spent >= b.budgeted)
            .map(|b| {
                let overspend = b.spent - b.budgeted;
                Insight {
                    id: format!("budget-overrun:{}", b.category),
                    kind: InsightKind::BudgetOverrun,
                    title: format!("{} budget exceeded", b.category),
                    description: format!(
                        "You spent {} over your {} budget of {}.",
                        format_amount(overspend),
                        b.category,
                        format_amount(b.budgeted),
                    ),
                    impact_amount: overspend,
                    action_label: "Adjust budget".into(),
                    action_target: "budgets",
                    priority: Priority::High,
                }
            })
            .collect()
    }
}

/// Monthly-surplus suggestion: with more than $100 left over, suggest
/// contributing 30% of the surplus (capped at what the goal still
/// needs) to the goal that is already closest to completion.
pub(super) struct SurplusContribution;

impl InsightRule for SurplusContribution {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        let surplus = ctx.aggregates.surplus();
        if surplus <= suggestion_floor() {
            return Vec::new();
        }
        let Some(goal) = ctx
            .goals
            .iter()
            .filter(|g| g.is_underfunded())
            .max_by(|a, b| a.progress().cmp(&b.progress()))
        else {
            return Vec::new();
        };

        let suggested = (surplus * surplus_share()).min(goal.remaining());
        vec![Insight {
            id: format!("surplus-contribution:{}", goal.name),
            kind: InsightKind::SurplusContribution,
            title: "You ended the month ahead".into(),
            description: format!(
                "Income exceeded spending by {}. Putting {} toward '{}' keeps the surplus working for you.",
                format_amount(surplus),
                format_amount(suggested),
                goal.name,
            ),
            impact_amount: suggested,
            action_label: format!("Contribute to '{}'", goal.name),
            action_target: "goals",
            priority: Priority::Medium,
        }]
    }
}

/// Goal near-completion celebration: 90% ≤ progress < 100%.
pub(super) struct GoalAlmostThere;

impl InsightRule for GoalAlmostThere {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        ctx.goals
            .iter()
            .filter(|g| {
                let progress = percent_of(g.current_amount, g.target_amount);
                progress >= celebration_pct() && progress < dollars(100)
            })
            .map(|g| Insight {
                id: format!("goal-almost-there:{}", g.name),
                kind: InsightKind::GoalAlmostThere,
                title: format!("'{}' is almost funded!", g.name),
                description: format!(
                    "Only {} to go on '{}' — you're at {}% of the target.",
                    format_amount(g.remaining()),
                    g.name,
                    percent_of(g.current_amount, g.target_amount).round_dp(0),
                ),
                impact_amount: g.remaining(),
                action_label: "Finish the goal".into(),
                action_target: "goals",
                priority: Priority::Medium,
            })
            .collect()
    }
}

/// Unplanned-spending leak: unplanned expenses above 15% of income are
/// a material leak; the impact is the annualized amount.
pub(super) struct UnplannedLeak;

impl InsightRule for UnplannedLeak {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        let agg = ctx.aggregates;
        if agg.income_total <= Decimal::ZERO {
            return Vec::new();
        }
        if agg.unplanned_total <= agg.income_total * unplanned_income_share() {
            return Vec::new();
        }

        let annualized = agg.unplanned_total * Decimal::from(MONTHS_PER_YEAR);
        vec![Insight {
            id: "unplanned-leak".into(),
            kind: InsightKind::UnplannedLeak,
            title: "Unplanned spending is leaking money".into(),
            description: format!(
                "Unplanned purchases took {} this month. At this pace that's {} a year.",
                format_amount(agg.unplanned_total),
                format_amount(annualized),
            ),
            impact_amount: annualized,
            action_label: "Review unplanned purchases".into(),
            action_target: "transactions",
            priority: Priority::Critical,
        }]
    }
}

/// Weekend-spending pattern: weekend spending above 60% of weekday
/// spending, with an annualized estimate of trimming 20% of it.
pub(super) struct WeekendPattern;

impl InsightRule for WeekendPattern {
    fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        let agg = ctx.aggregates;
        if agg.weekday_total <= Decimal::ZERO {
            return Vec::new();
        }
        if agg.weekend_total <= agg.weekday_total * weekend_weekday_ratio() {
            return Vec::new();
        }

        let estimate = agg.weekend_total * weekend_trim_share() * Decimal::from(MONTHS_PER_YEAR);
        vec![Insight {
            id: "weekend-pattern".into(),
            kind: InsightKind::WeekendPattern,
            title: "Weekends drive your spending".into(),
            description: format!(
                "You spent {} on weekends against {} on weekdays. Trimming weekend spending by a fifth would free up about {} a year.",
                format_amount(agg.weekend_total),
                format_amount(agg.weekday_total),
                format_amount(estimate),
            ),
            impact_amount: estimate,
            action_label: "See weekend transactions".into(),
            action_target: "transactions",
            priority: Priority::Medium,
        }]
    }
}
