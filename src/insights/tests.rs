#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::aggregate::MonthlyAggregates;
use crate::models::Goal;

fn goal(name: &str, target: Decimal, current: Decimal) -> Goal {
    let mut g = Goal::new(1, name.into(), target);
    g.current_amount = current;
    g
}

fn status(category: &str, budgeted: Decimal, spent: Decimal) -> BudgetStatus {
    BudgetStatus {
        category: category.into(),
        budgeted,
        spent,
    }
}

fn empty_aggregates() -> MonthlyAggregates {
    MonthlyAggregates::default()
}

fn evaluate(
    aggregates: &MonthlyAggregates,
    budgets: &[BudgetStatus],
    goals: &[Goal],
) -> Vec<Insight> {
    generate(&RuleContext {
        aggregates,
        budgets,
        goals,
    })
}

// ── Ranking ───────────────────────────────────────────────────

fn stub(id: &str, priority: Priority, impact: Decimal) -> Insight {
    Insight {
        id: id.into(),
        kind: InsightKind::BudgetOverrun,
        title: String::new(),
        description: String::new(),
        impact_amount: impact,
        action_label: String::new(),
        action_target: "budgets",
        priority,
    }
}

#[test]
fn test_rank_priority_then_impact() {
    let mut insights = vec![
        stub("low", Priority::Low, dec!(10)),
        stub("crit-small", Priority::Critical, dec!(5)),
        stub("high", Priority::High, dec!(100)),
        stub("crit-big", Priority::Critical, dec!(50)),
    ];
    rank(&mut insights);
    let order: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec!["crit-big", "crit-small", "high", "low"]);
}

#[test]
fn test_rank_is_stable_on_full_ties() {
    let mut insights = vec![
        stub("first", Priority::High, dec!(25)),
        stub("second", Priority::High, dec!(25)),
        stub("third", Priority::High, dec!(25)),
    ];
    rank(&mut insights);
    let order: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

// ── Budget near-limit ─────────────────────────────────────────

#[test]
fn test_near_limit_alert_at_90_percent() {
    let mut agg = empty_aggregates();
    agg.spent_by_category.insert("Alimentação".into(), dec!(450));
    agg.expense_total = dec!(450);
    let budgets = vec![status("Alimentação", dec!(500), dec!(450))];

    let insights = evaluate(&agg, &budgets, &[]);
    let alert = insights
        .iter()
        .find(|i| i.kind == InsightKind::BudgetNearLimit)
        .unwrap();
    assert_eq!(alert.impact_amount, dec!(50));
    assert_eq!(alert.priority, Priority::High);
    assert!(alert.description.contains("$50.00"));
}

#[test]
fn test_near_limit_not_triggered_below_85_percent() {
    let budgets = vec![status("Alimentação", dec!(500), dec!(420))]; // 84%
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::BudgetNearLimit));
}

#[test]
fn test_near_limit_boundary_at_85_percent() {
    let budgets = vec![status("Lazer", dec!(200), dec!(170))]; // exactly 85%
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    assert!(insights
        .iter()
        .any(|i| i.kind == InsightKind::BudgetNearLimit));
}

// ── Budget overrun ────────────────────────────────────────────

#[test]
fn test_overrun_alert() {
    let budgets = vec![status("Lazer", dec!(300), dec!(350))];
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    let alert = insights
        .iter()
        .find(|i| i.kind == InsightKind::BudgetOverrun)
        .unwrap();
    assert_eq!(alert.impact_amount, dec!(50));
    assert_eq!(alert.priority, Priority::High);
}

#[test]
fn test_overrun_at_exactly_100_percent() {
    let budgets = vec![status("Lazer", dec!(300), dec!(300))];
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    let alert = insights
        .iter()
        .find(|i| i.kind == InsightKind::BudgetOverrun)
        .unwrap();
    assert_eq!(alert.impact_amount, Decimal::ZERO);
    // 100% is an overrun, not a near-limit
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::BudgetNearLimit));
}

#[test]
fn test_zero_budget_emits_nothing() {
    let budgets = vec![status("Weird", Decimal::ZERO, dec!(100))];
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    assert!(!insights.iter().any(|i| {
        i.kind == InsightKind::BudgetOverrun || i.kind == InsightKind::BudgetNearLimit
    }));
}

// ── Budget surplus → goal ─────────────────────────────────────

#[test]
fn test_budget_surplus_needs_underfunded_goal() {
    let budgets = vec![status("Transporte", dec!(400), dec!(100))];

    // No goals: nothing
    let insights = evaluate(&empty_aggregates(), &budgets, &[]);
    assert!(!insights.iter().any(|i| i.kind == InsightKind::BudgetSurplus));

    // Fully funded goal: nothing
    let funded = vec![goal("Viagem", dec!(1000), dec!(1000))];
    let insights = evaluate(&empty_aggregates(), &budgets, &funded);
    assert!(!insights.iter().any(|i| i.kind == InsightKind::BudgetSurplus));

    // Underfunded goal: surplus suggestion with the full headroom
    let open = vec![goal("Viagem", dec!(1000), dec!(200))];
    let insights = evaluate(&empty_aggregates(), &budgets, &open);
    let surplus = insights
        .iter()
        .find(|i| i.kind == InsightKind::BudgetSurplus)
        .unwrap();
    assert_eq!(surplus.impact_amount, dec!(300));
    assert_eq!(surplus.priority, Priority::High);
    assert!(surplus.action_label.contains("Viagem"));
}

#[test]
fn test_budget_surplus_floor_is_exclusive() {
    // Exactly $50 of headroom does not trigger
    let budgets = vec![status("Alimentação", dec!(500), dec!(450))];
    let goals = vec![goal("Viagem", dec!(1000), dec!(0))];
    let insights = evaluate(&empty_aggregates(), &budgets, &goals);
    assert!(!insights.iter().any(|i| i.kind == InsightKind::BudgetSurplus));
}

// ── Monthly surplus suggestion ────────────────────────────────

#[test]
fn test_surplus_contribution_picks_most_advanced_goal() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(3000);
    agg.expense_total = dec!(2000);

    let goals = vec![
        goal("Emergência", dec!(5000), dec!(1000)), // 20%
        goal("Viagem", dec!(2000), dec!(1500)),     // 75%
    ];
    let insights = evaluate(&agg, &[], &goals);
    let suggestion = insights
        .iter()
        .find(|i| i.kind == InsightKind::SurplusContribution)
        .unwrap();
    // 30% of the 1000 surplus; under Viagem's remaining 500, so uncapped
    assert_eq!(suggestion.impact_amount, dec!(300));
    assert!(suggestion.description.contains("Viagem"));
    assert_eq!(suggestion.priority, Priority::Medium);
}

#[test]
fn test_surplus_contribution_capped_by_remaining() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(5000);
    agg.expense_total = dec!(1000); // surplus 4000, 30% = 1200

    let goals = vec![goal("Viagem", dec!(2000), dec!(1500))]; // remaining 500
    let insights = evaluate(&agg, &[], &goals);
    let suggestion = insights
        .iter()
        .find(|i| i.kind == InsightKind::SurplusContribution)
        .unwrap();
    assert_eq!(suggestion.impact_amount, dec!(500));
}

#[test]
fn test_surplus_contribution_floor() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(1100);
    agg.expense_total = dec!(1000); // surplus exactly 100: not enough

    let goals = vec![goal("Viagem", dec!(2000), dec!(100))];
    let insights = evaluate(&agg, &[], &goals);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::SurplusContribution));
}

// ── Goal celebration ──────────────────────────────────────────

#[test]
fn test_goal_celebration_at_92_percent() {
    let goals = vec![goal("Viagem", dec!(10000), dec!(9200))];
    let insights = evaluate(&empty_aggregates(), &[], &goals);
    let celebration = insights
        .iter()
        .find(|i| i.kind == InsightKind::GoalAlmostThere)
        .unwrap();
    assert_eq!(celebration.impact_amount, dec!(800));
    assert!(celebration.description.contains("$800.00"));
}

#[test]
fn test_goal_celebration_window() {
    // 89%: below the window
    let goals = vec![goal("A", dec!(1000), dec!(890))];
    let insights = evaluate(&empty_aggregates(), &[], &goals);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::GoalAlmostThere));

    // 100%: completed, no celebration insight
    let goals = vec![goal("B", dec!(1000), dec!(1000))];
    let insights = evaluate(&empty_aggregates(), &[], &goals);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::GoalAlmostThere));

    // exactly 90%: in the window
    let goals = vec![goal("C", dec!(1000), dec!(900))];
    let insights = evaluate(&empty_aggregates(), &[], &goals);
    assert!(insights
        .iter()
        .any(|i| i.kind == InsightKind::GoalAlmostThere));
}

// ── Unplanned leak ────────────────────────────────────────────

#[test]
fn test_unplanned_leak_annualizes() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(3000);
    agg.unplanned_total = dec!(500); // > 15% of 3000 (450)

    let insights = evaluate(&agg, &[], &[]);
    let leak = insights
        .iter()
        .find(|i| i.kind == InsightKind::UnplannedLeak)
        .unwrap();
    assert_eq!(leak.impact_amount, dec!(6000));
    assert_eq!(leak.priority, Priority::Critical);
}

#[test]
fn test_unplanned_leak_below_threshold() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(3000);
    agg.unplanned_total = dec!(450); // exactly 15%: not a leak

    let insights = evaluate(&agg, &[], &[]);
    assert!(!insights.iter().any(|i| i.kind == InsightKind::UnplannedLeak));
}

#[test]
fn test_unplanned_leak_requires_income() {
    let mut agg = empty_aggregates();
    agg.unplanned_total = dec!(500);

    let insights = evaluate(&agg, &[], &[]);
    assert!(!insights.iter().any(|i| i.kind == InsightKind::UnplannedLeak));
}

// ── Weekend pattern ───────────────────────────────────────────

#[test]
fn test_weekend_pattern_estimate() {
    let mut agg = empty_aggregates();
    agg.weekday_total = dec!(100);
    agg.weekend_total = dec!(70); // > 60% of weekday

    let insights = evaluate(&agg, &[], &[]);
    let pattern = insights
        .iter()
        .find(|i| i.kind == InsightKind::WeekendPattern)
        .unwrap();
    // 20% of 70, annualized: 70 * 0.20 * 12 = 168
    assert_eq!(pattern.impact_amount, dec!(168.00));
    assert_eq!(pattern.priority, Priority::Medium);
}

#[test]
fn test_weekend_pattern_below_ratio() {
    let mut agg = empty_aggregates();
    agg.weekday_total = dec!(100);
    agg.weekend_total = dec!(60); // exactly 60%: no insight

    let insights = evaluate(&agg, &[], &[]);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::WeekendPattern));
}

#[test]
fn test_weekend_pattern_requires_weekday_base() {
    let mut agg = empty_aggregates();
    agg.weekend_total = dec!(500);

    let insights = evaluate(&agg, &[], &[]);
    assert!(!insights
        .iter()
        .any(|i| i.kind == InsightKind::WeekendPattern));
}

// ── Engine behavior ───────────────────────────────────────────

#[test]
fn test_no_data_no_insights() {
    let insights = evaluate(&empty_aggregates(), &[], &[]);
    assert!(insights.is_empty());
}

#[test]
fn test_generated_insights_are_ranked() {
    let mut agg = empty_aggregates();
    agg.income_total = dec!(3000);
    agg.unplanned_total = dec!(600); // critical leak
    let budgets = vec![status("Lazer", dec!(300), dec!(350))]; // high overrun

    let insights = evaluate(&agg, &budgets, &[]);
    assert!(insights.len() >= 2);
    assert_eq!(insights[0].kind, InsightKind::UnplannedLeak);
    for window in insights.windows(2) {
        assert!(window[0].priority >= window[1].priority);
    }
}

#[test]
fn test_budget_statuses_join() {
    let mut agg = empty_aggregates();
    agg.spent_by_category.insert("Lazer".into(), dec!(120));

    let budgets = vec![
        crate::models::Budget::new(1, "Lazer".into(), "2024-01".into(), dec!(300)),
        crate::models::Budget::new(1, "Transporte".into(), "2024-01".into(), dec!(150)),
    ];
    let statuses = budget_statuses(&budgets, &agg);
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].spent, dec!(120));
    // No spending recorded: spent defaults to zero
    assert_eq!(statuses[1].spent, Decimal::ZERO);
}

#[test]
fn test_insight_serializes_to_json() {
    let insight = stub("x", Priority::Critical, dec!(42));
    let json = serde_json::to_string(&insight).unwrap();
    assert!(json.contains("\"priority\":\"critical\""));
    assert!(json.contains("\"impact_amount\""));
}
