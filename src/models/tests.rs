#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal, kind: TransactionKind) -> Transaction {
    Transaction::new(
        1,
        "Test".into(),
        amount,
        kind,
        "Groceries".into(),
        "2024-01-15".into(),
    )
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00), TransactionKind::Income);
    assert!(txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.signed_amount(), dec!(100.00));
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(50.00), TransactionKind::Expense);
    assert!(!txn.is_income());
    assert!(txn.is_expense());
    assert_eq!(txn.signed_amount(), dec!(-50.00));
}

#[test]
fn test_transaction_new_defaults() {
    let txn = make_txn(dec!(10), TransactionKind::Expense);
    assert!(txn.id.is_none());
    assert!(txn.classification.is_none());
    assert!(txn.planning.is_none());
    assert!(txn.recurring_id.is_none());
    assert!(!txn.created_at.is_empty());
}

#[test]
fn test_transaction_kind_parse() {
    assert_eq!(TransactionKind::parse("income"), TransactionKind::Income);
    assert_eq!(TransactionKind::parse("INCOME"), TransactionKind::Income);
    assert_eq!(TransactionKind::parse("expense"), TransactionKind::Expense);
    assert_eq!(TransactionKind::parse("anything"), TransactionKind::Expense);
}

#[test]
fn test_classification_parse() {
    assert_eq!(Classification::parse("fixed"), Some(Classification::Fixed));
    assert_eq!(
        Classification::parse("Variable"),
        Some(Classification::Variable)
    );
    assert_eq!(Classification::parse(""), None);
    assert_eq!(Classification::parse("other"), None);
}

#[test]
fn test_planning_status_parse() {
    assert_eq!(
        PlanningStatus::parse("planned"),
        Some(PlanningStatus::Planned)
    );
    assert_eq!(
        PlanningStatus::parse("UNPLANNED"),
        Some(PlanningStatus::Unplanned)
    );
    assert_eq!(PlanningStatus::parse(""), None);
}

// ── Goal ──────────────────────────────────────────────────────

#[test]
fn test_goal_progress() {
    let mut goal = Goal::new(1, "Viagem".into(), dec!(10000));
    assert_eq!(goal.progress(), Decimal::ZERO);
    assert_eq!(goal.remaining(), dec!(10000));
    assert!(goal.is_underfunded());

    goal.current_amount = dec!(9200);
    assert_eq!(goal.progress(), dec!(0.92));
    assert_eq!(goal.remaining(), dec!(800));
}

#[test]
fn test_goal_progress_zero_target() {
    let goal = Goal::new(1, "Empty".into(), Decimal::ZERO);
    assert_eq!(goal.progress(), Decimal::ZERO);
}

#[test]
fn test_goal_overfunded_remaining_clamps() {
    let mut goal = Goal::new(1, "Done".into(), dec!(100));
    goal.current_amount = dec!(150);
    assert_eq!(goal.remaining(), Decimal::ZERO);
    assert!(!goal.is_underfunded());
}

// ── Frequency ─────────────────────────────────────────────────

#[test]
fn test_frequency_parse() {
    assert_eq!(Frequency::parse("monthly"), Some(Frequency::Monthly));
    assert_eq!(Frequency::parse("BIMONTHLY"), Some(Frequency::Bimonthly));
    assert_eq!(Frequency::parse("quarterly"), Some(Frequency::Quarterly));
    assert_eq!(Frequency::parse("semiannual"), Some(Frequency::Semiannual));
    assert_eq!(Frequency::parse("semi-annual"), Some(Frequency::Semiannual));
    assert_eq!(Frequency::parse("annual"), Some(Frequency::Annual));
    assert_eq!(Frequency::parse("yearly"), Some(Frequency::Annual));
    assert_eq!(Frequency::parse("weekly"), None);
}

#[test]
fn test_frequency_months() {
    assert_eq!(Frequency::Monthly.months(), 1);
    assert_eq!(Frequency::Bimonthly.months(), 2);
    assert_eq!(Frequency::Quarterly.months(), 3);
    assert_eq!(Frequency::Semiannual.months(), 6);
    assert_eq!(Frequency::Annual.months(), 12);
}

#[test]
fn test_frequency_roundtrip() {
    for f in Frequency::all() {
        assert_eq!(Frequency::parse(f.as_str()), Some(*f));
    }
}

// ── RecurringDefinition ───────────────────────────────────────

#[test]
fn test_recurring_new_defaults() {
    let def = RecurringDefinition::new(
        1,
        "Rent".into(),
        dec!(1200),
        TransactionKind::Expense,
        "Housing".into(),
        Frequency::Monthly,
        "2024-01-01".into(),
    );
    assert!(def.id.is_none());
    assert!(def.is_active);
    assert!(def.end_date.is_none());
    // The first execution is the start date itself
    assert_eq!(def.next_execution_date, "2024-01-01");
}

// ── InstallmentPlan ───────────────────────────────────────────

#[test]
fn test_installment_amount_snapshot() {
    let plan = InstallmentPlan::new(
        1,
        "Sofa".into(),
        dec!(1200),
        12,
        "Home & Garden".into(),
        "2024-01-01".into(),
    );
    assert_eq!(plan.installment_amount, dec!(100));
    assert_eq!(plan.paid_installments, 0);
    assert_eq!(plan.remaining_installments(), 12);
    assert!(!plan.is_paid_off());
}

#[test]
fn test_installment_uneven_division() {
    let plan = InstallmentPlan::new(
        1,
        "Phone".into(),
        dec!(1000),
        3,
        "Electronics".into(),
        "2024-01-01".into(),
    );
    // Decimal division, not rounded to cents at this layer
    assert_eq!(plan.installment_amount.round_dp(2), dec!(333.33));
}

#[test]
fn test_installment_zero_installments() {
    let plan = InstallmentPlan::new(
        1,
        "Bad".into(),
        dec!(100),
        0,
        "Other".into(),
        "2024-01-01".into(),
    );
    assert_eq!(plan.installment_amount, Decimal::ZERO);
    assert!(plan.is_paid_off());
}

// ── Budget / Profile ──────────────────────────────────────────

#[test]
fn test_budget_new() {
    let budget = Budget::new(1, "Alimentação".into(), "2024-01".into(), dec!(500));
    assert!(budget.id.is_none());
    assert_eq!(budget.category, "Alimentação");
    assert_eq!(budget.month, "2024-01");
    assert_eq!(budget.limit_amount, dec!(500));
}

#[test]
fn test_profile_new() {
    let profile = Profile::new("Default".into());
    assert!(profile.id.is_none());
    assert_eq!(profile.name, "Default");
    assert!(!profile.created_at.is_empty());
}
