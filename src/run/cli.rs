use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::{
    Budget, Classification, Frequency, Goal, GoalContribution, InstallmentPlan, PlanningStatus,
    RecurringDefinition, Transaction, TransactionKind,
};
use crate::util::{current_month, format_amount, today};
use crate::{aggregate, insights, recurring};

pub(crate) fn as_cli(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db, user_id),
        "list" | "ls" => cli_list(&args[2..], db, user_id),
        "edit" => cli_edit(&args[2..], db, user_id),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "budget" => cli_budget(&args[2..], db, user_id),
        "goal" => cli_goal(&args[2..], db, user_id),
        "installment" => cli_installment(&args[2..], db, user_id),
        "recurring" => cli_recurring(&args[2..], db, user_id),
        "summary" | "s" => cli_summary(&args[2..], db, user_id),
        "insights" | "i" => cli_insights(&args[2..], db, user_id),
        "export" => cli_export(&args[2..], db, user_id),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finsight {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Finsight — local-only personal finance tracker");
    println!();
    println!("Usage: finsight <command>");
    println!();
    println!("Commands:");
    println!("  add <income|expense> <amount> <category>");
    println!("    --desc <text>               Description (default: category name)");
    println!("    --date <YYYY-MM-DD>         Transaction date (default: today)");
    println!("    --fixed | --variable        Tag the expense classification");
    println!("    --planned | --unplanned     Tag the planning status");
    println!("  list [YYYY-MM]                List transactions");
    println!("    --category <name>           Only one category");
    println!("    --limit <n>                 At most n rows");
    println!("    --from / --to <YYYY-MM-DD>  Date range instead of a month");
    println!("  edit <id> [--amount] [--desc] [--category] [--date]");
    println!("    [--fixed|--variable] [--planned|--unplanned]");
    println!("  delete <id>                   Delete a transaction");
    println!("  budget set <category> <amount> [--month YYYY-MM]");
    println!("  budget list [YYYY-MM]         Budgets with spent amounts");
    println!("  budget update <id> <amount>   Change a budget limit");
    println!("  budget delete <id>");
    println!("  goal add <name> <target>      Create a savings goal");
    println!("  goal list                     List goals with progress");
    println!("  goal contribute <id> <amount> [--date YYYY-MM-DD]");
    println!("  goal contributions <goal-id>  List a goal's contributions");
    println!("  goal recontribute <contribution-id> <amount> [--date]");
    println!("  goal uncontribute <contribution-id>");
    println!("  goal delete <id>              Delete goal and its contributions");
    println!("  installment add <desc> <total> <count> <category> [--start]");
    println!("  installment list");
    println!("  installment pay <id>          Record one installment payment");
    println!("  installment update <id> <total>  Edit the plan total");
    println!("  recurring add <desc> <amount> <category> <frequency>");
    println!("    --income                    Materialize as income (default: expense)");
    println!("    --start <YYYY-MM-DD>        First execution date (default: today)");
    println!("    --end <YYYY-MM-DD>          Stop after this date");
    println!("  recurring list                List recurring definitions");
    println!("  recurring enable <id> / disable <id>");
    println!("  recurring run [--date YYYY-MM-DD] [--json]");
    println!("                                Materialize everything due");
    println!("  summary [YYYY-MM]             Print monthly financial summary");
    println!("  insights [YYYY-MM] [--json]   Ranked recommendations for a month");
    println!("  export [path] [--month YYYY-MM]  Export transactions to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_amount(s: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(s).with_context(|| format!("Invalid amount: {s}"))?;
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive: {s}");
    }
    Ok(amount)
}

fn parse_date(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {s}"))?;
    Ok(s.to_string())
}

fn parse_month(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month (expected YYYY-MM): {s}"))?;
    Ok(s.to_string())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: finsight add <income|expense> <amount> <category> [options]");
    }

    let kind = match args[0].as_str() {
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => anyhow::bail!("Expected 'income' or 'expense', got: {other}"),
    };
    let amount = parse_amount(&args[1])?;
    let category = args[2].clone();

    let description = flag_value(args, "--desc")
        .map(str::to_string)
        .unwrap_or_else(|| category.clone());
    let date = match flag_value(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let mut txn = Transaction::new(user_id, description, amount, kind, category, date);
    if has_flag(args, "--fixed") {
        txn.classification = Some(Classification::Fixed);
    } else if has_flag(args, "--variable") {
        txn.classification = Some(Classification::Variable);
    }
    if has_flag(args, "--planned") {
        txn.planning = Some(PlanningStatus::Planned);
    } else if has_flag(args, "--unplanned") {
        txn.planning = Some(PlanningStatus::Unplanned);
    }

    let id = db.insert_transaction(&txn)?;
    println!(
        "Recorded {} {} in {} ({}) [id {id}]",
        txn.kind,
        format_amount(txn.amount),
        txn.category,
        txn.date,
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let txns = match (flag_value(args, "--from"), flag_value(args, "--to")) {
        (Some(from), Some(to)) => {
            db.get_transactions_in_range(user_id, &parse_date(from)?, &parse_date(to)?)?
        }
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("--from and --to must be given together")
        }
        (None, None) => {
            let month = match args.first().filter(|a| !a.starts_with('-')) {
                Some(m) => parse_month(m)?,
                None => current_month(),
            };
            let category = flag_value(args, "--category");
            let limit = match flag_value(args, "--limit") {
                Some(n) => Some(
                    n.parse::<u32>()
                        .with_context(|| format!("Invalid limit: {n}"))?,
                ),
                None => None,
            };
            db.get_transactions(user_id, limit, category, Some(&month))?
        }
    };

    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<12} {:<24} {:>12} {:<8} Category",
        "ID", "Date", "Description", "Amount", "Kind"
    );
    println!("{}", "─".repeat(78));
    for txn in &txns {
        println!(
            "{:<5} {:<12} {:<24} {:>12} {:<8} {}",
            txn.id.unwrap_or(0),
            txn.date,
            txn.description,
            format_amount(txn.amount),
            txn.kind.as_str(),
            txn.category,
        );
    }

    let net: Decimal = txns.iter().map(Transaction::signed_amount).sum();
    let expense_count = txns.iter().filter(|t| t.is_expense()).count();
    println!();
    println!(
        "{} transaction(s), {} expense(s), net {}",
        txns.len(),
        expense_count,
        format_amount(net),
    );
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: finsight edit <id> [options]");
    }
    let id: i64 = args[0]
        .parse()
        .with_context(|| format!("Invalid transaction id: {}", args[0]))?;

    let mut txn = db
        .get_transactions(user_id, None, None, None)?
        .into_iter()
        .find(|t| t.id == Some(id))
        .ok_or_else(|| anyhow::anyhow!("Transaction {id} not found"))?;

    if let Some(a) = flag_value(args, "--amount") {
        txn.amount = parse_amount(a)?;
    }
    if let Some(d) = flag_value(args, "--desc") {
        txn.description = d.to_string();
    }
    if let Some(c) = flag_value(args, "--category") {
        txn.category = c.to_string();
    }
    if let Some(d) = flag_value(args, "--date") {
        txn.date = parse_date(d)?;
    }
    if has_flag(args, "--fixed") {
        txn.classification = Some(Classification::Fixed);
    } else if has_flag(args, "--variable") {
        txn.classification = Some(Classification::Variable);
    }
    if has_flag(args, "--planned") {
        txn.planning = Some(PlanningStatus::Planned);
    } else if has_flag(args, "--unplanned") {
        txn.planning = Some(PlanningStatus::Unplanned);
    }

    db.update_transaction(&txn)?;
    println!("Updated transaction {id}");
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: finsight delete <id>");
    }
    let id: i64 = args[0]
        .parse()
        .with_context(|| format!("Invalid transaction id: {}", args[0]))?;
    db.delete_transaction(id)?;
    println!("Deleted transaction {id}");
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight budget set <category> <amount> [--month YYYY-MM]");
            }
            let category = args[1].clone();
            let amount = parse_amount(&args[2])?;
            let month = match flag_value(args, "--month") {
                Some(m) => parse_month(m)?,
                None => current_month(),
            };

            let budget = Budget::new(user_id, category, month, amount);
            db.insert_budget(&budget)?;
            println!(
                "Budget set: {} {} for {}",
                budget.category,
                format_amount(budget.limit_amount),
                budget.month,
            );
            Ok(())
        }
        Some("list") => {
            let month = match args.get(1).filter(|a| !a.starts_with('-')) {
                Some(m) => parse_month(m)?,
                None => current_month(),
            };
            let budgets = db.get_budgets(user_id, &month)?;
            if budgets.is_empty() {
                println!("No budgets for {month}");
                return Ok(());
            }

            let txns = db.get_transactions(user_id, None, None, Some(&month))?;
            let aggregates = aggregate::aggregate(&txns);
            let statuses = insights::budget_statuses(&budgets, &aggregates);

            println!("Budgets — {month}");
            println!("{}", "─".repeat(55));
            for status in &statuses {
                println!(
                    "  {:<20} {:>12} / {:>12}",
                    status.category,
                    format_amount(status.spent),
                    format_amount(status.budgeted),
                );
            }
            Ok(())
        }
        Some("update") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight budget update <id> <amount>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid budget id: {}", args[1]))?;
            let amount = parse_amount(&args[2])?;
            db.update_budget_amount(id, amount)?;
            println!("Budget {id} updated to {}", format_amount(amount));
            Ok(())
        }
        Some("delete") => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight budget delete <id>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid budget id: {}", args[1]))?;
            db.delete_budget(id)?;
            println!("Budget {id} deleted");
            Ok(())
        }
        _ => anyhow::bail!("Usage: finsight budget <set|list|update|delete>"),
    }
}

fn cli_goal(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight goal add <name> <target>");
            }
            let target = parse_amount(&args[2])?;
            let goal = Goal::new(user_id, args[1].clone(), target);
            let id = db.insert_goal(&goal)?;
            println!(
                "Goal '{}' created with target {} [id {id}]",
                goal.name,
                format_amount(goal.target_amount),
            );
            Ok(())
        }
        Some("list") => {
            let goals = db.get_goals(user_id)?;
            if goals.is_empty() {
                println!("No goals");
                return Ok(());
            }
            println!("{:<4} {:<20} {:>12} {:>12} {:>9}", "ID", "Name", "Saved", "Target", "Progress");
            println!("{}", "─".repeat(62));
            for goal in &goals {
                println!(
                    "{:<4} {:<20} {:>12} {:>12} {:>8}%",
                    goal.id.unwrap_or(0),
                    goal.name,
                    format_amount(goal.current_amount),
                    format_amount(goal.target_amount),
                    aggregate::percent_of(goal.current_amount, goal.target_amount).round_dp(0),
                );
            }
            Ok(())
        }
        Some("contribute") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight goal contribute <goal-id> <amount> [--date]");
            }
            let goal_id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid goal id: {}", args[1]))?;
            let amount = parse_amount(&args[2])?;
            let date = match flag_value(args, "--date") {
                Some(d) => parse_date(d)?,
                None => today(),
            };

            db.get_goal_by_id(goal_id)?
                .ok_or_else(|| anyhow::anyhow!("Goal {goal_id} not found"))?;

            let contribution = GoalContribution::new(goal_id, user_id, amount, date);
            db.insert_contribution(&contribution)?;

            // Re-read: the stored total is recomputed on every write.
            let goal = db
                .get_goal_by_id(goal_id)?
                .ok_or_else(|| anyhow::anyhow!("Goal {goal_id} not found"))?;
            println!(
                "Contributed {} to '{}' — now {} of {} ({}%)",
                format_amount(amount),
                goal.name,
                format_amount(goal.current_amount),
                format_amount(goal.target_amount),
                aggregate::percent_of(goal.current_amount, goal.target_amount).round_dp(0),
            );
            if goal.current_amount >= goal.target_amount && goal.celebrated_at.is_none() {
                db.set_goal_celebrated(goal_id, &chrono::Utc::now().to_rfc3339())?;
                println!("'{}' is fully funded!", goal.name);
            }
            Ok(())
        }
        Some("contributions") => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight goal contributions <goal-id>");
            }
            let goal_id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid goal id: {}", args[1]))?;
            let contributions = db.get_contributions(goal_id)?;
            if contributions.is_empty() {
                println!("No contributions for goal {goal_id}");
                return Ok(());
            }
            println!("{:<5} {:<12} Amount", "ID", "Date");
            println!("{}", "─".repeat(32));
            for c in &contributions {
                println!(
                    "{:<5} {:<12} {}",
                    c.id.unwrap_or(0),
                    c.date,
                    format_amount(c.amount),
                );
            }
            Ok(())
        }
        Some("recontribute") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight goal recontribute <contribution-id> <amount> [--date]");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid contribution id: {}", args[1]))?;
            let amount = parse_amount(&args[2])?;
            let date = match flag_value(args, "--date") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            db.update_contribution(id, amount, &date)?;
            println!("Contribution {id} updated to {}", format_amount(amount));
            Ok(())
        }
        Some("uncontribute") => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight goal uncontribute <contribution-id>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid contribution id: {}", args[1]))?;
            db.delete_contribution(id)?;
            println!("Contribution {id} removed");
            Ok(())
        }
        Some("delete") => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight goal delete <id>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid goal id: {}", args[1]))?;
            db.delete_goal(id)?;
            println!("Goal {id} deleted");
            Ok(())
        }
        _ => anyhow::bail!(
            "Usage: finsight goal <add|list|contribute|contributions|recontribute|uncontribute|delete>"
        ),
    }
}

fn cli_installment(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            if args.len() < 5 {
                anyhow::bail!(
                    "Usage: finsight installment add <desc> <total> <count> <category> [--start]"
                );
            }
            let total = parse_amount(&args[2])?;
            let count: i64 = args[3]
                .parse()
                .with_context(|| format!("Invalid installment count: {}", args[3]))?;
            if count <= 0 {
                anyhow::bail!("Installment count must be positive: {count}");
            }
            let start = match flag_value(args, "--start") {
                Some(d) => parse_date(d)?,
                None => today(),
            };

            let plan = InstallmentPlan::new(
                user_id,
                args[1].clone(),
                total,
                count,
                args[4].clone(),
                start,
            );
            let id = db.insert_installment_plan(&plan)?;
            println!(
                "Installment plan '{}' created: {} x {} [id {id}]",
                plan.description,
                count,
                format_amount(plan.installment_amount),
            );
            Ok(())
        }
        Some("list") => {
            let plans = db.get_installment_plans(user_id)?;
            if plans.is_empty() {
                println!("No installment plans");
                return Ok(());
            }
            println!(
                "{:<4} {:<20} {:>12} {:>12} {:>7} {:>5} Status",
                "ID", "Description", "Total", "Per pay", "Paid", "Left"
            );
            println!("{}", "─".repeat(74));
            for plan in &plans {
                let status = if plan.is_paid_off() {
                    "paid"
                } else if plan.is_active {
                    "active"
                } else {
                    "disabled"
                };
                println!(
                    "{:<4} {:<20} {:>12} {:>12} {:>4}/{:<2} {:>5} {}",
                    plan.id.unwrap_or(0),
                    plan.description,
                    format_amount(plan.total_amount),
                    format_amount(plan.installment_amount),
                    plan.paid_installments,
                    plan.total_installments,
                    plan.remaining_installments(),
                    status,
                );
            }
            Ok(())
        }
        Some("pay") => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight installment pay <id>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid plan id: {}", args[1]))?;
            db.record_installment_payment(id)?;
            println!("Payment recorded on plan {id}");
            Ok(())
        }
        Some("update") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: finsight installment update <id> <total>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid plan id: {}", args[1]))?;
            let total = parse_amount(&args[2])?;
            db.update_installment_total(id, total)?;
            println!("Plan {id} total updated to {}", format_amount(total));
            Ok(())
        }
        _ => anyhow::bail!("Usage: finsight installment <add|list|pay|update>"),
    }
}

fn cli_recurring(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            if args.len() < 5 {
                anyhow::bail!(
                    "Usage: finsight recurring add <desc> <amount> <category> <frequency> [options]"
                );
            }
            let amount = parse_amount(&args[2])?;
            let frequency = Frequency::parse(&args[4]).ok_or_else(|| {
                let options: Vec<&str> = Frequency::all().iter().map(Frequency::as_str).collect();
                anyhow::anyhow!(
                    "Unknown frequency '{}' (expected one of: {})",
                    args[4],
                    options.join(", ")
                )
            })?;
            let kind = if has_flag(args, "--income") {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let start = match flag_value(args, "--start") {
                Some(d) => parse_date(d)?,
                None => today(),
            };

            let mut def = RecurringDefinition::new(
                user_id,
                args[1].clone(),
                amount,
                kind,
                args[3].clone(),
                frequency,
                start,
            );
            if let Some(end) = flag_value(args, "--end") {
                def.end_date = Some(parse_date(end)?);
            }

            let id = db.insert_recurring(&def)?;
            println!(
                "Recurring {} '{}' {} {} [id {id}], next on {}",
                def.kind,
                def.description,
                format_amount(def.amount),
                def.frequency,
                def.next_execution_date,
            );
            Ok(())
        }
        Some("list") => {
            let defs = db.get_recurring(user_id)?;
            if defs.is_empty() {
                println!("No recurring definitions");
                return Ok(());
            }
            println!(
                "{:<4} {:<20} {:>12} {:<12} {:<12} Active",
                "ID", "Description", "Amount", "Frequency", "Next"
            );
            println!("{}", "─".repeat(70));
            for def in &defs {
                println!(
                    "{:<4} {:<20} {:>12} {:<12} {:<12} {}",
                    def.id.unwrap_or(0),
                    def.description,
                    format_amount(def.amount),
                    def.frequency.as_str(),
                    def.next_execution_date,
                    if def.is_active { "yes" } else { "no" },
                );
            }
            Ok(())
        }
        Some("run") => {
            let run_date = match flag_value(args, "--date") {
                Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {d}"))?,
                None => chrono::Local::now().date_naive(),
            };

            let summary = recurring::process_due(db, run_date)?;
            if has_flag(args, "--json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!(
                "Processed {} definition(s), created {} transaction(s)",
                summary.processed_count,
                summary.created_transaction_ids.len(),
            );
            for failure in &summary.failures {
                eprintln!(
                    "  Definition {} failed: {}",
                    failure.definition_id, failure.error
                );
            }
            if !summary.failures.is_empty() {
                println!(
                    "{} definition(s) failed and remain due; rerun after fixing them",
                    summary.failures.len(),
                );
            }
            Ok(())
        }
        Some(action @ ("enable" | "disable")) => {
            if args.len() < 2 {
                anyhow::bail!("Usage: finsight recurring {action} <id>");
            }
            let id: i64 = args[1]
                .parse()
                .with_context(|| format!("Invalid definition id: {}", args[1]))?;
            db.set_recurring_active(id, action == "enable")?;
            println!("Recurring definition {id} {action}d");
            Ok(())
        }
        _ => anyhow::bail!("Usage: finsight recurring <add|list|enable|disable|run>"),
    }
}

fn cli_summary(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let month = match args.first().filter(|a| !a.starts_with('-')) {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };

    let txns = db.get_transactions(user_id, None, None, Some(&month))?;
    let agg = aggregate::aggregate(&txns);

    println!("Finsight — {month}");
    println!("{}", "─".repeat(40));
    println!("  Income:     {}", format_amount(agg.income_total));
    println!("  Expenses:   {}", format_amount(agg.expense_total));
    println!("  Net:        {}", format_amount(agg.surplus()));
    println!();
    println!("  Fixed:      {}", format_amount(agg.fixed_total));
    println!("  Variable:   {}", format_amount(agg.variable_total));
    println!("  Planned:    {}", format_amount(agg.planned_total));
    println!("  Unplanned:  {}", format_amount(agg.unplanned_total));
    println!("  Weekday:    {}", format_amount(agg.weekday_total));
    println!("  Weekend:    {}", format_amount(agg.weekend_total));

    if !agg.spent_by_category.is_empty() {
        let mut spending: Vec<(&String, &Decimal)> = agg.spent_by_category.iter().collect();
        spending.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        println!();
        println!("Spending by Category:");
        for (category, amount) in spending {
            println!("  {category:<24} {}", format_amount(*amount));
        }
    }

    Ok(())
}

fn cli_insights(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let month = match args.first().filter(|a| !a.starts_with('-')) {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };

    let txns = db.get_transactions(user_id, None, None, Some(&month))?;
    let aggregates = aggregate::aggregate(&txns);
    let budgets = db.get_budgets(user_id, &month)?;
    let statuses = insights::budget_statuses(&budgets, &aggregates);
    let goals = db.get_goals(user_id)?;

    let ctx = insights::RuleContext {
        aggregates: &aggregates,
        budgets: &statuses,
        goals: &goals,
    };
    let results = insights::generate(&ctx);
    log::info!("{} insight(s) generated for {month}", results.len());

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No insights for {month}");
        return Ok(());
    }

    println!("Insights — {month}");
    println!("{}", "─".repeat(40));
    for insight in &results {
        println!("[{}] {}", insight.priority.as_str().to_uppercase(), insight.title);
        println!("  {}", insight.description);
        println!(
            "  → {} (impact {})",
            insight.action_label,
            format_amount(insight.impact_amount),
        );
        println!();
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let month = match flag_value(args, "--month") {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };

    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/finsight-export-{month}.csv")
        });

    let count = db.export_to_csv(&output_path, user_id, Some(&month))?;
    if count == 0 {
        println!("No transactions for {month}");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}
