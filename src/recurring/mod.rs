use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Frequency, PlanningStatus, RecurringDefinition, Transaction};

/// Next occurrence for a schedule: purely calendar arithmetic.
///
/// When the day-of-month does not exist in the target month the date
/// clamps to the month's last valid day (Jan 31 + 1 month → Feb 29 in a
/// leap year), which keeps long-running schedules from drifting.
pub(crate) fn next_date(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    date.checked_add_months(Months::new(frequency.months()))
        .unwrap_or(date)
}

#[derive(Debug, Serialize)]
pub(crate) struct RunFailure {
    pub definition_id: i64,
    pub error: String,
}

/// Outcome of one processor invocation.
#[derive(Debug, Serialize)]
pub(crate) struct RunSummary {
    pub processed_count: usize,
    pub created_transaction_ids: Vec<i64>,
    pub failures: Vec<RunFailure>,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            processed_count: 0,
            created_transaction_ids: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Materializes every due recurring definition and advances its
/// schedule.
///
/// Each definition is handled independently: a failed insert or
/// schedule update is logged and recorded in the summary, and the batch
/// moves on. A successful firing advances `next_execution_date` past
/// `today`, so re-running on the same day materializes nothing new.
pub(crate) fn process_due(db: &mut Database, today: NaiveDate) -> Result<RunSummary> {
    let today_str = today.format("%Y-%m-%d").to_string();

    let expired = db.deactivate_expired_recurring(&today_str)?;
    if expired > 0 {
        log::info!("Deactivated {expired} expired recurring definition(s)");
    }

    let due = db.get_due_recurring(&today_str)?;
    log::info!("{} recurring definition(s) due on {today_str}", due.len());

    let mut summary = RunSummary::new();
    for def in &due {
        match fire_definition(db, def, &today_str) {
            Ok(txn_id) => {
                summary.processed_count += 1;
                summary.created_transaction_ids.push(txn_id);
            }
            Err(e) => {
                let id = def.id.unwrap_or(0);
                log::warn!("Recurring definition {id} failed: {e:#}");
                summary.failures.push(RunFailure {
                    definition_id: id,
                    error: format!("{e:#}"),
                });
            }
        }
    }

    log::info!(
        "Processed {} definition(s), {} failure(s)",
        summary.processed_count,
        summary.failures.len()
    );
    Ok(summary)
}

/// Materializes one definition: validates and advances the schedule,
/// inserts the transaction, then persists the new date. The transaction
/// is dated today, marked planned, and tagged with the definition that
/// produced it.
fn fire_definition(db: &Database, def: &RecurringDefinition, today_str: &str) -> Result<i64> {
    let def_id = def
        .id
        .ok_or_else(|| anyhow::anyhow!("Definition has no id"))?;

    let scheduled = NaiveDate::parse_from_str(&def.next_execution_date, "%Y-%m-%d")
        .with_context(|| {
            format!(
                "Definition {def_id} has an invalid next_execution_date '{}'",
                def.next_execution_date
            )
        })?;
    let next = next_date(scheduled, def.frequency);

    let mut txn = Transaction::new(
        def.user_id,
        def.description.clone(),
        def.amount,
        def.kind,
        def.category.clone(),
        today_str.to_string(),
    );
    txn.planning = Some(PlanningStatus::Planned);
    txn.recurring_id = Some(def_id);

    let txn_id = db
        .insert_transaction(&txn)
        .with_context(|| format!("Failed to materialize transaction for '{}'", def.description))?;

    db.update_next_execution(def_id, &next.format("%Y-%m-%d").to_string())
        .with_context(|| format!("Failed to advance schedule for definition {def_id}"))?;

    Ok(txn_id)
}
