mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Profiles ──────────────────────────────────────────────

    pub(crate) fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO profiles (name, created_at) VALUES (?1, ?2)",
            params![profile.name, profile.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM profiles ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Profile {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions (user_id, description, amount, kind, category, date, classification, planning, recurring_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                txn.user_id,
                txn.description,
                txn.amount.to_string(),
                txn.kind.as_str(),
                txn.category,
                txn.date,
                txn.classification.as_ref().map(Classification::as_str),
                txn.planning.as_ref().map(PlanningStatus::as_str),
                txn.recurring_id,
                txn.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_transactions(
        &self,
        user_id: i64,
        limit: Option<u32>,
        category: Option<&str>,
        month: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, description, amount, kind, category, date,
                    classification, planning, recurring_id, created_at
             FROM transactions WHERE user_id = ?1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id)];

        if let Some(c) = category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(c.to_string()));
        }
        if let Some(m) = month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), txn_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transactions_in_range(
        &self,
        user_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, description, amount, kind, category, date,
                    classification, planning, recurring_id, created_at
             FROM transactions
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![user_id, from, to], txn_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_transaction(&self, txn: &Transaction) -> Result<()> {
        let id = txn
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a transaction without an id"))?;
        self.conn.execute(
            "UPDATE transactions
             SET description = ?1, amount = ?2, kind = ?3, category = ?4, date = ?5,
                 classification = ?6, planning = ?7
             WHERE id = ?8 AND user_id = ?9",
            params![
                txn.description,
                txn.amount.to_string(),
                txn.kind.as_str(),
                txn.category,
                txn.date,
                txn.classification.as_ref().map(Classification::as_str),
                txn.planning.as_ref().map(PlanningStatus::as_str),
                id,
                txn.user_id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Inserts a budget. At most one budget may exist per
    /// (user, category, month); a duplicate is a caller-facing error.
    pub(crate) fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO budgets (user_id, category, month, limit_amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                budget.user_id,
                budget.category,
                budget.month,
                budget.limit_amount.to_string(),
            ],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                anyhow::bail!(
                    "A budget for '{}' in {} already exists",
                    budget.category,
                    budget.month
                )
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_budget_amount(&self, id: i64, limit_amount: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE budgets SET limit_amount = ?1 WHERE id = ?2",
            params![limit_amount.to_string(), id],
        )?;
        Ok(())
    }

    pub(crate) fn get_budgets(&self, user_id: i64, month: &str) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, category, month, limit_amount
             FROM budgets WHERE user_id = ?1 AND month = ?2
             ORDER BY category",
        )?;
        let rows = stmt.query_map(params![user_id, month], |row| {
            let amt_str: String = row.get(4)?;
            Ok(Budget {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                category: row.get(2)?,
                month: row.get(3)?,
                limit_amount: Decimal::from_str(&amt_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Goals & contributions ─────────────────────────────────

    pub(crate) fn insert_goal(&self, goal: &Goal) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO goals (user_id, name, target_amount, current_amount, target_date, celebrated_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.user_id,
                goal.name,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.target_date,
                goal.celebrated_at,
                goal.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, celebrated_at, created_at
             FROM goals WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], goal_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_goal_by_id(&self, id: i64) -> Result<Option<Goal>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, celebrated_at, created_at
             FROM goals WHERE id = ?1",
            params![id],
            goal_from_row,
        );
        match result {
            Ok(g) => Ok(Some(g)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn set_goal_celebrated(&self, id: i64, at: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE goals SET celebrated_at = ?1 WHERE id = ?2",
            params![at, id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_goal(&self, id: i64) -> Result<()> {
        // Contributions cascade via the schema's ON DELETE CASCADE
        self.conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Inserts a contribution and recomputes the goal total in the same
    /// SQL transaction. `goals.current_amount` is always the contribution
    /// sum, never an incrementally patched value.
    pub(crate) fn insert_contribution(&mut self, contribution: &GoalContribution) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO goal_contributions (goal_id, user_id, amount, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                contribution.goal_id,
                contribution.user_id,
                contribution.amount.to_string(),
                contribution.date,
            ],
        )?;
        let id = tx.last_insert_rowid();
        recompute_goal_total(&tx, contribution.goal_id)?;
        tx.commit()?;
        Ok(id)
    }

    pub(crate) fn update_contribution(&mut self, id: i64, amount: Decimal, date: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let goal_id: i64 = tx.query_row(
            "SELECT goal_id FROM goal_contributions WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE goal_contributions SET amount = ?1, date = ?2 WHERE id = ?3",
            params![amount.to_string(), date, id],
        )?;
        recompute_goal_total(&tx, goal_id)?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn delete_contribution(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let goal_id: i64 = tx.query_row(
            "SELECT goal_id FROM goal_contributions WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        tx.execute(
            "DELETE FROM goal_contributions WHERE id = ?1",
            params![id],
        )?;
        recompute_goal_total(&tx, goal_id)?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn get_contributions(&self, goal_id: i64) -> Result<Vec<GoalContribution>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, goal_id, user_id, amount, date
             FROM goal_contributions WHERE goal_id = ?1
             ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![goal_id], |row| {
            let amt_str: String = row.get(3)?;
            Ok(GoalContribution {
                id: Some(row.get(0)?),
                goal_id: row.get(1)?,
                user_id: row.get(2)?,
                amount: Decimal::from_str(&amt_str).unwrap_or_default(),
                date: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Recurring definitions ─────────────────────────────────

    pub(crate) fn insert_recurring(&self, def: &RecurringDefinition) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO recurring_definitions
             (user_id, description, amount, kind, category, frequency, start_date, end_date, next_execution_date, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                def.user_id,
                def.description,
                def.amount.to_string(),
                def.kind.as_str(),
                def.category,
                def.frequency.as_str(),
                def.start_date,
                def.end_date,
                def.next_execution_date,
                def.is_active,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_recurring(&self, user_id: i64) -> Result<Vec<RecurringDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, description, amount, kind, category, frequency,
                    start_date, end_date, next_execution_date, is_active
             FROM recurring_definitions WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], recurring_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Definitions due on `today` (ISO date), across all profiles:
    /// active, next execution at or before today, and not yet ended.
    pub(crate) fn get_due_recurring(&self, today: &str) -> Result<Vec<RecurringDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, description, amount, kind, category, frequency,
                    start_date, end_date, next_execution_date, is_active
             FROM recurring_definitions
             WHERE is_active = 1
               AND next_execution_date <= ?1
               AND (end_date IS NULL OR end_date >= ?1)
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![today], recurring_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_next_execution(&self, id: i64, next: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE recurring_definitions SET next_execution_date = ?1 WHERE id = ?2",
            params![next, id],
        )?;
        Ok(())
    }

    pub(crate) fn set_recurring_active(&self, id: i64, active: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE recurring_definitions SET is_active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(())
    }

    /// Deactivates definitions whose end date has passed. Returns how many
    /// were expired.
    pub(crate) fn deactivate_expired_recurring(&self, today: &str) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE recurring_definitions SET is_active = 0
             WHERE is_active = 1 AND end_date IS NOT NULL AND end_date < ?1",
            params![today],
        )?;
        Ok(changed)
    }

    // ── Installment plans ─────────────────────────────────────

    pub(crate) fn insert_installment_plan(&self, plan: &InstallmentPlan) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO installment_plans
             (user_id, description, total_amount, installment_amount, total_installments, paid_installments, category, start_date, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                plan.user_id,
                plan.description,
                plan.total_amount.to_string(),
                plan.installment_amount.to_string(),
                plan.total_installments,
                plan.paid_installments,
                plan.category,
                plan.start_date,
                plan.is_active,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_installment_plans(&self, user_id: i64) -> Result<Vec<InstallmentPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, description, total_amount, installment_amount,
                    total_installments, paid_installments, category, start_date, is_active
             FROM installment_plans WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let total_str: String = row.get(3)?;
            let inst_str: String = row.get(4)?;
            Ok(InstallmentPlan {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                description: row.get(2)?,
                total_amount: Decimal::from_str(&total_str).unwrap_or_default(),
                installment_amount: Decimal::from_str(&inst_str).unwrap_or_default(),
                total_installments: row.get(5)?,
                paid_installments: row.get(6)?,
                category: row.get(7)?,
                start_date: row.get(8)?,
                is_active: row.get(9)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Edits the plan total without touching the installment_amount
    /// snapshot taken at creation time.
    pub(crate) fn update_installment_total(&self, id: i64, total_amount: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE installment_plans SET total_amount = ?1 WHERE id = ?2",
            params![total_amount.to_string(), id],
        )?;
        Ok(())
    }

    /// Records one installment payment; the plan deactivates once all
    /// installments are paid.
    pub(crate) fn record_installment_payment(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE installment_plans
             SET paid_installments = paid_installments + 1,
                 is_active = CASE WHEN paid_installments + 1 >= total_installments THEN 0 ELSE 1 END
             WHERE id = ?1 AND is_active = 1 AND paid_installments < total_installments",
            params![id],
        )?;
        if changed == 0 {
            anyhow::bail!("Installment plan {id} is not active or already paid off");
        }
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    pub(crate) fn export_to_csv(
        &self,
        path: &str,
        user_id: i64,
        month: Option<&str>,
    ) -> Result<usize> {
        let txns = self.get_transactions(user_id, None, None, month)?;
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        writer.write_record([
            "date",
            "description",
            "amount",
            "kind",
            "category",
            "classification",
            "planning",
        ])?;
        for txn in &txns {
            writer.write_record([
                txn.date.as_str(),
                txn.description.as_str(),
                &txn.amount.to_string(),
                txn.kind.as_str(),
                txn.category.as_str(),
                txn.classification
                    .as_ref()
                    .map(Classification::as_str)
                    .unwrap_or(""),
                txn.planning
                    .as_ref()
                    .map(PlanningStatus::as_str)
                    .unwrap_or(""),
            ])?;
        }
        writer.flush()?;
        Ok(txns.len())
    }
}

fn txn_from_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(3)?;
    let kind_str: String = row.get(4)?;
    let classification: Option<String> = row.get(7)?;
    let planning: Option<String> = row.get(8)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        kind: TransactionKind::parse(&kind_str),
        category: row.get(5)?,
        date: row.get(6)?,
        classification: classification.as_deref().and_then(Classification::parse),
        planning: planning.as_deref().and_then(PlanningStatus::parse),
        recurring_id: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn goal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let target_str: String = row.get(3)?;
    let current_str: String = row.get(4)?;
    Ok(Goal {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: Decimal::from_str(&target_str).unwrap_or_default(),
        current_amount: Decimal::from_str(&current_str).unwrap_or_default(),
        target_date: row.get(5)?,
        celebrated_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn recurring_from_row(row: &rusqlite::Row) -> rusqlite::Result<RecurringDefinition> {
    let amount_str: String = row.get(3)?;
    let kind_str: String = row.get(4)?;
    let freq_str: String = row.get(6)?;
    Ok(RecurringDefinition {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        kind: TransactionKind::parse(&kind_str),
        category: row.get(5)?,
        frequency: Frequency::parse(&freq_str).unwrap_or(Frequency::Monthly),
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        next_execution_date: row.get(9)?,
        is_active: row.get(10)?,
    })
}

/// Rewrites `goals.current_amount` from the contribution sum. Runs inside
/// the caller's transaction so the projection can never drift.
fn recompute_goal_total(tx: &rusqlite::Transaction, goal_id: i64) -> Result<()> {
    let mut stmt = tx.prepare("SELECT amount FROM goal_contributions WHERE goal_id = ?1")?;
    let rows = stmt.query_map(params![goal_id], |row| row.get::<_, String>(0))?;
    let mut total = Decimal::ZERO;
    for amount in rows {
        total += Decimal::from_str(&amount?).unwrap_or_default();
    }
    drop(stmt);
    tx.execute(
        "UPDATE goals SET current_amount = ?1 WHERE id = ?2",
        params![total.to_string(), goal_id],
    )?;
    Ok(())
}
