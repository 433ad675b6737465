pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recurring_definitions (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id              INTEGER NOT NULL REFERENCES profiles(id),
    description          TEXT NOT NULL,
    amount               TEXT NOT NULL,
    kind                 TEXT NOT NULL DEFAULT 'expense',
    category             TEXT NOT NULL DEFAULT '',
    frequency            TEXT NOT NULL DEFAULT 'monthly',
    start_date           TEXT NOT NULL,
    end_date             TEXT,
    next_execution_date  TEXT NOT NULL,
    is_active            BOOLEAN NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_recurring_next ON recurring_definitions(next_execution_date);
CREATE INDEX IF NOT EXISTS idx_recurring_user ON recurring_definitions(user_id);

CREATE TABLE IF NOT EXISTS transactions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL REFERENCES profiles(id),
    description     TEXT NOT NULL,
    amount          TEXT NOT NULL,
    kind            TEXT NOT NULL DEFAULT 'expense',
    category        TEXT NOT NULL DEFAULT '',
    date            TEXT NOT NULL,
    classification  TEXT,
    planning        TEXT,
    recurring_id    INTEGER REFERENCES recurring_definitions(id),
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

CREATE TABLE IF NOT EXISTS budgets (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES profiles(id),
    category      TEXT NOT NULL,
    month         TEXT NOT NULL,
    limit_amount  TEXT NOT NULL,
    UNIQUE(user_id, category, month)
);

CREATE TABLE IF NOT EXISTS goals (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL REFERENCES profiles(id),
    name            TEXT NOT NULL,
    target_amount   TEXT NOT NULL,
    current_amount  TEXT NOT NULL DEFAULT '0',
    target_date     TEXT,
    celebrated_at   TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS goal_contributions (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    goal_id  INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
    user_id  INTEGER NOT NULL REFERENCES profiles(id),
    amount   TEXT NOT NULL,
    date     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_contributions_goal ON goal_contributions(goal_id);

CREATE TABLE IF NOT EXISTS installment_plans (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL REFERENCES profiles(id),
    description         TEXT NOT NULL,
    total_amount        TEXT NOT NULL,
    installment_amount  TEXT NOT NULL,
    total_installments  INTEGER NOT NULL,
    paid_installments   INTEGER NOT NULL DEFAULT 0,
    category            TEXT NOT NULL DEFAULT '',
    start_date          TEXT NOT NULL,
    is_active           BOOLEAN NOT NULL DEFAULT 1
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE transactions ADD COLUMN currency TEXT NOT NULL DEFAULT 'USD';"),
];
