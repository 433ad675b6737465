use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "income" => Self::Income,
            _ => Self::Expense,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an expense is structurally fixed (rent) or variable (discretionary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Fixed,
    Variable,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "variable" => Some(Self::Variable),
            _ => None,
        }
    }
}

/// Whether an expense was anticipated (planned) or impulsive (unplanned).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningStatus {
    Planned,
    Unplanned,
}

impl PlanningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Unplanned => "unplanned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "unplanned" => Some(Self::Unplanned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub user_id: i64,
    pub description: String,
    /// Always positive; direction is carried by `kind`.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    pub classification: Option<Classification>,
    pub planning: Option<PlanningStatus>,
    /// Set when this transaction was materialized from a recurring definition.
    pub recurring_id: Option<i64>,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        user_id: i64,
        description: String,
        amount: Decimal,
        kind: TransactionKind,
        category: String,
        date: String,
    ) -> Self {
        Self {
            id: None,
            user_id,
            description,
            amount,
            kind,
            category,
            date,
            classification: None,
            planning: None,
            recurring_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Signed amount: income positive, expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}
