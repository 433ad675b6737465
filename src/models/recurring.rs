use rust_decimal::Decimal;

use crate::models::TransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Bimonthly => "bimonthly",
            Self::Quarterly => "quarterly",
            Self::Semiannual => "semiannual",
            Self::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "bimonthly" => Some(Self::Bimonthly),
            "quarterly" => Some(Self::Quarterly),
            "semiannual" | "semi-annual" => Some(Self::Semiannual),
            "annual" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }

    pub fn all() -> &'static [Frequency] {
        &[
            Self::Monthly,
            Self::Bimonthly,
            Self::Quarterly,
            Self::Semiannual,
            Self::Annual,
        ]
    }

    /// Step size in calendar months.
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Bimonthly => 2,
            Self::Quarterly => 3,
            Self::Semiannual => 6,
            Self::Annual => 12,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-authored template for a transaction that repeats on a schedule.
/// Never deleted automatically; deactivated when `end_date` passes or the
/// user disables it.
#[derive(Debug, Clone)]
pub struct RecurringDefinition {
    pub id: Option<i64>,
    pub user_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub frequency: Frequency,
    /// Format: "YYYY-MM-DD"
    pub start_date: String,
    pub end_date: Option<String>,
    /// The next date this definition is due to materialize a transaction.
    pub next_execution_date: String,
    pub is_active: bool,
}

impl RecurringDefinition {
    pub fn new(
        user_id: i64,
        description: String,
        amount: Decimal,
        kind: TransactionKind,
        category: String,
        frequency: Frequency,
        start_date: String,
    ) -> Self {
        Self {
            id: None,
            user_id,
            description,
            amount,
            kind,
            category,
            frequency,
            next_execution_date: start_date.clone(),
            start_date,
            end_date: None,
            is_active: true,
        }
    }
}
