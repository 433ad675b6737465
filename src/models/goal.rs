use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Goal {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    /// Recomputed projection of the contribution sum; the database layer
    /// rewrites it inside the same transaction as every contribution write.
    pub current_amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub target_date: Option<String>,
    pub celebrated_at: Option<String>,
    pub created_at: String,
}

impl Goal {
    pub fn new(user_id: i64, name: String, target_amount: Decimal) -> Self {
        Self {
            id: None,
            user_id,
            name,
            target_amount,
            current_amount: Decimal::ZERO,
            target_date: None,
            celebrated_at: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Progress ratio in [0, 1]; 0 when the target is zero.
    pub fn progress(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.current_amount / self.target_amount
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn is_underfunded(&self) -> bool {
        self.current_amount < self.target_amount
    }
}

#[derive(Debug, Clone)]
pub struct GoalContribution {
    pub id: Option<i64>,
    pub goal_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub date: String,
}

impl GoalContribution {
    pub fn new(goal_id: i64, user_id: i64, amount: Decimal, date: String) -> Self {
        Self {
            id: None,
            goal_id,
            user_id,
            amount,
            date,
        }
    }
}
