use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category: String,
    /// Format: "YYYY-MM"
    pub month: String,
    pub limit_amount: Decimal,
}

impl Budget {
    pub fn new(user_id: i64, category: String, month: String, limit_amount: Decimal) -> Self {
        Self {
            id: None,
            user_id,
            category,
            month,
            limit_amount,
        }
    }
}
