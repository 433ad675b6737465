use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct InstallmentPlan {
    pub id: Option<i64>,
    pub user_id: i64,
    pub description: String,
    pub total_amount: Decimal,
    /// Snapshot of total_amount / total_installments taken at creation;
    /// never recomputed, even if total_amount is edited later.
    pub installment_amount: Decimal,
    pub total_installments: i64,
    pub paid_installments: i64,
    pub category: String,
    /// Format: "YYYY-MM-DD"
    pub start_date: String,
    pub is_active: bool,
}

impl InstallmentPlan {
    pub fn new(
        user_id: i64,
        description: String,
        total_amount: Decimal,
        total_installments: i64,
        category: String,
        start_date: String,
    ) -> Self {
        let installment_amount = if total_installments > 0 {
            total_amount / Decimal::from(total_installments)
        } else {
            Decimal::ZERO
        };
        Self {
            id: None,
            user_id,
            description,
            total_amount,
            installment_amount,
            total_installments,
            paid_installments: 0,
            category,
            start_date,
            is_active: true,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.paid_installments >= self.total_installments
    }

    pub fn remaining_installments(&self) -> i64 {
        (self.total_installments - self.paid_installments).max(0)
    }
}
