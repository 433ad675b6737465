mod budget;
mod goal;
mod installment;
mod profile;
mod recurring;
mod transaction;

pub use budget::Budget;
pub use goal::{Goal, GoalContribution};
pub use installment::InstallmentPlan;
pub use profile::Profile;
pub use recurring::{Frequency, RecurringDefinition};
pub use transaction::{Classification, PlanningStatus, Transaction, TransactionKind};

#[cfg(test)]
mod tests;
