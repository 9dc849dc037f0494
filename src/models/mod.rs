mod budget_item;
mod project;
mod role;

pub use budget_item::{BudgetCategory, BudgetItem, ItemId};
pub use project::Project;
pub use role::Role;

#[cfg(test)]
mod tests;
