use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BudgetItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Externally approved figure. Informational; never reconciled with the plan.
    pub approved_amount: Decimal,
    pub budget_items: Vec<BudgetItem>,
    pub created_at: String,
}

impl Project {
    pub fn new(name: String, approved_amount: Decimal) -> Self {
        Self {
            id: format!("p-{}", uuid::Uuid::new_v4()),
            name,
            approved_amount,
            budget_items: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Find a project by exact ID, falling back to a case-insensitive name match.
    pub fn find<'a>(projects: &'a [Project], key: &str) -> Option<&'a Project> {
        if let Some(p) = projects.iter().find(|p| p.id == key) {
            return Some(p);
        }
        let lower = key.to_lowercase();
        projects.iter().find(|p| p.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
