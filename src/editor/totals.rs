use rust_decimal::Decimal;

use crate::models::{BudgetCategory, BudgetItem};

/// Sum of every item's total price.
pub(crate) fn aggregate_total(items: &[BudgetItem]) -> Decimal {
    items.iter().map(|i| i.total_price).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CategoryTotals {
    pub(crate) personnel: Decimal,
    pub(crate) operating: Decimal,
    pub(crate) miscellaneous: Decimal,
}

impl CategoryTotals {
    pub(crate) fn from_items(items: &[BudgetItem]) -> Self {
        let mut totals = Self::default();
        for item in items {
            *totals.slot(item.category) += item.total_price;
        }
        totals
    }

    pub(crate) fn get(&self, category: BudgetCategory) -> Decimal {
        match category {
            BudgetCategory::Personnel => self.personnel,
            BudgetCategory::Operating => self.operating,
            BudgetCategory::Miscellaneous => self.miscellaneous,
        }
    }

    pub(crate) fn total(&self) -> Decimal {
        self.personnel + self.operating + self.miscellaneous
    }

    fn slot(&mut self, category: BudgetCategory) -> &mut Decimal {
        match category {
            BudgetCategory::Personnel => &mut self.personnel,
            BudgetCategory::Operating => &mut self.operating,
            BudgetCategory::Miscellaneous => &mut self.miscellaneous,
        }
    }
}
