use rust_decimal::Decimal;
use std::str::FromStr;

use super::EditError;
use crate::models::{BudgetCategory, BudgetItem};

/// The editable columns of a budget item, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemField {
    Category,
    Name,
    Quantity,
    Unit,
    UnitPrice,
    Description,
}

impl ItemField {
    pub(crate) fn all() -> &'static [ItemField] {
        &[
            Self::Category,
            Self::Name,
            Self::Quantity,
            Self::Unit,
            Self::UnitPrice,
            Self::Description,
        ]
    }

    pub(crate) fn key(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::UnitPrice => "unit_price",
            Self::Description => "description",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Name => "Name",
            Self::Quantity => "Qty",
            Self::Unit => "Unit",
            Self::UnitPrice => "Unit Price",
            Self::Description => "Description",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "category" | "cat" => Some(Self::Category),
            "name" => Some(Self::Name),
            "quantity" | "qty" => Some(Self::Quantity),
            "unit" => Some(Self::Unit),
            "unit_price" | "unitprice" | "price" => Some(Self::UnitPrice),
            "description" | "desc" => Some(Self::Description),
            _ => None,
        }
    }

    /// Whether an edit to this field recomputes the item's total.
    pub(crate) fn affects_total(&self) -> bool {
        matches!(self, Self::Quantity | Self::UnitPrice)
    }

    /// Convert raw text from an input layer into a typed value for this field.
    pub(crate) fn parse_input(self, raw: &str) -> Result<FieldValue, EditError> {
        let value = match self {
            Self::Category => FieldValue::Category(BudgetCategory::parse(raw).ok_or_else(
                || EditError::invalid(self, format!("unknown category '{}'", raw.trim())),
            )?),
            Self::Name => FieldValue::Name(raw.to_string()),
            Self::Unit => FieldValue::Unit(raw.to_string()),
            Self::Description => FieldValue::Description(raw.to_string()),
            Self::Quantity => FieldValue::Quantity(parse_number(self, raw)?),
            Self::UnitPrice => FieldValue::UnitPrice(parse_number(self, raw)?),
        };
        value.validate()?;
        Ok(value)
    }

    /// The item's current value for this field, as the text an input box would start with.
    pub(crate) fn current_text(&self, item: &BudgetItem) -> String {
        match self {
            Self::Category => item.category.to_string(),
            Self::Name => item.name.clone(),
            Self::Quantity => item.quantity.normalize().to_string(),
            Self::Unit => item.unit.clone(),
            Self::UnitPrice => item.unit_price.normalize().to_string(),
            Self::Description => item.description.clone(),
        }
    }
}

impl std::fmt::Display for ItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A field paired with a value of the matching type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldValue {
    Category(BudgetCategory),
    Name(String),
    Quantity(Decimal),
    Unit(String),
    UnitPrice(Decimal),
    Description(String),
}

impl FieldValue {
    pub(crate) fn field(&self) -> ItemField {
        match self {
            Self::Category(_) => ItemField::Category,
            Self::Name(_) => ItemField::Name,
            Self::Quantity(_) => ItemField::Quantity,
            Self::Unit(_) => ItemField::Unit,
            Self::UnitPrice(_) => ItemField::UnitPrice,
            Self::Description(_) => ItemField::Description,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EditError> {
        match self {
            Self::Quantity(v) | Self::UnitPrice(v) if v.is_sign_negative() && !v.is_zero() => {
                Err(EditError::invalid(self.field(), "must not be negative"))
            }
            _ => Ok(()),
        }
    }

    /// A copy of `item` with this value set. Quantity and unit price edits
    /// recompute the total from the post-edit factors.
    pub(crate) fn apply_to(self, item: &BudgetItem) -> Result<BudgetItem, EditError> {
        self.validate()?;
        let field = self.field();
        let mut updated = item.clone();
        match self {
            Self::Category(c) => updated.category = c,
            Self::Name(s) => updated.name = s,
            Self::Quantity(q) => updated.quantity = q,
            Self::Unit(s) => updated.unit = s,
            Self::UnitPrice(p) => updated.unit_price = p,
            Self::Description(s) => updated.description = s,
        }
        if field.affects_total() {
            updated.total_price = updated
                .computed_total()
                .ok_or_else(|| EditError::invalid(field, "total price is not exactly representable"))?;
        }
        Ok(updated)
    }
}

/// Parse a user-typed amount such as `"1,200"`, `"$ 35.50"` or `"4"`.
pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn parse_number(field: ItemField, raw: &str) -> Result<Decimal, EditError> {
    parse_amount(raw)
        .ok_or_else(|| EditError::invalid(field, format!("'{}' is not a number", raw.trim())))
}
