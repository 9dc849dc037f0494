use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    Personnel,
    Operating,
    Miscellaneous,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personnel => "Personnel",
            Self::Operating => "Operating",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Key used in storage and CSV files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Personnel => "personnel",
            Self::Operating => "operating",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    /// The set is closed: unknown labels are rejected rather than mapped to a default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personnel" | "staff" => Some(Self::Personnel),
            "operating" | "ops" => Some(Self::Operating),
            "miscellaneous" | "misc" => Some(Self::Miscellaneous),
            _ => None,
        }
    }

    pub fn all() -> &'static [BudgetCategory] {
        &[Self::Personnel, Self::Operating, Self::Miscellaneous]
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Personnel => Self::Operating,
            Self::Operating => Self::Miscellaneous,
            Self::Miscellaneous => Self::Personnel,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Personnel => Self::Miscellaneous,
            Self::Operating => Self::Personnel,
            Self::Miscellaneous => Self::Operating,
        }
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// A fresh `bi-<uuid v4>` identifier.
    pub fn generate() -> Self {
        Self(format!("bi-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: ItemId,
    pub category: BudgetCategory,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    /// Always `quantity * unit_price` after an edit to either factor.
    pub total_price: Decimal,
    pub description: String,
}

impl BudgetItem {
    /// A blank personnel line: one unit at zero price.
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            category: BudgetCategory::Personnel,
            name: String::new(),
            quantity: Decimal::ONE,
            unit: String::new(),
            unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
            description: String::new(),
        }
    }

    /// `quantity * unit_price`, or `None` unless the product is representable
    /// exactly. `Decimal` multiplication rounds past 28 digits, so the product
    /// is built from the mantissas instead.
    pub fn computed_total(&self) -> Option<Decimal> {
        exact_product(self.quantity, self.unit_price)
            .or_else(|| exact_product(self.quantity.normalize(), self.unit_price.normalize()))
    }
}

const MAX_SCALE: u32 = 28;
const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

fn exact_product(a: Decimal, b: Decimal) -> Option<Decimal> {
    let mut mantissa = a.mantissa().checked_mul(b.mantissa())?;
    let mut scale = a.scale() + b.scale();
    // Trailing zeros can be dropped without losing anything.
    while scale > 0
        && mantissa % 10 == 0
        && (scale > MAX_SCALE || mantissa.unsigned_abs() > MAX_MANTISSA)
    {
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}
