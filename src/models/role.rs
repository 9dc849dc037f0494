#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Operator,
    Coach,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Operator => "Operator",
            Self::Coach => "Coach",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Some(Self::Admin),
            "operator" | "owner" => Some(Self::Operator),
            "coach" | "viewer" => Some(Self::Coach),
            _ => None,
        }
    }

    pub fn all() -> &'static [Role] {
        &[Self::Admin, Self::Operator, Self::Coach]
    }

    /// Coaches advise on a plan but never change it.
    pub fn can_edit_budget(&self) -> bool {
        matches!(self, Self::Admin | Self::Operator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
