use serde::{Deserialize, Serialize};

/// How a guest settles their line. Cash carries the house discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(alias = "Efectivo")]
    Cash,
    #[serde(alias = "Tarjeta")]
    Card,
    #[serde(alias = "Otro")]
    Other,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Other]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive; accepts the English names and the Spanish labels
    /// the venue's staff are used to.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" | "efectivo" => Some(Self::Cash),
            "card" | "tarjeta" => Some(Self::Card),
            "other" | "otro" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn is_discounted(&self) -> bool {
        matches!(self, Self::Cash)
    }
}
