use serde::{Deserialize, Serialize};

/// Whether the guest has already paid their line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStatus {
    #[serde(alias = "Abono")]
    Paid,
    #[serde(alias = "No Abono")]
    Unpaid,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" | "abono" => Some(Self::Paid),
            "unpaid" | "no abono" => Some(Self::Unpaid),
            _ => None,
        }
    }
}
