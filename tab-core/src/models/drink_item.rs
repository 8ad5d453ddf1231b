use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrinkItem {
    #[serde(alias = "Agua")]
    Water,
    #[serde(alias = "Gaseosa")]
    Soda,
    #[serde(alias = "Vino")]
    Wine,
}

impl DrinkItem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Soda => "Soda",
            Self::Wine => "Wine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" | "agua" => Some(Self::Water),
            "soda" | "gaseosa" => Some(Self::Soda),
            "wine" | "vino" => Some(Self::Wine),
            _ => None,
        }
    }
}
