use serde::{Deserialize, Serialize};

/// Token from the fixed palette a roster draws its colors from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Blue,
    Green,
    Teal,
    Yellow,
    Orange,
    Purple,
}

/// Palette in seat order. Its length bounds the roster size.
pub const PALETTE: [PlayerColor; 6] = [
    PlayerColor::Blue,
    PlayerColor::Green,
    PlayerColor::Teal,
    PlayerColor::Yellow,
    PlayerColor::Orange,
    PlayerColor::Purple,
];

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Blue => "blue",
            PlayerColor::Green => "green",
            PlayerColor::Teal => "teal",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Orange => "orange",
            PlayerColor::Purple => "purple",
        }
    }

    /// Hex value rendered by clients
    pub fn hex(&self) -> &'static str {
        match self {
            PlayerColor::Blue => "#1E3A8A",
            PlayerColor::Green => "#166534",
            PlayerColor::Teal => "#115E59",
            PlayerColor::Yellow => "#854D0E",
            PlayerColor::Orange => "#C2410C",
            PlayerColor::Purple => "#6B21A8",
        }
    }

    /// Accepts either the token name or its hex value, case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        PALETTE
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.hex().eq_ignore_ascii_case(s))
    }

    /// Default color for a seat
    pub fn for_seat(index: usize) -> Option<Self> {
        PALETTE.get(index).copied()
    }
}

/// Player entity - one seat in a game's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub color: PlayerColor,
}

impl Player {
    pub fn new(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}
