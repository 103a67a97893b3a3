use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::error::GameError;

/// One of the two seats at the table. On the wire, players are the integers `1` and `2`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    /// The player numbered 1.
    #[default]
    One,
    /// The player numbered 2.
    Two,
}

impl Player {
    /// The opponent of `self`.
    pub fn other(&self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// The wire number of this player.
    pub fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(GameError::UnknownPlayer { value }),
        }
    }
}

impl From<Player> for u8 {
    fn from(value: Player) -> Self {
        value.number()
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.number())
    }
}
