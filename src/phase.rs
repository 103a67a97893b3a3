use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::error::GameError;

/// Number of distinct phases; all phase arithmetic is performed modulo this.
pub const PHASE_COUNT: u8 = 8;

/// The offset between two phases which face each other across the cycle.
pub const OPPOSITE_OFFSET: u8 = PHASE_COUNT / 2;

/// A moon phase in `0..8`. Arithmetic on phases wraps, so `7` and `0` are adjacent.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Phase(u8);

/// The direction in which a chain walks around the phase cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Direction {
    /// Each step adds one, modulo [`PHASE_COUNT`].
    Increasing,
    /// Each step subtracts one, modulo [`PHASE_COUNT`].
    Decreasing,
}

impl Direction {
    // a step of -1 is the same as a step of +7 under mod 8
    fn delta(&self) -> u8 {
        match self {
            Self::Increasing => 1,
            Self::Decreasing => PHASE_COUNT - 1,
        }
    }
}

impl Phase {
    /// Construct a phase, or `None` if `value` is not in `0..8`.
    pub fn new(value: u8) -> Option<Self> {
        (value < PHASE_COUNT).then_some(Self(value))
    }

    /// The raw value of this phase.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The phase one step away from this one in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        Self((self.0 + direction.delta()) % PHASE_COUNT)
    }

    /// How far forward `other` lies from `self` on the cycle, in `0..8`.
    pub fn offset_to(self, other: Phase) -> u8 {
        (other.0 + PHASE_COUNT - self.0) % PHASE_COUNT
    }

    /// Whether the two phases are one step apart in either direction.
    pub fn is_adjacent(self, other: Phase) -> bool {
        matches!(self.offset_to(other), 1 | 7)
    }

    /// Whether the two phases sit directly across the cycle from each other.
    ///
    /// Four is the only offset which is its own inverse under mod 8, so this relation is symmetric.
    pub fn is_opposite(self, other: Phase) -> bool {
        self.offset_to(other) == OPPOSITE_OFFSET
    }

    /// Every phase, in increasing order.
    pub fn all() -> impl Iterator<Item = Phase> {
        (0..PHASE_COUNT).map(Self)
    }
}

impl TryFrom<u8> for Phase {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(GameError::PhaseOutOfRange { value })
    }
}

impl From<Phase> for u8 {
    fn from(value: Phase) -> Self {
        value.0
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
