use std::num::NonZero;

use serde::{Deserialize, Serialize};
use serde_json::Number;

type Coord = usize;
pub(crate) type Dimension = NonZero<Coord>;

/// A cell `(x, y)` on a builder's rectangular grid. The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

/// Where a cell is drawn, as the two-element array `[x, y]`.
///
/// Positions only matter for rendering; scoring looks at adjacency alone.
/// Any JSON numbers are accepted, negative and fractional included, and written back exactly as they were read.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Number, pub Number);

impl Position {
    /// A position from finite coordinates, or `None` if either is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        Some(Self(Number::from_f64(x)?, Number::from_f64(y)?))
    }

    /// The horizontal coordinate.
    pub fn x(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }

    /// The vertical coordinate, growing downwards.
    pub fn y(&self) -> f64 {
        self.1.as_f64().unwrap_or_default()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self(Number::from(0u8), Number::from(0u8))
    }
}

impl From<Location> for Position {
    fn from(location: Location) -> Self {
        Self(Number::from(location.0), Number::from(location.1))
    }
}
