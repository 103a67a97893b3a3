use std::hash::Hash;

use ndarray::Array2;
use strum::VariantArray;

use crate::location::Location;

/// Moves between orthogonally or otherwise regularly placed grid positions, used by grid builders to lay out adjacency.
pub trait Step: Sized + Copy + VariantArray + Eq + Hash + Ord {
    /// Where one step from `location` lands.
    ///
    /// Steps off the top or left edge wrap to an enormous coordinate, which every bounds check rejects.
    fn attempt_from(&self, location: Location) -> Location;

    /// The steps which land on a later cell in row-major order. Connecting every cell along these covers every adjacency exactly once.
    const FORWARD_VARIANTS: &'static [Self];

    /// Which single step leads from `a` to `b`, if any.
    fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|step| step.attempt_from(a) == b)
    }
}

/// Orthogonal steps on a rectangular grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray)]
pub enum SquareStep {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Step for SquareStep {
    fn attempt_from(&self, location: Location) -> Location {
        let delta = match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        };
        location.offset_by(delta)
    }

    const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];
}

/// Dump a character grid row by row, each row terminated by a newline.
pub(crate) fn print(grid: Array2<char>) -> String {
    let mut out = String::with_capacity(grid.nrows() * (grid.ncols() + 1));

    for row in grid.rows() {
        out.extend(row.iter());
        out.push('\n');
    }

    out
}
