use std::collections::HashSet;
use std::num::NonZero;

use itertools::Itertools;
use unordered_pair::UnorderedPair;

use crate::board::BoardGraph;
use crate::location::{Dimension, Location};
use crate::shape::{SquareStep, Step};

/// Why a builder refused to produce a board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A hole or wall referenced a location outside the board's dimensions.
    FeatureOutOfBounds,
}

/// Incremental construction of a [`BoardGraph`] on a grid.
///
/// Every method takes and returns `&mut Self` so calls can be chained. The first mistake is remembered,
/// after which further calls are ignored and [`Self::build`] reports it. Clone a builder to branch off variants of one board.
pub trait Builder: Clone {
    /// An empty builder for a grid `dims.0` cells wide and `dims.1` cells high.
    fn with_dims(dims: (Dimension, Dimension)) -> Self;
    /// Leave a hole at `location`: no cell is created there and nothing connects to it.
    ///
    /// Out-of-bounds locations invalidate the builder with [`BuilderInvalidReason::FeatureOutOfBounds`].
    fn drop_location(&mut self, location: Location) -> &mut Self;
    /// Put a wall between two neighboring locations so their cells are not connected.
    ///
    /// A pair which is not one step apart is ignored. Out-of-bounds locations invalidate the builder.
    fn disconnect(&mut self, locations: UnorderedPair<Location>) -> &mut Self;
    /// Wall off `location` in each of `directions`. Walls along the outside of the grid are skipped, since they exist anyway.
    fn disconnect_around(&mut self, location: Location, directions: Vec<SquareStep>) -> &mut Self;
    /// `None` while the builder is usable, otherwise the reasons it is not.
    fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>>;
    /// Produce the board: one named cell per non-hole location, connected to each orthogonal neighbor not behind a wall.
    fn build(&self) -> Result<BoardGraph, &Vec<BuilderInvalidReason>>;
}

/// A builder for rectangular boards of square cells with orthogonal adjacency.
///
/// Cells are named `square-{i}` where `i` is the row-major index of the cell, so a 5x5 board runs from `square-0` in the top left to `square-24` in the bottom right.
/// Holes keep their index; the names of the other cells do not shift.
#[derive(Clone)]
pub struct SquareBoardBuilder {
    // (width, height)
    dims: (Dimension, Dimension),
    invalid_reasons: Vec<BuilderInvalidReason>,
    walls: HashSet<UnorderedPair<Location>>,
    holes: HashSet<Location>,
}

/// Side length of the default board.
const DEFAULT_SIDE: Dimension = match NonZero::new(5) {
    Some(side) => side,
    None => panic!("default side must be nonzero"),
};

impl Default for SquareBoardBuilder {
    /// The standard 5x5 board.
    fn default() -> Self {
        Self::with_dims((DEFAULT_SIDE, DEFAULT_SIDE))
    }
}

impl SquareBoardBuilder {
    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }

    /// The name given to the cell at `location`.
    pub fn name_at(&self, location: Location) -> String {
        format!("square-{}", location.1 * self.dims.0.get() + location.0)
    }
}

impl Builder for SquareBoardBuilder {
    fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            invalid_reasons: Default::default(),
            walls: Default::default(),
            holes: Default::default(),
        }
    }

    fn drop_location(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.holes.insert(location);
        self
    }

    fn disconnect(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !(self.in_bounds(locations.0) && self.in_bounds(locations.1)) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        if SquareStep::direction_to(locations.0, locations.1).is_none() {
            return self;
        }

        self.walls.insert(locations);
        self
    }

    fn disconnect_around(&mut self, location: Location, directions: Vec<SquareStep>) -> &mut Self {
        for direction in directions.into_iter().unique() {
            let other = direction.attempt_from(location);
            // walls along the outer edge of the board are implied
            if self.in_bounds(location) && !self.in_bounds(other) {
                continue;
            }
            self.disconnect(UnorderedPair::from((location, other)));
        }

        self
    }

    fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        (!self.invalid_reasons.is_empty()).then_some(&self.invalid_reasons)
    }

    fn build(&self) -> Result<BoardGraph, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let locations = (0..self.dims.1.get())
            .cartesian_product(0..self.dims.0.get())
            .map(|(y, x)| Location(x, y))
            .filter(|location| !self.holes.contains(location))
            .collect_vec();

        let mut board = BoardGraph::new();
        for location in &locations {
            board.add_node(self.name_at(*location), *location);
        }

        for location in &locations {
            // add edges to the right and down, if possible
            for direction in SquareStep::FORWARD_VARIANTS {
                let other = direction.attempt_from(*location);
                if !self.in_bounds(other)
                    || self.holes.contains(&other)
                    || self.walls.contains(&UnorderedPair::from((*location, other))) {
                    continue;
                }

                let (Ok(a), Ok(b)) = (board.id_of(&self.name_at(*location)), board.id_of(&self.name_at(other))) else {
                    continue;
                };
                // distinct in-bounds locations never alias, so this cannot fail
                let _ = board.connect(a, b);
            }
        }

        Ok(board)
    }
}
