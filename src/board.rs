use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use tracing::trace;

use crate::error::{GameError, Result};
use crate::location::Position;
use crate::phase::Phase;
use crate::shape;

/// Handle to a cell on one particular [`BoardGraph`].
///
/// Ids are handed out by [`BoardGraph::add_node`] and index the board's cell arena, so they are only meaningful on the board (or a clone of the board) which issued them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CellId(usize);

impl CellId {
    /// Position of this cell in its board's arena, which is also its insertion order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One playable cell: a stable name, a display position and, once played, a phase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    name: String,
    position: Position,
    value: Option<Phase>,
}

impl Cell {
    /// The stable id of this cell, e.g. `square-12`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where this cell is drawn.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The phase played here, if any.
    pub fn value(&self) -> Option<Phase> {
        self.value
    }
}

/// The board: an arena of [`Cell`]s plus undirected adjacency between them.
///
/// Topology is fixed once the board is built; during play only cell values change.
/// Adjacency is stored in a [`UnGraphMap`] keyed by [`CellId`], so it is symmetric by construction and neighbor iteration follows connection order.
#[derive(Clone, Debug, Default)]
pub struct BoardGraph {
    cells: Vec<Cell>,
    ids: HashMap<String, CellId>,
    graph: UnGraphMap<CellId, ()>,
}

impl BoardGraph {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unplayed cell named `name` drawn at `position`.
    ///
    /// If a cell with this name already exists, its id is returned and the board is left untouched.
    pub fn add_node(&mut self, name: impl Into<String>, position: impl Into<Position>) -> CellId {
        let name = name.into();
        if let Some(existing) = self.ids.get(&name) {
            return *existing;
        }

        let id = CellId(self.cells.len());
        self.ids.insert(name.clone(), id);
        self.cells.push(Cell { name, position: position.into(), value: None });
        self.graph.add_node(id);
        id
    }

    /// Connect two cells. Connecting an already connected pair does nothing.
    pub fn connect(&mut self, a: CellId, b: CellId) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(GameError::InvalidLayout(format!("cannot connect {:?} to itself", self.name(a))));
        }
        if !self.graph.contains_edge(a, b) {
            trace!(a = self.name(a), b = self.name(b), "connected");
            self.graph.add_edge(a, b, ());
        }
        Ok(())
    }

    /// [`Self::connect`], addressing cells by name.
    pub fn connect_names(&mut self, a: &str, b: &str) -> Result<()> {
        let (a, b) = (self.id_of(a)?, self.id_of(b)?);
        self.connect(a, b)
    }

    /// Look up a cell by name.
    pub fn id_of(&self, name: &str) -> Result<CellId> {
        self.ids.get(name).copied().ok_or_else(|| GameError::not_found(name))
    }

    /// Whether `id` names a cell on this board.
    pub fn contains(&self, id: CellId) -> bool {
        id.0 < self.cells.len()
    }

    fn check(&self, id: CellId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GameError::not_found(format!("#{}", id.0)))
        }
    }

    /// The cell behind `id`.
    ///
    /// # Panics
    /// If `id` was issued by a different board and is out of range here. See [`Self::contains`].
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    /// The name of the cell behind `id`.
    ///
    /// # Panics
    /// Under the same conditions as [`Self::cell`].
    pub fn name(&self, id: CellId) -> &str {
        &self.cell(id).name
    }

    /// The phase played on `id`, if any. Ids this board does not know are unplayed.
    #[inline]
    pub fn value(&self, id: CellId) -> Option<Phase> {
        self.cells.get(id.0).and_then(|cell| cell.value)
    }

    /// Play `phase` on `id`. A value, once set, is never overwritten.
    pub fn set_value(&mut self, id: CellId, phase: Phase) -> Result<()> {
        self.check(id)?;
        let cell = &mut self.cells[id.0];
        if cell.value.is_some() {
            return Err(GameError::occupied(cell.name.clone()));
        }
        cell.value = Some(phase);
        Ok(())
    }

    /// Return every cell to the unplayed state, leaving topology alone.
    pub fn clear_all_values(&mut self) {
        self.cells.iter_mut().for_each(|cell| cell.value = None);
    }

    /// Neighbors of `id`, in the order they were connected.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.graph.neighbors(id)
    }

    /// Whether `a` and `b` share an edge.
    pub fn are_adjacent(&self, a: CellId, b: CellId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Every cell with its id, in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| (CellId(i), cell))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of distinct adjacencies.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of cells still waiting for a phase.
    pub fn unplayed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.value.is_none()).count()
    }

    /// Whether every cell holds a phase.
    pub fn is_full(&self) -> bool {
        self.unplayed_count() == 0
    }

    /// Every cell's value in arena order. Together with the fixed topology this is the whole mutable state of the board.
    pub(crate) fn values(&self) -> Vec<Option<Phase>> {
        self.cells.iter().map(|cell| cell.value).collect()
    }

    /// Put back values captured by [`Self::values`] on this same board.
    pub(crate) fn restore_values(&mut self, values: &[Option<Phase>]) {
        debug_assert_eq!(values.len(), self.cells.len());
        for (cell, value) in self.cells.iter_mut().zip(values) {
            cell.value = *value;
        }
    }
}

/// Largest grid, per side, that a board is drawn onto.
const MAX_RENDER_SIDE: usize = 64;

/// Maps the coordinates along one axis onto grid rows or columns.
struct Axis {
    min: f64,
    // halved so that the extremes of f64 cannot overflow
    half_span: f64,
    side: usize,
}

impl Axis {
    fn fit(coords: &[f64]) -> Self {
        let small_grid = coords.iter().all(|c| c.fract() == 0.0 && (0.0..MAX_RENDER_SIDE as f64).contains(c));
        if small_grid {
            // drawn as is, margin to the origin included
            let max = coords.iter().copied().fold(0.0, f64::max);
            return Self { min: 0.0, half_span: max / 2.0, side: max as usize + 1 };
        }

        let min = coords.iter().copied().fold(f64::INFINITY, f64::min);
        let max = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let distinct = coords.iter().map(|c| c.to_bits()).unique().count();
        Self { min, half_span: max / 2.0 - min / 2.0, side: distinct.clamp(1, MAX_RENDER_SIDE) }
    }

    fn index(&self, coord: f64) -> usize {
        if self.side == 1 || self.half_span <= 0.0 {
            return 0;
        }
        let scaled = (coord / 2.0 - self.min / 2.0) / self.half_span * (self.side - 1) as f64;
        (scaled.round() as usize).min(self.side - 1)
    }
}

impl Display for BoardGraph {
    /// Lays cells out by position: `.` for an unplayed cell, the phase digit otherwise, and a space where there is no cell.
    ///
    /// Boards on small non-negative integer positions are drawn cell for cell.
    /// Anything else is scaled between its minimum and maximum onto a grid of at most 64 cells per side, where cells landing on the same spot overwrite each other.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.cells.is_empty() {
            return Ok(());
        }

        let xs = self.cells.iter().map(|cell| cell.position.x()).collect_vec();
        let ys = self.cells.iter().map(|cell| cell.position.y()).collect_vec();
        let (columns, rows) = (Axis::fit(&xs), Axis::fit(&ys));

        let mut grid = Array2::from_elem((rows.side, columns.side), ' ');
        for (cell, (x, y)) in self.cells.iter().zip(xs.iter().zip(&ys)) {
            grid[(rows.index(*y), columns.index(*x))] = match cell.value {
                Some(phase) => char::from(b'0' + phase.get()),
                None => '.',
            };
        }

        write!(f, "{}", shape::print(grid))
    }
}
