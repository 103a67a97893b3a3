#![warn(missing_docs)]

//! # `lunation`
//!
//! The rules engine for a two-player game of moon phases played on a graph of cells.
//! Players take turns placing a phase `0..8` on an empty cell; placements score against the phases already on neighboring cells.
//! Begin by building a [`BoardGraph`], either with a builder such as [`SquareBoardBuilder`](builder::SquareBoardBuilder) or from a serialized [`BoardLayout`],
//! then hand it to a [`GameSession`] and call [`place()`](GameSession::place).
//!
//! # Scoring
//! Each placement is checked against three rules, in this order:
//! 1. Equal pair: one point for every neighbor holding the same phase.
//! 2. Complementary pair: two points for every neighbor holding the opposite phase, four steps away around the cycle.
//! 3. Lunar cycle: for every chain of three or more cells through the placed cell whose phases step monotonically around the cycle
//!    (`5, 6, 7, 0` counts), one point per cell in the chain.
//!
//! Every scoring structure also claims its cells for the scoring player, taking them from the opponent if need be.
//! At the end of the game each player earns a bonus point per cell they own.
//!
//! # Internals
//! Chains are found by a branching depth-first search outwards from the placed cell, once towards decreasing phases and once towards increasing phases.
//! Each decreasing chain is then stitched onto each increasing chain so that every full traversal through the placed cell is scored.
//! See the [`chain`] module.
//!
//! Sessions snapshot their mutable state before each placement for undo and redo.
//! Since board topology never changes during play, a snapshot holds only cell values next to the ledger.

pub use board::{BoardGraph, Cell, CellId};
pub use builder::Builder;
pub use error::{GameError, HistoryDirection, Result};
pub use layout::{BoardLayout, NodeLayout};
pub use ledger::{FinalScores, ScoreLedger, Scores, ScoringEvent};
pub use location::{Location, Position};
pub use phase::{Direction, Phase};
pub use player::Player;
pub use registry::SessionRegistry;
pub use scoring::{ScoredStructure, ScoringKind, ScoringStrategy};
pub use session::{GameSession, GameState, PlacementOutcome, PlacementRequest, PlacementResponse, SessionConfig, SessionStatus};

pub(crate) mod board;
pub mod builder;
pub mod chain;
pub(crate) mod error;
pub(crate) mod layout;
pub(crate) mod ledger;
pub(crate) mod location;
pub mod phase;
pub(crate) mod player;
pub(crate) mod registry;
pub mod scoring;
pub(crate) mod session;
pub mod shape;
