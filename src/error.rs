use thiserror::Error;

use crate::player::Player;

/// Which history stack an undo or redo request found empty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum HistoryDirection {
    /// The undo stack.
    Undo,
    /// The redo stack.
    Redo,
}

/// Everything that can go wrong while building a board or playing on it.
///
/// All variants are recoverable at the request boundary; none of them leave the session in a partially mutated state.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GameError {
    /// A node id was referenced which the board does not contain.
    #[error("no node named {id:?} on this board")]
    NodeNotFound {
        /// The name looked up.
        id: String,
    },

    /// A phase was placed on a node which already holds one.
    #[error("node {id:?} is already occupied")]
    AlreadyOccupied {
        /// The occupied node.
        id: String,
    },

    /// A placement request was missing a field or carried a malformed one.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A phase value outside `0..8`.
    #[error("phase {value} is out of range 0..8")]
    PhaseOutOfRange {
        /// The rejected value.
        value: u8,
    },

    /// A player number other than 1 or 2.
    #[error("unknown player {value}")]
    UnknownPlayer {
        /// The rejected value.
        value: u8,
    },

    /// Undo or redo was requested with nothing to restore.
    #[error("nothing to {0}")]
    NoHistory(HistoryDirection),

    /// A player attempted to move out of turn.
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn {
        /// The player on turn.
        expected: Player,
        /// The player who tried to move.
        got: Player,
    },

    /// A placement was attempted after the game ended.
    #[error("the game is over")]
    GameOver,

    /// A serialized board layout could not be reconstructed.
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),

    /// No session is registered under this room id.
    #[error("no session for room {room:?}")]
    UnknownSession {
        /// The room id looked up.
        room: String,
    },

    /// A session is already registered under this room id.
    #[error("a session for room {room:?} already exists")]
    SessionExists {
        /// The room id in use.
        room: String,
    },
}

impl GameError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    pub(crate) fn occupied(id: impl Into<String>) -> Self {
        Self::AlreadyOccupied { id: id.into() }
    }
}

/// Shorthand for results carrying a [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;
