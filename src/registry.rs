use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use itertools::Itertools;
use tracing::info;

use crate::board::BoardGraph;
use crate::error::{GameError, Result};
use crate::phase::Phase;
use crate::player::Player;
use crate::session::{GameSession, GameState, PlacementOutcome, SessionConfig};

/// Every live [`GameSession`], keyed by room id.
///
/// Rooms are fully isolated from one another. Access to any one session is exclusive for the duration of a call,
/// so a placement and its snapshot are complete before the next request for that room is looked at.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, GameSession>,
}

impl SessionRegistry {
    /// A registry with no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a room playing on `board`, returning its initial state.
    pub fn create(&self, room: impl Into<String>, board: BoardGraph, config: SessionConfig) -> Result<GameState> {
        match self.sessions.entry(room.into()) {
            Entry::Occupied(entry) => Err(GameError::SessionExists { room: entry.key().clone() }),
            Entry::Vacant(entry) => {
                info!(room = %entry.key(), cells = board.len(), "session created");
                let session = GameSession::new(board, config);
                let state = session.get_state();
                entry.insert(session);
                Ok(state)
            }
        }
    }

    /// Run `f` with exclusive access to the session for `room`.
    pub fn with_session<R>(&self, room: &str, f: impl FnOnce(&mut GameSession) -> R) -> Result<R> {
        let mut session = self.sessions.get_mut(room)
            .ok_or_else(|| GameError::UnknownSession { room: room.to_owned() })?;
        Ok(f(&mut session))
    }

    /// [`GameSession::place`] in `room`.
    pub fn place(&self, room: &str, player: Player, node: &str, value: Phase) -> Result<PlacementOutcome> {
        self.with_session(room, |session| session.place(player, node, value))?
    }

    /// [`GameSession::get_state`] in `room`.
    pub fn state(&self, room: &str) -> Result<GameState> {
        self.with_session(room, |session| session.get_state())
    }

    /// Close the room, dropping its session and history.
    pub fn destroy(&self, room: &str) -> Result<()> {
        self.sessions.remove(room)
            .map(|_| info!(room, "session destroyed"))
            .ok_or_else(|| GameError::UnknownSession { room: room.to_owned() })
    }

    /// Whether a session is open for `room`.
    pub fn contains(&self, room: &str) -> bool {
        self.sessions.contains_key(room)
    }

    /// Open room ids, sorted.
    pub fn rooms(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).sorted().collect()
    }

    /// Number of open rooms.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no rooms are open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
