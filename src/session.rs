use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::BoardGraph;
use crate::error::{GameError, HistoryDirection, Result};
use crate::layout::BoardLayout;
use crate::ledger::{FinalScores, ScoreLedger, Scores, ScoringEvent};
use crate::phase::Phase;
use crate::player::Player;
use crate::scoring::{ComplementaryPhasePair, EqualPhasePair, LunarCycle, ScoringStrategy};

/// Rules which vary between games.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Who moves first in the first game. Later games alternate.
    pub starting_player: Player,
    /// Reject placements by the player who is not on turn.
    pub enforce_turn_order: bool,
    /// Total number of cards in a finite deck; the game ends once that many have been played.
    /// `None` is an infinite deck, where only a full board ends the game.
    pub deck_size: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_player: Player::One,
            enforce_turn_order: true,
            deck_size: None,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for `current_player` to place a phase.
    AwaitingPlacement {
        /// The player on turn.
        current_player: Player,
    },
    /// No more placements are accepted until the session is reset.
    GameOver,
}

/// Everything a client needs to draw the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The board in wire form, values included.
    pub board: BoardLayout,
    /// Base points per player.
    pub scores: Scores,
    /// Owner of every claimed cell.
    pub claimed: BTreeMap<String, Player>,
    /// Distinct equal-phase pairs scored so far.
    pub equal_pairs: Vec<(String, String)>,
    /// Distinct opposite-phase pairs scored so far.
    pub complementary_pairs: Vec<(String, String)>,
    /// Lunar cycle chains scored so far.
    pub cycle_chains: Vec<Vec<String>>,
    /// Distinct adjacencies along scored lunar cycles.
    pub cycle_connections: Vec<(String, String)>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// The player on turn, absent once the game is over.
    pub current_player: Option<Player>,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Cards left in a finite deck.
    pub cards_remaining: Option<usize>,
}

/// The result of an accepted placement.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Everything the placement scored, in the order it was credited.
    pub events: Vec<ScoringEvent>,
    /// Whether this placement ended the game.
    pub game_over: bool,
    /// The end-of-game tally, present only when `game_over` is set.
    pub final_scores: Option<FinalScores>,
    /// State after the placement.
    pub state: GameState,
}

/// A placement as it arrives over the wire, with every field optional so that omissions can be reported.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Player number, 1 or 2.
    pub player: Option<u8>,
    /// Name of the target cell.
    pub node_name: Option<String>,
    /// Phase to place, `0..8`.
    pub value: Option<u8>,
}

impl PlacementRequest {
    /// Check every field is present and in range.
    pub fn validate(&self) -> Result<(Player, &str, Phase)> {
        let player = self.player.ok_or_else(|| GameError::InvalidPlacement("missing field `player`".into()))?;
        let node = self.node_name.as_deref().ok_or_else(|| GameError::InvalidPlacement("missing field `node_name`".into()))?;
        let value = self.value.ok_or_else(|| GameError::InvalidPlacement("missing field `value`".into()))?;

        Ok((Player::try_from(player)?, node, Phase::try_from(value)?))
    }
}

/// The reply to a placement request: either a success carrying the outcome or a failure carrying the reason.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementResponse {
    /// Whether the placement was accepted.
    pub success: bool,
    /// Why the placement was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// What the placement did.
    #[serde(flatten)]
    pub outcome: Option<PlacementOutcome>,
}

impl From<Result<PlacementOutcome>> for PlacementResponse {
    fn from(value: Result<PlacementOutcome>) -> Self {
        match value {
            Ok(outcome) => Self { success: true, error: None, outcome: Some(outcome) },
            Err(e) => Self { success: false, error: Some(e.to_string()), outcome: None },
        }
    }
}

/// Everything a placement can change. The topology of the board never changes, so only its values are kept.
#[derive(Clone, Debug)]
struct Snapshot {
    values: Vec<Option<Phase>>,
    ledger: ScoreLedger,
    status: SessionStatus,
    placements: usize,
}

/// One game on one board: validates placements, scores them, and keeps linear undo/redo history.
///
/// A session is not internally synchronized; callers serialize access to it (see [`SessionRegistry`](crate::SessionRegistry)).
#[derive(Clone, Debug)]
pub struct GameSession {
    board: BoardGraph,
    ledger: ScoreLedger,
    status: SessionStatus,
    placements: usize,
    config: SessionConfig,
    starting_player: Player,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl GameSession {
    /// Start a game on `board`. Values already on the board are kept but score nothing.
    pub fn new(board: BoardGraph, config: SessionConfig) -> Self {
        let starting_player = config.starting_player;
        let mut session = Self {
            board,
            ledger: ScoreLedger::new(),
            status: SessionStatus::AwaitingPlacement { current_player: starting_player },
            placements: 0,
            config,
            starting_player,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        };
        if session.is_exhausted() {
            session.status = SessionStatus::GameOver;
        }
        session
    }

    fn is_exhausted(&self) -> bool {
        self.board.is_full() || self.config.deck_size.is_some_and(|size| self.placements >= size)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.board.values(),
            ledger: self.ledger.clone(),
            status: self.status,
            placements: self.placements,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board.restore_values(&snapshot.values);
        self.ledger = snapshot.ledger;
        self.status = snapshot.status;
        self.placements = snapshot.placements;
    }

    /// Place `value` on the cell named `node` for `player`, score it, and pass the turn.
    ///
    /// On failure nothing changes. A successful placement discards any redo history.
    pub fn place(&mut self, player: Player, node: &str, value: Phase) -> Result<PlacementOutcome> {
        let cell = self.board.id_of(node).inspect_err(|_| warn!(%player, node, "placement on unknown node"))?;
        if self.board.value(cell).is_some() {
            warn!(%player, node, "placement on occupied node");
            return Err(GameError::occupied(node));
        }

        let current_player = match self.status {
            SessionStatus::GameOver => {
                warn!(%player, node, "placement after game over");
                return Err(GameError::GameOver);
            }
            SessionStatus::AwaitingPlacement { current_player } => current_player,
        };
        if self.config.enforce_turn_order && player != current_player {
            warn!(%player, expected = %current_player, "placement out of turn");
            return Err(GameError::NotYourTurn { expected: current_player, got: player });
        }

        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
        self.board.set_value(cell, value)?;

        let mut events = self.ledger.apply_pair_events(player, EqualPhasePair.score(&self.board, cell));
        events.extend(self.ledger.apply_pair_events(player, ComplementaryPhasePair.score(&self.board, cell)));
        events.extend(self.ledger.apply_cycle_events(player, LunarCycle.score(&self.board, cell)));

        self.placements += 1;
        let game_over = self.is_exhausted();
        self.status = if game_over {
            SessionStatus::GameOver
        } else {
            SessionStatus::AwaitingPlacement { current_player: current_player.other() }
        };

        info!(%player, node, %value, events = events.len(), game_over, "placement accepted");
        Ok(PlacementOutcome {
            events,
            game_over,
            final_scores: game_over.then(|| self.ledger.finalize_scores()),
            state: self.get_state(),
        })
    }

    /// [`Self::place`] from an unvalidated request.
    pub fn place_request(&mut self, request: &PlacementRequest) -> Result<PlacementOutcome> {
        let (player, node, value) = request.validate()?;
        self.place(player, node, value)
    }

    /// Step back to before the most recent placement.
    pub fn undo(&mut self) -> Result<GameState> {
        let snapshot = self.undo_stack.pop().ok_or(GameError::NoHistory(HistoryDirection::Undo))?;
        self.redo_stack.push(self.snapshot());
        self.restore(snapshot);
        info!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        Ok(self.get_state())
    }

    /// Reapply the most recently undone placement.
    pub fn redo(&mut self) -> Result<GameState> {
        let snapshot = self.redo_stack.pop().ok_or(GameError::NoHistory(HistoryDirection::Redo))?;
        self.undo_stack.push(self.snapshot());
        self.restore(snapshot);
        info!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        Ok(self.get_state())
    }

    /// Clear the board and the ledger for a fresh game, giving the first move to whoever did not have it last time.
    ///
    /// History does not survive a reset.
    pub fn reset(&mut self) -> GameState {
        self.board.clear_all_values();
        self.ledger.reset();
        self.placements = 0;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.starting_player = self.starting_player.other();
        self.status = if self.is_exhausted() {
            SessionStatus::GameOver
        } else {
            SessionStatus::AwaitingPlacement { current_player: self.starting_player }
        };
        info!(starting_player = %self.starting_player, "reset");
        self.get_state()
    }

    /// Everything a client needs to draw the game.
    pub fn get_state(&self) -> GameState {
        GameState {
            board: self.board.to_layout(),
            scores: self.ledger.scores().clone(),
            claimed: self.ledger.all_claimed_cards().clone(),
            equal_pairs: self.ledger.equal_pairs().to_vec(),
            complementary_pairs: self.ledger.complementary_pairs().to_vec(),
            cycle_chains: self.ledger.cycle_chains().to_vec(),
            cycle_connections: self.ledger.cycle_connections().to_vec(),
            status: self.status,
            current_player: self.current_player(),
            game_over: self.is_game_over(),
            cards_remaining: self.config.deck_size.map(|size| size.saturating_sub(self.placements)),
        }
    }

    /// Base points per player.
    pub fn get_scores(&self) -> &Scores {
        self.ledger.scores()
    }

    /// Cells currently owned by `player`.
    pub fn get_claimed_cards(&self, player: Player) -> Vec<&str> {
        self.ledger.claimed_cards(player)
    }

    /// Owner of every claimed cell.
    pub fn get_all_claimed_cards(&self) -> &BTreeMap<String, Player> {
        self.ledger.all_claimed_cards()
    }

    /// The end-of-game tally as it would stand right now. Does not end the game.
    pub fn finalize_scores(&self) -> FinalScores {
        self.ledger.finalize_scores()
    }

    /// The board being played on.
    pub fn board(&self) -> &BoardGraph {
        &self.board
    }

    /// The score ledger, including full event history.
    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// The rules this session was started with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The player on turn, or `None` once the game is over.
    pub fn current_player(&self) -> Option<Player> {
        match self.status {
            SessionStatus::AwaitingPlacement { current_player } => Some(current_player),
            SessionStatus::GameOver => None,
        }
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.status == SessionStatus::GameOver
    }

    /// Whether [`Self::undo`] would succeed.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether [`Self::redo`] would succeed.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
