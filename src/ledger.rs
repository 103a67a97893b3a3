use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::VariantArray;
use tracing::debug;

use crate::player::Player;
use crate::scoring::{ScoredStructure, ScoringKind};

/// Points per player. Both players are always present.
pub type Scores = BTreeMap<Player, u32>;

fn zero_scores() -> Scores {
    Player::VARIANTS.iter().map(|player| (*player, 0)).collect()
}

/// A scoring structure credited to a player. Recorded once per triggering placement and never changed afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    /// Who scored.
    pub player: Player,
    /// The rule which produced the score.
    #[serde(rename = "type")]
    pub kind: ScoringKind,
    /// Points awarded.
    pub points: u32,
    /// Cells claimed by `player`.
    pub claimed: Vec<String>,
    /// Adjacencies involved, as sorted name pairs.
    pub connections: Vec<(String, String)>,
    /// The chain in walking order, for lunar cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<String>>,
}

/// End-of-game tally: points from scoring, one bonus point per claimed cell, and the sum.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalScores {
    /// Points earned from scoring events.
    pub base_scores: Scores,
    /// Number of cells each player owns.
    pub bonus_scores: Scores,
    /// `base_scores + bonus_scores`.
    pub final_scores: Scores,
}

/// Running score, cell ownership and scoring history for one game.
///
/// Ownership is last-claimer-wins: a newer event claiming a cell replaces whoever held it before.
/// Points are never deduplicated, but the highlight lists (`equal_pairs` and friends) hold each pair or connection once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreLedger {
    scores: Scores,
    claims: BTreeMap<String, Player>,
    equal_pairs: Vec<(String, String)>,
    complementary_pairs: Vec<(String, String)>,
    cycle_chains: Vec<Vec<String>>,
    cycle_connections: Vec<(String, String)>,
    history: Vec<ScoringEvent>,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self {
            scores: zero_scores(),
            claims: Default::default(),
            equal_pairs: Default::default(),
            complementary_pairs: Default::default(),
            cycle_chains: Default::default(),
            cycle_connections: Default::default(),
            history: Default::default(),
        }
    }
}

fn push_distinct<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

impl ScoreLedger {
    /// A ledger with both players at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit pair structures to `player`, returning the recorded events.
    pub fn apply_pair_events(&mut self, player: Player, structures: Vec<ScoredStructure>) -> Vec<ScoringEvent> {
        debug_assert!(structures.iter().all(|s| s.kind.is_pair()));
        self.apply(player, structures)
    }

    /// Credit lunar cycle structures to `player`, returning the recorded events.
    pub fn apply_cycle_events(&mut self, player: Player, structures: Vec<ScoredStructure>) -> Vec<ScoringEvent> {
        debug_assert!(structures.iter().all(|s| s.kind == ScoringKind::LunarCycle));
        self.apply(player, structures)
    }

    fn apply(&mut self, player: Player, structures: Vec<ScoredStructure>) -> Vec<ScoringEvent> {
        structures.into_iter()
            .map(|structure| {
                let event = ScoringEvent {
                    player,
                    kind: structure.kind,
                    points: structure.points,
                    claimed: structure.claimed,
                    connections: structure.connections,
                    chain: structure.chain,
                };
                self.record(&event);
                event
            })
            .collect()
    }

    fn record(&mut self, event: &ScoringEvent) {
        debug!(player = %event.player, kind = %event.kind, points = event.points, "scoring event");

        *self.scores.entry(event.player).or_default() += event.points;
        for cell in &event.claimed {
            self.claims.insert(cell.clone(), event.player);
        }

        match event.kind {
            ScoringKind::EqualPair => event.connections.iter()
                .for_each(|pair| push_distinct(&mut self.equal_pairs, pair.clone())),
            ScoringKind::ComplementaryPair => event.connections.iter()
                .for_each(|pair| push_distinct(&mut self.complementary_pairs, pair.clone())),
            ScoringKind::LunarCycle => {
                if let Some(chain) = &event.chain {
                    self.cycle_chains.push(chain.clone());
                }
                event.connections.iter()
                    .for_each(|pair| push_distinct(&mut self.cycle_connections, pair.clone()));
            }
        }

        self.history.push(event.clone());
    }

    /// Points per player.
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    /// Cells currently owned by `player`, in name order.
    pub fn claimed_cards(&self, player: Player) -> Vec<&str> {
        self.claims.iter()
            .filter(|(_, owner)| **owner == player)
            .map(|(cell, _)| cell.as_str())
            .collect()
    }

    /// Every owned cell with its owner.
    pub fn all_claimed_cards(&self) -> &BTreeMap<String, Player> {
        &self.claims
    }

    /// Distinct equal-phase pairs scored so far.
    pub fn equal_pairs(&self) -> &[(String, String)] {
        &self.equal_pairs
    }

    /// Distinct opposite-phase pairs scored so far.
    pub fn complementary_pairs(&self) -> &[(String, String)] {
        &self.complementary_pairs
    }

    /// Every lunar cycle chain scored so far, in scoring order.
    pub fn cycle_chains(&self) -> &[Vec<String>] {
        &self.cycle_chains
    }

    /// Distinct adjacencies along scored lunar cycles.
    pub fn cycle_connections(&self) -> &[(String, String)] {
        &self.cycle_connections
    }

    /// Every event in the order it was recorded.
    pub fn history(&self) -> &[ScoringEvent] {
        &self.history
    }

    /// Compute the end-of-game tally. This does not change the ledger and may be called at any time.
    pub fn finalize_scores(&self) -> FinalScores {
        let base_scores = self.scores.clone();
        let bonus_scores = Player::VARIANTS.iter()
            .map(|player| (*player, self.claims.values().filter(|owner| *owner == player).count() as u32))
            .collect::<Scores>();
        let final_scores = base_scores.iter()
            .map(|(player, base)| (*player, base + bonus_scores.get(player).copied().unwrap_or(0)))
            .collect();

        FinalScores { base_scores, bonus_scores, final_scores }
    }

    /// Forget all scores, claims and history. The board is not touched.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
