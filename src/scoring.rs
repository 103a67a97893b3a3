use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use tracing::debug;

use crate::board::{BoardGraph, CellId};
use crate::chain::{self, chains_through_node, collapse_subchains, MIN_SCORING_CHAIN};
use crate::phase::Phase;

/// Which rule produced a score.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScoringKind {
    /// Two adjacent cells holding the same phase.
    EqualPair,
    /// Two adjacent cells holding opposite phases.
    ComplementaryPair,
    /// A chain of three or more cells stepping monotonically around the cycle.
    LunarCycle,
}

impl ScoringKind {
    /// Whether this kind scores a single adjacency rather than a chain.
    pub fn is_pair(&self) -> bool {
        matches!(self, Self::EqualPair | Self::ComplementaryPair)
    }
}

/// One scoring structure found around a freshly played cell, before it is credited to anyone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoredStructure {
    /// The rule which found this structure.
    pub kind: ScoringKind,
    /// Points this structure is worth.
    pub points: u32,
    /// Cells whose ownership passes to the scoring player.
    pub claimed: Vec<String>,
    /// Adjacencies involved, as sorted name pairs.
    pub connections: Vec<(String, String)>,
    /// The chain in walking order, for [`ScoringKind::LunarCycle`] only.
    pub chain: Option<Vec<String>>,
}

/// A rule which looks at a freshly played cell and reports what it completed.
///
/// Strategies never mutate anything; crediting points and claims is the ledger's job.
pub trait ScoringStrategy {
    /// The kind of every structure this strategy reports.
    fn kind(&self) -> ScoringKind;

    /// Everything `played` completed on `board`. `played` must already hold its phase.
    fn score(&self, board: &BoardGraph, played: CellId) -> Vec<ScoredStructure>;
}

/// One point for every neighbor holding the same phase as the played cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualPhasePair;

/// Two points for every neighbor holding the phase opposite the played cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComplementaryPhasePair;

/// One point per cell for every chain of three or more cells through the played cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct LunarCycle;

/// Each matching neighbor forms its own structure, claiming the neighbor and then the played cell.
fn score_pairs(board: &BoardGraph, played: CellId, kind: ScoringKind, points: u32, matches: impl Fn(Phase, Phase) -> bool) -> Vec<ScoredStructure> {
    let Some(phase) = board.value(played) else {
        return Vec::new();
    };

    board.neighbors(played)
        .filter(|neighbor| board.value(*neighbor).is_some_and(|other| matches(phase, other)))
        .map(|neighbor| ScoredStructure {
            kind,
            points,
            claimed: vec![board.name(neighbor).to_owned(), board.name(played).to_owned()],
            connections: vec![chain::connection(board, neighbor, played)],
            chain: None,
        })
        .collect()
}

impl ScoringStrategy for EqualPhasePair {
    fn kind(&self) -> ScoringKind {
        ScoringKind::EqualPair
    }

    fn score(&self, board: &BoardGraph, played: CellId) -> Vec<ScoredStructure> {
        score_pairs(board, played, self.kind(), 1, |a, b| a == b)
    }
}

impl ScoringStrategy for ComplementaryPhasePair {
    fn kind(&self) -> ScoringKind {
        ScoringKind::ComplementaryPair
    }

    fn score(&self, board: &BoardGraph, played: CellId) -> Vec<ScoredStructure> {
        score_pairs(board, played, self.kind(), 2, Phase::is_opposite)
    }
}

impl ScoringStrategy for LunarCycle {
    fn kind(&self) -> ScoringKind {
        ScoringKind::LunarCycle
    }

    fn score(&self, board: &BoardGraph, played: CellId) -> Vec<ScoredStructure> {
        let chains = collapse_subchains(chains_through_node(board, played))
            .into_iter()
            .filter(|chain| chain.len() >= MIN_SCORING_CHAIN)
            .collect::<Vec<_>>();

        chains.iter()
            .map(|chain| {
                let names = chain.iter().map(|id| board.name(*id).to_owned()).collect::<Vec<_>>();
                debug!(cells = ?names, "lunar cycle");
                ScoredStructure {
                    kind: self.kind(),
                    points: chain.len() as u32,
                    claimed: names.clone(),
                    connections: chain::chain_connections(board, [chain]),
                    chain: Some(names),
                }
            })
            .collect()
    }
}
