//! Discovery of monotone phase chains.
//!
//! A chain is a simple path of adjacent cells whose phases step around the cycle by one in a fixed [`Direction`], e.g. `6, 7, 0, 1`.
//! Chains through a freshly played cell are found by walking outwards from it in both directions and stitching each decreasing run onto each increasing run.

use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use tracing::debug;
use unordered_pair::UnorderedPair;

use crate::board::{BoardGraph, CellId};
use crate::phase::Direction;

/// An ordered, repetition-free run of cells.
pub type Chain = Vec<CellId>;

/// The shortest chain worth anything on its own.
pub const MIN_SCORING_CHAIN: usize = 3;

/// All maximal chains which start at `start` and step in `direction`.
///
/// Every branch is followed, so on a branchy board several chains may share a prefix.
/// A chain is only emitted once it cannot be extended without revisiting one of its own cells.
/// A start cell with no extension yields the single chain `[start]`; an unplayed start cell yields nothing.
pub fn find_maximal_chains(board: &BoardGraph, start: CellId, direction: Direction) -> Vec<Chain> {
    if board.value(start).is_none() {
        return Vec::new();
    }

    let mut chains = Vec::new();
    let mut path = vec![start];
    let mut on_path = HashSet::from([start]);
    extend(board, direction, &mut path, &mut on_path, &mut chains);
    chains
}

fn extend(board: &BoardGraph, direction: Direction, path: &mut Chain, on_path: &mut HashSet<CellId>, chains: &mut Vec<Chain>) {
    let Some(&current) = path.last() else {
        return;
    };
    let wanted = board.value(current).map(|phase| phase.step(direction));

    let mut extended = false;
    for next in board.neighbors(current) {
        if on_path.contains(&next) || board.value(next) != wanted {
            continue;
        }

        extended = true;
        path.push(next);
        on_path.insert(next);
        extend(board, direction, path, on_path, chains);
        on_path.remove(&next);
        path.pop();
    }

    if !extended {
        chains.push(path.clone());
    }
}

/// Drop repeated cells from `chain`, keeping each at its first occurrence.
pub fn dedup_chain(chain: impl IntoIterator<Item = CellId>) -> Chain {
    chain.into_iter().unique().collect()
}

/// Every chain that passes through `cell`, in one flat list.
///
/// Decreasing and increasing chains of at least two cells are found from `cell`, then each decreasing chain is reversed to end at `cell` and joined with each increasing chain, giving one combined chain per pair.
/// If one side has no chains at all, the chains of three or more cells on the other side are returned as they are.
/// Stitched chains come first, then decreasing leftovers, then increasing leftovers.
pub fn chains_through_node(board: &BoardGraph, cell: CellId) -> Vec<Chain> {
    let decreasing = find_maximal_chains(board, cell, Direction::Decreasing)
        .into_iter()
        .filter(|chain| chain.len() > 1)
        .collect_vec();
    let increasing = find_maximal_chains(board, cell, Direction::Increasing)
        .into_iter()
        .filter(|chain| chain.len() > 1)
        .collect_vec();

    let mut chains = Vec::with_capacity(decreasing.len() * increasing.len());
    for (dec, inc) in decreasing.iter().cartesian_product(increasing.iter()) {
        let tail = match inc.first() {
            Some(first) if *first == cell => &inc[1..],
            _ => &inc[..],
        };
        chains.push(dedup_chain(dec.iter().rev().chain(tail).copied()));
    }

    if increasing.is_empty() {
        chains.extend(decreasing.iter().filter(|chain| chain.len() >= MIN_SCORING_CHAIN).cloned());
    }
    if decreasing.is_empty() {
        chains.extend(increasing.iter().filter(|chain| chain.len() >= MIN_SCORING_CHAIN).cloned());
    }

    debug!(
        cell = board.name(cell),
        decreasing = decreasing.len(),
        increasing = increasing.len(),
        found = chains.len(),
        "chains through cell"
    );
    chains
}

/// Remove every chain whose cells are all contained in some other chain of the list.
///
/// Of several chains covering exactly the same cells, the first is kept. Survivors keep their relative order.
pub fn collapse_subchains(chains: Vec<Chain>) -> Vec<Chain> {
    let mut kept: Vec<(BTreeSet<CellId>, Chain)> = Vec::with_capacity(chains.len());

    for chain in chains {
        let cells = chain.iter().copied().collect::<BTreeSet<_>>();
        if kept.iter().any(|(other, _)| other.is_superset(&cells)) {
            continue;
        }
        kept.retain(|(other, _)| !other.is_subset(&cells));
        kept.push((cells, chain));
    }

    kept.into_iter().map(|(_, chain)| chain).collect()
}

/// Adjacent cell pairs along the given chains, as sorted name pairs, each listed once and in sorted order.
///
/// Consecutive chain members which are not actually adjacent on the board contribute nothing.
pub fn chain_connections<'a>(board: &BoardGraph, chains: impl IntoIterator<Item = &'a Chain>) -> Vec<(String, String)> {
    let pairs = chains.into_iter()
        .flat_map(|chain| chain.iter().tuple_windows())
        .filter(|(a, b)| board.are_adjacent(**a, **b))
        .map(|(a, b)| UnorderedPair::from((*a, *b)))
        .collect::<HashSet<_>>();

    pairs.into_iter()
        .map(|UnorderedPair(a, b)| connection(board, a, b))
        .sorted()
        .collect()
}

/// The name pair for an adjacency, smaller name first.
pub(crate) fn connection(board: &BoardGraph, a: CellId, b: CellId) -> (String, String) {
    let (a, b) = (board.name(a), board.name(b));
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}
