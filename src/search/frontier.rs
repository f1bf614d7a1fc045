use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use itertools::Itertools;
use std::collections::VecDeque;

use super::Algorithm;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Cells that have been discovered but not yet expanded, stored as arena indices.
#[derive(Clone, Debug)]
pub(crate) enum Frontier {
    /// Oldest first.
    Queue(VecDeque<usize>),
    /// Newest first.
    Stack(Vec<usize>),
    /// Lowest rank first, scanning in insertion order so the earliest admitted cell wins ties.
    /// Pushing a cell that is already present keeps its original slot.
    Scan(FxIndexSet<usize>),
}

impl Frontier {
    pub fn for_algorithm(algorithm: Algorithm) -> Frontier {
        match algorithm {
            Algorithm::BreadthFirst => Frontier::Queue(VecDeque::new()),
            Algorithm::DepthFirst => Frontier::Stack(Vec::new()),
            Algorithm::GreedyBestFirst | Algorithm::AStar => Frontier::Scan(FxIndexSet::default()),
        }
    }
    pub fn push(&mut self, ix: usize) {
        match self {
            Frontier::Queue(q) => q.push_back(ix),
            Frontier::Stack(s) => s.push(ix),
            Frontier::Scan(set) => {
                set.insert(ix);
            }
        }
    }
    /// Removes the next cell to expand. `rank` is only consulted by [Frontier::Scan].
    pub fn pop<F>(&mut self, rank: F) -> Option<usize>
    where
        F: Fn(usize) -> f64,
    {
        match self {
            Frontier::Queue(q) => q.pop_front(),
            Frontier::Stack(s) => s.pop(),
            Frontier::Scan(set) => {
                let best = set
                    .iter()
                    .position_min_by(|&&a, &&b| rank(a).total_cmp(&rank(b)))?;
                set.shift_remove_index(best)
            }
        }
    }
    pub fn len(&self) -> usize {
        match self {
            Frontier::Queue(q) => q.len(),
            Frontier::Stack(s) => s.len(),
            Frontier::Scan(set) => set.len(),
        }
    }
}
