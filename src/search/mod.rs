//! The search engine. Four strategies share one expansion loop and differ only in how the
//! frontier hands out the next cell and in when a neighbour is (re)admitted.
use crate::cell::{CellKind, Position, Scratch};
use crate::error::{ParseAlgorithmError, SearchError};
use crate::route_grid::RouteGrid;
use crate::STEP_COST;
use core::fmt;
use core::str::FromStr;
use fxhash::FxHashSet;
use log::{info, trace, warn};

pub(crate) mod frontier;
pub mod result;

use frontier::Frontier;
use result::SearchResult;

/// Selects the search strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// FIFO frontier; shortest path in steps.
    #[default]
    BreadthFirst,
    /// LIFO frontier; any path.
    DepthFirst,
    /// Expands the frontier cell closest to the target by [heuristic]; any path.
    GreedyBestFirst,
    /// Expands the frontier cell with the lowest `g + h`; shortest path in steps.
    AStar,
}

/// When a neighbour enters the frontier.
enum Admission {
    /// Once, the first time it is seen.
    FirstDiscovery,
    /// Whenever a cheaper way to reach it is found.
    CostImprovement,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::BreadthFirst,
        Algorithm::DepthFirst,
        Algorithm::GreedyBestFirst,
        Algorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "bfs",
            Algorithm::DepthFirst => "dfs",
            Algorithm::GreedyBestFirst => "greedy",
            Algorithm::AStar => "astar",
        }
    }
    pub fn guarantees_shortest_path(self) -> bool {
        matches!(self, Algorithm::BreadthFirst | Algorithm::AStar)
    }
    fn admission(self) -> Admission {
        match self {
            Algorithm::AStar => Admission::CostImprovement,
            _ => Admission::FirstDiscovery,
        }
    }
    fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::GreedyBestFirst | Algorithm::AStar)
    }
    /// Value minimized when picking from a scanned frontier.
    fn rank(self, scratch: &Scratch) -> f64 {
        match self {
            Algorithm::GreedyBestFirst => scratch.h,
            Algorithm::AStar => scratch.f,
            Algorithm::BreadthFirst | Algorithm::DepthFirst => 0.0,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Algorithm, ParseAlgorithmError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Algorithm::BreadthFirst),
            "dfs" | "depth-first" => Ok(Algorithm::DepthFirst),
            "greedy" | "best-first" => Ok(Algorithm::GreedyBestFirst),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(ParseAlgorithmError(s.to_owned())),
        }
    }
}

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), which never
/// overestimates on a 4-connected grid with unit steps.
pub fn heuristic(from: &Position, to: &Position) -> f64 {
    from.manhattan_distance(to) as f64 * STEP_COST
}

/// Runs `algorithm` from `start` to `target`.
///
/// `start` must hold the start classification and `target` the target classification. The
/// scratch state of every cell is reset first, so repeated calls on an unchanged grid return
/// identical results. Classifications are never modified.
pub fn search(
    grid: &mut RouteGrid,
    start: Position,
    target: Position,
    algorithm: Algorithm,
) -> Result<SearchResult, SearchError> {
    check_endpoint(grid, start, CellKind::Start)?;
    check_endpoint(grid, target, CellKind::Target)?;
    info!("Searching from {} to {} using {}", start, target, algorithm);
    grid.reset_scratch();
    let result = expand(grid, start, target, algorithm);
    if result.found {
        info!(
            "Found path of {} cells after expanding {} cells",
            result.path_len(),
            result.visited_count()
        );
    } else {
        info!(
            "{} is not reachable from {}, expanded {} cells",
            target,
            start,
            result.visited_count()
        );
    }
    Ok(result)
}

/// Searches between the start and target currently placed on the grid.
pub fn search_marked(
    grid: &mut RouteGrid,
    algorithm: Algorithm,
) -> Result<SearchResult, SearchError> {
    let start = grid
        .start()
        .ok_or(SearchError::MissingEndpoint(CellKind::Start))?;
    let target = grid
        .target()
        .ok_or(SearchError::MissingEndpoint(CellKind::Target))?;
    search(grid, start, target, algorithm)
}

fn check_endpoint(
    grid: &RouteGrid,
    pos: Position,
    expected: CellKind,
) -> Result<(), SearchError> {
    let found = grid.kind(pos)?;
    if found != expected {
        warn!("Refusing to search: {} is {}, not {}", pos, found, expected);
        return Err(SearchError::InvalidEndpoint {
            pos,
            expected,
            found,
        });
    }
    Ok(())
}

fn expand(
    grid: &mut RouteGrid,
    start: Position,
    target: Position,
    algorithm: Algorithm,
) -> SearchResult {
    let start_ix = grid.index(start);
    let target_ix = grid.index(target);
    let mut frontier = Frontier::for_algorithm(algorithm);
    let mut discovered: FxHashSet<usize> = FxHashSet::default();
    let mut closed: FxHashSet<usize> = FxHashSet::default();
    let mut visited = Vec::new();

    let root = &mut grid.scratch[start_ix];
    root.g = 0.0;
    if algorithm.uses_heuristic() {
        root.h = heuristic(&start, &target);
    }
    if let Admission::CostImprovement = algorithm.admission() {
        root.f = root.g + root.h;
    }
    discovered.insert(start_ix);
    frontier.push(start_ix);

    while let Some(current) = frontier.pop(|ix| algorithm.rank(&grid.scratch[ix])) {
        closed.insert(current);
        let current_pos = grid.position(current);
        visited.push(current_pos);
        trace!("Expanding {} ({} left in frontier)", current_pos, frontier.len());
        if current == target_ix {
            return SearchResult {
                path: reconstruct_path(grid, current),
                visited,
                found: true,
            };
        }

        let tentative_g = grid.scratch[current].g + STEP_COST;
        for n in grid.adjacent(current_pos) {
            let n_ix = grid.index(n);
            if grid.kind_at(n).is_blocked() || closed.contains(&n_ix) {
                continue;
            }
            let scratch = &mut grid.scratch[n_ix];
            match algorithm.admission() {
                Admission::FirstDiscovery => {
                    if !discovered.insert(n_ix) {
                        continue;
                    }
                    scratch.g = tentative_g;
                    if algorithm.uses_heuristic() {
                        scratch.h = heuristic(&n, &target);
                    }
                }
                Admission::CostImprovement => {
                    if tentative_g >= scratch.g {
                        continue;
                    }
                    scratch.g = tentative_g;
                    scratch.h = heuristic(&n, &target);
                    scratch.f = scratch.g + scratch.h;
                }
            }
            scratch.predecessor = Some(current);
            frontier.push(n_ix);
        }
    }
    SearchResult::not_found(visited)
}

/// Follows predecessors back from `end` and returns the cells in start to `end` order.
fn reconstruct_path(grid: &RouteGrid, end: usize) -> Vec<Position> {
    let mut path = std::iter::successors(Some(end), |&ix| grid.scratch[ix].predecessor)
        .map(|ix| grid.position(ix))
        .collect::<Vec<Position>>();
    path.reverse();
    path
}
