//! # route_finder
//!
//! Traceable pathfinding on a 4-connected grid. A [RouteGrid] holds the classification of every
//! cell (a single start, a single target and any number of obstacles) and [search](fn@search) runs one of
//! four strategies over it:
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search),
//! [greedy best-first](https://en.wikipedia.org/wiki/Best-first_search) and
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm).
//!
//! Besides the path, every search reports the order in which cells were expanded, so a
//! presentation layer can replay the exploration. Neighbours are always examined in the order
//! up, down, left, right, which makes every tie-break and therefore every result deterministic.
//!
//! ```
//! use route_finder::{search_marked, Algorithm, RouteGrid};
//!
//! let mut grid: RouteGrid = "S.#\n..#\n..T".parse().unwrap();
//! let result = search_marked(&mut grid, Algorithm::AStar).unwrap();
//! assert!(result.found);
//! assert_eq!(result.steps(), 4);
//! ```
mod cell;
mod error;
mod route_grid;
pub mod search;

pub use cell::{Cell, CellKind, Position};
pub use error::{GridError, ParseAlgorithmError, SearchError};
pub use route_grid::RouteGrid;
pub use search::result::{Frame, SearchResult};
pub use search::{heuristic, search, search_marked, Algorithm};

/// Side length of the board used by [RouteGrid::default].
pub const DEFAULT_GRID_SIZE: usize = 20;
/// Cost of a single move between adjacent cells.
pub const STEP_COST: f64 = 1.0;
/// A cell has at most four neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;
