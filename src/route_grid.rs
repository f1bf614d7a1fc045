use crate::cell::{Cell, CellKind, Position, Scratch};
use crate::error::GridError;
use crate::search::result::{Frame, SearchResult};
use crate::{DEFAULT_GRID_SIZE, N_SMALLVEC_SIZE};
use core::fmt;
use core::str::FromStr;
use grid_util::{Point, SimpleValueGrid, ValueGrid};
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// [RouteGrid] is a fixed-size matrix of classified cells. Besides the classifications kept in a
/// [SimpleValueGrid] it owns the scratch array written by searches, the positions of the start and
/// target singletons and a [UnionFind] of 4-connected open cells for quick reachability queries.
#[derive(Clone, Debug)]
pub struct RouteGrid {
    rows: usize,
    cols: usize,
    kinds: SimpleValueGrid<CellKind>,
    pub(crate) scratch: Vec<Scratch>,
    start: Option<Position>,
    target: Option<Position>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for RouteGrid {
    fn default() -> RouteGrid {
        RouteGrid::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE)
    }
}

impl RouteGrid {
    /// Creates a grid of `rows` by `cols` empty cells.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are rejected by [try_new](Self::try_new).
    pub fn new(rows: usize, cols: usize) -> RouteGrid {
        match RouteGrid::try_new(rows, cols) {
            Ok(grid) => grid,
            Err(err) => panic!("{}", err),
        }
    }
    /// Creates a grid of `rows` by `cols` empty cells. Each side must fit in an [i32] coordinate
    /// and the cell count must fit in a [usize].
    pub fn try_new(rows: usize, cols: usize) -> Result<RouteGrid, GridError> {
        let len = rows
            .checked_mul(cols)
            .filter(|_| rows <= i32::MAX as usize && cols <= i32::MAX as usize)
            .ok_or(GridError::TooLarge { rows, cols })?;
        let mut grid = RouteGrid {
            rows,
            cols,
            kinds: SimpleValueGrid::new(cols, rows, CellKind::Empty),
            scratch: vec![Scratch::default(); len],
            start: None,
            target: None,
            components: UnionFind::new(len),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn start(&self) -> Option<Position> {
        self.start
    }
    pub fn target(&self) -> Option<Position> {
        self.target
    }
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }
    pub(crate) fn check_bounds(&self, pos: Position) -> Result<(), GridError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }
    pub(crate) fn position(&self, ix: usize) -> Position {
        Position::new(ix / self.cols, ix % self.cols)
    }
    fn point(pos: Position) -> Point {
        Point::new(pos.col as i32, pos.row as i32)
    }
    /// Classification of an in-bounds cell.
    pub(crate) fn kind_at(&self, pos: Position) -> CellKind {
        self.kinds.get_point(Self::point(pos))
    }
    pub fn kind(&self, pos: Position) -> Result<CellKind, GridError> {
        self.check_bounds(pos)?;
        Ok(self.kind_at(pos))
    }
    /// Returns the classification of the cell together with the scratch values of the last search.
    pub fn cell(&self, pos: Position) -> Result<Cell, GridError> {
        self.check_bounds(pos)?;
        let scratch = self.scratch[self.index(pos)];
        Ok(Cell {
            pos,
            kind: self.kind_at(pos),
            g: scratch.g,
            h: scratch.h,
            f: scratch.f,
            predecessor: scratch.predecessor.map(|ix| self.position(ix)),
        })
    }

    /// Applies a user edit to a cell.
    ///
    /// - [Start](CellKind::Start) and [Target](CellKind::Target) are singletons: the previous
    ///   holder is demoted to [Empty](CellKind::Empty). Reapplying to the same cell does nothing.
    /// - [Obstacle](CellKind::Obstacle) toggles; it is ignored on start and target cells.
    /// - [Empty](CellKind::Empty) clears the cell, forgetting an endpoint stored there.
    /// - [Visited](CellKind::Visited) and [Path](CellKind::Path) are only painted over open cells.
    pub fn set_classification(&mut self, pos: Position, kind: CellKind) -> Result<(), GridError> {
        self.check_bounds(pos)?;
        let current = self.kind_at(pos);
        match kind {
            CellKind::Start | CellKind::Target => {
                if current == kind {
                    return Ok(());
                }
                if let Some(previous) = self.endpoint(kind) {
                    debug!("Moving {} from {} to {}", kind, previous, pos);
                    self.write(previous, CellKind::Empty);
                }
                self.write(pos, kind);
            }
            CellKind::Obstacle => {
                if current.is_endpoint() {
                    return Ok(());
                }
                let next = if current.is_blocked() {
                    CellKind::Empty
                } else {
                    CellKind::Obstacle
                };
                self.write(pos, next);
            }
            CellKind::Empty => self.write(pos, CellKind::Empty),
            CellKind::Visited | CellKind::Path => {
                if current.is_open() {
                    self.write(pos, kind);
                }
            }
        }
        Ok(())
    }
    fn endpoint(&self, kind: CellKind) -> Option<Position> {
        match kind {
            CellKind::Start => self.start,
            CellKind::Target => self.target,
            _ => None,
        }
    }
    /// Stores a classification, keeping the endpoint singletons and the components in sync.
    fn write(&mut self, pos: Position, kind: CellKind) {
        let current = self.kind_at(pos);
        if current == kind {
            return;
        }
        match current {
            CellKind::Start => self.start = None,
            CellKind::Target => self.target = None,
            _ => {}
        }
        match kind {
            CellKind::Start => self.start = Some(pos),
            CellKind::Target => self.target = Some(pos),
            _ => {}
        }
        self.kinds.set_point(Self::point(pos), kind);
        if kind.is_blocked() {
            // Placing an obstacle may split a component
            self.components_dirty = true;
        } else if current.is_blocked() {
            let ix = self.index(pos);
            for n in self.adjacent(pos) {
                if !self.kind_at(n).is_blocked() {
                    let n_ix = self.index(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// In-bounds neighbours in the canonical order up, down, left, right.
    pub(crate) fn adjacent(&self, pos: Position) -> SmallVec<[Position; N_SMALLVEC_SIZE]> {
        let mut out = SmallVec::new();
        if pos.row > 0 {
            out.push(Position::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.rows {
            out.push(Position::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            out.push(Position::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            out.push(Position::new(pos.row, pos.col + 1));
        }
        out
    }
    /// Returns the up to four grid-aligned neighbours of `pos` in the order up, down, left, right.
    /// Obstacles are included; filtering them is up to the search.
    pub fn neighbors(
        &self,
        pos: Position,
    ) -> Result<SmallVec<[Position; N_SMALLVEC_SIZE]>, GridError> {
        self.check_bounds(pos)?;
        Ok(self.adjacent(pos))
    }

    /// Resets `g`, `h`, `f` and the predecessor of every cell. Classifications are untouched.
    pub fn reset_scratch(&mut self) {
        self.scratch.fill(Scratch::default());
    }

    /// Reverts every visited and path marker to empty.
    pub fn clear_markers(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                if self.kind_at(pos).is_marker() {
                    self.write(pos, CellKind::Empty);
                }
            }
        }
    }
    /// Returns every cell to empty and forgets the start and target.
    pub fn clear(&mut self) {
        self.kinds = SimpleValueGrid::new(self.cols, self.rows, CellKind::Empty);
        self.start = None;
        self.target = None;
        self.reset_scratch();
        self.generate_components();
    }
    /// Paints a single playback frame. Start and target cells keep their classification.
    pub fn apply_frame(&mut self, frame: Frame) -> Result<(), GridError> {
        match frame {
            Frame::Visit(pos) => self.set_classification(pos, CellKind::Visited),
            Frame::Path(pos) => self.set_classification(pos, CellKind::Path),
        }
    }
    /// Paints the visited cells and then the path of a finished search. Every frame is
    /// bounds-checked first, so on error the grid is left untouched.
    pub fn mark_result(&mut self, result: &SearchResult) -> Result<(), GridError> {
        result
            .frames()
            .try_for_each(|frame| self.check_bounds(frame.pos()))?;
        result.frames().try_for_each(|frame| self.apply_frame(frame))
    }

    /// Checks if start and goal are on the same connected component.
    pub fn reachable(&mut self, start: Position, goal: Position) -> Result<bool, GridError> {
        self.check_bounds(start)?;
        self.check_bounds(goal)?;
        self.update();
        if self.kind_at(start).is_blocked() || self.kind_at(goal).is_blocked() {
            return Ok(false);
        }
        Ok(self.components.equiv(self.index(start), self.index(goal)))
    }
    /// Checks if start and goal are not on the same connected component.
    pub fn unreachable(&mut self, start: Position, goal: Position) -> Result<bool, GridError> {
        self.reachable(start, goal).map(|r| !r)
    }
    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and links up open grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = UnionFind::new(self.len());
        self.components_dirty = false;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                if self.kind_at(pos).is_blocked() {
                    continue;
                }
                let ix = self.index(pos);
                // Down and right suffice, the other two directions are covered by the neighbour
                for n in [Position::new(row + 1, col), Position::new(row, col + 1)] {
                    if self.in_bounds(n) && !self.kind_at(n).is_blocked() {
                        let n_ix = self.index(n);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for RouteGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let line = (0..self.cols)
                .map(|col| self.kind_at(Position::new(row, col)).symbol())
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the format produced by [Display](fmt::Display): one line per row, one symbol per cell.
/// Blank lines and surrounding whitespace are ignored.
impl FromStr for RouteGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<RouteGrid, GridError> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let cols = lines.first().map(|l| l.chars().count()).ok_or(GridError::Empty)?;
        let mut grid = RouteGrid::try_new(lines.len(), cols)?;
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::RaggedRow {
                    row,
                    found,
                    expected: cols,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let pos = Position::new(row, col);
                let kind =
                    CellKind::from_symbol(symbol).ok_or(GridError::UnknownSymbol { symbol, pos })?;
                if grid.endpoint(kind).is_some() {
                    return Err(GridError::DuplicateEndpoint(kind));
                }
                grid.write(pos, kind);
            }
        }
        grid.generate_components();
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn start_is_a_singleton() {
        let mut grid = RouteGrid::new(3, 3);
        grid.set_classification(p(0, 0), CellKind::Start).unwrap();
        grid.set_classification(p(0, 0), CellKind::Start).unwrap();
        assert_eq!(grid.start(), Some(p(0, 0)));
        assert_eq!(grid.kind(p(0, 0)).unwrap(), CellKind::Start);

        grid.set_classification(p(2, 1), CellKind::Start).unwrap();
        assert_eq!(grid.start(), Some(p(2, 1)));
        assert_eq!(grid.kind(p(0, 0)).unwrap(), CellKind::Empty);
        assert_eq!(grid.kind(p(2, 1)).unwrap(), CellKind::Start);
    }

    #[test]
    fn endpoint_overwrites_other_endpoint() {
        let mut grid = RouteGrid::new(2, 2);
        grid.set_classification(p(0, 0), CellKind::Target).unwrap();
        grid.set_classification(p(0, 0), CellKind::Start).unwrap();
        assert_eq!(grid.start(), Some(p(0, 0)));
        assert_eq!(grid.target(), None);
    }

    #[test]
    fn obstacle_toggles_but_spares_endpoints() {
        let mut grid = RouteGrid::new(2, 2);
        grid.set_classification(p(0, 1), CellKind::Obstacle).unwrap();
        assert_eq!(grid.kind(p(0, 1)).unwrap(), CellKind::Obstacle);
        grid.set_classification(p(0, 1), CellKind::Obstacle).unwrap();
        assert_eq!(grid.kind(p(0, 1)).unwrap(), CellKind::Empty);

        grid.set_classification(p(1, 1), CellKind::Target).unwrap();
        grid.set_classification(p(1, 1), CellKind::Obstacle).unwrap();
        assert_eq!(grid.kind(p(1, 1)).unwrap(), CellKind::Target);
    }

    #[test]
    fn start_replaces_obstacle() {
        let mut grid = RouteGrid::new(1, 2);
        grid.set_classification(p(0, 0), CellKind::Obstacle).unwrap();
        grid.set_classification(p(0, 0), CellKind::Start).unwrap();
        assert_eq!(grid.kind(p(0, 0)).unwrap(), CellKind::Start);
        assert!(grid.reachable(p(0, 0), p(0, 1)).unwrap());
    }

    #[test]
    fn clearing_an_endpoint_forgets_it() {
        let mut grid = RouteGrid::new(2, 2);
        grid.set_classification(p(1, 0), CellKind::Target).unwrap();
        grid.set_classification(p(1, 0), CellKind::Empty).unwrap();
        assert_eq!(grid.target(), None);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut grid = RouteGrid::new(2, 3);
        let err = grid.set_classification(p(2, 0), CellKind::Obstacle).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                pos: p(2, 0),
                rows: 2,
                cols: 3
            }
        );
        assert!(grid.neighbors(p(0, 3)).is_err());
        assert!(grid.cell(p(5, 5)).is_err());
    }

    #[test]
    fn neighbour_order_is_up_down_left_right() {
        let grid = RouteGrid::new(3, 3);
        assert_eq!(
            grid.neighbors(p(1, 1)).unwrap().as_slice(),
            &[p(0, 1), p(2, 1), p(1, 0), p(1, 2)]
        );
        assert_eq!(grid.neighbors(p(0, 0)).unwrap().as_slice(), &[p(1, 0), p(0, 1)]);
        assert_eq!(grid.neighbors(p(2, 2)).unwrap().as_slice(), &[p(1, 2), p(2, 1)]);
    }

    #[test]
    fn neighbours_include_obstacles() {
        let mut grid = RouteGrid::new(1, 2);
        grid.set_classification(p(0, 1), CellKind::Obstacle).unwrap();
        assert_eq!(grid.neighbors(p(0, 0)).unwrap().as_slice(), &[p(0, 1)]);
    }

    #[test]
    fn reset_scratch_restores_defaults() {
        let mut grid = RouteGrid::new(2, 2);
        let ix = grid.index(p(1, 1));
        grid.scratch[ix] = Scratch {
            g: 2.0,
            h: 1.0,
            f: 3.0,
            predecessor: Some(0),
        };
        grid.reset_scratch();
        let cell = grid.cell(p(1, 1)).unwrap();
        assert!(cell.g.is_infinite() && cell.f.is_infinite());
        assert_eq!(cell.h, 0.0);
        assert_eq!(cell.predecessor, None);
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // S#.
        // .#T
        let mut grid: RouteGrid = "S#.\n.#T".parse().unwrap();
        assert!(grid.unreachable(p(0, 0), p(1, 2)).unwrap());
        assert!(grid.reachable(p(0, 0), p(1, 0)).unwrap());
        assert!(grid.reachable(p(0, 2), p(1, 2)).unwrap());

        // Opening the wall joins both halves without regenerating
        grid.set_classification(p(1, 1), CellKind::Obstacle).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(p(0, 0), p(1, 2)).unwrap());

        // Closing it again flags the components as dirty
        grid.set_classification(p(1, 1), CellKind::Obstacle).unwrap();
        assert!(grid.components_dirty);
        assert!(grid.unreachable(p(0, 0), p(1, 2)).unwrap());
        assert!(!grid.components_dirty);
    }

    #[test]
    fn display_and_parse_agree() {
        let text = "S..#\n.#o*\n..#T\n";
        let grid: RouteGrid = text.parse().unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.start(), Some(p(0, 0)));
        assert_eq!(grid.target(), Some(p(2, 3)));
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<RouteGrid>().unwrap_err(), GridError::Empty);
        assert_eq!(
            "...\n..".parse::<RouteGrid>().unwrap_err(),
            GridError::RaggedRow {
                row: 1,
                found: 2,
                expected: 3
            }
        );
        assert_eq!(
            ".x".parse::<RouteGrid>().unwrap_err(),
            GridError::UnknownSymbol {
                symbol: 'x',
                pos: p(0, 1)
            }
        );
        assert_eq!(
            "S.S".parse::<RouteGrid>().unwrap_err(),
            GridError::DuplicateEndpoint(CellKind::Start)
        );
    }

    #[test]
    fn markers_only_paint_open_cells() {
        let mut grid: RouteGrid = "S.#T".parse().unwrap();
        for col in 0..4 {
            grid.set_classification(p(0, col), CellKind::Visited).unwrap();
        }
        assert_eq!(grid.to_string(), "So#T\n");
        grid.set_classification(p(0, 1), CellKind::Path).unwrap();
        assert_eq!(grid.to_string(), "S*#T\n");
        grid.clear_markers();
        assert_eq!(grid.to_string(), "S.#T\n");
    }

    #[test]
    fn clear_resets_everything() {
        let mut grid: RouteGrid = "S#\n.T".parse().unwrap();
        grid.clear();
        assert_eq!(grid.to_string(), "..\n..\n");
        assert_eq!(grid.start(), None);
        assert_eq!(grid.target(), None);
        assert!(grid.reachable(p(0, 0), p(1, 1)).unwrap());
    }

    #[test]
    fn oversized_grids_are_rejected() {
        assert_eq!(
            RouteGrid::try_new(usize::MAX, 2).unwrap_err(),
            GridError::TooLarge {
                rows: usize::MAX,
                cols: 2
            }
        );
        let wide = i32::MAX as usize + 1;
        assert_eq!(
            RouteGrid::try_new(1, wide).unwrap_err(),
            GridError::TooLarge { rows: 1, cols: wide }
        );
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn new_panics_on_overflow() {
        RouteGrid::new(usize::MAX, usize::MAX);
    }

    #[test]
    fn default_grid_size() {
        let grid = RouteGrid::default();
        assert_eq!(grid.rows(), DEFAULT_GRID_SIZE);
        assert_eq!(grid.cols(), DEFAULT_GRID_SIZE);
        assert_eq!(grid.len(), DEFAULT_GRID_SIZE * DEFAULT_GRID_SIZE);
    }
}
