use core::fmt;

/// A plain (row, column) coordinate. Row 0 is the top of the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }
    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Position {
        Position { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> (usize, usize) {
        (pos.row, pos.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Classification of a grid cell. [Visited](CellKind::Visited) and [Path](CellKind::Path) are
/// presentation markers painted by the caller after a search; the search itself never writes
/// them and treats them like [Empty](CellKind::Empty).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    #[default]
    Empty,
    Start,
    Target,
    Obstacle,
    Visited,
    Path,
}

impl CellKind {
    /// Only obstacles block movement.
    pub fn is_blocked(self) -> bool {
        self == CellKind::Obstacle
    }
    pub fn is_endpoint(self) -> bool {
        matches!(self, CellKind::Start | CellKind::Target)
    }
    pub fn is_marker(self) -> bool {
        matches!(self, CellKind::Visited | CellKind::Path)
    }
    /// Cells that carry no user-placed classification.
    pub fn is_open(self) -> bool {
        matches!(self, CellKind::Empty | CellKind::Visited | CellKind::Path)
    }
    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Start => 'S',
            CellKind::Target => 'T',
            CellKind::Obstacle => '#',
            CellKind::Visited => 'o',
            CellKind::Path => '*',
        }
    }
    pub fn from_symbol(symbol: char) -> Option<CellKind> {
        match symbol {
            '.' => Some(CellKind::Empty),
            'S' => Some(CellKind::Start),
            'T' => Some(CellKind::Target),
            '#' => Some(CellKind::Obstacle),
            'o' => Some(CellKind::Visited),
            '*' => Some(CellKind::Path),
            _ => None,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CellKind::Empty => "empty",
            CellKind::Start => "start",
            CellKind::Target => "target",
            CellKind::Obstacle => "obstacle",
            CellKind::Visited => "visited",
            CellKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// Per-run search state of a single cell. The predecessor is an index into the grid arena
/// rather than a reference so the whole scratch array can be reset in one pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Scratch {
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub predecessor: Option<usize>,
}

impl Default for Scratch {
    fn default() -> Scratch {
        Scratch {
            g: f64::INFINITY,
            h: 0.0,
            f: f64::INFINITY,
            predecessor: None,
        }
    }
}

/// Read-only view of a cell: its classification together with the scratch values left by the
/// most recent search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    pub pos: Position,
    pub kind: CellKind,
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub predecessor: Option<Position>,
}
