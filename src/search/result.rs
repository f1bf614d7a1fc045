use crate::cell::Position;

/// Outcome of a single search: every expanded cell in expansion order and, if the target was
/// reached, the path from start to target with both endpoints included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub path: Vec<Position>,
    pub visited: Vec<Position>,
    pub found: bool,
}

/// One step of playback. Presentation layers iterate [SearchResult::frames] and decide on their
/// own how long to wait between frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Visit(Position),
    Path(Position),
}

impl Frame {
    pub fn pos(self) -> Position {
        match self {
            Frame::Visit(pos) | Frame::Path(pos) => pos,
        }
    }
}

impl SearchResult {
    pub(crate) fn not_found(visited: Vec<Position>) -> SearchResult {
        SearchResult {
            path: Vec::new(),
            visited,
            found: false,
        }
    }
    /// Number of cells on the path, endpoints included.
    pub fn path_len(&self) -> usize {
        self.path.len()
    }
    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty() && self.path.is_empty()
    }
    /// All visited cells followed by all path cells.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.visited
            .iter()
            .map(|&p| Frame::Visit(p))
            .chain(self.path.iter().map(|&p| Frame::Path(p)))
    }
}
