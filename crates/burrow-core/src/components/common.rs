//! Common components used across creatures and eggs.

use serde::{Deserialize, Serialize};

/// Orthogonal unit steps, in the order adjacent cells are probed.
pub const CARDINAL_STEPS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Every unit step, cardinal first then diagonal.
pub const ALL_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Integer cell position on the colony grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chessboard distance; "within radius r" checks use this.
    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// True when the cells share an edge (diagonals do not count).
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.manhattan(other) == 1
    }

    pub fn cardinal_neighbors(&self) -> impl Iterator<Item = GridPos> + '_ {
        CARDINAL_STEPS.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn clamp(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            pos.x.clamp(0, self.width - 1),
            pos.y.clamp(0, self.height - 1),
        )
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = GridPos::new(1, 2);
        let b = GridPos::new(4, 0);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(a.chebyshev(&b), 3);
    }

    #[test]
    fn test_adjacency_excludes_diagonals() {
        let origin = GridPos::new(5, 5);
        assert!(origin.is_adjacent(&GridPos::new(5, 6)));
        assert!(origin.is_adjacent(&GridPos::new(4, 5)));
        assert!(!origin.is_adjacent(&GridPos::new(6, 6)));
        assert!(!origin.is_adjacent(&origin));
    }

    #[test]
    fn test_bounds_clamp_and_contains() {
        let bounds = Bounds::new(10, 8);
        assert!(bounds.contains(GridPos::new(9, 7)));
        assert!(!bounds.contains(GridPos::new(10, 0)));
        assert!(!bounds.contains(GridPos::new(0, -1)));
        assert_eq!(bounds.clamp(GridPos::new(-3, 12)), GridPos::new(0, 7));
        assert_eq!(bounds.cell_count(), 80);
    }

    #[test]
    fn test_cardinal_neighbors() {
        let n: Vec<_> = GridPos::new(0, 0).cardinal_neighbors().collect();
        assert_eq!(n.len(), 4);
        assert!(n.iter().all(|p| p.is_adjacent(&GridPos::new(0, 0))));
    }
}
