//! Occupancy grid: at most one entity per cell.
//!
//! The grid is the single source of truth for "is this cell free". Anything
//! outside the bounds counts as occupied so movement code can reject it with
//! the same check.

use std::collections::HashMap;

use hecs::Entity;

use crate::components::{Bounds, GridPos};

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    bounds: Bounds,
    cells: HashMap<GridPos, Entity>,
}

impl OccupancyGrid {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            cells: HashMap::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        self.bounds.contains(pos)
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        !self.in_bounds(pos) || self.cells.contains_key(&pos)
    }

    pub fn is_free(&self, pos: GridPos) -> bool {
        !self.is_occupied(pos)
    }

    pub fn get(&self, pos: GridPos) -> Option<Entity> {
        self.cells.get(&pos).copied()
    }

    /// Place an entity; returns whatever previously held the cell.
    pub fn insert(&mut self, pos: GridPos, entity: Entity) -> Option<Entity> {
        self.cells.insert(pos, entity)
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<Entity> {
        self.cells.remove(&pos)
    }

    /// Clear the cell only if it still belongs to `entity`.
    pub fn remove_entity(&mut self, pos: GridPos, entity: Entity) -> bool {
        if self.cells.get(&pos) == Some(&entity) {
            self.cells.remove(&pos);
            true
        } else {
            false
        }
    }

    /// Move `entity` from `from` to `to`. Fails if `to` is taken by someone else.
    pub fn relocate(&mut self, entity: Entity, from: GridPos, to: GridPos) -> bool {
        if from == to {
            return true;
        }
        match self.cells.get(&to) {
            Some(&other) if other != entity => return false,
            _ => {}
        }
        if !self.in_bounds(to) {
            return false;
        }
        self.remove_entity(from, entity);
        self.cells.insert(to, entity);
        true
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Entity)> + '_ {
        self.cells.iter().map(|(pos, e)| (*pos, *e))
    }

    /// Free, in-bounds cells sharing an edge with `pos`.
    pub fn open_neighbors(&self, pos: GridPos) -> Vec<GridPos> {
        pos.cardinal_neighbors().filter(|p| self.is_free(*p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    fn two_entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn(()), world.spawn(()))
    }

    #[test]
    fn test_out_of_bounds_is_occupied() {
        let grid = OccupancyGrid::new(Bounds::new(3, 3));
        assert!(grid.is_occupied(GridPos::new(-1, 0)));
        assert!(grid.is_occupied(GridPos::new(3, 1)));
        assert!(grid.is_free(GridPos::new(2, 2)));
    }

    #[test]
    fn test_relocate_respects_other_occupants() {
        let (a, b) = two_entities();
        let mut grid = OccupancyGrid::new(Bounds::new(5, 5));
        grid.insert(GridPos::new(0, 0), a);
        grid.insert(GridPos::new(1, 0), b);

        assert!(!grid.relocate(a, GridPos::new(0, 0), GridPos::new(1, 0)));
        assert_eq!(grid.get(GridPos::new(0, 0)), Some(a));

        assert!(grid.relocate(a, GridPos::new(0, 0), GridPos::new(0, 1)));
        assert_eq!(grid.get(GridPos::new(0, 0)), None);
        assert_eq!(grid.get(GridPos::new(0, 1)), Some(a));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_remove_entity_only_clears_own_cell() {
        let (a, b) = two_entities();
        let mut grid = OccupancyGrid::new(Bounds::new(5, 5));
        grid.insert(GridPos::new(2, 2), b);
        assert!(!grid.remove_entity(GridPos::new(2, 2), a));
        assert!(grid.remove_entity(GridPos::new(2, 2), b));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_open_neighbors_skips_edges_and_occupants() {
        let (a, _) = two_entities();
        let mut grid = OccupancyGrid::new(Bounds::new(3, 3));
        grid.insert(GridPos::new(1, 0), a);
        let open = grid.open_neighbors(GridPos::new(0, 0));
        assert_eq!(open, vec![GridPos::new(0, 1)]);
    }
}
