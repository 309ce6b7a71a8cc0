//! Movement resolver - one grid step per tick, with two-body corpse carrying

use hecs::Entity;
use tracing::trace;

use crate::components::{GridPos, ALL_STEPS};
use crate::engine::Environment;

/// Result of a single movement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Already standing on the target.
    AtTarget,
    Moved,
    /// Every candidate cell was taken.
    Blocked,
    /// The carried corpse was gone or no longer adjacent; nothing moved.
    LostCarry,
}

impl MoveOutcome {
    pub fn succeeded(self) -> bool {
        matches!(self, MoveOutcome::AtTarget | MoveOutcome::Moved)
    }
}

/// Unit steps to try when heading by `(dx, dy)`, best first.
///
/// Straight along the dominant axis, then the diagonal, then the other axis;
/// then sidesteps that still make progress; then any neighbour at all.
pub fn candidate_steps(dx: i32, dy: i32) -> Vec<(i32, i32)> {
    let (sx, sy) = (dx.signum(), dy.signum());
    let mut steps = Vec::with_capacity(16);

    if dx.abs() > dy.abs() {
        steps.push((sx, 0));
        if dy != 0 {
            steps.push((sx, sy));
            steps.push((0, sy));
        }
    } else if dy != 0 {
        steps.push((0, sy));
        if dx != 0 {
            steps.push((sx, sy));
            steps.push((sx, 0));
        }
    }

    if dx != 0 {
        steps.push((sx, 1));
        steps.push((sx, -1));
    }
    if dy != 0 {
        steps.push((1, sy));
        steps.push((-1, sy));
    }

    steps.extend(ALL_STEPS);
    steps
}

/// Try to step `entity` toward `target`. When `carrying` names a corpse the
/// pair moves together and the corpse ends next to the carrier.
///
/// Only the arena positions and the occupancy grid are touched; the caller
/// owns the creature's flags.
pub(crate) fn resolve_move(
    env: &mut Environment,
    entity: Entity,
    carrying: Option<Entity>,
    target: GridPos,
) -> MoveOutcome {
    let Some(pos) = env.position(entity) else {
        return MoveOutcome::Blocked;
    };
    let (dx, dy) = (target.x - pos.x, target.y - pos.y);
    if dx == 0 && dy == 0 {
        return MoveOutcome::AtTarget;
    }
    let steps = candidate_steps(dx, dy);

    if let Some(corpse) = carrying {
        return move_with_corpse(env, entity, pos, corpse, target, &steps);
    }

    for (sx, sy) in steps {
        let next = pos.offset(sx, sy);
        if env.grid.is_free(next) {
            env.grid.relocate(entity, pos, next);
            env.set_position(entity, next);
            return MoveOutcome::Moved;
        }
    }
    MoveOutcome::Blocked
}

fn move_with_corpse(
    env: &mut Environment,
    carrier: Entity,
    pos: GridPos,
    corpse: Entity,
    target: GridPos,
    steps: &[(i32, i32)],
) -> MoveOutcome {
    let Some(corpse_pos) = env.position(corpse) else {
        return MoveOutcome::LostCarry;
    };
    let still_dead = env.creature(corpse).is_some_and(|c| c.dead);
    if !still_dead || !pos.is_adjacent(&corpse_pos) {
        return MoveOutcome::LostCarry;
    }

    for &(sx, sy) in steps {
        let carrier_next = pos.offset(sx, sy);
        if !env.grid.is_free(carrier_next) {
            continue;
        }

        // The corpse may take any open cell beside the carrier's new spot,
        // including the two cells the pair is about to leave.
        let mut best: Option<(GridPos, i32)> = None;
        for spot in carrier_next.cardinal_neighbors() {
            let open = spot == pos || spot == corpse_pos || env.grid.is_free(spot);
            if !open || !env.grid.in_bounds(spot) {
                continue;
            }
            let distance = spot.manhattan(&target) + carrier_next.manhattan(&target);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((spot, distance));
            }
        }

        if let Some((corpse_next, _)) = best {
            env.grid.remove_entity(pos, carrier);
            env.grid.remove_entity(corpse_pos, corpse);
            env.grid.insert(carrier_next, carrier);
            env.grid.insert(corpse_next, corpse);
            env.set_position(carrier, carrier_next);
            env.set_position(corpse, corpse_next);
            trace!(
                "Carried corpse {} -> {}, carrier now at {}",
                corpse_pos,
                corpse_next,
                carrier_next
            );
            return MoveOutcome::Moved;
        }
    }
    MoveOutcome::Blocked
}
