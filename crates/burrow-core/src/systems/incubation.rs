//! Incubation system - egg timers, parent release and hatching

use hecs::Entity;
use tracing::trace;

use crate::components::{Egg, GridPos};
use crate::engine::Environment;

/// Advance every egg by one tick.
///
/// An egg that becomes ready releases the flagged creatures around it so
/// they may breed again. Eggs hatch on the tick after they become ready,
/// leaving a newborn on the same cell.
pub fn incubate_eggs(env: &mut Environment) {
    let mut hatching: Vec<Entity> = Vec::new();

    for egg_entity in env.eggs.clone() {
        let Some(pos) = env.position(egg_entity) else {
            continue;
        };
        let (was_ready, became_ready) = {
            let Ok(mut egg) = env.world.get::<&mut Egg>(egg_entity) else {
                continue;
            };
            let was_ready = egg.ready_to_hatch;
            let became_ready = egg.advance();
            (was_ready, became_ready)
        };

        if became_ready {
            release_parents(env, pos);
        }
        if was_ready {
            hatching.push(egg_entity);
        }
    }

    for egg in hatching {
        env.hatch(egg);
    }
}

/// Clear the "waiting on an egg" flag on every live creature within
/// `egg.parent_range` of the egg. The recorded parent gets no special
/// treatment; it is released only if it is close by.
fn release_parents(env: &mut Environment, egg_pos: GridPos) {
    let range = env.config.egg.parent_range;
    let nearby: Vec<Entity> = env
        .creatures
        .iter()
        .copied()
        .filter(|e| env.position(*e).is_some_and(|p| p.manhattan(&egg_pos) <= range))
        .collect();

    for entity in nearby {
        if let Some(mut c) = env.creature_mut(entity) {
            if c.is_alive() && c.has_laid_egg {
                c.has_laid_egg = false;
                trace!("Egg at {} is ready; released {:?}", egg_pos, entity);
            }
        }
    }
}
