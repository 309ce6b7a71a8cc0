//! Decomposition system - corpses rot in place and feed the soil

use std::collections::HashSet;

use hecs::Entity;

use crate::engine::Environment;

/// Rot every corpse by one step and fertilize the cell it rests on.
///
/// A corpse that is being hauled keeps rotting but doesn't fertilize; its
/// source cell catches up once it is set down.
pub fn decompose_corpses(env: &mut Environment) {
    let rate = env.config.decomposition.rate;
    let max = env.config.decomposition.max;
    let max_fertility = env.config.soil.max_fertility;

    let hauled: HashSet<Entity> = env
        .creatures
        .iter()
        .filter_map(|e| env.creature(*e))
        .filter(|c| c.is_alive() && c.carrying_food)
        .filter_map(|c| c.target.creature())
        .collect();

    for entity in env.creatures.clone() {
        let Some(pos) = env.position(entity) else {
            continue;
        };
        {
            let Some(mut corpse) = env.creature_mut(entity) else {
                continue;
            };
            if !corpse.dead {
                continue;
            }
            corpse.decomposition = (corpse.decomposition + rate).min(max);
        }

        if hauled.contains(&entity) {
            continue;
        }
        env.decomposing.insert(entity, pos);
        env.soil.add_fertility(pos, rate, max_fertility);
    }
}
