//! Behavior system - one decision per creature per tick
//!
//! Priority order: aging and death, needs, critical hunger, sleep, then the
//! normal day (follow target, reproduce, eat, haul corpses). Happiness is
//! recomputed at the end of every branch that doesn't bail out early.

use std::f64::consts::TAU;

use hecs::Entity;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::movement::{resolve_move, MoveOutcome};
use crate::components::{BehaviorState, Creature, DeathCause, GridPos, Target, STAT_MAX};
use crate::config::CreatureConfig;
use crate::engine::Environment;
use crate::zones::ZoneKind;

/// Run one behavior tick for a live creature.
///
/// The creature is copied out of the arena, driven through the decision
/// tree, and written back once at the end.
pub fn tick_creature(env: &mut Environment, entity: Entity) {
    let Some(mut me) = env.creature(entity) else {
        return;
    };
    if me.dead {
        return;
    }
    let config = env.config.creature.clone();
    decide(env, entity, &mut me, &config);
    me.clamp_stats();
    env.store_creature(entity, me);
}

fn decide(env: &mut Environment, entity: Entity, me: &mut Creature, cfg: &CreatureConfig) {
    // Aging
    me.age += 1;
    if me.age >= cfg.mature_age {
        me.mature = true;
    }
    if me.is_elderly(cfg.elderly_fraction) && env.rng.gen::<f64>() < cfg.age_health_loss_chance {
        me.health = (me.health - 1.0).max(0.0);
        me.age_related_health_loss = true;
    }
    if me.age >= me.max_age {
        die(env, entity, me, DeathCause::OldAge, cfg);
        return;
    }

    // Needs
    if env.rng.gen::<f64>() < cfg.hunger_decay_chance {
        me.hunger = (me.hunger - 1.0).max(0.0);
    }
    let energy_cost = if me.eating || me.carrying_food {
        cfg.busy_energy_cost
    } else {
        cfg.energy_cost
    };
    me.energy = (me.energy - energy_cost).max(0.0);
    me.eating = false;

    if me.hunger <= 0.0 {
        me.health = (me.health - 1.0).max(0.0);
        if me.health <= 0.0 {
            die(env, entity, me, DeathCause::Starvation, cfg);
            return;
        }
    }
    if me.health <= 0.0 {
        die(env, entity, me, DeathCause::Unknown, cfg);
        return;
    }

    let Some(pos) = env.position(entity) else {
        return;
    };

    // Critical hunger overrides everything else
    if me.hunger <= cfg.critical_hunger {
        me.sleeping = false;
        me.drop_carry();
        me.state = BehaviorState::SeekingFood;
        if try_eat_adjacent(env, entity, me, cfg) {
            return;
        }
        match env.find_nearest_food(pos) {
            Some((food, food_pos)) => {
                me.target = Target::Creature(food);
                step_toward(env, entity, me, food_pos);
            }
            None => {
                let jitter = wander_target(env, pos, cfg);
                step_toward(env, entity, me, jitter);
            }
        }
        return;
    }

    // Sleep
    if me.sleeping {
        me.state = BehaviorState::Sleeping;
        if !env.is_in_area(pos, ZoneKind::Sleeping) {
            me.target = Target::Zone(ZoneKind::Sleeping);
            let bed = env.get_area_center(ZoneKind::Sleeping);
            step_toward(env, entity, me, bed);
        } else {
            let recovery = if me.hunger > cfg.well_fed_hunger {
                cfg.sleep_recovery_fed
            } else {
                cfg.sleep_recovery_hungry
            };
            me.energy = (me.energy + recovery).min(STAT_MAX);
            if me.energy >= cfg.wake_threshold
                || me.hunger <= cfg.critical_hunger
                || me.health < cfg.wake_health
            {
                me.sleeping = false;
                me.target = Target::None;
                me.state = BehaviorState::Idle;
            }
        }
        update_happiness(env, entity, me);
        return;
    }

    if me.energy <= cfg.rest_threshold && me.hunger > cfg.critical_hunger {
        me.sleeping = true;
        me.drop_carry();
        me.target = Target::Zone(ZoneKind::Sleeping);
        me.state = BehaviorState::Sleeping;
        let bed = env.get_area_center(ZoneKind::Sleeping);
        step_toward(env, entity, me, bed);
        update_happiness(env, entity, me);
        return;
    }

    // Normal day
    me.state = BehaviorState::Idle;
    follow_target(env, entity, me, cfg);

    if me.egg_laying_cooldown > 0 {
        me.egg_laying_cooldown -= 1;
    }

    if me.can_reproduce(cfg) {
        let Some(here) = env.position(entity) else {
            return;
        };
        if env.is_in_area(here, ZoneKind::Nursery) {
            if lay_egg(env, entity, me, here, cfg) {
                return;
            }
        } else {
            me.target = Target::Zone(ZoneKind::Nursery);
            me.state = BehaviorState::SeekingNursery;
            return;
        }
    }

    let ate = me.hunger < cfg.eat_hunger_threshold && try_eat_adjacent(env, entity, me, cfg);
    if !ate {
        haul_corpses(env, entity, me);
    }

    update_happiness(env, entity, me);
}

fn die(env: &mut Environment, entity: Entity, me: &mut Creature, cause: DeathCause, cfg: &CreatureConfig) {
    me.die(cause, cfg.corpse_food_value);
    env.lifecycle.record_death(cause);
    if let Some(pos) = env.position(entity) {
        debug!("Creature died of {} at {} (age {})", cause, pos, me.age);
    }
}

/// Step toward `destination`, dragging a carried corpse if there is one.
fn step_toward(env: &mut Environment, entity: Entity, me: &mut Creature, destination: GridPos) {
    let destination = env.bounds().clamp(destination);
    let carrying = if me.carrying_food {
        me.target.creature()
    } else {
        None
    };
    if resolve_move(env, entity, carrying, destination) == MoveOutcome::LostCarry {
        me.drop_carry();
    }
}

/// A random nearby cell to drift toward.
fn wander_target(env: &mut Environment, pos: GridPos, cfg: &CreatureConfig) -> GridPos {
    if env.rng.gen::<f64>() < cfg.wander_chance {
        pos.offset(env.rng.gen_range(-1..=1), env.rng.gen_range(-1..=1))
    } else {
        let angle: f64 = env.rng.gen_range(0.0..TAU);
        pos.offset(angle.cos().round() as i32, angle.sin().round() as i32)
    }
}

/// Move toward whatever the creature is currently after.
fn follow_target(env: &mut Environment, entity: Entity, me: &mut Creature, cfg: &CreatureConfig) {
    let Some(pos) = env.position(entity) else {
        return;
    };

    let destination = match me.target {
        Target::Creature(other) => match (env.creature(other), env.position(other)) {
            (Some(c), Some(_)) if c.dead && me.carrying_food => {
                env.get_area_center(ZoneKind::Food)
            }
            (Some(_), Some(other_pos)) => other_pos,
            _ => {
                me.drop_carry();
                wander_target(env, pos, cfg)
            }
        },
        Target::Egg(egg) => match (env.egg(egg), env.position(egg)) {
            (Some(_), Some(egg_pos)) => egg_pos,
            _ => {
                me.target = Target::None;
                wander_target(env, pos, cfg)
            }
        },
        Target::Zone(kind) => env.get_area_center(kind),
        Target::None => wander_target(env, pos, cfg),
    };

    step_toward(env, entity, me, destination);

    if me.carrying_food {
        if let Some(corpse) = me.target.creature() {
            let delivered = env
                .position(corpse)
                .is_some_and(|p| env.is_in_area(p, ZoneKind::Food));
            if delivered {
                debug!("Corpse delivered to the food area");
                me.drop_carry();
            }
        }
    }
}

/// Lay an egg on a random open nursery cell beside the creature.
fn lay_egg(
    env: &mut Environment,
    entity: Entity,
    me: &mut Creature,
    pos: GridPos,
    cfg: &CreatureConfig,
) -> bool {
    let spots: Vec<GridPos> = env
        .grid
        .open_neighbors(pos)
        .into_iter()
        .filter(|p| env.is_in_area(*p, ZoneKind::Nursery))
        .collect();
    let Some(&spot) = spots.choose(&mut env.rng) else {
        return false;
    };
    if env.spawn_egg(spot, Some(entity)).is_err() {
        return false;
    }

    me.energy = (me.energy - cfg.egg_energy_cost).max(0.0);
    me.has_laid_egg = true;
    me.egg_laying_cooldown = cfg.egg_cooldown;
    me.target = Target::None;
    me.state = BehaviorState::LayingEgg;
    env.lifecycle.eggs_laid += 1;
    debug!("Egg laid at {}", spot);
    true
}

/// Take a bite of the leanest adjacent corpse.
fn try_eat_adjacent(
    env: &mut Environment,
    entity: Entity,
    me: &mut Creature,
    cfg: &CreatureConfig,
) -> bool {
    if me.sleeping || me.hunger >= STAT_MAX {
        return false;
    }
    let Some(pos) = env.position(entity) else {
        return false;
    };

    let mut food: Vec<(Entity, f64)> = pos
        .cardinal_neighbors()
        .filter_map(|cell| env.grid.get(cell))
        .filter_map(|e| {
            let c = env.creature(e)?;
            c.is_food_source().then_some((e, c.food_value))
        })
        .collect();
    food.sort_by(|a, b| a.1.total_cmp(&b.1));

    let Some(&(corpse, _)) = food.first() else {
        return false;
    };
    let bite = match env.creature_mut(corpse) {
        Some(mut c) => c.yield_food(cfg.max_bite),
        None => return false,
    };
    me.feed(bite, cfg.bite_multiplier);
    true
}

/// Keep hold of the current corpse, or claim an adjacent unclaimed one that
/// isn't already in the food area.
fn haul_corpses(env: &mut Environment, entity: Entity, me: &mut Creature) {
    let Some(pos) = env.position(entity) else {
        return;
    };

    if me.carrying_food {
        let holding = me.target.creature().is_some_and(|corpse| {
            env.creature(corpse).is_some_and(|c| c.dead)
                && env.position(corpse).is_some_and(|p| p.is_adjacent(&pos))
        });
        if !holding {
            me.drop_carry();
        }
    }

    if !me.carrying_food {
        let claim = pos
            .cardinal_neighbors()
            .filter_map(|cell| env.grid.get(cell))
            .find(|&e| {
                env.creature(e).is_some_and(|c| c.is_food_source())
                    && env
                        .position(e)
                        .is_some_and(|p| !env.is_in_area(p, ZoneKind::Food))
                    && !is_claimed(env, e, entity)
            });
        if let Some(corpse) = claim {
            me.target = Target::Creature(corpse);
            me.carrying_food = true;
            debug!("Picked up corpse next to {}", pos);
        }
    }

    if me.carrying_food {
        me.state = BehaviorState::CarryingCorpse;
    }
}

/// Some other live creature already has `corpse` as its target.
fn is_claimed(env: &Environment, corpse: Entity, except: Entity) -> bool {
    env.creatures.iter().any(|&e| {
        e != except
            && env
                .creature(e)
                .is_some_and(|c| c.is_alive() && c.target == Target::Creature(corpse))
    })
}

/// Weighted blend of the vital stats, age and company, nudged by situation.
fn update_happiness(env: &Environment, entity: Entity, me: &mut Creature) {
    let Some(pos) = env.position(entity) else {
        return;
    };
    let foraging = &env.config.foraging;

    let health = 30.0 * me.health / STAT_MAX;
    let hunger = 25.0 * me.hunger / STAT_MAX;
    let energy = 20.0 * me.energy / STAT_MAX;
    let age = 10.0 * (1.0 - me.age_fraction() * 0.5).max(0.0);
    let company = env.count_live_within(pos, foraging.social_radius, Some(entity)) as f64;
    let social = 15.0 * (company / foraging.social_saturation).min(1.0);

    let mut happiness = health + hunger + energy + age + social;
    if me.sleeping && env.is_in_area(pos, ZoneKind::Sleeping) {
        happiness += 10.0;
    }
    if me.has_laid_egg {
        happiness += 15.0;
    }
    if me.carrying_food {
        happiness -= 5.0;
    }
    if me.age_related_health_loss {
        happiness -= 10.0;
    }
    me.happiness = happiness.clamp(0.0, STAT_MAX);
}
