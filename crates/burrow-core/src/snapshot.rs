//! Read-only views of the colony for front ends.
//!
//! Handles are exported as their raw bits so a view can be matched back to
//! the entity that produced it.

use hecs::Entity;
use serde::Serialize;

use crate::components::{BehaviorState, DeathCause, GridPos};
use crate::engine::Environment;
use crate::stats::PopulationStats;
use crate::zones::ZoneKind;

#[derive(Debug, Clone, Serialize)]
pub struct CreatureView {
    pub id: u64,
    pub pos: GridPos,
    pub health: f64,
    pub energy: f64,
    pub hunger: f64,
    pub happiness: f64,
    pub age: u32,
    pub max_age: u32,
    pub mature: bool,
    pub dead: bool,
    pub sleeping: bool,
    pub eating: bool,
    pub carrying_food: bool,
    pub has_laid_egg: bool,
    pub state: BehaviorState,
    pub death_cause: Option<DeathCause>,
    pub food_value: f64,
    pub decomposition: f64,
    pub status: Vec<&'static str>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EggView {
    pub id: u64,
    pub pos: GridPos,
    pub timer: u32,
    pub hatch_time: u32,
    pub ready_to_hatch: bool,
    pub progress: f64,
    pub time_remaining: u32,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub kind: ZoneKind,
    pub center: GridPos,
    pub radius: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub tick_rate: u32,
    pub width: i32,
    pub height: i32,
    pub creatures: Vec<CreatureView>,
    pub eggs: Vec<EggView>,
    pub zones: Vec<ZoneView>,
    pub stats: PopulationStats,
}

fn id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

impl Environment {
    pub fn creature_view(&self, entity: Entity) -> Option<CreatureView> {
        let c = self.creature(entity)?;
        let pos = self.position(entity)?;
        Some(CreatureView {
            id: id(entity),
            pos,
            health: c.health,
            energy: c.energy,
            hunger: c.hunger,
            happiness: c.happiness,
            age: c.age,
            max_age: c.max_age,
            mature: c.mature,
            dead: c.dead,
            sleeping: c.sleeping,
            eating: c.eating,
            carrying_food: c.carrying_food,
            has_laid_egg: c.has_laid_egg,
            state: c.state,
            death_cause: c.death_cause,
            food_value: c.food_value,
            decomposition: c.decomposition,
            status: c.status_labels(self.config.creature.elderly_fraction),
            selected: self.is_selected(entity),
        })
    }

    pub fn egg_view(&self, entity: Entity) -> Option<EggView> {
        let egg = self.egg(entity)?;
        let pos = self.position(entity)?;
        Some(EggView {
            id: id(entity),
            pos,
            timer: egg.timer,
            hatch_time: egg.hatch_time,
            ready_to_hatch: egg.ready_to_hatch,
            progress: egg.progress(),
            time_remaining: egg.time_remaining(),
            selected: self.is_selected(entity),
        })
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let bounds = self.bounds();
        WorldSnapshot {
            tick: self.tick(),
            tick_rate: self.tick_rate(),
            width: bounds.width,
            height: bounds.height,
            creatures: self
                .creatures()
                .iter()
                .filter_map(|e| self.creature_view(*e))
                .collect(),
            eggs: self.eggs().iter().filter_map(|e| self.egg_view(*e)).collect(),
            zones: ZoneKind::ALL
                .iter()
                .map(|&kind| {
                    let zone = self.zones().get(kind);
                    ZoneView {
                        kind,
                        center: zone.center_cell(),
                        radius: zone.radius(),
                        scale: zone.scale,
                    }
                })
                .collect(),
            stats: PopulationStats::collect(self),
        }
    }
}
