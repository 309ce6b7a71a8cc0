//! Population statistics.

use serde::Serialize;

use crate::components::DeathCause;
use crate::engine::Environment;
use crate::zones::ZoneKind;

/// Running totals of lifecycle events since the colony was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleCounters {
    /// Every creature placed on the grid, hatchlings included.
    pub births: u64,
    pub hatched: u64,
    pub eggs_laid: u64,
    pub deaths_old_age: u64,
    pub deaths_starvation: u64,
    pub deaths_unknown: u64,
    /// Corpses fully eaten and rotted away.
    pub removed: u64,
}

impl LifecycleCounters {
    pub fn record_death(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::OldAge => self.deaths_old_age += 1,
            DeathCause::Starvation => self.deaths_starvation += 1,
            DeathCause::Unknown => self.deaths_unknown += 1,
        }
    }

    pub fn deaths(&self) -> u64 {
        self.deaths_old_age + self.deaths_starvation + self.deaths_unknown
    }
}

/// Point-in-time summary of the colony.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PopulationStats {
    pub tick: u64,
    pub live: usize,
    pub dead: usize,
    pub eggs: usize,
    pub sleeping: usize,
    pub eating: usize,
    pub carrying: usize,
    pub avg_health: f64,
    pub avg_energy: f64,
    pub avg_hunger: f64,
    pub avg_happiness: f64,
    pub total_fertility: f64,
    pub total_grass: f64,
    pub food_zone_scale: f64,
    pub nursery_zone_scale: f64,
    pub sleeping_zone_scale: f64,
    pub lifecycle: LifecycleCounters,
}

impl PopulationStats {
    pub fn collect(env: &Environment) -> Self {
        let mut stats = Self {
            tick: env.tick(),
            eggs: env.eggs().len(),
            total_fertility: env.soil().total_fertility(),
            total_grass: env.soil().total_grass(),
            food_zone_scale: env.zones().scale(ZoneKind::Food),
            nursery_zone_scale: env.zones().scale(ZoneKind::Nursery),
            sleeping_zone_scale: env.zones().scale(ZoneKind::Sleeping),
            lifecycle: *env.lifecycle(),
            ..Default::default()
        };

        for creature in env.creatures().iter().filter_map(|e| env.creature(*e)) {
            if creature.dead {
                stats.dead += 1;
                continue;
            }
            stats.live += 1;
            stats.sleeping += creature.sleeping as usize;
            stats.eating += creature.eating as usize;
            stats.carrying += creature.carrying_food as usize;
            stats.avg_health += creature.health;
            stats.avg_energy += creature.energy;
            stats.avg_hunger += creature.hunger;
            stats.avg_happiness += creature.happiness;
        }

        if stats.live > 0 {
            let n = stats.live as f64;
            stats.avg_health /= n;
            stats.avg_energy /= n;
            stats.avg_hunger /= n;
            stats.avg_happiness /= n;
        }
        stats
    }
}

impl std::fmt::Display for PopulationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tick {:>6} | live {:>3} dead {:>3} eggs {:>3} | hp {:>5.1} en {:>5.1} hu {:>5.1} joy {:>5.1} | soil {:>8.1} grass {:>8.1}",
            self.tick,
            self.live,
            self.dead,
            self.eggs,
            self.avg_health,
            self.avg_energy,
            self.avg_hunger,
            self.avg_happiness,
            self.total_fertility,
            self.total_grass,
        )
    }
}
