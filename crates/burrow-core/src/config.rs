//! Simulation tuning parameters.
//!
//! Every constant the colony runs on lives here so a TOML file can override
//! any subset of them. Sections missing from the file fall back to
//! [`Default`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::zones::ZoneKind;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub creature: CreatureConfig,
    pub egg: EggConfig,
    pub decomposition: DecompositionConfig,
    pub soil: SoilConfig,
    pub zones: ZoneLayout,
    pub foraging: ForagingConfig,
}

impl SimConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would make the simulation degenerate.
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        if w.width <= 0 || w.height <= 0 {
            return Err(invalid("world size must be positive"));
        }
        if w.cell_size <= 0 {
            return Err(invalid("cell_size must be positive"));
        }
        if w.initial_creatures > (w.width as usize) * (w.height as usize) {
            return Err(invalid("initial_creatures exceeds the number of cells"));
        }

        let c = &self.creature;
        if c.min_max_age == 0 || c.min_max_age > c.max_max_age {
            return Err(invalid("max_age range must be non-empty and start above zero"));
        }
        for (name, p) in [
            ("age_health_loss_chance", c.age_health_loss_chance),
            ("hunger_decay_chance", c.hunger_decay_chance),
            ("elderly_fraction", c.elderly_fraction),
            ("wander_chance", c.wander_chance),
            ("grass_spread_chance", self.soil.grass_spread_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(&format!("{name} must be within [0, 1]")));
            }
        }
        for (name, v) in [
            ("critical_hunger", c.critical_hunger),
            ("rest_threshold", c.rest_threshold),
            ("wake_threshold", c.wake_threshold),
            ("wake_health", c.wake_health),
            ("eat_hunger_threshold", c.eat_hunger_threshold),
            ("reproduce_happiness", c.reproduce_happiness),
            ("reproduce_energy", c.reproduce_energy),
            ("reproduce_hunger", c.reproduce_hunger),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return Err(invalid(&format!("{name} must be within [0, 100]")));
            }
        }
        if c.bite_multiplier <= 0.0 || c.max_bite <= 0.0 {
            return Err(invalid("bite size and multiplier must be positive"));
        }

        if self.egg.hatch_time == 0 {
            return Err(invalid("hatch_time must be at least one tick"));
        }
        if self.decomposition.rate <= 0.0 || self.decomposition.max <= 0.0 {
            return Err(invalid("decomposition rate and max must be positive"));
        }

        let z = &self.zones;
        if z.max_scale < 1.0 {
            return Err(invalid("zone max_scale must be at least 1.0"));
        }
        for kind in ZoneKind::ALL {
            if z.zone(kind).base_radius <= 0.0 {
                return Err(invalid(&format!("{kind} zone radius must be positive")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SimError {
    SimError::InvalidConfig(msg.to_string())
}

/// Grid dimensions and initial population.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    /// Pixel size of one cell, for converting display clicks.
    pub cell_size: i32,
    pub initial_creatures: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            // (1200 - 280 sidebar) / 50 by 900 / 50
            width: 18,
            height: 18,
            cell_size: 50,
            initial_creatures: 1,
        }
    }
}

/// Needs, thresholds and costs driving the creature state machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub min_max_age: u32,
    pub max_max_age: u32,
    pub mature_age: u32,
    /// Fraction of max_age after which age-related health loss starts.
    pub elderly_fraction: f64,
    pub age_health_loss_chance: f64,
    pub hunger_decay_chance: f64,
    pub energy_cost: f64,
    /// Energy cost on ticks following eating or while carrying.
    pub busy_energy_cost: f64,
    pub critical_hunger: f64,
    pub rest_threshold: f64,
    pub wake_threshold: f64,
    pub wake_health: f64,
    /// Sleep recovery when hunger is above `well_fed_hunger`.
    pub sleep_recovery_fed: f64,
    pub sleep_recovery_hungry: f64,
    pub well_fed_hunger: f64,
    pub egg_cooldown: u32,
    pub egg_energy_cost: f64,
    pub reproduce_happiness: f64,
    pub reproduce_energy: f64,
    pub reproduce_hunger: f64,
    pub eat_hunger_threshold: f64,
    pub max_bite: f64,
    pub bite_multiplier: f64,
    pub corpse_food_value: f64,
    /// Food value carried by a live creature (never eaten while alive).
    pub living_food_value: f64,
    /// Probability of a plain random step when wandering without a target.
    pub wander_chance: f64,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            min_max_age: 500,
            max_max_age: 750,
            mature_age: 20,
            elderly_fraction: 0.7,
            age_health_loss_chance: 0.1,
            hunger_decay_chance: 0.2,
            energy_cost: 0.5,
            busy_energy_cost: 1.0,
            critical_hunger: 30.0,
            rest_threshold: 30.0,
            wake_threshold: 80.0,
            wake_health: 50.0,
            sleep_recovery_fed: 3.0,
            sleep_recovery_hungry: 1.0,
            well_fed_hunger: 50.0,
            egg_cooldown: 300,
            egg_energy_cost: 50.0,
            reproduce_happiness: 70.0,
            reproduce_energy: 60.0,
            reproduce_hunger: 60.0,
            eat_hunger_threshold: 70.0,
            max_bite: 40.0,
            bite_multiplier: 1.5,
            corpse_food_value: 200.0,
            living_food_value: 100.0,
            wander_chance: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EggConfig {
    pub hatch_time: u32,
    /// Manhattan range within which a waiting parent is released on hatch.
    pub parent_range: i32,
}

impl Default for EggConfig {
    fn default() -> Self {
        Self {
            hatch_time: 300,
            parent_range: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    pub rate: f64,
    pub max: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            rate: 0.1,
            max: 100.0,
        }
    }
}

/// Fertility and grass dynamics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoilConfig {
    pub max_fertility: f64,
    pub max_grass: f64,
    pub fertility_spread_rate: f64,
    pub spread_radius: i32,
    pub grass_growth_rate: f64,
    /// Growth multiplier on fertilized cells near a corpse.
    pub fertile_growth_factor: f64,
    pub barren_growth_factor: f64,
    /// Growth multiplier for established grass anywhere.
    pub ambient_growth_factor: f64,
    pub grass_spread_chance: f64,
    pub grass_spread_threshold: f64,
    pub grass_spread_fraction: f64,
    pub fertile_spread_bonus: f64,
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            max_fertility: 100.0,
            max_grass: 100.0,
            fertility_spread_rate: 0.05,
            spread_radius: 2,
            grass_growth_rate: 0.1,
            fertile_growth_factor: 0.5,
            barren_growth_factor: 0.1,
            ambient_growth_factor: 0.05,
            grass_spread_chance: 0.1,
            grass_spread_threshold: 50.0,
            grass_spread_fraction: 0.01,
            fertile_spread_bonus: 1.5,
        }
    }
}

/// One circular zone, in cell units.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoneConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub base_radius: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZoneLayout {
    pub food: ZoneConfig,
    pub nursery: ZoneConfig,
    pub sleeping: ZoneConfig,
    pub max_scale: f64,
    pub scale_factor: f64,
}

impl ZoneLayout {
    pub fn zone(&self, kind: ZoneKind) -> &ZoneConfig {
        match kind {
            ZoneKind::Food => &self.food,
            ZoneKind::Nursery => &self.nursery,
            ZoneKind::Sleeping => &self.sleeping,
        }
    }
}

impl Default for ZoneLayout {
    fn default() -> Self {
        // Nest centre (300, 450) px with a 300 px quadrant offset, 50 px cells.
        Self {
            food: ZoneConfig {
                center_x: 0.0,
                center_y: 3.0,
                base_radius: 5.0,
            },
            nursery: ZoneConfig {
                center_x: 12.0,
                center_y: 15.0,
                base_radius: 3.0,
            },
            sleeping: ZoneConfig {
                center_x: 12.0,
                center_y: 3.0,
                base_radius: 4.0,
            },
            max_scale: 1.5,
            scale_factor: 0.3,
        }
    }
}

/// Food search heuristics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForagingConfig {
    pub search_radius: i32,
    pub congestion_radius: i32,
    pub congestion_penalty: f64,
    pub jitter: f64,
    pub social_radius: i32,
    /// Neighbours needed for the full social share of happiness.
    pub social_saturation: f64,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            search_radius: 5,
            congestion_radius: 3,
            congestion_penalty: 2.0,
            jitter: 0.5,
            social_radius: 2,
            social_saturation: 3.0,
        }
    }
}
