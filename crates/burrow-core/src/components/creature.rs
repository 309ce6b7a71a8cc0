//! Creature component: needs, lifecycle flags and the current target.

use hecs::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CreatureConfig;
use crate::zones::ZoneKind;

pub const STAT_MAX: f64 = 100.0;

/// Why a creature died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Unknown,
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeathCause::OldAge => "Old Age",
            DeathCause::Starvation => "Starvation",
            DeathCause::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// What a creature is heading for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    None,
    Creature(Entity),
    Egg(Entity),
    Zone(ZoneKind),
}

impl Target {
    pub fn creature(&self) -> Option<Entity> {
        match self {
            Target::Creature(e) => Some(*e),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }
}

/// Branch of the behavior tree taken on the most recent tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Idle,
    Sleeping,
    SeekingFood,
    Eating,
    CarryingCorpse,
    SeekingNursery,
    LayingEgg,
    Dead,
}

#[derive(Debug, Clone, Copy)]
pub struct Creature {
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
    pub target: Target,
    /// Set while this creature's egg is incubating.
    pub has_laid_egg: bool,
    pub egg_laying_cooldown: u32,
    pub age_related_health_loss: bool,
    /// Only meaningful once dead.
    pub food_value: f64,
    pub decomposition: f64,
    pub death_cause: Option<DeathCause>,
    pub state: BehaviorState,
}

impl Creature {
    pub fn new(max_age: u32, living_food_value: f64) -> Self {
        Self {
            health: STAT_MAX,
            energy: STAT_MAX,
            hunger: STAT_MAX,
            happiness: STAT_MAX,
            age: 0,
            max_age,
            mature: false,
            dead: false,
            sleeping: false,
            eating: false,
            carrying_food: false,
            target: Target::None,
            has_laid_egg: false,
            egg_laying_cooldown: 0,
            age_related_health_loss: false,
            food_value: living_food_value,
            decomposition: 0.0,
            death_cause: None,
            state: BehaviorState::Idle,
        }
    }

    /// Newborn with a randomized lifespan.
    pub fn random(rng: &mut impl Rng, config: &CreatureConfig) -> Self {
        let max_age = rng.gen_range(config.min_max_age..=config.max_max_age);
        Self::new(max_age, config.living_food_value)
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// A corpse that still has something to eat.
    pub fn is_food_source(&self) -> bool {
        self.dead && self.food_value > 0.0
    }

    pub fn is_elderly(&self, elderly_fraction: f64) -> bool {
        self.age as f64 > self.max_age as f64 * elderly_fraction
    }

    pub fn is_fully_decomposed(&self, max_decomposition: f64) -> bool {
        self.food_value <= 0.0 && self.decomposition >= max_decomposition
    }

    pub fn die(&mut self, cause: DeathCause, corpse_food_value: f64) {
        self.dead = true;
        self.health = 0.0;
        self.food_value = corpse_food_value;
        self.death_cause = Some(cause);
        self.sleeping = false;
        self.eating = false;
        self.carrying_food = false;
        self.target = Target::None;
        self.state = BehaviorState::Dead;
    }

    /// Meets every threshold for laying an egg (location aside).
    pub fn can_reproduce(&self, config: &CreatureConfig) -> bool {
        !self.dead
            && !self.sleeping
            && !self.eating
            && self.mature
            && !self.has_laid_egg
            && self.egg_laying_cooldown == 0
            && self.happiness >= config.reproduce_happiness
            && self.energy >= config.reproduce_energy
            && self.hunger >= config.reproduce_hunger
    }

    /// Take up to `max_bite` food off this corpse; returns the amount taken.
    pub fn yield_food(&mut self, max_bite: f64) -> f64 {
        let amount = max_bite.min(self.food_value).max(0.0);
        self.food_value -= amount;
        amount
    }

    /// Turn food into satiety, capped at full.
    pub fn feed(&mut self, food: f64, multiplier: f64) {
        self.hunger = (self.hunger + food * multiplier).min(STAT_MAX);
        self.eating = true;
        self.target = Target::None;
        self.carrying_food = false;
        self.state = BehaviorState::Eating;
    }

    pub fn drop_carry(&mut self) {
        self.carrying_food = false;
        self.target = Target::None;
    }

    pub fn clamp_stats(&mut self) {
        self.health = self.health.clamp(0.0, STAT_MAX);
        self.energy = self.energy.clamp(0.0, STAT_MAX);
        self.hunger = self.hunger.clamp(0.0, STAT_MAX);
        self.happiness = self.happiness.clamp(0.0, STAT_MAX);
    }

    pub fn age_fraction(&self) -> f64 {
        if self.max_age == 0 {
            return 1.0;
        }
        self.age as f64 / self.max_age as f64
    }

    /// Short status tags for an info panel.
    pub fn status_labels(&self, elderly_fraction: f64) -> Vec<&'static str> {
        if self.dead {
            return vec!["Dead"];
        }
        let mut labels = Vec::new();
        if self.sleeping {
            labels.push("Sleeping");
        }
        if self.eating {
            labels.push("Eating");
        }
        if self.has_laid_egg {
            labels.push("Has unhatched egg");
        }
        if self.is_elderly(elderly_fraction) {
            labels.push("Elderly");
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_random_lifespan_in_range() {
        let config = CreatureConfig::default();
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for _ in 0..50 {
            let c = Creature::random(&mut rng, &config);
            assert!((500..=750).contains(&c.max_age));
            assert_eq!(c.health, 100.0);
            assert_eq!(c.hunger, 100.0);
        }
    }

    #[test]
    fn test_die_sets_corpse_state() {
        let mut c = Creature::new(600, 100.0);
        c.carrying_food = true;
        c.die(DeathCause::Starvation, 200.0);
        assert!(c.dead);
        assert_eq!(c.health, 0.0);
        assert_eq!(c.food_value, 200.0);
        assert_eq!(c.death_cause, Some(DeathCause::Starvation));
        assert!(!c.carrying_food);
        assert!(c.is_food_source());
    }

    #[test]
    fn test_yield_food_never_goes_negative() {
        let mut corpse = Creature::new(600, 100.0);
        corpse.die(DeathCause::OldAge, 50.0);
        assert_eq!(corpse.yield_food(40.0), 40.0);
        assert_eq!(corpse.yield_food(40.0), 10.0);
        assert_eq!(corpse.yield_food(40.0), 0.0);
        assert_eq!(corpse.food_value, 0.0);
        assert!(!corpse.is_food_source());
    }

    #[test]
    fn test_feed_caps_hunger() {
        let mut c = Creature::new(600, 100.0);
        c.hunger = 80.0;
        c.feed(40.0, 1.5);
        assert_eq!(c.hunger, 100.0);
        assert!(c.eating);
    }

    #[test]
    fn test_reproduction_thresholds() {
        let config = CreatureConfig::default();
        let mut c = Creature::new(600, 100.0);
        assert!(!c.can_reproduce(&config), "immature");
        c.mature = true;
        assert!(c.can_reproduce(&config));
        c.has_laid_egg = true;
        assert!(!c.can_reproduce(&config));
        c.has_laid_egg = false;
        c.egg_laying_cooldown = 1;
        assert!(!c.can_reproduce(&config));
        c.egg_laying_cooldown = 0;
        c.hunger = 59.0;
        assert!(!c.can_reproduce(&config));
    }

    #[test]
    fn test_status_labels() {
        let mut c = Creature::new(100, 100.0);
        c.age = 80;
        c.sleeping = true;
        assert_eq!(c.status_labels(0.7), vec!["Sleeping", "Elderly"]);
        c.die(DeathCause::OldAge, 200.0);
        assert_eq!(c.status_labels(0.7), vec!["Dead"]);
    }
}
