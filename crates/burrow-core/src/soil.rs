//! Fertility and grass fields.
//!
//! Both are sparse maps from cell to amount. Decomposing corpses fertilize
//! the cell they rest on; fertility leaks into cells within
//! `spread_radius` (Manhattan) of each source, and grass grows there faster
//! when the soil is fertile. Established grass occasionally spreads to its
//! orthogonal neighbours.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::components::{Bounds, GridPos, CARDINAL_STEPS};
use crate::config::SoilConfig;

#[derive(Debug, Clone, Default)]
pub struct SoilFields {
    fertility: BTreeMap<GridPos, f64>,
    grass: BTreeMap<GridPos, f64>,
}

impl SoilFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fertility_at(&self, pos: GridPos) -> f64 {
        self.fertility.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn grass_at(&self, pos: GridPos) -> f64 {
        self.grass.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn total_fertility(&self) -> f64 {
        self.fertility.values().sum()
    }

    pub fn total_grass(&self) -> f64 {
        self.grass.values().sum()
    }

    pub fn fertility(&self) -> impl Iterator<Item = (GridPos, f64)> + '_ {
        self.fertility.iter().map(|(p, v)| (*p, *v))
    }

    pub fn grass(&self) -> impl Iterator<Item = (GridPos, f64)> + '_ {
        self.grass.iter().map(|(p, v)| (*p, *v))
    }

    pub fn add_fertility(&mut self, pos: GridPos, amount: f64, max: f64) {
        let cell = self.fertility.entry(pos).or_insert(0.0);
        *cell = (*cell + amount).min(max);
    }

    /// One diffusion step. `sources` are the cells where corpses currently rest.
    pub fn diffuse(
        &mut self,
        sources: &BTreeSet<GridPos>,
        bounds: Bounds,
        config: &SoilConfig,
        rng: &mut impl Rng,
    ) {
        let mut fertility = self.fertility.clone();
        let mut grass = self.grass.clone();
        let radius = config.spread_radius;

        for source in sources {
            let source_amount = self.fertility.get(source).copied();
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    if dx.abs() + dy.abs() > radius {
                        continue;
                    }
                    let cell = source.offset(dx, dy);
                    if !bounds.contains(cell) {
                        continue;
                    }

                    if let Some(amount) = source_amount {
                        let f = fertility.entry(cell).or_insert(0.0);
                        *f = (*f + amount * config.fertility_spread_rate).min(config.max_fertility);
                    }

                    let fertile = fertility.get(&cell).is_some_and(|f| *f > 0.0);
                    let factor = if fertile {
                        config.fertile_growth_factor
                    } else {
                        config.barren_growth_factor
                    };
                    let g = grass.entry(cell).or_insert(0.0);
                    *g = (*g + config.grass_growth_rate * factor).min(config.max_grass);
                }
            }
        }

        if rng.gen::<f64>() < config.grass_spread_chance {
            for (pos, amount) in &self.grass {
                if *amount <= config.grass_spread_threshold {
                    continue;
                }
                for &(dx, dy) in &CARDINAL_STEPS {
                    let cell = pos.offset(dx, dy);
                    if !bounds.contains(cell) {
                        continue;
                    }
                    let mut spread = amount * config.grass_spread_fraction;
                    if fertility.contains_key(&cell) {
                        spread *= config.fertile_spread_bonus;
                    }
                    let g = grass.entry(cell).or_insert(0.0);
                    *g = (*g + spread).min(config.max_grass);
                }
            }
        }

        // Established grass creeps up everywhere, very slowly.
        for g in grass.values_mut() {
            if *g > 0.0 {
                *g = (*g + config.grass_growth_rate * config.ambient_growth_factor)
                    .min(config.max_grass);
            }
        }

        self.fertility = fertility;
        self.grass = grass;
    }
}
