//! Colony zones: fixed-centre circles whose radius grows with demand.

use serde::{Deserialize, Serialize};

use crate::components::GridPos;
use crate::config::{ZoneConfig, ZoneLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Where corpses are stored.
    Food,
    /// Where eggs are laid.
    Nursery,
    /// Where creatures sleep.
    Sleeping,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 3] = [ZoneKind::Food, ZoneKind::Nursery, ZoneKind::Sleeping];
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneKind::Food => "food",
            ZoneKind::Nursery => "nursery",
            ZoneKind::Sleeping => "sleeping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub center_x: f64,
    pub center_y: f64,
    pub base_radius: f64,
    pub scale: f64,
}

impl Zone {
    fn from_config(config: &ZoneConfig) -> Self {
        Self {
            center_x: config.center_x,
            center_y: config.center_y,
            base_radius: config.base_radius,
            scale: 1.0,
        }
    }

    pub fn radius(&self) -> f64 {
        self.base_radius * self.scale
    }

    /// Measured from the centre of the cell.
    pub fn contains(&self, pos: GridPos) -> bool {
        let dx = pos.x as f64 + 0.5 - self.center_x;
        let dy = pos.y as f64 + 0.5 - self.center_y;
        (dx * dx + dy * dy).sqrt() <= self.radius()
    }

    /// The cell containing the zone centre; used as a movement target.
    pub fn center_cell(&self) -> GridPos {
        GridPos::new(self.center_x.floor() as i32, self.center_y.floor() as i32)
    }
}

/// Demand counts that drive zone scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneDemand {
    pub total_creatures: usize,
    pub live_creatures: usize,
    pub dead_creatures: usize,
    pub eggs: usize,
}

#[derive(Debug, Clone)]
pub struct Zones {
    food: Zone,
    nursery: Zone,
    sleeping: Zone,
    max_scale: f64,
    scale_factor: f64,
}

impl Zones {
    pub fn new(layout: &ZoneLayout) -> Self {
        Self {
            food: Zone::from_config(&layout.food),
            nursery: Zone::from_config(&layout.nursery),
            sleeping: Zone::from_config(&layout.sleeping),
            max_scale: layout.max_scale,
            scale_factor: layout.scale_factor,
        }
    }

    pub fn get(&self, kind: ZoneKind) -> &Zone {
        match kind {
            ZoneKind::Food => &self.food,
            ZoneKind::Nursery => &self.nursery,
            ZoneKind::Sleeping => &self.sleeping,
        }
    }

    pub fn contains(&self, kind: ZoneKind, pos: GridPos) -> bool {
        self.get(kind).contains(pos)
    }

    pub fn center_cell(&self, kind: ZoneKind) -> GridPos {
        self.get(kind).center_cell()
    }

    pub fn scale(&self, kind: ZoneKind) -> f64 {
        self.get(kind).scale
    }

    /// Grow each zone in proportion to its share of the population.
    /// With no creatures at all the scales are left unchanged.
    pub fn rescale(&mut self, demand: ZoneDemand) {
        if demand.total_creatures == 0 {
            return;
        }
        let total = demand.total_creatures as f64;
        let scale_for = |count: usize| -> f64 {
            (1.0 + count as f64 / total * self.scale_factor).clamp(1.0, self.max_scale)
        };
        let food = scale_for(demand.dead_creatures);
        let nursery = scale_for(demand.eggs);
        let sleeping = scale_for(demand.live_creatures);

        self.food.scale = food;
        self.nursery.scale = nursery;
        self.sleeping.scale = sleeping;
    }
}
