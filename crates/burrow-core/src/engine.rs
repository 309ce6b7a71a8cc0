//! Simulation coordinator - owns the arena, grid, zones and soil, and runs
//! the per-tick pipeline.

use std::collections::{BTreeSet, HashMap};

use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::components::*;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::grid::OccupancyGrid;
use crate::rng::{create_rng, SimRng};
use crate::soil::SoilFields;
use crate::stats::LifecycleCounters;
use crate::systems::{self, MoveOutcome};
use crate::zones::{ZoneDemand, ZoneKind, Zones};

/// Fastest tick rate the speed control accepts.
pub const MAX_TICK_RATE: u32 = 60;

/// What the operator currently has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Creature(Entity),
    Egg(Entity),
}

/// The colony: every creature, egg and field, plus the tick pipeline.
pub struct Environment {
    pub(crate) world: World,
    pub(crate) grid: OccupancyGrid,
    pub(crate) zones: Zones,
    pub(crate) soil: SoilFields,
    /// Spawn order; iteration order for behavior.
    pub(crate) creatures: Vec<Entity>,
    pub(crate) eggs: Vec<Entity>,
    /// Cell each settled corpse is currently fertilizing.
    pub(crate) decomposing: HashMap<Entity, GridPos>,
    pub(crate) config: SimConfig,
    pub(crate) rng: SimRng,
    pub(crate) lifecycle: LifecycleCounters,
    selection: Option<Selection>,
    tick_rate: u32,
    tick: u64,
    sim_time: f64,
}

impl Environment {
    /// Create a colony and scatter the configured initial population.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        let mut env = Self::empty(config, seed)?;
        for _ in 0..env.config.world.initial_creatures {
            let Some(pos) = env.random_free_cell() else {
                break;
            };
            env.spawn_creature(pos)?;
        }
        info!(
            "Colony created: {}x{} grid, {} creatures, seed {}",
            env.config.world.width,
            env.config.world.height,
            env.creatures.len(),
            seed
        );
        Ok(env)
    }

    /// Create a colony with no creatures.
    pub fn empty(config: SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let bounds = Bounds::new(config.world.width, config.world.height);
        Ok(Self {
            world: World::new(),
            grid: OccupancyGrid::new(bounds),
            zones: Zones::new(&config.zones),
            soil: SoilFields::new(),
            creatures: Vec::new(),
            eggs: Vec::new(),
            decomposing: HashMap::new(),
            config,
            rng: create_rng(seed),
            lifecycle: LifecycleCounters::default(),
            selection: None,
            tick_rate: 0,
            tick: 0,
            sim_time: 0.0,
        })
    }

    /// Advance the simulation by one tick.
    ///
    /// The caller's scheduler decides when to call this; a paused colony is
    /// one whose scheduler stops calling.
    pub fn update(&mut self, dt: f32) {
        self.tick += 1;
        self.sim_time += dt as f64;

        self.rebuild_grid();

        for entity in self.creatures.clone() {
            let Some(before) = self.position(entity) else {
                continue;
            };
            if !self.creature(entity).is_some_and(|c| c.is_alive()) {
                continue;
            }
            systems::tick_creature(self, entity);
            if let Some(after) = self.position(entity) {
                if after != before && self.grid.get(after) != Some(entity) {
                    self.grid.relocate(entity, before, after);
                }
            }
        }

        systems::decompose_corpses(self);
        self.remove_decomposed();
        systems::incubate_eggs(self);
        self.rescale_zones();

        let sources: BTreeSet<GridPos> = self.decomposing.values().copied().collect();
        let bounds = self.grid.bounds();
        self.soil
            .diffuse(&sources, bounds, &self.config.soil, &mut self.rng);
    }

    // ── Spawning ──────────────────────────────────────────────────────

    /// Spawn a newborn with randomized traits.
    pub fn spawn_creature(&mut self, pos: GridPos) -> Result<Entity> {
        let creature = Creature::random(&mut self.rng, &self.config.creature);
        self.spawn_creature_with(pos, creature)
    }

    /// Spawn a creature with explicit state.
    pub fn spawn_creature_with(&mut self, pos: GridPos, creature: Creature) -> Result<Entity> {
        self.check_cell(pos)?;
        let entity = self.world.spawn((pos, creature));
        self.grid.insert(pos, entity);
        self.creatures.push(entity);
        self.lifecycle.births += 1;
        Ok(entity)
    }

    pub fn spawn_egg(&mut self, pos: GridPos, parent: Option<Entity>) -> Result<Entity> {
        self.check_cell(pos)?;
        let egg = Egg::new(self.config.egg.hatch_time, parent);
        let entity = self.world.spawn((pos, egg));
        self.grid.insert(pos, entity);
        self.eggs.push(entity);
        Ok(entity)
    }

    fn check_cell(&self, pos: GridPos) -> Result<()> {
        if !self.grid.in_bounds(pos) {
            return Err(SimError::OutOfBounds(pos));
        }
        if self.grid.is_occupied(pos) {
            return Err(SimError::CellOccupied(pos));
        }
        Ok(())
    }

    fn random_free_cell(&mut self) -> Option<GridPos> {
        let bounds = self.grid.bounds();
        for _ in 0..bounds.cell_count() * 2 {
            let pos = GridPos::new(
                self.rng.gen_range(0..bounds.width),
                self.rng.gen_range(0..bounds.height),
            );
            if self.grid.is_free(pos) {
                return Some(pos);
            }
        }
        (0..bounds.width)
            .flat_map(|x| (0..bounds.height).map(move |y| GridPos::new(x, y)))
            .find(|p| self.grid.is_free(*p))
    }

    // ── Tick phases ───────────────────────────────────────────────────

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for &entity in self.creatures.iter().chain(self.eggs.iter()) {
            let Some(pos) = self.position(entity) else {
                continue;
            };
            if let Some(other) = self.grid.insert(pos, entity) {
                warn!("Cell {} claimed by both {:?} and {:?}", pos, other, entity);
            }
        }
    }

    fn remove_decomposed(&mut self) {
        let max = self.config.decomposition.max;
        let finished: Vec<Entity> = self
            .creatures
            .iter()
            .copied()
            .filter(|e| self.creature(*e).is_some_and(|c| c.is_fully_decomposed(max)))
            .collect();

        for entity in finished {
            if let Some(pos) = self.position(entity) {
                self.grid.remove_entity(pos, entity);
                debug!("Removing fully decomposed creature at {}", pos);
            }
            let despawned = self.world.despawn(entity);
            debug_assert!(despawned.is_ok(), "stale creature handle {:?}", entity);
            self.creatures.retain(|e| *e != entity);
            self.decomposing.remove(&entity);
            if self.selection == Some(Selection::Creature(entity)) {
                self.selection = None;
            }
            for &other in &self.creatures {
                if let Ok(mut c) = self.world.get::<&mut Creature>(other) {
                    if c.target == Target::Creature(entity) {
                        c.drop_carry();
                    }
                }
            }
            self.lifecycle.removed += 1;
        }
    }

    /// Replace a ready egg with a newborn on the same cell.
    pub(crate) fn hatch(&mut self, egg: Entity) {
        let Some(pos) = self.position(egg) else {
            return;
        };
        self.grid.remove_entity(pos, egg);
        let despawned = self.world.despawn(egg);
        debug_assert!(despawned.is_ok(), "stale egg handle {:?}", egg);
        self.eggs.retain(|e| *e != egg);
        if self.selection == Some(Selection::Egg(egg)) {
            self.selection = None;
        }

        match self.spawn_creature(pos) {
            Ok(_) => {
                self.lifecycle.hatched += 1;
                debug!("Egg hatched at {}", pos);
            }
            Err(e) => warn!("Egg at {} could not hatch: {}", pos, e),
        }
    }

    fn rescale_zones(&mut self) {
        let dead = self
            .creatures
            .iter()
            .filter(|e| self.creature(**e).is_some_and(|c| c.dead))
            .count();
        self.zones.rescale(ZoneDemand {
            total_creatures: self.creatures.len(),
            live_creatures: self.creatures.len() - dead,
            dead_creatures: dead,
            eggs: self.eggs.len(),
        });
    }

    // ── Entity access ─────────────────────────────────────────────────

    pub fn creature(&self, entity: Entity) -> Option<Creature> {
        self.world.get::<&Creature>(entity).ok().map(|c| *c)
    }

    pub fn creature_mut(&self, entity: Entity) -> Option<hecs::RefMut<'_, Creature>> {
        self.world.get::<&mut Creature>(entity).ok()
    }

    pub fn egg(&self, entity: Entity) -> Option<Egg> {
        self.world.get::<&Egg>(entity).ok().map(|e| *e)
    }

    pub fn position(&self, entity: Entity) -> Option<GridPos> {
        self.world.get::<&GridPos>(entity).ok().map(|p| *p)
    }

    pub(crate) fn set_position(&mut self, entity: Entity, pos: GridPos) {
        if let Ok(mut p) = self.world.get::<&mut GridPos>(entity) {
            *p = pos;
        }
    }

    pub(crate) fn store_creature(&mut self, entity: Entity, creature: Creature) {
        if let Ok(mut c) = self.world.get::<&mut Creature>(entity) {
            *c = creature;
        }
    }

    /// All creatures, live and dead, in spawn order.
    pub fn creatures(&self) -> &[Entity] {
        &self.creatures
    }

    pub fn eggs(&self) -> &[Entity] {
        &self.eggs
    }

    pub fn live_count(&self) -> usize {
        self.creatures
            .iter()
            .filter(|e| self.creature(**e).is_some_and(|c| c.is_alive()))
            .count()
    }

    // ── Queries ───────────────────────────────────────────────────────

    /// Entities (creatures and eggs) within `radius` cells, chessboard distance.
    pub fn get_nearby_entities(&self, pos: GridPos, radius: i32) -> Vec<Entity> {
        self.creatures
            .iter()
            .chain(self.eggs.iter())
            .copied()
            .filter(|e| self.position(*e).is_some_and(|p| p.chebyshev(&pos) <= radius))
            .collect()
    }

    /// Live creatures around `pos` within the congestion radius.
    pub fn count_nearby_creatures(&self, pos: GridPos) -> usize {
        self.count_live_within(pos, self.config.foraging.congestion_radius, None)
    }

    pub(crate) fn count_live_within(
        &self,
        pos: GridPos,
        radius: i32,
        exclude: Option<Entity>,
    ) -> usize {
        self.creatures
            .iter()
            .filter(|e| Some(**e) != exclude)
            .filter(|e| self.creature(**e).is_some_and(|c| c.is_alive()))
            .filter(|e| self.position(**e).is_some_and(|p| p.chebyshev(&pos) <= radius))
            .count()
    }

    /// Best corpse to forage from: distance plus a crowding penalty, with a
    /// little jitter so foragers don't all pick the same one.
    pub fn find_nearest_food(&mut self, pos: GridPos) -> Option<(Entity, GridPos)> {
        let foraging = self.config.foraging.clone();
        let candidates: Vec<(Entity, GridPos, f64)> = self
            .get_nearby_entities(pos, foraging.search_radius)
            .into_iter()
            .filter(|e| self.creature(*e).is_some_and(|c| c.is_food_source()))
            .filter_map(|e| {
                let food_pos = self.position(e)?;
                let crowd = self.count_nearby_creatures(food_pos) as f64;
                let cost = food_pos.manhattan(&pos) as f64 + crowd * foraging.congestion_penalty;
                Some((e, food_pos, cost))
            })
            .collect();

        let mut best: Option<(Entity, GridPos, f64)> = None;
        for (entity, food_pos, cost) in candidates {
            let jitter = if foraging.jitter > 0.0 {
                self.rng.gen_range(0.0..foraging.jitter)
            } else {
                0.0
            };
            let score = cost + jitter;
            if best.map_or(true, |(_, _, s)| score < s) {
                best = Some((entity, food_pos, score));
            }
        }
        best.map(|(e, p, _)| (e, p))
    }

    pub fn is_in_area(&self, pos: GridPos, zone: ZoneKind) -> bool {
        self.zones.contains(zone, pos)
    }

    pub fn get_area_center(&self, zone: ZoneKind) -> GridPos {
        self.zones.center_cell(zone)
    }

    /// Move a live creature one step toward `target`, dragging its corpse
    /// along if it is carrying one. Returns false when no step was possible.
    pub fn try_move_towards(&mut self, entity: Entity, target: GridPos) -> bool {
        let Some(creature) = self.creature(entity) else {
            return false;
        };
        if creature.dead {
            return false;
        }
        let carrying = if creature.carrying_food {
            creature.target.creature()
        } else {
            None
        };
        match systems::resolve_move(self, entity, carrying, target) {
            MoveOutcome::LostCarry => {
                if let Some(mut c) = self.creature_mut(entity) {
                    c.drop_carry();
                }
                false
            }
            outcome => outcome.succeeded(),
        }
    }

    // ── Operator commands ─────────────────────────────────────────────

    /// Select whatever sits on `pos`: a creature first, then an egg.
    /// Empty cells clear the selection.
    pub fn select_at(&mut self, pos: GridPos) -> Option<Selection> {
        let on_cell = |e: &&Entity| self.position(**e) == Some(pos);
        let found = if let Some(&creature) = self.creatures.iter().find(on_cell) {
            Some(Selection::Creature(creature))
        } else {
            self.eggs.iter().find(on_cell).map(|&egg| Selection::Egg(egg))
        };
        self.selection = found;
        found
    }

    /// Select from display coordinates. Clicks outside the grid are ignored.
    pub fn select_at_pixel(&mut self, px: i32, py: i32) -> Option<Selection> {
        let cell_size = self.config.world.cell_size;
        if px < 0 || py < 0 {
            return self.selection;
        }
        let pos = GridPos::new(px / cell_size, py / cell_size);
        if !self.grid.in_bounds(pos) {
            return self.selection;
        }
        self.select_at(pos)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn is_selected(&self, entity: Entity) -> bool {
        matches!(
            self.selection,
            Some(Selection::Creature(e)) | Some(Selection::Egg(e)) if e == entity
        )
    }

    /// Ticks per second for the external scheduler; 0 pauses.
    pub fn set_tick_rate(&mut self, ticks_per_second: u32) {
        self.tick_rate = ticks_per_second.min(MAX_TICK_RATE);
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn is_paused(&self) -> bool {
        self.tick_rate == 0
    }

    // ── Accessors ─────────────────────────────────────────────────────

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    pub fn soil(&self) -> &SoilFields {
        &self.soil
    }

    pub fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    pub fn lifecycle(&self) -> &LifecycleCounters {
        &self.lifecycle
    }
}
