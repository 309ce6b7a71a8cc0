//! Burrow Core - Creature Colony Simulation Engine
//!
//! A grid-based colony of simple creatures that age, eat, sleep, haul
//! corpses to a food store, and lay eggs in a nursery. Corpses rot into the
//! soil, which feeds a slowly spreading grass field.
//!
//! # Architecture
//!
//! Creatures and eggs are entities in a `hecs` world; the [`Environment`]
//! keeps them in spawn order alongside an occupancy grid, the three zones
//! and the soil fields.
//! - **Components**: `GridPos`, `Creature`, `Egg`
//! - **Systems**: behavior, movement, decomposition, incubation
//! - **Environment**: runs the systems in a fixed order each tick
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_core::prelude::*;
//!
//! let mut env = Environment::new(SimConfig::default(), 42).unwrap();
//! env.set_tick_rate(10);
//!
//! let mut clock = TickClock::new();
//! loop {
//!     clock.advance(&mut env, 1.0 / 60.0);
//! }
//! ```
//!
//! [`Environment`]: engine::Environment

pub mod clock;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod rng;
pub mod snapshot;
pub mod soil;
pub mod stats;
pub mod systems;
pub mod zones;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::TickClock;
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::engine::{Environment, Selection, MAX_TICK_RATE};
    pub use crate::error::{Result, SimError};
    pub use crate::snapshot::{CreatureView, EggView, WorldSnapshot};
    pub use crate::stats::PopulationStats;
    pub use crate::zones::ZoneKind;
    pub use hecs::Entity;
}
