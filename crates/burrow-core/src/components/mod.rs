//! Component definitions for the entity arena.
//!
//! Components are plain data attached to entities.
//! Behavior lives in systems.

mod common;
mod creature;
mod egg;

pub use common::*;
pub use creature::*;
pub use egg::*;
