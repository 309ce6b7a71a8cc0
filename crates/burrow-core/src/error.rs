//! Error types for the fallible edges of the simulation.
//!
//! Ticks never fail; only configuration loading and explicit spawn commands
//! can return an error.

use thiserror::Error;

use crate::components::GridPos;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("position {0} is outside the grid")]
    OutOfBounds(GridPos),

    #[error("position {0} is already occupied")]
    CellOccupied(GridPos),
}

pub type Result<T> = std::result::Result<T, SimError>;
