//! Systems - per-tick logic that operates on the colony

mod behavior;
mod decomposition;
mod incubation;
mod movement;

pub use behavior::*;
pub use decomposition::*;
pub use incubation::*;
pub use movement::*;
