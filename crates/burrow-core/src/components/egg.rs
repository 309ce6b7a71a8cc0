//! Egg component: incubation timer only.

use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Egg {
    pub timer: u32,
    pub hatch_time: u32,
    pub ready_to_hatch: bool,
    /// Creature that laid this egg, if any.
    pub parent: Option<Entity>,
}

impl Egg {
    pub fn new(hatch_time: u32, parent: Option<Entity>) -> Self {
        Self {
            timer: 0,
            hatch_time,
            ready_to_hatch: false,
            parent,
        }
    }

    /// Advance one tick. Returns true only on the tick the egg becomes ready.
    pub fn advance(&mut self) -> bool {
        if self.timer < self.hatch_time {
            self.timer += 1;
        }
        if self.timer >= self.hatch_time && !self.ready_to_hatch {
            self.ready_to_hatch = true;
            return true;
        }
        false
    }

    /// Incubation progress in percent, capped at 100.
    pub fn progress(&self) -> f64 {
        if self.hatch_time == 0 {
            return 100.0;
        }
        (self.timer as f64 / self.hatch_time as f64 * 100.0).min(100.0)
    }

    pub fn time_remaining(&self) -> u32 {
        self.hatch_time.saturating_sub(self.timer)
    }
}
