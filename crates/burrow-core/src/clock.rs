//! Fixed-rate tick scheduler for front ends.

use crate::engine::Environment;

/// Longest stretch of wall time one `advance` call will catch up on.
const MAX_CATCH_UP_SECS: f64 = 1.0;

/// Turns elapsed wall time into whole simulation ticks at the colony's
/// current tick rate. A rate of zero pauses without losing state.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    accumulated: f64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `elapsed_secs` of wall time; returns how many ticks ran.
    pub fn advance(&mut self, env: &mut Environment, elapsed_secs: f64) -> u32 {
        let rate = env.tick_rate();
        if rate == 0 {
            self.accumulated = 0.0;
            return 0;
        }

        let interval = 1.0 / rate as f64;
        self.accumulated = (self.accumulated + elapsed_secs.max(0.0)).min(MAX_CATCH_UP_SECS);
        let mut ran = 0;
        while self.accumulated >= interval {
            self.accumulated -= interval;
            env.update(interval as f32);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_paused_clock_runs_nothing() {
        let mut env = Environment::new(SimConfig::default(), 8).unwrap();
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(&mut env, 5.0), 0);
        assert_eq!(env.tick(), 0);
    }

    #[test]
    fn test_clock_runs_at_rate() {
        let mut env = Environment::new(SimConfig::default(), 8).unwrap();
        env.set_tick_rate(10);
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(&mut env, 0.25), 2);
        assert_eq!(clock.advance(&mut env, 0.06), 1);
        assert_eq!(env.tick(), 3);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut env = Environment::new(SimConfig::default(), 8).unwrap();
        env.set_tick_rate(8);
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(&mut env, 30.0), 8);
    }
}
