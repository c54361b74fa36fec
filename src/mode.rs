//! Game-mode state machine and its countdown timers.
//!
//! ```text
//!   chase --pellet--> power-up --timer--> chase
//!   chase --guard countdown--> guard --timer--> chase
//! ```
//!
//! The guard countdown keeps running during a power-up but cannot interrupt
//! it; an overdue guard phase starts the moment the power-up runs out.

use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Chase,
    PowerUp,
    Guard,
}

/// Shortest a level-scaled duration may become.
pub const MIN_SCALED_DURATION: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct ModeClock {
    mode: GameMode,
    power_up_remaining: f64,
    guard_remaining: f64,
    next_guard_in: f64,
    power_up_time: f64,
    guard_time: f64,

    initial_power_up_time: f64,
    power_up_time_decrement: f64,
    initial_guard_time: f64,
    guard_time_decrement: f64,
    time_between_guard_mode: f64,
}

impl ModeClock {
    pub fn new(config: &Config) -> Self {
        Self {
            mode: GameMode::Chase,
            power_up_remaining: 0.0,
            guard_remaining: 0.0,
            next_guard_in: config.time_between_guard_mode,
            power_up_time: config.initial_power_up_time,
            guard_time: config.initial_guard_time,
            initial_power_up_time: config.initial_power_up_time,
            power_up_time_decrement: config.power_up_time_decrement,
            initial_guard_time: config.initial_guard_time,
            guard_time_decrement: config.guard_time_decrement,
            time_between_guard_mode: config.time_between_guard_mode,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn power_up_remaining(&self) -> f64 {
        self.power_up_remaining
    }

    pub fn guard_remaining(&self) -> f64 {
        self.guard_remaining
    }

    pub fn next_guard_in(&self) -> f64 {
        self.next_guard_in
    }

    /// Level-scaled power-up duration.
    pub fn power_up_time(&self) -> f64 {
        self.power_up_time
    }

    /// Level-scaled guard duration.
    pub fn guard_time(&self) -> f64 {
        self.guard_time
    }

    /// Pellet effect. Restarts the power-up timer and cancels any guard phase.
    pub fn start_power_up(&mut self) {
        if self.mode == GameMode::Guard {
            self.guard_remaining = 0.0;
            self.next_guard_in = self.time_between_guard_mode;
        }
        self.power_up_remaining = self.power_up_time;
        self.set_mode(GameMode::PowerUp);
    }

    pub fn tick(&mut self, dt: f64) {
        if self.mode != GameMode::Guard {
            self.next_guard_in -= dt;
        }

        match self.mode {
            GameMode::PowerUp => {
                self.power_up_remaining -= dt;
                if self.power_up_remaining <= 0.0 {
                    self.power_up_remaining = 0.0;
                    self.set_mode(GameMode::Chase);
                }
            }
            GameMode::Guard => {
                self.guard_remaining -= dt;
                if self.guard_remaining <= 0.0 {
                    self.guard_remaining = 0.0;
                    self.next_guard_in = self.time_between_guard_mode;
                    self.set_mode(GameMode::Chase);
                }
            }
            GameMode::Chase => {}
        }

        if self.mode == GameMode::Chase && self.next_guard_in <= 0.0 {
            self.guard_remaining = self.guard_time;
            self.set_mode(GameMode::Guard);
        }
    }

    /// Shortens both durations for the next level and restarts the clock.
    pub fn level_up(&mut self) {
        self.power_up_time = scaled(self.power_up_time, self.power_up_time_decrement);
        self.guard_time = scaled(self.guard_time, self.guard_time_decrement);
        self.restart_level();
    }

    /// Back to chase with idle timers; the scaled durations are kept.
    pub fn restart_level(&mut self) {
        self.mode = GameMode::Chase;
        self.power_up_remaining = 0.0;
        self.guard_remaining = 0.0;
        self.next_guard_in = self.time_between_guard_mode;
    }

    pub fn reset(&mut self) {
        self.power_up_time = self.initial_power_up_time;
        self.guard_time = self.initial_guard_time;
        self.restart_level();
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "mode transition");
            self.mode = mode;
        }
    }
}

fn scaled(duration: f64, decrement: f64) -> f64 {
    (duration - decrement).max(MIN_SCALED_DURATION.min(duration))
}
