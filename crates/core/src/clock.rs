//! Scalar animation time shared by every evaluator of a scene.

use serde::{Deserialize, Serialize};

/// Advances time by `delta * speed_multiplier` while running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationClock {
    time: f64,
    pub speed_multiplier: f64,
    running: bool,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AnimationClock {
    /// A running clock at time 0.
    pub fn new(speed_multiplier: f64) -> Self {
        Self {
            time: 0.0,
            speed_multiplier,
            running: true,
        }
    }

    /// Adds `delta * speed_multiplier`; a paused clock ignores the call.
    pub fn advance(&mut self, delta: f64) {
        if self.running {
            self.time += delta * self.speed_multiplier;
        }
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
