/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringConfig {
    /// Light overshoot, lively feel
    pub const DEFAULT: Self = Self {
        mass: 1.0,
        stiffness: 180.0,
        damping: 11.0,
    };

    /// Quick response with a little bounce
    pub const SNAPPY: Self = Self {
        mass: 1.0,
        stiffness: 250.0,
        damping: 14.0,
    };

    /// Critically damped: settles as fast as possible without overshoot
    /// when started from rest
    pub const CRITICAL: Self = Self {
        mass: 1.0,
        stiffness: 250.0,
        damping: 32.0,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::CRITICAL
    }
}

/// Largest integration step; longer frames are split into several steps
const MAX_STEP_SECS: f32 = 1.0 / 240.0;

/// Normalized spring simulation travelling from 0.0 toward 1.0.
#[derive(Clone, Debug, Default)]
pub struct SpringState {
    pub position: f32,
    /// Normalized units per second
    pub velocity: f32,
}

impl SpringState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at 0.0 already moving. Used to carry a fling's release velocity
    /// into the snap animation.
    pub fn with_velocity(velocity: f32) -> Self {
        Self {
            position: 0.0,
            velocity: if velocity.is_finite() { velocity } else { 0.0 },
        }
    }

    /// Advance by `dt_secs`, returning the new position (may overshoot 1.0).
    pub fn step(&mut self, dt_secs: f32, config: &SpringConfig) -> f32 {
        let mut remaining = dt_secs.max(0.0);
        let mass = config.mass.max(f32::EPSILON);

        while remaining > 1e-6 {
            let dt = remaining.min(MAX_STEP_SECS);
            remaining -= dt;

            let displacement = self.position - 1.0;
            let force = -config.stiffness * displacement - config.damping * self.velocity;

            // Semi-implicit Euler
            self.velocity += force / mass * dt;
            self.position += self.velocity * dt;
        }

        self.position
    }

    pub fn is_settled(&self, position_threshold: f32, velocity_threshold: f32) -> bool {
        (self.position - 1.0).abs() < position_threshold && self.velocity.abs() < velocity_threshold
    }
}
