//! Duskwave - a wave-survival arcade combat core
//!
//! Core modules:
//! - `sim`: Deterministic combat simulation (entities, attacks, status
//!   effects, pooling, spawn scaling)
//! - `catalog`: Read-only enemy/attack stat tables
//! - `config`: Data-driven tuning knobs
//!
//! The crate is a pure simulation library: the surrounding application owns
//! the window, renderer, audio, and input devices, and drives the sim with a
//! fixed-timestep accumulator calling [`sim::tick`] once per substep. All
//! outward-facing effects (sounds, floating text, flashes, camera shake)
//! surface as [`sim::GameEvent`]s drained after each frame.

pub mod catalog;
pub mod config;
pub mod sim;

pub use catalog::{AttackSpec, Catalog, EnemySpawnRecord};
pub use config::SimConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena half-extent; entities are clamped inside the square
    pub const ARENA_HALF_EXTENT: f32 = 1000.0;

    /// Pickup attraction radius (orbs drift toward the player inside this)
    pub const MAGNET_RADIUS: f32 = 80.0;
    /// Pickup collection radius
    pub const COLLECT_RADIUS: f32 = 20.0;
    /// Speed at which magnetized pickups chase the player (units/sec)
    pub const MAGNET_SPEED: f32 = 360.0;

    /// Circle radius used for projectile-vs-entity overlap
    pub const PROJECTILE_RADIUS: f32 = 6.0;

    /// Boss attack-pattern phase gates (fractions of max health)
    pub const BOSS_PHASE_2_HEALTH: f32 = 0.6;
    pub const BOSS_PHASE_3_HEALTH: f32 = 0.3;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Absolute angular difference between two angles, in [0, π]
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        // Multiples of PI don't land exactly on the boundary in f32, so
        // assert the range contract rather than a specific value
        for raw in [3.0 * PI, -3.0 * PI, 7.5, -7.5, 100.0] {
            let n = normalize_angle(raw);
            assert!((-PI..PI).contains(&n), "{raw} normalized to {n}");
        }
        // The boundary itself wraps to -PI (the interval is half-open)
        assert_eq!(normalize_angle(PI), -PI);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_angle_diff_wraps() {
        // 170° vs -170° are 20° apart, not 340°
        let a = 170.0_f32.to_radians();
        let b = -170.0_f32.to_radians();
        assert!((angle_diff(a, b) - 20.0_f32.to_radians()).abs() < 1e-4);
    }
}
