//! Data-driven tuning knobs
//!
//! Everything balance-related that is not per-enemy/per-attack lives here,
//! so designers can tweak a JSON file instead of recompiling.

use serde::{Deserialize, Serialize};

/// Simulation tuning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Leveling ===
    /// Experience required for the first level-up
    pub first_threshold: u32,
    /// Threshold growth: next = floor((threshold - prev) * growth) + threshold
    pub threshold_growth: f32,

    // === Spawning ===
    /// Enemy spawn interval at level 1 (ms)
    pub base_spawn_interval_ms: f32,
    /// Interval reduction per player level (ms)
    pub spawn_interval_decay_ms: f32,
    /// Interval floor (ms)
    pub min_spawn_interval_ms: f32,
    /// Heart pickup spawn interval (ms)
    pub heart_spawn_interval_ms: f32,
    /// Fraction of max health restored by a heart
    pub heart_heal_fraction: f32,
    /// Ring distance from the player at which enemies appear
    pub enemy_spawn_radius: f32,
    /// Ring distance at which hearts appear
    pub heart_spawn_radius: f32,
    /// Player level at which the boss phase begins
    pub boss_level: u32,
    /// Ring distance at which the boss appears
    pub boss_spawn_radius: f32,
    /// Interval between boss pattern attacks in phase one (ms); later
    /// phases scale this down
    pub boss_pattern_interval_ms: f32,
    /// Radius of the boss's telegraphed strike
    pub boss_telegraph_radius: f32,
    /// Boss telegraph damage as a multiple of its attack power
    pub boss_telegraph_power_factor: f32,

    // === Combat ===
    /// Damage multiplier on a critical hit
    pub crit_multiplier: f32,
    /// Telegraph delay for targeted area attacks (ms)
    pub telegraph_ms: f32,

    // === Pools ===
    /// Optional hard cap on live projectiles (None = unbounded)
    pub max_projectiles: Option<usize>,
    /// Optional hard cap on live enemies (None = unbounded)
    pub max_enemies: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            first_threshold: 100,
            threshold_growth: 1.35,

            base_spawn_interval_ms: 2000.0,
            spawn_interval_decay_ms: 100.0,
            min_spawn_interval_ms: 400.0,
            heart_spawn_interval_ms: 15_000.0,
            heart_heal_fraction: 0.25,
            enemy_spawn_radius: 460.0,
            heart_spawn_radius: 240.0,
            boss_level: 10,
            boss_spawn_radius: 420.0,
            boss_pattern_interval_ms: 2400.0,
            boss_telegraph_radius: 90.0,
            boss_telegraph_power_factor: 1.5,

            crit_multiplier: 2.0,
            telegraph_ms: 1000.0,

            max_projectiles: None,
            max_enemies: None,
        }
    }
}

impl SimConfig {
    /// Load a config from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enemy spawn interval for a given player level (decays, floored)
    pub fn spawn_interval_ms(&self, level: u32) -> f32 {
        let decayed =
            self.base_spawn_interval_ms - self.spawn_interval_decay_ms * (level - 1) as f32;
        decayed.max(self.min_spawn_interval_ms)
    }
}
