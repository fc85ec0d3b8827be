//! Framerate-independent movement resolution
//!
//! Leaf helpers converting (facing, speed, elapsed ms) into position deltas.
//! Speeds are in units/second; callers pass elapsed milliseconds already
//! scaled by the global time multiplier.

use glam::Vec2;

use crate::consts::ARENA_HALF_EXTENT;

/// Displacement along a facing angle over `dt_ms`
#[inline]
pub fn step(facing: f32, speed: f32, dt_ms: f32) -> Vec2 {
    Vec2::new(facing.cos(), facing.sin()) * speed * (dt_ms / 1000.0)
}

/// Displacement toward a target point, capped so the mover never overshoots
pub fn seek(from: Vec2, to: Vec2, speed: f32, dt_ms: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let max_step = speed * (dt_ms / 1000.0);
    delta / dist * max_step.min(dist)
}

/// Clamp a position inside the square arena
#[inline]
pub fn clamp_to_arena(pos: Vec2) -> Vec2 {
    pos.clamp(
        Vec2::splat(-ARENA_HALF_EXTENT),
        Vec2::splat(ARENA_HALF_EXTENT),
    )
}
