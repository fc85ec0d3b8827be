//! Pooled projectiles
//!
//! A projectile damages lazily, on overlap, at most once per target per
//! flight; piercing lets it survive a limited number of hits before the
//! slot goes back to the pool.

use glam::Vec2;

use crate::sim::entity::Faction;
use crate::sim::movement;
use crate::sim::pool::Poolable;
use crate::sim::status::StatusEffect;

/// A transient pooled projectile
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub active: bool,
    pub id: u32,
    /// Faction of the attack that fired it; determines valid targets
    pub faction: Faction,
    pub pos: Vec2,
    /// Launch position; travel range is measured from here
    pub origin: Vec2,
    pub angle: f32,
    /// Travel speed (units/sec)
    pub speed: f32,
    pub power: f32,
    pub color: u32,
    /// Additional targets this projectile may still damage after a hit
    pub piercing_left: u32,
    /// Targets already damaged this flight
    pub hit: Vec<u32>,
    pub status: Option<StatusEffect>,
    pub max_range: f32,
}

impl Projectile {
    /// Advance along the flight path; deactivates past max travel range
    pub fn advance(&mut self, dt_ms: f32) {
        self.pos += movement::step(self.angle, self.speed, dt_ms);
        if self.pos.distance(self.origin) >= self.max_range {
            self.deactivate();
        }
    }

    /// Register a hit on `target`. Returns false if this target was
    /// already damaged this flight. Exhausting the piercing budget
    /// deactivates the projectile.
    pub fn register_hit(&mut self, target: u32) -> bool {
        if self.hit.contains(&target) {
            return false;
        }
        self.hit.push(target);
        if self.piercing_left == 0 {
            self.deactivate();
        } else {
            self.piercing_left -= 1;
        }
        true
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }
    fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(piercing: u32) -> Projectile {
        Projectile {
            active: true,
            id: 1,
            faction: Faction::Player,
            pos: Vec2::ZERO,
            origin: Vec2::ZERO,
            angle: 0.0,
            speed: 200.0,
            power: 5.0,
            color: 0,
            piercing_left: piercing,
            hit: Vec::new(),
            status: None,
            max_range: 100.0,
        }
    }

    #[test]
    fn test_piercing_exhaustion() {
        // piercing = 2 allows three distinct targets total
        let mut p = projectile(2);
        assert!(p.register_hit(10));
        assert!(p.is_active());
        assert!(p.register_hit(11));
        assert!(p.is_active());
        assert!(p.register_hit(12));
        assert!(!p.is_active());
    }

    #[test]
    fn test_never_hits_same_target_twice() {
        let mut p = projectile(5);
        assert!(p.register_hit(10));
        assert!(!p.register_hit(10));
        // The duplicate did not consume piercing
        assert_eq!(p.piercing_left, 4);
    }

    #[test]
    fn test_zero_piercing_deactivates_on_first_hit() {
        let mut p = projectile(0);
        assert!(p.register_hit(10));
        assert!(!p.is_active());
    }

    #[test]
    fn test_deactivates_past_max_range() {
        let mut p = projectile(0);
        // 200 units/sec for 400ms = 80 units: still flying
        p.advance(400.0);
        assert!(p.is_active());
        // 120ms more crosses the 100 unit range
        p.advance(120.0);
        assert!(!p.is_active());
    }
}
