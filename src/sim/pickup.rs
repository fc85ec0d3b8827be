//! Pooled pickups: experience orbs and hearts
//!
//! Dropped by dying enemies (orbs) or spawned on a timer (hearts).
//! Collection is idempotent: only the first collection yields the payload.

use glam::Vec2;

use crate::sim::pool::Poolable;

/// What a pickup grants on collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupKind {
    /// Experience orb
    Xp { value: u32 },
    /// Healing heart
    Heart { heal: f32 },
}

impl Default for PickupKind {
    fn default() -> Self {
        PickupKind::Xp { value: 0 }
    }
}

/// A transient pooled pickup
#[derive(Debug, Clone, Default)]
pub struct Pickup {
    pub active: bool,
    pub kind: PickupKind,
    pub pos: Vec2,
    collected: bool,
}

impl Pickup {
    pub fn init(&mut self, kind: PickupKind, pos: Vec2) {
        self.active = true;
        self.kind = kind;
        self.pos = pos;
        self.collected = false;
    }

    /// First collection returns the payload and deactivates; repeats
    /// return None
    pub fn collect(&mut self) -> Option<PickupKind> {
        if self.collected {
            return None;
        }
        self.collected = true;
        let kind = self.kind;
        self.deactivate();
        Some(kind)
    }
}

impl Poolable for Pickup {
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
    use crate::sim::pool::Pool;

    #[test]
    fn test_collect_is_idempotent() {
        let mut p = Pickup::default();
        p.init(PickupKind::Xp { value: 25 }, Vec2::ZERO);
        assert_eq!(p.collect(), Some(PickupKind::Xp { value: 25 }));
        assert_eq!(p.collect(), None);
        assert!(!p.is_active());
    }

    #[test]
    fn test_recycled_orb_is_collectible_again() {
        let mut pool: Pool<Pickup> = Pool::new(None);
        pool.acquire(|p| p.init(PickupKind::Xp { value: 5 }, Vec2::ZERO));
        pool.slots_mut()[0].collect();

        // Reacquired slot must not carry the collected flag
        let slot = pool
            .acquire(|p| p.init(PickupKind::Heart { heal: 10.0 }, Vec2::ONE))
            .unwrap();
        assert_eq!(slot.collect(), Some(PickupKind::Heart { heal: 10.0 }));
    }
}
