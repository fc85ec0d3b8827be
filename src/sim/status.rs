//! Timed status effects (burn / poison / freeze / stun)
//!
//! Each entity carries a [`StatusSet`]: at most one effect per id, where the
//! id is unique per *source* so repeated casts from the same attack refresh
//! the running effect instead of stacking a second copy. Tick-rated effects
//! (burn, poison) deal periodic damage; one-shot effects (freeze, stun)
//! change state on entry and reverse it exactly once on expiry.

use serde::{Deserialize, Serialize};

/// Status effect categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Damage over time, scaled by the target's max health
    Burn,
    /// Damage over time, scaled by the target's current health
    Poison,
    /// Movement speed multiplier while active
    Freeze,
    /// No movement or attacks while active
    Stun,
}

/// Catalog-side template: what an attack applies on hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusTemplate {
    pub kind: StatusKind,
    pub duration_ms: f32,
    /// Interval between periodic ticks; None for one-shot effects
    pub tick_rate_ms: Option<f32>,
    /// Burn/poison: fraction of reference health per tick.
    /// Freeze: speed multiplier. Stun: unused.
    pub magnitude: f32,
}

impl StatusTemplate {
    /// Instantiate for a target, stamped with the source's effect id
    pub fn instantiate(&self, id: u32) -> StatusEffect {
        StatusEffect {
            id,
            kind: self.kind,
            duration_ms: self.duration_ms,
            tick_rate_ms: self.tick_rate_ms,
            last_tick_ms: 0.0,
            magnitude: self.magnitude,
        }
    }
}

/// A live effect instance on one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    /// Source-unique id; re-application with the same id refreshes
    pub id: u32,
    pub kind: StatusKind,
    pub duration_ms: f32,
    pub tick_rate_ms: Option<f32>,
    pub last_tick_ms: f32,
    pub magnitude: f32,
}

/// A periodic tick produced by [`StatusSet::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusTick {
    pub kind: StatusKind,
    /// Fraction of the reference health to apply as damage
    pub fraction: f32,
}

/// Per-entity active effects
#[derive(Debug, Clone, Default)]
pub struct StatusSet {
    effects: Vec<StatusEffect>,
}

impl StatusSet {
    /// Apply an effect. Same id present: refresh duration and tick rate
    /// without re-triggering entry behavior. Otherwise store a fresh copy.
    /// Returns true if this was a new application (entry behavior ran).
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.id == effect.id) {
            existing.duration_ms = effect.duration_ms;
            existing.tick_rate_ms = effect.tick_rate_ms;
            return false;
        }
        self.effects.push(effect);
        true
    }

    /// Advance all effects by `dt_ms`. Periodic ticks that came due are
    /// returned for the caller to apply as damage; expired effects are
    /// removed (their one-time modifiers lapse with them).
    pub fn update(&mut self, dt_ms: f32) -> Vec<StatusTick> {
        let mut ticks = Vec::new();
        for effect in &mut self.effects {
            // Zero/negative initial duration expires without ever ticking
            if effect.duration_ms <= 0.0 {
                continue;
            }
            effect.duration_ms -= dt_ms;
            if let Some(rate) = effect.tick_rate_ms {
                effect.last_tick_ms += dt_ms;
                if effect.last_tick_ms >= rate {
                    effect.last_tick_ms = 0.0;
                    ticks.push(StatusTick {
                        kind: effect.kind,
                        fraction: effect.magnitude,
                    });
                }
            }
        }
        self.effects.retain(|e| e.duration_ms > 0.0);
        ticks
    }

    /// Movement speed multiplier from active freezes (product)
    pub fn speed_factor(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind == StatusKind::Freeze)
            .map(|e| e.magnitude)
            .product()
    }

    /// True while any stun is active: no movement, no attacks
    pub fn stunned(&self) -> bool {
        self.effects.iter().any(|e| e.kind == StatusKind::Stun)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Drop every active effect (entity death / pool release)
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    #[cfg(test)]
    fn get(&self, id: u32) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn(id: u32, duration: f32) -> StatusEffect {
        StatusEffect {
            id,
            kind: StatusKind::Burn,
            duration_ms: duration,
            tick_rate_ms: Some(500.0),
            last_tick_ms: 0.0,
            magnitude: 0.05,
        }
    }

    #[test]
    fn test_refresh_not_stack() {
        let mut set = StatusSet::default();
        assert!(set.apply(burn(7, 1000.0)));
        // Re-applying the same id refreshes, never duplicates
        assert!(!set.apply(burn(7, 3000.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(7).unwrap().duration_ms, 3000.0);
    }

    #[test]
    fn test_distinct_ids_coexist() {
        let mut set = StatusSet::default();
        set.apply(burn(1, 1000.0));
        let mut stun = burn(2, 1000.0);
        stun.kind = StatusKind::Stun;
        stun.tick_rate_ms = None;
        set.apply(stun);
        assert_eq!(set.len(), 2);
        assert!(set.stunned());
    }

    #[test]
    fn test_periodic_ticks_and_expiry() {
        let mut set = StatusSet::default();
        set.apply(burn(1, 1200.0));

        // 400ms: not yet due
        assert!(set.update(400.0).is_empty());
        // 400ms more: 800 >= 500, one tick, accumulator resets
        let ticks = set.update(400.0);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].fraction, 0.05);
        // 600ms more: one more tick, then duration hits zero and it expires
        let ticks = set.update(600.0);
        assert_eq!(ticks.len(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_zero_duration_expires_without_ticking() {
        let mut set = StatusSet::default();
        set.apply(burn(1, 0.0));
        let ticks = set.update(16.0);
        assert!(ticks.is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_freeze_speed_factor() {
        let mut set = StatusSet::default();
        let mut freeze = burn(1, 1000.0);
        freeze.kind = StatusKind::Freeze;
        freeze.tick_rate_ms = None;
        freeze.magnitude = 0.5;
        set.apply(freeze);
        assert_eq!(set.speed_factor(), 0.5);

        // Expiry reverses the modifier exactly once
        set.update(1000.0);
        assert_eq!(set.speed_factor(), 1.0);
    }
}
