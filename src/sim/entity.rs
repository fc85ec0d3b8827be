//! Combat-capable entities and the damage model
//!
//! One `Character` type covers the player and every enemy class; behavior
//! differences hang off plain data (faction, stats, attack list) rather
//! than a type hierarchy. Targeting and collision logic switch on
//! [`Faction`] equality, never on type identity.

use glam::Vec2;

use crate::catalog::EnemySpawnRecord;
use crate::sim::attack::Attack;
use crate::sim::pool::Poolable;
use crate::sim::status::StatusSet;

/// The side an entity fights for; hostiles are the opposite faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Faction {
    Player,
    #[default]
    Enemy,
}

impl Faction {
    /// The faction this one attacks
    pub fn hostile(self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// A combat-capable entity: the player or one pooled enemy
#[derive(Debug, Clone, Default)]
pub struct Character {
    pub id: u32,
    pub active: bool,
    pub faction: Faction,
    pub pos: Vec2,
    /// Facing angle in radians
    pub facing: f32,
    /// Movement speed (units/sec), before status modifiers
    pub move_speed: f32,
    /// Collision radius
    pub size: f32,
    pub color: u32,
    pub health: f32,
    pub max_health: f32,
    /// Flat damage reduction (player stat; enemies carry 0)
    pub defense: f32,
    /// Chance that damage *dealt by* this entity crits (player stat)
    pub crit_chance: f32,
    /// Fraction of actual damage dealt returned as healing (player stat)
    pub life_steal: f32,
    pub status: StatusSet,
    pub attacks: Vec<Attack>,
    /// Experience orb value dropped on death (enemies)
    pub experience: u32,
    pub is_boss: bool,
}

impl Character {
    /// Build the player entity. Stats beyond these defaults come from
    /// power-ups during the run.
    pub fn player(id: u32, max_health: f32) -> Self {
        Self {
            id,
            active: true,
            faction: Faction::Player,
            pos: Vec2::ZERO,
            facing: 0.0,
            move_speed: 160.0,
            size: 14.0,
            color: 0xf8f8f2,
            health: max_health,
            max_health,
            defense: 0.0,
            crit_chance: 0.05,
            life_steal: 0.0,
            status: StatusSet::default(),
            attacks: Vec::new(),
            experience: 0,
            is_boss: false,
        }
    }

    /// Initialize a pooled slot from a spawn record
    pub fn init_enemy(&mut self, id: u32, record: &EnemySpawnRecord, pos: Vec2, effect_id: u32) {
        self.id = id;
        self.active = true;
        self.faction = Faction::Enemy;
        self.pos = pos;
        self.facing = 0.0;
        self.move_speed = record.move_speed;
        self.size = record.size;
        self.color = record.color;
        self.health = record.max_health;
        self.max_health = record.max_health;
        self.defense = 0.0;
        self.crit_chance = 0.0;
        self.life_steal = 0.0;
        self.status.clear();
        self.attacks = vec![Attack::new(record.attack.clone(), effect_id)];
        self.experience = record.experience;
        self.is_boss = false;
    }

    /// Apply incoming damage. Defense is subtracted first (floored at 0),
    /// health is clamped to [0, max]. Returns the actual post-clamp delta,
    /// which upstream life-steal must be computed from.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let effective = (amount - self.defense).max(0.0);
        let before = self.health;
        self.health = (self.health - effective).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Direct health reduction that ignores defense (status effect ticks).
    /// Returns the actual delta.
    pub fn take_status_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Restore health, clamped to max. Returns the actual delta.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        self.health - before
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Effective movement speed after status modifiers; zero while stunned
    pub fn effective_speed(&self) -> f32 {
        if self.status.stunned() {
            0.0
        } else {
            self.move_speed * self.status.speed_factor()
        }
    }
}

impl Poolable for Character {
    fn is_active(&self) -> bool {
        self.active
    }

    /// Destroying a character releases its owned attacks and clears every
    /// status effect
    fn deactivate(&mut self) {
        self.active = false;
        self.attacks.clear();
        self.status.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::status::{StatusEffect, StatusKind};
    use proptest::prelude::*;

    #[test]
    fn test_defense_floors_at_zero() {
        let mut c = Character::player(0, 100.0);
        c.defense = 10.0;
        // Weak hit is fully absorbed
        assert_eq!(c.take_damage(6.0), 0.0);
        assert_eq!(c.health, 100.0);
        // Strong hit lands minus defense
        assert_eq!(c.take_damage(25.0), 15.0);
        assert_eq!(c.health, 85.0);
    }

    #[test]
    fn test_damage_return_is_post_clamp() {
        let mut c = Character::player(0, 50.0);
        c.health = 10.0;
        // Overkill reports only the health actually removed
        assert_eq!(c.take_damage(999.0), 10.0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut c = Character::player(0, 100.0);
        c.health = 95.0;
        assert_eq!(c.heal(20.0), 5.0);
        assert_eq!(c.health, 100.0);
    }

    #[test]
    fn test_deactivate_clears_owned_state() {
        let mut c = Character::player(1, 100.0);
        c.status.apply(StatusEffect {
            id: 1,
            kind: StatusKind::Stun,
            duration_ms: 1000.0,
            tick_rate_ms: None,
            last_tick_ms: 0.0,
            magnitude: 0.0,
        });
        c.deactivate();
        assert!(c.status.is_empty());
        assert!(c.attacks.is_empty());
    }

    #[test]
    fn test_stun_zeroes_speed() {
        let mut c = Character::player(0, 100.0);
        c.status.apply(StatusEffect {
            id: 9,
            kind: StatusKind::Stun,
            duration_ms: 500.0,
            tick_rate_ms: None,
            last_tick_ms: 0.0,
            magnitude: 0.0,
        });
        assert_eq!(c.effective_speed(), 0.0);
    }

    proptest! {
        /// Health never leaves [0, max] under any damage/heal sequence,
        /// and every return value equals the actual health delta
        #[test]
        fn prop_health_clamp(ops in proptest::collection::vec((any::<bool>(), 0.0f32..500.0), 0..64)) {
            let mut c = Character::player(0, 100.0);
            for (is_damage, amount) in ops {
                let before = c.health;
                let delta = if is_damage {
                    -c.take_damage(amount)
                } else {
                    c.heal(amount)
                };
                prop_assert!((0.0..=c.max_health).contains(&c.health));
                prop_assert!((c.health - (before + delta)).abs() < 1e-3);
            }
        }
    }
}
