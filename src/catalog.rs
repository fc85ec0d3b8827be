//! Read-only enemy and attack stat tables
//!
//! Loaded once at startup and treated as an immutable catalog keyed by type
//! name. Unknown names are logged and skipped, never fatal: a bad config
//! entry costs one spawn or one power-up, not the run.

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::sim::status::{StatusKind, StatusTemplate};

/// Which attack resolution an [`AttackSpec`] uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackForm {
    /// Facing-centered arc, resolved synchronously on trigger
    Melee,
    /// Pooled projectile with piercing and max travel range
    Projectile,
    /// Immediate radial damage around the owner
    Aoe,
    /// Telegraphed radial damage at the nearest hostile's position
    TargetedAoe,
    /// Persisting line to the farthest in-range hostile
    Beam,
}

/// Static parameters of one attack type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSpec {
    pub form: AttackForm,
    /// Maximum targeting distance
    pub range: f32,
    /// Cooldown between triggers (ms)
    pub cooldown_ms: f32,
    /// Base damage per application
    pub power: f32,
    /// Render color (0xRRGGBB)
    pub color: u32,
    /// Half-angle of the melee arc (radians)
    #[serde(default = "default_half_arc")]
    pub half_arc: f32,
    /// Projectile travel speed (units/sec)
    #[serde(default)]
    pub projectile_speed: f32,
    /// Extra targets a projectile may hit after its first
    #[serde(default)]
    pub piercing: u32,
    /// Damage radius for area attacks
    #[serde(default)]
    pub effect_radius: f32,
    /// How long a beam stays anchored to its target (ms)
    #[serde(default)]
    pub beam_duration_ms: f32,
    /// Status effect applied to every target hit
    #[serde(default)]
    pub status: Option<StatusTemplate>,
}

fn default_half_arc() -> f32 {
    FRAC_PI_4
}

/// Per-enemy-class static metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawnRecord {
    pub name: String,
    pub color: u32,
    /// Collision radius
    pub size: f32,
    pub move_speed: f32,
    pub max_health: f32,
    pub attack: AttackSpec,
    /// Experience orb value dropped on death
    pub experience: u32,
    /// Eligible for spawn only while the player level is in range
    pub from_level: u32,
    pub to_level: u32,
    /// Relative spawn weight within the eligible set
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// The full stat catalog: enemy roster + named player attacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub enemies: Vec<EnemySpawnRecord>,
    pub player_attacks: BTreeMap<String, AttackSpec>,
    /// The boss record, spawned once at the boss level
    pub boss: EnemySpawnRecord,
}

impl Catalog {
    /// Load a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a player attack by name; logs and returns None on a miss
    pub fn player_attack(&self, name: &str) -> Option<&AttackSpec> {
        let spec = self.player_attacks.get(name);
        if spec.is_none() {
            log::warn!("Unknown player attack '{name}', skipping");
        }
        spec
    }

    /// Enemy classes eligible at the given player level
    pub fn eligible_enemies(&self, level: u32) -> impl Iterator<Item = &EnemySpawnRecord> {
        self.enemies
            .iter()
            .filter(move |e| e.from_level <= level && level <= e.to_level)
    }
}

impl Default for Catalog {
    /// Built-in roster mirroring the shipped game balance
    fn default() -> Self {
        let enemies = vec![
            EnemySpawnRecord {
                name: "wisp".into(),
                color: 0x8be9fd,
                size: 10.0,
                move_speed: 110.0,
                max_health: 20.0,
                attack: AttackSpec {
                    form: AttackForm::Melee,
                    range: 24.0,
                    cooldown_ms: 900.0,
                    power: 4.0,
                    color: 0x8be9fd,
                    half_arc: FRAC_PI_4,
                    projectile_speed: 0.0,
                    piercing: 0,
                    effect_radius: 0.0,
                    beam_duration_ms: 0.0,
                    status: None,
                },
                experience: 5,
                from_level: 1,
                to_level: 6,
                weight: 4,
            },
            EnemySpawnRecord {
                name: "husk".into(),
                color: 0x6272a4,
                size: 16.0,
                move_speed: 55.0,
                max_health: 70.0,
                attack: AttackSpec {
                    form: AttackForm::Melee,
                    range: 30.0,
                    cooldown_ms: 1400.0,
                    power: 10.0,
                    color: 0x6272a4,
                    half_arc: FRAC_PI_4,
                    projectile_speed: 0.0,
                    piercing: 0,
                    effect_radius: 0.0,
                    beam_duration_ms: 0.0,
                    status: None,
                },
                experience: 12,
                from_level: 2,
                to_level: 10,
                weight: 3,
            },
            EnemySpawnRecord {
                name: "spitter".into(),
                color: 0x50fa7b,
                size: 12.0,
                move_speed: 70.0,
                max_health: 35.0,
                attack: AttackSpec {
                    form: AttackForm::Projectile,
                    range: 320.0,
                    cooldown_ms: 1800.0,
                    power: 6.0,
                    color: 0x50fa7b,
                    half_arc: FRAC_PI_4,
                    projectile_speed: 220.0,
                    piercing: 0,
                    effect_radius: 0.0,
                    beam_duration_ms: 0.0,
                    status: Some(StatusTemplate {
                        kind: StatusKind::Poison,
                        duration_ms: 3000.0,
                        tick_rate_ms: Some(1000.0),
                        magnitude: 0.02,
                    }),
                },
                experience: 18,
                from_level: 4,
                to_level: 14,
                weight: 2,
            },
            EnemySpawnRecord {
                name: "frost_shade".into(),
                color: 0xbd93f9,
                size: 14.0,
                move_speed: 60.0,
                max_health: 50.0,
                attack: AttackSpec {
                    form: AttackForm::TargetedAoe,
                    range: 280.0,
                    cooldown_ms: 3500.0,
                    power: 9.0,
                    color: 0xbd93f9,
                    half_arc: FRAC_PI_4,
                    projectile_speed: 0.0,
                    piercing: 0,
                    effect_radius: 60.0,
                    beam_duration_ms: 0.0,
                    status: Some(StatusTemplate {
                        kind: StatusKind::Freeze,
                        duration_ms: 2000.0,
                        tick_rate_ms: None,
                        magnitude: 0.5,
                    }),
                },
                experience: 25,
                from_level: 6,
                to_level: 20,
                weight: 2,
            },
            EnemySpawnRecord {
                name: "warden".into(),
                color: 0xffb86c,
                size: 15.0,
                move_speed: 45.0,
                max_health: 90.0,
                attack: AttackSpec {
                    form: AttackForm::Beam,
                    range: 360.0,
                    cooldown_ms: 4000.0,
                    power: 14.0,
                    color: 0xffb86c,
                    half_arc: FRAC_PI_4,
                    projectile_speed: 0.0,
                    piercing: 0,
                    effect_radius: 0.0,
                    beam_duration_ms: 900.0,
                    status: None,
                },
                experience: 40,
                from_level: 8,
                to_level: 30,
                weight: 1,
            },
        ];

        let mut player_attacks = BTreeMap::new();
        player_attacks.insert(
            "sword_sweep".into(),
            AttackSpec {
                form: AttackForm::Melee,
                range: 70.0,
                cooldown_ms: 600.0,
                power: 12.0,
                color: 0xf8f8f2,
                half_arc: FRAC_PI_4,
                projectile_speed: 0.0,
                piercing: 0,
                effect_radius: 0.0,
                beam_duration_ms: 0.0,
                status: None,
            },
        );
        player_attacks.insert(
            "bolt".into(),
            AttackSpec {
                form: AttackForm::Projectile,
                range: 420.0,
                cooldown_ms: 1000.0,
                power: 10.0,
                color: 0xf1fa8c,
                half_arc: FRAC_PI_4,
                projectile_speed: 400.0,
                piercing: 1,
                effect_radius: 0.0,
                beam_duration_ms: 0.0,
                status: None,
            },
        );
        player_attacks.insert(
            "ember_nova".into(),
            AttackSpec {
                form: AttackForm::Aoe,
                range: 0.0,
                cooldown_ms: 2500.0,
                power: 8.0,
                color: 0xff5555,
                half_arc: FRAC_PI_4,
                projectile_speed: 0.0,
                piercing: 0,
                effect_radius: 120.0,
                beam_duration_ms: 0.0,
                status: Some(StatusTemplate {
                    kind: StatusKind::Burn,
                    duration_ms: 3000.0,
                    tick_rate_ms: Some(750.0),
                    magnitude: 0.015,
                }),
            },
        );
        player_attacks.insert(
            "glacial_sigil".into(),
            AttackSpec {
                form: AttackForm::TargetedAoe,
                range: 340.0,
                cooldown_ms: 4000.0,
                power: 16.0,
                color: 0x8be9fd,
                half_arc: FRAC_PI_4,
                projectile_speed: 0.0,
                piercing: 0,
                effect_radius: 90.0,
                beam_duration_ms: 0.0,
                status: Some(StatusTemplate {
                    kind: StatusKind::Freeze,
                    duration_ms: 2500.0,
                    tick_rate_ms: None,
                    magnitude: 0.5,
                }),
            },
        );
        player_attacks.insert(
            "lance".into(),
            AttackSpec {
                form: AttackForm::Beam,
                range: 380.0,
                cooldown_ms: 3000.0,
                power: 22.0,
                color: 0xff79c6,
                half_arc: FRAC_PI_4,
                projectile_speed: 0.0,
                piercing: 0,
                effect_radius: 0.0,
                beam_duration_ms: 800.0,
                status: None,
            },
        );

        let boss = EnemySpawnRecord {
            name: "hollow_king".into(),
            color: 0xff5555,
            size: 40.0,
            move_speed: 35.0,
            max_health: 1500.0,
            attack: AttackSpec {
                form: AttackForm::Projectile,
                range: 500.0,
                cooldown_ms: 1200.0,
                power: 12.0,
                color: 0xff5555,
                half_arc: FRAC_PI_4,
                projectile_speed: 260.0,
                piercing: 0,
                effect_radius: 0.0,
                beam_duration_ms: 0.0,
                status: None,
            },
            experience: 500,
            from_level: 10,
            to_level: u32::MAX,
            weight: 1,
        };

        Self {
            enemies,
            player_attacks,
            boss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_window() {
        let cat = Catalog::default();
        let at_1: Vec<_> = cat.eligible_enemies(1).map(|e| e.name.as_str()).collect();
        assert_eq!(at_1, ["wisp"]);
        // wisp ages out after level 6
        assert!(cat.eligible_enemies(7).all(|e| e.name != "wisp"));
    }

    #[test]
    fn test_unknown_attack_is_none() {
        let cat = Catalog::default();
        assert!(cat.player_attack("sword_sweep").is_some());
        assert!(cat.player_attack("no_such_attack").is_none());
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let cat = Catalog::default();
        let json = serde_json::to_string(&cat).unwrap();
        let back = Catalog::from_json(&json).unwrap();
        assert_eq!(back.enemies.len(), cat.enemies.len());
        assert_eq!(back.boss.name, cat.boss.name);
    }
}
