//! Power-up catalog applied at level-up
//!
//! Power-ups compose: they either append a new attack from the catalog or
//! mutate the player's stats/attack list in place. The registry samples
//! distinct choices with the run RNG, so offers are deterministic per seed.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::catalog::Catalog;
use crate::sim::attack::Attack;
use crate::sim::entity::Character;

/// One selectable level-up reward
#[derive(Debug, Clone, PartialEq)]
pub enum PowerUp {
    /// Learn a new attack from the catalog
    NewAttack { name: String },
    /// Multiply the power of every owned attack
    AttackPower { factor: f32 },
    /// Multiply every owned attack's cooldown (values < 1 are faster)
    AttackSpeed { factor: f32 },
    /// Multiply every owned attack's targeting range
    AttackRange { factor: f32 },
    /// Raise max health and heal by the same amount
    MaxHealth { amount: f32 },
    /// Multiply movement speed
    MoveSpeed { factor: f32 },
    /// Flat damage reduction
    Defense { amount: f32 },
    /// Additive critical-hit chance
    CritChance { amount: f32 },
    /// Additive life-steal fraction
    LifeSteal { amount: f32 },
}

impl PowerUp {
    /// Short label for the choice UI
    pub fn label(&self) -> String {
        match self {
            PowerUp::NewAttack { name } => format!("New attack: {name}"),
            PowerUp::AttackPower { factor } => {
                format!("Attack power +{:.0}%", (factor - 1.0) * 100.0)
            }
            PowerUp::AttackSpeed { factor } => {
                format!("Attack speed +{:.0}%", (1.0 / factor - 1.0) * 100.0)
            }
            PowerUp::AttackRange { factor } => {
                format!("Attack range +{:.0}%", (factor - 1.0) * 100.0)
            }
            PowerUp::MaxHealth { amount } => format!("Max health +{amount:.0}"),
            PowerUp::MoveSpeed { factor } => {
                format!("Move speed +{:.0}%", (factor - 1.0) * 100.0)
            }
            PowerUp::Defense { amount } => format!("Defense +{amount:.0}"),
            PowerUp::CritChance { amount } => {
                format!("Crit chance +{:.0}%", amount * 100.0)
            }
            PowerUp::LifeSteal { amount } => {
                format!("Life steal +{:.0}%", amount * 100.0)
            }
        }
    }
}

/// The full set of obtainable power-ups
#[derive(Debug, Clone)]
pub struct PowerUpRegistry {
    options: Vec<PowerUp>,
}

impl Default for PowerUpRegistry {
    fn default() -> Self {
        Self {
            options: vec![
                PowerUp::NewAttack {
                    name: "bolt".into(),
                },
                PowerUp::NewAttack {
                    name: "ember_nova".into(),
                },
                PowerUp::NewAttack {
                    name: "glacial_sigil".into(),
                },
                PowerUp::NewAttack {
                    name: "lance".into(),
                },
                PowerUp::AttackPower { factor: 1.2 },
                PowerUp::AttackSpeed { factor: 0.85 },
                PowerUp::AttackRange { factor: 1.15 },
                PowerUp::MaxHealth { amount: 25.0 },
                PowerUp::MoveSpeed { factor: 1.1 },
                PowerUp::Defense { amount: 2.0 },
                PowerUp::CritChance { amount: 0.05 },
                PowerUp::LifeSteal { amount: 0.03 },
            ],
        }
    }
}

impl PowerUpRegistry {
    /// Sample up to `count` distinct choices. Attacks the player already
    /// owns are filtered out of the offer.
    pub fn offer(&self, count: usize, player: &Character, rng: &mut Pcg32) -> Vec<PowerUp> {
        let owned: Vec<&str> = player
            .attacks
            .iter()
            .filter_map(|a| a.spec_name())
            .collect();
        let mut candidates: Vec<&PowerUp> = self
            .options
            .iter()
            .filter(|p| match p {
                PowerUp::NewAttack { name } => !owned.contains(&name.as_str()),
                _ => true,
            })
            .collect();

        let mut picks = Vec::new();
        while picks.len() < count && !candidates.is_empty() {
            let idx = rng.random_range(0..candidates.len());
            picks.push(candidates.swap_remove(idx).clone());
        }
        picks
    }

    /// Apply a chosen power-up to the player. Unknown attack names are
    /// logged and skipped (the level-up is not retried).
    pub fn apply(powerup: &PowerUp, player: &mut Character, catalog: &Catalog, effect_id: u32) {
        match powerup {
            PowerUp::NewAttack { name } => {
                if let Some(spec) = catalog.player_attack(name) {
                    player
                        .attacks
                        .push(Attack::new_named(spec.clone(), name.clone(), effect_id));
                }
            }
            PowerUp::AttackPower { factor } => {
                for attack in &mut player.attacks {
                    attack.spec.power *= factor;
                }
            }
            PowerUp::AttackSpeed { factor } => {
                for attack in &mut player.attacks {
                    attack.spec.cooldown_ms *= factor;
                }
            }
            PowerUp::AttackRange { factor } => {
                for attack in &mut player.attacks {
                    attack.spec.range *= factor;
                    attack.spec.effect_radius *= factor;
                }
            }
            PowerUp::MaxHealth { amount } => {
                player.max_health += amount;
                player.heal(*amount);
            }
            PowerUp::MoveSpeed { factor } => player.move_speed *= factor,
            PowerUp::Defense { amount } => player.defense += amount,
            PowerUp::CritChance { amount } => {
                player.crit_chance = (player.crit_chance + amount).min(1.0)
            }
            PowerUp::LifeSteal { amount } => player.life_steal += amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn player_with(catalog: &Catalog, names: &[&str]) -> Character {
        let mut player = Character::player(0, 100.0);
        for (i, name) in names.iter().enumerate() {
            let spec = catalog.player_attack(name).unwrap().clone();
            player
                .attacks
                .push(Attack::new_named(spec, name.to_string(), i as u32 + 1));
        }
        player
    }

    #[test]
    fn test_offer_excludes_owned_attacks() {
        let catalog = Catalog::default();
        let player = player_with(&catalog, &["bolt", "lance"]);
        let registry = PowerUpRegistry::default();
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..20 {
            for pick in registry.offer(3, &player, &mut rng) {
                if let PowerUp::NewAttack { name } = pick {
                    assert!(name != "bolt" && name != "lance");
                }
            }
        }
    }

    #[test]
    fn test_offer_is_distinct() {
        let catalog = Catalog::default();
        let player = player_with(&catalog, &[]);
        let registry = PowerUpRegistry::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let picks = registry.offer(3, &player, &mut rng);
        assert_eq!(picks.len(), 3);
        assert!(picks[0] != picks[1] && picks[1] != picks[2] && picks[0] != picks[2]);
    }

    #[test]
    fn test_apply_new_attack_and_stat_boosts() {
        let catalog = Catalog::default();
        let mut player = player_with(&catalog, &[]);

        PowerUpRegistry::apply(
            &PowerUp::NewAttack {
                name: "bolt".into(),
            },
            &mut player,
            &catalog,
            42,
        );
        assert_eq!(player.attacks.len(), 1);

        let base_power = player.attacks[0].spec.power;
        PowerUpRegistry::apply(
            &PowerUp::AttackPower { factor: 1.2 },
            &mut player,
            &catalog,
            43,
        );
        assert!((player.attacks[0].spec.power - base_power * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_apply_unknown_attack_skips() {
        let catalog = Catalog::default();
        let mut player = player_with(&catalog, &[]);
        PowerUpRegistry::apply(
            &PowerUp::NewAttack {
                name: "missingno".into(),
            },
            &mut player,
            &catalog,
            42,
        );
        assert!(player.attacks.is_empty());
    }

    #[test]
    fn test_max_health_heals_too() {
        let catalog = Catalog::default();
        let mut player = player_with(&catalog, &[]);
        player.health = 40.0;
        PowerUpRegistry::apply(
            &PowerUp::MaxHealth { amount: 25.0 },
            &mut player,
            &catalog,
            1,
        );
        assert_eq!(player.max_health, 125.0);
        assert_eq!(player.health, 65.0);
    }
}
