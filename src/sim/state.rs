//! The complete simulation state
//!
//! Everything the tick function mutates lives here: the player, the pooled
//! enemy/projectile/pickup collections, the deferred-task queue, spawn and
//! leveling bookkeeping, the seeded RNG, and the outbound event queue.
//! There is no ambient registry: collections are owned fields, iterated
//! explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::catalog::Catalog;
use crate::config::SimConfig;
use crate::consts::ARENA_HALF_EXTENT;
use crate::polar_to_cartesian;
use crate::sim::attack::{Attack, Indicator};
use crate::sim::entity::{Character, Faction};
use crate::sim::events::GameEvent;
use crate::sim::pickup::Pickup;
use crate::sim::pool::Pool;
use crate::sim::powerup::{PowerUp, PowerUpRegistry};
use crate::sim::progress::Progress;
use crate::sim::projectile::Projectile;
use crate::sim::scheduler::TaskQueue;
use crate::sim::spawn::SpawnController;
use crate::sim::status::StatusEffect;

/// Top-level simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Normal play
    Running,
    /// Frozen while the player picks a power-up; the sim clock does not
    /// advance, so every pending cooldown/telegraph keeps its remaining
    /// delay
    LevelUpPause,
    /// Player died
    GameOver,
}

/// A pending telegraphed area strike (also the renderer's warning marker)
#[derive(Debug, Clone)]
pub struct Telegraph {
    pub marker: u32,
    /// Faction that fired it; damages the opposite side on resolve
    pub faction: Faction,
    pub center: Vec2,
    pub radius: f32,
    pub power: f32,
    pub color: u32,
    pub status: Option<StatusEffect>,
    pub resolve_at_ms: f64,
}

/// A live beam segment for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamLine {
    pub from: Vec2,
    pub to: Vec2,
    pub color: u32,
}

/// Complete game state
#[derive(Debug)]
pub struct SimState {
    pub config: SimConfig,
    pub catalog: Catalog,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (ms); frozen while paused
    pub now_ms: f64,
    /// Global time multiplier applied to every dt before integration, so
    /// slowing/pausing affects movement and scheduled tasks uniformly
    pub time_scale: f32,
    pub phase: SimPhase,
    pub player: Character,
    pub enemies: Pool<Character>,
    pub projectiles: Pool<Projectile>,
    pub pickups: Pool<Pickup>,
    pub tasks: TaskQueue,
    pub spawner: SpawnController,
    pub progress: Progress,
    pub registry: PowerUpRegistry,
    pub telegraphs: Vec<Telegraph>,
    /// Choices on the table during a level-up pause
    pub offered: Vec<PowerUp>,
    /// Level-ups earned but not yet resolved through a choice
    pub pending_level_ups: u32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl SimState {
    /// Create a run with the given seed, tuning, and stat catalog
    pub fn new(seed: u64, config: SimConfig, catalog: Catalog) -> Self {
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            now_ms: 0.0,
            time_scale: 1.0,
            phase: SimPhase::Running,
            player: Character::player(0, 100.0),
            enemies: Pool::new(config.max_enemies),
            projectiles: Pool::new(config.max_projectiles),
            pickups: Pool::new(None),
            tasks: TaskQueue::default(),
            spawner: SpawnController::default(),
            progress: Progress::new(config.first_threshold, config.threshold_growth),
            registry: PowerUpRegistry::default(),
            telegraphs: Vec::new(),
            offered: Vec::new(),
            pending_level_ups: 0,
            events: Vec::new(),
            next_id: 1,
            config,
            catalog,
        };

        // Starting weapon; a missing catalog entry just means a bare-handed
        // start, not a crash
        if let Some(spec) = state.catalog.player_attack("sword_sweep") {
            let spec = spec.clone();
            let effect_id = state.next_entity_id();
            state
                .player
                .attacks
                .push(Attack::new_named(spec, "sword_sweep".into(), effect_id));
        }

        log::info!("Run initialized with seed {seed}");
        state
    }

    /// Allocate a new entity/effect/marker id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the frame's events to the UI/audio collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_level(&self) -> u32 {
        self.progress.level
    }

    /// Position of a combatant by id (0 is always the player)
    pub fn combatant_pos(&self, id: u32) -> Option<Vec2> {
        if id == self.player.id {
            return Some(self.player.pos);
        }
        self.enemies.iter().find(|e| e.id == id).map(|e| e.pos)
    }

    /// Spawn an enemy from a catalog record at a ring position around the
    /// player. Returns the new entity id, or None on pool exhaustion.
    pub fn spawn_enemy_at(&mut self, record_idx: EnemyRecordRef, pos: Vec2) -> Option<u32> {
        let record = match record_idx {
            EnemyRecordRef::Roster(i) => self.catalog.enemies[i].clone(),
            EnemyRecordRef::Boss => self.catalog.boss.clone(),
        };
        let id = self.next_entity_id();
        let effect_id = self.next_entity_id();
        let spawned = self
            .enemies
            .acquire(|slot| slot.init_enemy(id, &record, pos, effect_id))
            .is_some();
        if spawned {
            if matches!(record_idx, EnemyRecordRef::Boss) {
                if let Some(boss) = self.enemies.iter_mut().find(|e| e.id == id) {
                    boss.is_boss = true;
                }
            }
            Some(id)
        } else {
            None
        }
    }

    /// Random point on a ring around the player, clamped to the arena
    pub fn spawn_ring_pos(&mut self, radius: f32) -> Vec2 {
        use rand::Rng;
        let theta = self.rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
        let pos = self.player.pos + polar_to_cartesian(radius, theta);
        pos.clamp(
            Vec2::splat(-ARENA_HALF_EXTENT),
            Vec2::splat(ARENA_HALF_EXTENT),
        )
    }

    /// Live beam segments, re-anchored to current target positions
    pub fn beams(&self) -> Vec<BeamLine> {
        let mut lines = Vec::new();
        let mut collect = |owner: &Character| {
            for attack in &owner.attacks {
                if let Some(beam) = attack.beam
                    && beam.until_ms > self.now_ms
                    && let Some(to) = self.combatant_pos(beam.target)
                {
                    lines.push(BeamLine {
                        from: owner.pos,
                        to,
                        color: attack.spec.color,
                    });
                }
            }
        };
        collect(&self.player);
        for enemy in self.enemies.iter() {
            collect(enemy);
        }
        lines
    }

    /// Owner-following attack indicators for the renderer
    pub fn indicators(&self) -> Vec<Indicator> {
        self.player
            .attacks
            .iter()
            .filter_map(|a| a.indicator(self.player.pos, self.player.facing))
            .collect()
    }
}

/// Which catalog record to spawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyRecordRef {
    /// Index into `catalog.enemies`
    Roster(usize),
    Boss,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_starting_weapon() {
        let state = SimState::new(1, SimConfig::default(), Catalog::default());
        assert_eq!(state.player.attacks.len(), 1);
        assert_eq!(state.player.attacks[0].spec_name(), Some("sword_sweep"));
        assert_eq!(state.phase, SimPhase::Running);
    }

    #[test]
    fn test_spawn_enemy_assigns_ids() {
        let mut state = SimState::new(1, SimConfig::default(), Catalog::default());
        let id = state
            .spawn_enemy_at(EnemyRecordRef::Roster(0), Vec2::new(100.0, 0.0))
            .unwrap();
        assert!(state.combatant_pos(id).is_some());
        assert_eq!(state.enemies.live(), 1);
    }

    #[test]
    fn test_capped_enemy_pool_skips_spawn() {
        let config = SimConfig {
            max_enemies: Some(1),
            ..SimConfig::default()
        };
        let mut state = SimState::new(1, config, Catalog::default());
        assert!(
            state
                .spawn_enemy_at(EnemyRecordRef::Roster(0), Vec2::ZERO)
                .is_some()
        );
        assert!(
            state
                .spawn_enemy_at(EnemyRecordRef::Roster(0), Vec2::ZERO)
                .is_none()
        );
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = SimState::new(1, SimConfig::default(), Catalog::default());
        state.push_event(GameEvent::CameraShake);
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.drain_events().is_empty());
    }
}
