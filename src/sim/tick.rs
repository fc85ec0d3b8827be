//! Per-frame simulation advance
//!
//! The external scene driver calls [`tick`] once per fixed substep with the
//! elapsed milliseconds. Within one tick the order is fixed: deferred tasks,
//! status effects, movement, attack evaluation, projectile collision,
//! pickups, deaths, leveling, spawning. A stun applied by the status pass
//! therefore blocks movement and attacks in the same frame.
//!
//! Cross-entity effects are resolved through command lists collected first
//! and applied after iteration, keeping borrows simple and the order
//! deterministic.

use glam::Vec2;
use rand::Rng;

use crate::consts::{COLLECT_RADIUS, MAGNET_RADIUS, MAGNET_SPEED, PROJECTILE_RADIUS};
use crate::sim::attack::{Attack, AttackCommand, TargetView, perform_attack};
use crate::sim::entity::Faction;
use crate::sim::events::{GameEvent, SoundKey};
use crate::sim::movement;
use crate::sim::pickup::PickupKind;
use crate::sim::pool::Poolable;
use crate::sim::powerup::PowerUpRegistry;
use crate::sim::scheduler::TaskAction;
use crate::sim::spawn::{self, SpawnController};
use crate::sim::state::{EnemyRecordRef, SimPhase, SimState, Telegraph};
use crate::sim::status::{StatusEffect, StatusKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Normalized movement direction from the input collaborator
    /// (zero = standing still)
    pub move_dir: Vec2,
    /// Index into the offered power-up choices, during a level-up pause
    pub select_power_up: Option<usize>,
}

/// Advance the simulation by one timestep
pub fn tick(state: &mut SimState, input: &TickInput, dt_ms: f32) {
    match state.phase {
        SimPhase::GameOver => return,
        SimPhase::LevelUpPause => {
            // The clock is frozen: pending cooldowns and telegraphs keep
            // their remaining delay, and no catch-up jump happens on resume
            apply_power_up_selection(state, input);
            return;
        }
        SimPhase::Running => {}
    }

    let dt = dt_ms * state.time_scale;
    if dt <= 0.0 {
        return;
    }
    state.now_ms += dt as f64;
    let now = state.now_ms;

    run_due_tasks(state, now);
    update_statuses(state, dt);
    move_entities(state, input, dt);
    let commands = evaluate_attacks(state, now);
    apply_commands(state, commands, now);
    resolve_projectiles(state, dt);
    update_pickups(state, dt);
    reap_dead(state);
    maybe_enter_level_up(state);
    run_spawner(state, dt, now);
}

// === Level-up pause ===

fn apply_power_up_selection(state: &mut SimState, input: &TickInput) {
    let Some(choice) = input.select_power_up else {
        return;
    };
    let Some(powerup) = state.offered.get(choice).cloned() else {
        return;
    };
    let effect_id = state.next_entity_id();
    PowerUpRegistry::apply(&powerup, &mut state.player, &state.catalog, effect_id);
    state.push_event(GameEvent::Sound(SoundKey::PowerUp));

    state.pending_level_ups = state.pending_level_ups.saturating_sub(1);
    if state.pending_level_ups > 0 {
        offer_choices(state);
    } else {
        state.offered.clear();
        state.phase = SimPhase::Running;
    }
}

fn offer_choices(state: &mut SimState) {
    state.offered = state.registry.offer(3, &state.player, &mut state.rng);
    let names = state.offered.iter().map(|p| p.label()).collect();
    state.push_event(GameEvent::PowerUpChoices { names });
    state.phase = SimPhase::LevelUpPause;
}

fn maybe_enter_level_up(state: &mut SimState) {
    if state.pending_level_ups > 0 && state.phase == SimPhase::Running {
        offer_choices(state);
    }
}

// === Deferred tasks ===

fn run_due_tasks(state: &mut SimState, now: f64) {
    for action in state.tasks.drain_due(now) {
        match action {
            TaskAction::ResetCooldown { owner, attack } => {
                let slot = if owner == state.player.id {
                    state.player.attacks.get_mut(attack)
                } else {
                    // A recycled slot has a fresh id, so a stale reset for a
                    // dead enemy simply finds no owner
                    state
                        .enemies
                        .iter_mut()
                        .find(|e| e.id == owner)
                        .and_then(|e| e.attacks.get_mut(attack))
                };
                if let Some(a) = slot {
                    a.cooling_down = false;
                }
            }
            TaskAction::ResolveTelegraph { marker } => resolve_telegraph(state, marker),
            TaskAction::BossPattern { generation } => boss_pattern_step(state, generation, now),
        }
    }
}

fn resolve_telegraph(state: &mut SimState, marker: u32) {
    let Some(idx) = state.telegraphs.iter().position(|t| t.marker == marker) else {
        return;
    };
    let telegraph = state.telegraphs.swap_remove(idx);
    match telegraph.faction {
        Faction::Player => {
            let hit: Vec<u32> = state
                .enemies
                .iter()
                .filter(|e| e.pos.distance(telegraph.center) <= telegraph.radius)
                .map(|e| e.id)
                .collect();
            for id in hit {
                damage_enemy(state, id, telegraph.power, telegraph.status);
            }
        }
        Faction::Enemy => {
            if state.player.pos.distance(telegraph.center) <= telegraph.radius {
                damage_player(state, telegraph.power, telegraph.status);
            }
        }
    }
}

// === Damage resolution ===

/// Damage dealt by the player's side: the crit roll happens in attacker
/// context, and life-steal is computed from the actual post-clamp damage.
fn damage_enemy(state: &mut SimState, id: u32, power: f32, status: Option<StatusEffect>) {
    let crit = state.rng.random::<f32>() < state.player.crit_chance;
    let amount = if crit {
        power * state.config.crit_multiplier
    } else {
        power
    };

    let mut outcome = None;
    if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) {
        let dealt = enemy.take_damage(amount);
        if let Some(s) = status {
            enemy.status.apply(s);
        }
        outcome = Some((dealt, enemy.pos, enemy.is_dead()));
    }
    let Some((dealt, pos, dead)) = outcome else {
        return;
    };
    // A zero-damage hit (already-dead enemy awaiting reap) is silent
    if dealt <= 0.0 {
        return;
    }

    state.push_event(GameEvent::EnemyHealthChanged {
        enemy: id,
        damage_dealt: dealt,
    });
    if !dead {
        state.push_event(GameEvent::Flash { entity: id });
    }
    state.push_event(GameEvent::FloatingText {
        pos,
        text: if crit {
            format!("{dealt:.0}!")
        } else {
            format!("{dealt:.0}")
        },
        color: if crit { 0xffb86c } else { 0xf8f8f2 },
    });
    state.push_event(GameEvent::Sound(SoundKey::Hit));

    let steal = dealt * state.player.life_steal;
    if steal > 0.0 && state.player.heal(steal) > 0.0 {
        state.push_event(GameEvent::HealthChanged {
            current: state.player.health,
            max: state.player.max_health,
        });
    }
}

fn damage_player(state: &mut SimState, power: f32, status: Option<StatusEffect>) {
    let dealt = state.player.take_damage(power);
    if let Some(s) = status {
        state.player.status.apply(s);
    }
    state.push_event(GameEvent::HealthChanged {
        current: state.player.health,
        max: state.player.max_health,
    });
    if !state.player.is_dead() {
        state.push_event(GameEvent::Flash {
            entity: state.player.id,
        });
    }
    if dealt > 0.0 {
        state.push_event(GameEvent::FloatingText {
            pos: state.player.pos,
            text: format!("{dealt:.0}"),
            color: 0xff5555,
        });
        state.push_event(GameEvent::Sound(SoundKey::Hurt));
    }
}

// === Status effects ===

fn status_tick_amount(kind: StatusKind, fraction: f32, current: f32, max: f32) -> f32 {
    match kind {
        StatusKind::Burn => fraction * max,
        StatusKind::Poison => fraction * current,
        // One-shot effects never produce periodic ticks
        StatusKind::Freeze | StatusKind::Stun => 0.0,
    }
}

fn update_statuses(state: &mut SimState, dt: f32) {
    for tick in state.player.status.update(dt) {
        let amount = status_tick_amount(
            tick.kind,
            tick.fraction,
            state.player.health,
            state.player.max_health,
        );
        if amount > 0.0 {
            let dealt = state.player.take_status_damage(amount);
            state.push_event(GameEvent::HealthChanged {
                current: state.player.health,
                max: state.player.max_health,
            });
            state.push_event(GameEvent::FloatingText {
                pos: state.player.pos,
                text: format!("{dealt:.0}"),
                color: 0xbd93f9,
            });
        }
    }

    let mut damaged: Vec<(u32, f32, Vec2)> = Vec::new();
    for enemy in state.enemies.iter_mut() {
        for tick in enemy.status.update(dt) {
            let amount =
                status_tick_amount(tick.kind, tick.fraction, enemy.health, enemy.max_health);
            if amount > 0.0 {
                let dealt = enemy.take_status_damage(amount);
                damaged.push((enemy.id, dealt, enemy.pos));
            }
        }
    }
    for (id, dealt, pos) in damaged {
        state.push_event(GameEvent::EnemyHealthChanged {
            enemy: id,
            damage_dealt: dealt,
        });
        state.push_event(GameEvent::FloatingText {
            pos,
            text: format!("{dealt:.0}"),
            color: 0xbd93f9,
        });
    }
}

// === Movement ===

fn move_entities(state: &mut SimState, input: &TickInput, dt: f32) {
    let dir = input.move_dir;
    if dir.length_squared() > 0.0 {
        let speed = state.player.effective_speed();
        if speed > 0.0 {
            let dir = dir.normalize();
            state.player.facing = dir.y.atan2(dir.x);
            state.player.pos =
                movement::clamp_to_arena(state.player.pos + dir * speed * (dt / 1000.0));
        }
    }

    // Enemies track the player, stopping just inside their attack range
    let player_pos = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        let delta = player_pos - enemy.pos;
        enemy.facing = delta.y.atan2(delta.x);
        let speed = enemy.effective_speed();
        if speed <= 0.0 {
            continue;
        }
        let engage = enemy
            .attacks
            .first()
            .map(|a| a.spec.range * 0.8)
            .unwrap_or(0.0);
        if delta.length() > engage {
            enemy.pos += movement::seek(enemy.pos, player_pos, speed, dt);
        }
    }
}

// === Attacks ===

fn evaluate_attacks(state: &mut SimState, now: f64) -> Vec<(Faction, AttackCommand)> {
    let mut cmds: Vec<(Faction, AttackCommand)> = Vec::new();

    let enemy_views: Vec<TargetView> = state
        .enemies
        .iter()
        .filter(|e| !e.is_dead())
        .map(|e| TargetView {
            id: e.id,
            pos: e.pos,
        })
        .collect();

    {
        let SimState { player, tasks, .. } = state;
        let (id, pos, facing) = (player.id, player.pos, player.facing);
        if !player.status.stunned() {
            for (i, attack) in player.attacks.iter_mut().enumerate() {
                let mut out = Vec::new();
                perform_attack(attack, i, id, pos, facing, now, &enemy_views, tasks, &mut out);
                cmds.extend(out.into_iter().map(|c| (Faction::Player, c)));
            }
        }
        for attack in player.attacks.iter_mut() {
            maintain_beam(attack, pos, &enemy_views, now);
        }
    }

    let player_view = [TargetView {
        id: state.player.id,
        pos: state.player.pos,
    }];
    let player_pos = state.player.pos;
    {
        let SimState { enemies, tasks, .. } = state;
        for enemy in enemies.iter_mut() {
            // The boss attacks exclusively through its scheduled pattern
            if enemy.is_boss || enemy.status.stunned() {
                continue;
            }
            let (id, pos, facing) = (enemy.id, enemy.pos, enemy.facing);
            let dist = pos.distance(player_pos);
            for (i, attack) in enemy.attacks.iter_mut().enumerate() {
                if dist <= attack.spec.range {
                    let mut out = Vec::new();
                    perform_attack(attack, i, id, pos, facing, now, &player_view, tasks, &mut out);
                    cmds.extend(out.into_iter().map(|c| (Faction::Enemy, c)));
                }
                maintain_beam(attack, pos, &player_view, now);
            }
        }
    }

    cmds
}

/// Re-anchor a live beam every frame; drop it when its duration lapses or
/// the target dies or leaves range
fn maintain_beam(attack: &mut Attack, owner_pos: Vec2, targets: &[TargetView], now: f64) {
    if let Some(beam) = attack.beam {
        let in_range = targets
            .iter()
            .find(|t| t.id == beam.target)
            .is_some_and(|t| t.pos.distance(owner_pos) <= attack.spec.range);
        if now >= beam.until_ms || !in_range {
            attack.beam = None;
        }
    }
}

fn apply_commands(state: &mut SimState, cmds: Vec<(Faction, AttackCommand)>, now: f64) {
    for (faction, cmd) in cmds {
        match cmd {
            AttackCommand::Damage {
                target,
                power,
                status,
            } => match faction {
                Faction::Player => damage_enemy(state, target, power, status),
                Faction::Enemy => damage_player(state, power, status),
            },
            AttackCommand::SpawnProjectile {
                pos,
                angle,
                speed,
                piercing,
                power,
                color,
                max_range,
                status,
            } => {
                spawn_projectile(
                    state, faction, pos, angle, speed, piercing, power, color, max_range, status,
                );
            }
            AttackCommand::StartTelegraph {
                center,
                radius,
                power,
                color,
                status,
            } => {
                start_telegraph(state, faction, center, radius, power, color, status, now);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_projectile(
    state: &mut SimState,
    faction: Faction,
    pos: Vec2,
    angle: f32,
    speed: f32,
    piercing: u32,
    power: f32,
    color: u32,
    max_range: f32,
    status: Option<StatusEffect>,
) {
    let id = state.next_entity_id();
    let spawned = state
        .projectiles
        .acquire(|p| {
            p.active = true;
            p.id = id;
            p.faction = faction;
            p.pos = pos;
            p.origin = pos;
            p.angle = angle;
            p.speed = speed;
            p.power = power;
            p.color = color;
            p.piercing_left = piercing;
            p.status = status;
            p.max_range = max_range;
        })
        .is_some();
    if spawned {
        state.push_event(GameEvent::Sound(SoundKey::Shoot));
    }
}

#[allow(clippy::too_many_arguments)]
fn start_telegraph(
    state: &mut SimState,
    faction: Faction,
    center: Vec2,
    radius: f32,
    power: f32,
    color: u32,
    status: Option<StatusEffect>,
    now: f64,
) {
    let marker = state.next_entity_id();
    let resolve_at_ms = now + state.config.telegraph_ms as f64;
    state.telegraphs.push(Telegraph {
        marker,
        faction,
        center,
        radius,
        power,
        color,
        status,
        resolve_at_ms,
    });
    state
        .tasks
        .schedule(resolve_at_ms, TaskAction::ResolveTelegraph { marker });
}

// === Projectiles ===

fn resolve_projectiles(state: &mut SimState, dt: f32) {
    for p in state.projectiles.iter_mut() {
        p.advance(dt);
    }

    let enemy_snaps: Vec<(u32, Vec2, f32)> = state
        .enemies
        .iter()
        .map(|e| (e.id, e.pos, e.size))
        .collect();
    let (player_id, player_pos, player_size) =
        (state.player.id, state.player.pos, state.player.size);

    let mut hits: Vec<(Faction, u32, f32, Option<StatusEffect>)> = Vec::new();
    for p in state.projectiles.iter_mut() {
        match p.faction {
            Faction::Player => {
                for &(id, pos, size) in &enemy_snaps {
                    if !p.is_active() {
                        break;
                    }
                    if p.pos.distance(pos) <= PROJECTILE_RADIUS + size && p.register_hit(id) {
                        hits.push((Faction::Player, id, p.power, p.status));
                    }
                }
            }
            Faction::Enemy => {
                if p.pos.distance(player_pos) <= PROJECTILE_RADIUS + player_size
                    && p.register_hit(player_id)
                {
                    hits.push((Faction::Enemy, player_id, p.power, p.status));
                }
            }
        }
    }

    for (faction, target, power, status) in hits {
        match faction {
            Faction::Player => damage_enemy(state, target, power, status),
            Faction::Enemy => damage_player(state, power, status),
        }
    }
}

// === Pickups ===

fn update_pickups(state: &mut SimState, dt: f32) {
    let player_pos = state.player.pos;
    let mut xp_gained = 0u32;
    let mut heals: Vec<f32> = Vec::new();

    for pickup in state.pickups.iter_mut() {
        let dist = pickup.pos.distance(player_pos);
        if dist <= COLLECT_RADIUS {
            if let Some(kind) = pickup.collect() {
                match kind {
                    PickupKind::Xp { value } => xp_gained += value,
                    PickupKind::Heart { heal } => heals.push(heal),
                }
            }
        } else if dist <= MAGNET_RADIUS {
            pickup.pos += movement::seek(pickup.pos, player_pos, MAGNET_SPEED, dt);
        }
    }

    if xp_gained > 0 || !heals.is_empty() {
        state.push_event(GameEvent::Sound(SoundKey::Pickup));
    }
    for heal in heals {
        let healed = state.player.heal(heal);
        if healed > 0.0 {
            state.push_event(GameEvent::HealthChanged {
                current: state.player.health,
                max: state.player.max_health,
            });
            state.push_event(GameEvent::FloatingText {
                pos: player_pos,
                text: format!("+{healed:.0}"),
                color: 0x50fa7b,
            });
        }
    }

    if xp_gained > 0 {
        let ups = state.progress.grant(xp_gained);
        state.push_event(GameEvent::ExperienceUpdated {
            xp: state.progress.xp,
            threshold: state.progress.threshold,
        });
        for k in 0..ups {
            state.push_event(GameEvent::PlayerLevelUp {
                level: state.progress.level - ups + k + 1,
            });
            state.push_event(GameEvent::Sound(SoundKey::LevelUp));
        }
        state.pending_level_ups += ups;
    }
}

// === Deaths ===

fn reap_dead(state: &mut SimState) {
    let mut drops: Vec<(Vec2, u32, bool)> = Vec::new();
    for slot in state.enemies.slots_mut() {
        if slot.is_active() && slot.is_dead() {
            drops.push((slot.pos, slot.experience, slot.is_boss));
            slot.release();
        }
    }
    for (pos, xp, was_boss) in drops {
        if xp > 0 {
            state
                .pickups
                .acquire(|p| p.init(PickupKind::Xp { value: xp }, pos));
        }
        state.push_event(GameEvent::Sound(SoundKey::EnemyDeath));
        if was_boss {
            state.spawner.boss_id = None;
            log::info!("Boss defeated, normal spawns resume");
        }
    }

    if state.player.is_dead() && state.phase != SimPhase::GameOver {
        state.phase = SimPhase::GameOver;
        state.push_event(GameEvent::PlayerDead);
    }
}

// === Spawning ===

fn run_spawner(state: &mut SimState, dt: f32, now: f64) {
    let level = state.progress.level;

    if !state.spawner.boss_spawned && level >= state.config.boss_level {
        let pos = state.spawn_ring_pos(state.config.boss_spawn_radius);
        if let Some(id) = state.spawn_enemy_at(EnemyRecordRef::Boss, pos) {
            state.spawner.boss_spawned = true;
            state.spawner.boss_id = Some(id);
            state.spawner.boss_phase = 1;
            state.spawner.boss_generation += 1;
            let generation = state.spawner.boss_generation;
            state.tasks.schedule(
                now + state.config.boss_pattern_interval_ms as f64,
                TaskAction::BossPattern { generation },
            );
            state.push_event(GameEvent::Sound(SoundKey::BossRoar));
            log::info!("Boss phase begins at level {level}");
        }
    }

    if let Some(boss_id) = state.spawner.boss_id {
        let fraction = state
            .enemies
            .iter()
            .find(|e| e.id == boss_id)
            .map(|b| b.health / b.max_health);
        if let Some(fraction) = fraction {
            let phase = SpawnController::phase_for(fraction);
            if phase > state.spawner.boss_phase {
                // Replace the pattern wholesale: the generation bump orphans
                // every task from the previous phase
                state.spawner.boss_phase = phase;
                state.spawner.boss_generation += 1;
                let generation = state.spawner.boss_generation;
                let interval = state.config.boss_pattern_interval_ms
                    * SpawnController::pattern_interval_factor(phase);
                state
                    .tasks
                    .schedule(now + interval as f64, TaskAction::BossPattern { generation });
                state.push_event(GameEvent::CameraShake);
                state.push_event(GameEvent::Sound(SoundKey::BossRoar));
            }
        }
        // A live boss blocks normal spawning
        return;
    }

    let interval = state.config.spawn_interval_ms(level);
    if state.spawner.enemy_due(dt, interval)
        && let Some(idx) = spawn::pick_enemy(&state.catalog, level, &mut state.rng)
    {
        let pos = state.spawn_ring_pos(state.config.enemy_spawn_radius);
        state.spawn_enemy_at(EnemyRecordRef::Roster(idx), pos);
    }

    let heart_interval = state.config.heart_spawn_interval_ms;
    if state.spawner.heart_due(dt, heart_interval) {
        let heal = state.config.heart_heal_fraction * state.player.max_health;
        let pos = state.spawn_ring_pos(state.config.heart_spawn_radius);
        state
            .pickups
            .acquire(|p| p.init(PickupKind::Heart { heal }, pos));
    }
}

/// One step of the boss's repeating pattern: a projectile fan aimed at the
/// player, plus a telegraphed strike in later phases. Stale generations
/// (pattern replaced by a phase transition) drop silently.
fn boss_pattern_step(state: &mut SimState, generation: u32, now: f64) {
    if generation != state.spawner.boss_generation {
        return;
    }
    let Some(boss_id) = state.spawner.boss_id else {
        return;
    };
    let Some((pos, spec)) = state
        .enemies
        .iter()
        .find(|e| e.id == boss_id)
        .and_then(|b| b.attacks.first().map(|a| (b.pos, a.spec.clone())))
    else {
        return;
    };

    let to_player = state.player.pos - pos;
    let aim = to_player.y.atan2(to_player.x);
    let phase = state.spawner.boss_phase;

    let (count, spread) = match phase {
        1 => (3, 0.25),
        2 => (4, 0.35),
        _ => (6, 0.5),
    };
    for i in 0..count {
        let t = i as f32 / (count - 1) as f32;
        let angle = aim + (t - 0.5) * 2.0 * spread;
        spawn_projectile(
            state,
            Faction::Enemy,
            pos,
            angle,
            spec.projectile_speed,
            spec.piercing,
            spec.power,
            spec.color,
            spec.range,
            None,
        );
    }

    if phase >= 2 {
        start_telegraph(
            state,
            Faction::Enemy,
            state.player.pos,
            state.config.boss_telegraph_radius,
            spec.power * state.config.boss_telegraph_power_factor,
            spec.color,
            None,
            now,
        );
    }

    let interval =
        state.config.boss_pattern_interval_ms * SpawnController::pattern_interval_factor(phase);
    state
        .tasks
        .schedule(now + interval as f64, TaskAction::BossPattern { generation });
}
