//! The attack behavior family
//!
//! One `Attack` struct covers every variant; resolution dispatches on the
//! catalog [`AttackForm`] tag instead of a class hierarchy. Triggering an
//! attack emits [`AttackCommand`]s - plain data the tick function applies
//! against the world - and schedules the cooldown reset as a deferred task
//! on the simulation clock, so cooldowns freeze across pauses.

use glam::Vec2;

use crate::angle_diff;
use crate::catalog::{AttackForm, AttackSpec};
use crate::sim::scheduler::{TaskAction, TaskQueue};
use crate::sim::status::StatusEffect;

/// A beam currently anchored to a target
#[derive(Debug, Clone, Copy)]
pub struct BeamState {
    pub target: u32,
    /// Sim time at which the beam line disappears
    pub until_ms: f64,
}

/// One owned attack instance
#[derive(Debug, Clone)]
pub struct Attack {
    pub spec: AttackSpec,
    /// Catalog key this attack was learned from (player attacks only)
    pub name: Option<String>,
    /// Source-unique status id: repeat applications from this attack
    /// refresh instead of stacking
    pub effect_id: u32,
    /// Cooldown flag; `perform` is a no-op while set
    pub cooling_down: bool,
    /// Live beam, if this is a beam attack mid-duration
    pub beam: Option<BeamState>,
}

impl Attack {
    pub fn new(spec: AttackSpec, effect_id: u32) -> Self {
        Self {
            spec,
            name: None,
            effect_id,
            cooling_down: false,
            beam: None,
        }
    }

    pub fn new_named(spec: AttackSpec, name: String, effect_id: u32) -> Self {
        Self {
            name: Some(name),
            ..Self::new(spec, effect_id)
        }
    }

    pub fn spec_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The status effect this attack stamps on targets it hits
    fn status_on_hit(&self) -> Option<StatusEffect> {
        self.spec.status.map(|t| t.instantiate(self.effect_id))
    }

    /// Owner-following indicator geometry, recomputed every frame
    /// regardless of cooldown state
    pub fn indicator(&self, owner_pos: Vec2, owner_facing: f32) -> Option<Indicator> {
        match self.spec.form {
            AttackForm::Melee => Some(Indicator {
                shape: IndicatorShape::Arc {
                    center: owner_pos,
                    radius: self.spec.range,
                    facing: owner_facing,
                    half_arc: self.spec.half_arc,
                },
                color: self.spec.color,
            }),
            AttackForm::Aoe => Some(Indicator {
                shape: IndicatorShape::Circle {
                    center: owner_pos,
                    radius: self.spec.effect_radius,
                },
                color: self.spec.color,
            }),
            // Beams and telegraphs are drawn from the sim state lists
            _ => None,
        }
    }
}

/// Indicator geometry handed to the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorShape {
    Arc {
        center: Vec2,
        radius: f32,
        facing: f32,
        half_arc: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub shape: IndicatorShape,
    pub color: u32,
}

/// Lightweight snapshot of a potential target
#[derive(Debug, Clone, Copy)]
pub struct TargetView {
    pub id: u32,
    pub pos: Vec2,
}

/// World mutations requested by a triggered attack
#[derive(Debug, Clone, PartialEq)]
pub enum AttackCommand {
    /// Apply damage (and optionally a status) to one target
    Damage {
        target: u32,
        power: f32,
        status: Option<StatusEffect>,
    },
    /// Launch a pooled projectile
    SpawnProjectile {
        pos: Vec2,
        angle: f32,
        speed: f32,
        piercing: u32,
        power: f32,
        color: u32,
        max_range: f32,
        status: Option<StatusEffect>,
    },
    /// Begin a telegraphed area strike at a fixed point
    StartTelegraph {
        center: Vec2,
        radius: f32,
        power: f32,
        color: u32,
        status: Option<StatusEffect>,
    },
}

/// Trigger an attack if it is off cooldown and has a valid shot.
///
/// `targets` holds snapshots of every hostile. Returns true when the attack
/// actually fired (and its cooldown started). Policy for empty target sets:
/// - Melee / Aoe swing anyway (cooldown consumed, nothing hit)
/// - Projectile / Beam silently no-op without consuming cooldown
/// - TargetedAoe consumes cooldown and telegraphs at the owner's own
///   position, preserving the dodge-window rhythm
#[allow(clippy::too_many_arguments)]
pub fn perform_attack(
    attack: &mut Attack,
    attack_index: usize,
    owner_id: u32,
    owner_pos: Vec2,
    owner_facing: f32,
    now_ms: f64,
    targets: &[TargetView],
    tasks: &mut TaskQueue,
    out: &mut Vec<AttackCommand>,
) -> bool {
    if attack.cooling_down {
        return false;
    }

    let spec = &attack.spec;
    let fired = match spec.form {
        AttackForm::Melee => {
            // Facing is captured at attack start; the whole arc resolves
            // synchronously against it. Boundary is inclusive on both the
            // range and the half-arc.
            for t in targets {
                let delta = t.pos - owner_pos;
                let dist = delta.length();
                if dist > spec.range {
                    continue;
                }
                let to_target = delta.y.atan2(delta.x);
                if dist > 0.0 && angle_diff(to_target, owner_facing) > spec.half_arc {
                    continue;
                }
                out.push(AttackCommand::Damage {
                    target: t.id,
                    power: spec.power,
                    status: attack.status_on_hit(),
                });
            }
            true
        }

        AttackForm::Projectile => match nearest(targets, owner_pos) {
            Some(t) => {
                let delta = t.pos - owner_pos;
                out.push(AttackCommand::SpawnProjectile {
                    pos: owner_pos,
                    angle: delta.y.atan2(delta.x),
                    speed: spec.projectile_speed,
                    piercing: spec.piercing,
                    power: spec.power,
                    color: spec.color,
                    max_range: spec.range,
                    status: attack.status_on_hit(),
                });
                true
            }
            None => false,
        },

        AttackForm::Aoe => {
            for t in targets {
                if t.pos.distance(owner_pos) <= spec.effect_radius {
                    out.push(AttackCommand::Damage {
                        target: t.id,
                        power: spec.power,
                        status: attack.status_on_hit(),
                    });
                }
            }
            true
        }

        AttackForm::TargetedAoe => {
            // Nearest in-range hostile, falling back to the owner's own
            // position when nothing is targetable
            let center = nearest(targets, owner_pos)
                .filter(|t| t.pos.distance(owner_pos) <= spec.range)
                .map(|t| t.pos)
                .unwrap_or(owner_pos);
            out.push(AttackCommand::StartTelegraph {
                center,
                radius: spec.effect_radius,
                power: spec.power,
                color: spec.color,
                status: attack.status_on_hit(),
            });
            true
        }

        AttackForm::Beam => {
            // Farthest hostile still inside range; damage lands once at
            // trigger time, the line persists for beam_duration_ms
            let target = targets
                .iter()
                .filter(|t| t.pos.distance(owner_pos) <= spec.range)
                .max_by(|a, b| {
                    a.pos
                        .distance(owner_pos)
                        .partial_cmp(&b.pos.distance(owner_pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            match target {
                Some(t) => {
                    out.push(AttackCommand::Damage {
                        target: t.id,
                        power: spec.power,
                        status: attack.status_on_hit(),
                    });
                    attack.beam = Some(BeamState {
                        target: t.id,
                        until_ms: now_ms + spec.beam_duration_ms as f64,
                    });
                    true
                }
                None => false,
            }
        }
    };

    if fired {
        attack.cooling_down = true;
        tasks.schedule(
            now_ms + spec.cooldown_ms as f64,
            TaskAction::ResetCooldown {
                owner: owner_id,
                attack: attack_index,
            },
        );
    }
    fired
}

fn nearest(targets: &[TargetView], from: Vec2) -> Option<&TargetView> {
    targets.iter().min_by(|a, b| {
        a.pos
            .distance(from)
            .partial_cmp(&b.pos.distance(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
