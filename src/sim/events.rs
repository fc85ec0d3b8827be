//! Domain events emitted toward the UI/audio/rendering collaborators
//!
//! The sim pushes events into a queue drained once per frame by the driving
//! scene. Consumers are optional: dropping every event leaves the simulation
//! fully correct.

use glam::Vec2;

/// Sound effect keys the audio collaborator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKey {
    /// Player attack connects
    Hit,
    /// Player takes damage
    Hurt,
    /// Projectile fired
    Shoot,
    /// Pickup collected
    Pickup,
    /// Power-up applied
    PowerUp,
    /// Level-up reached
    LevelUp,
    /// Enemy death
    EnemyDeath,
    /// Boss phase transition
    BossRoar,
}

/// Events surfaced to external collaborators (HUD, audio, camera)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player health changed (current, max)
    HealthChanged { current: f32, max: f32 },
    /// Experience total or threshold changed
    ExperienceUpdated { xp: u32, threshold: u32 },
    /// Player reached a new level
    PlayerLevelUp { level: u32 },
    /// Player died; the run is over
    PlayerDead,
    /// An enemy took damage (drives enemy health bars)
    EnemyHealthChanged { enemy: u32, damage_dealt: f32 },
    /// Fire-and-forget sound request
    Sound(SoundKey),
    /// Damage/heal number popup
    FloatingText {
        pos: Vec2,
        text: String,
        color: u32,
    },
    /// Brief hit-flash on an entity (rendering concern)
    Flash { entity: u32 },
    /// One-time camera shake (boss phase transitions)
    CameraShake,
    /// Level-up pause began; present these power-up choices
    PowerUpChoices { names: Vec<String> },
}
