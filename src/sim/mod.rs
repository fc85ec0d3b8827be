//! The deterministic combat simulation
//!
//! Every piece of gameplay logic lives under this module, and all of it is
//! pure and deterministic:
//! - Fixed timestep only; the driver owns the accumulator
//! - Seeded RNG only
//! - Stable iteration order (pool slot order, insertion-ordered tasks)
//! - No rendering, audio, or platform dependencies

pub mod attack;
pub mod entity;
pub mod events;
pub mod movement;
pub mod pickup;
pub mod pool;
pub mod powerup;
pub mod progress;
pub mod projectile;
pub mod scheduler;
pub mod spawn;
pub mod state;
pub mod status;
pub mod tick;

pub use attack::{Attack, AttackCommand, Indicator, IndicatorShape, TargetView, perform_attack};
pub use entity::{Character, Faction};
pub use events::{GameEvent, SoundKey};
pub use pickup::{Pickup, PickupKind};
pub use pool::{Pool, Poolable};
pub use powerup::{PowerUp, PowerUpRegistry};
pub use progress::Progress;
pub use projectile::Projectile;
pub use scheduler::{TaskAction, TaskQueue};
pub use spawn::SpawnController;
pub use state::{BeamLine, EnemyRecordRef, SimPhase, SimState, Telegraph};
pub use status::{StatusEffect, StatusKind, StatusSet, StatusTemplate};
pub use tick::{TickInput, tick};
