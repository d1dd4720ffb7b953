//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Speeds are per step; frame time only feeds the spawn and banner timers
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod combat;
pub mod config;
pub mod spawner;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use config::SimConfig;
pub use spawner::{Banner, SpawnClock};
pub use state::{
    Bullet, BulletOwner, Enemy, EnemyKind, GameEvent, Movement, Particle, ParticleKind, Player,
    World,
};
pub use tick::{TickInput, tick};
