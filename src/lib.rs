//! Blaze Arena - a scrolling top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, combat, spawning, game state)
//! - `renderer`: Scene building and the WebGPU pipeline
//! - `settings`: Render preferences
//! - `error`: Errors raised at the platform/render boundary

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Speeds are in pixels per frame; the simulation advances one frame per tick.
pub mod consts {
    /// Nominal frame duration at 60 Hz (milliseconds)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta fed to the timers (a backgrounded tab resumes gently)
    pub const MAX_FRAME_MS: f32 = 250.0;
    /// Cap on periodic spawns released by a single tick
    pub const MAX_SPAWNS_PER_TICK: u32 = 4;

    /// Player defaults - always drawn at viewport center
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    /// Frames between player bullets while shoot is held
    pub const PLAYER_SHOT_COOLDOWN: u32 = 10;
    /// Weapon barrel drawn from the player center
    pub const WEAPON_LENGTH: f32 = 40.0;
    pub const WEAPON_WIDTH: f32 = 8.0;

    /// Normal enemy
    pub const ENEMY_RADIUS: f32 = 15.0;
    pub const ENEMY_HEALTH: f32 = 100.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_SHOOT_INTERVAL: i32 = 60;

    /// Boss enemy (bigger, slower, fires twice as often)
    pub const BOSS_RADIUS: f32 = 45.0;
    pub const BOSS_HEALTH: f32 = 500.0;
    pub const BOSS_SPEED: f32 = 1.0;
    pub const BOSS_SHOOT_INTERVAL: i32 = 30;

    /// Bullets
    pub const BULLET_SPEED: f32 = 5.0;
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const ENEMY_BULLET_DAMAGE: f32 = 5.0;
    pub const PLAYER_BULLET_DAMAGE: f32 = 10.0;
    /// Bullets farther than this from the player are pruned
    pub const DESPAWN_RADIUS: f32 = 1000.0;

    /// Exhaust trail emitted while moving
    pub const EXHAUST_PER_FRAME: usize = 3;
    pub const EXHAUST_JITTER: f32 = 0.25;
    pub const EXHAUST_SHRINK: f32 = 0.95;

    /// Flamethrower particles emitted while fire is held
    pub const FIRE_PER_FRAME: usize = 5;
    pub const FIRE_JITTER: f32 = 0.1;
    pub const FIRE_SHRINK: f32 = 0.97;
    pub const FIRE_DAMAGE: f32 = 25.0;

    /// Scoring and boss progression
    pub const SCORE_NORMAL: u64 = 10;
    pub const SCORE_BOSS: u64 = 50;
    pub const KILLS_PER_BOSS: u32 = 3;
    pub const BOSS_SPAWN_DISTANCE: f32 = 300.0;

    /// Distance outside the viewport edge where periodic enemies appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    pub const DEFAULT_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const DEFAULT_BANNER_MS: f32 = 2000.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle (radians) of the ray from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    direction(theta) * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_distance_and_angle() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-5);

        assert!((angle_to(Vec2::ZERO, Vec2::new(0.0, 3.0)) - PI / 2.0).abs() < 1e-5);
        assert!((angle_to(Vec2::ZERO, Vec2::new(-2.0, 0.0)).abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(300.0, PI / 3.0);
        assert!((p.length() - 300.0).abs() < 1e-3);
        assert!((angle_to(Vec2::ZERO, p) - PI / 3.0).abs() < 1e-5);
    }
}
