//! Enemy spawning and the boss banner
//!
//! Wall-clock timers are modelled as accumulators fed by the step's frame
//! delta, so spawning is deterministic for a given dt sequence.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, GameEvent, World};
use crate::consts::{BOSS_SPAWN_DISTANCE, MAX_SPAWNS_PER_TICK, SPAWN_MARGIN};
use crate::polar_to_cartesian;

/// "Boss incoming" banner state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Banner {
    #[default]
    Hidden,
    Visible { remaining_ms: f32 },
}

impl Banner {
    pub fn is_visible(&self) -> bool {
        matches!(self, Banner::Visible { .. })
    }

    /// Show for `duration_ms`, replacing any pending window
    pub fn trigger(&mut self, duration_ms: f32) {
        *self = Banner::Visible {
            remaining_ms: duration_ms,
        };
    }

    pub fn advance(&mut self, dt_ms: f32) {
        if !dt_ms.is_finite() {
            return;
        }
        if let Banner::Visible { remaining_ms } = self {
            *remaining_ms -= dt_ms;
            if *remaining_ms <= 0.0 {
                *self = Banner::Hidden;
            }
        }
    }
}

/// Periodic spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    pub interval_ms: f32,
    pub elapsed_ms: f32,
}

impl SpawnClock {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Accumulate `dt_ms` and return how many spawns are due
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if self.interval_ms <= 0.0 || !dt_ms.is_finite() {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.interval_ms {
            return 0;
        }

        let due = (self.elapsed_ms / self.interval_ms).floor();
        self.elapsed_ms %= self.interval_ms;
        if due > MAX_SPAWNS_PER_TICK as f32 {
            log::warn!("dropping {} overdue spawns", due - MAX_SPAWNS_PER_TICK as f32);
            return MAX_SPAWNS_PER_TICK;
        }
        due as u32
    }
}

/// Viewport edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..4u32) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }
}

/// World position just outside the viewport on `edge`; `t` in [0, 1) picks
/// the point along the edge
pub fn edge_position(camera_offset: Vec2, viewport: Vec2, edge: Edge, t: f32) -> Vec2 {
    let o = camera_offset;
    match edge {
        Edge::Top => Vec2::new(o.x + t * viewport.x, o.y - SPAWN_MARGIN),
        Edge::Right => Vec2::new(o.x + viewport.x + SPAWN_MARGIN, o.y + t * viewport.y),
        Edge::Bottom => Vec2::new(o.x + t * viewport.x, o.y + viewport.y + SPAWN_MARGIN),
        Edge::Left => Vec2::new(o.x - SPAWN_MARGIN, o.y + t * viewport.y),
    }
}

/// Spawn one normal enemy just outside a random viewport edge
pub fn spawn_edge_enemy(world: &mut World) -> u32 {
    let rng = world.rng();
    let edge = Edge::random(rng);
    let t = rng.random::<f32>();
    let pos = edge_position(world.camera.offset, world.viewport, edge, t);
    world.spawn_enemy(EnemyKind::Normal, pos)
}

/// Spawn a boss on a circle around the viewport center and raise the banner
pub fn spawn_boss(world: &mut World) -> u32 {
    let angle = world.rng().random::<f32>() * std::f32::consts::TAU;
    let center = world.camera.view_center(world.viewport);
    let pos = center + polar_to_cartesian(BOSS_SPAWN_DISTANCE, angle);
    let id = world.spawn_enemy(EnemyKind::Boss, pos);

    world.bosses_spawned += 1;
    let duration = world.banner_duration_ms;
    world.banner.trigger(duration);
    world.events.push(GameEvent::BossIncoming);
    log::info!("boss {} incoming (boss #{})", id, world.bosses_spawned);
    id
}

/// Advance both timers by one frame delta
pub fn update_timers(world: &mut World, dt_ms: f32) {
    world.banner.advance(dt_ms);

    let due = world.spawn_clock.advance(dt_ms);
    for _ in 0..due {
        spawn_edge_enemy(world);
    }
}
