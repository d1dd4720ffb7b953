//! Game state and core simulation types
//!
//! Everything the step mutates and the renderer reads lives in `World`.
//! Entities removed during a step are only flagged dead; collections are
//! compacted once at the end of the step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::config::SimConfig;
use super::spawner::{Banner, SpawnClock};
use crate::consts::*;
use crate::direction;

/// Held movement keys (cardinal directions, independent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Movement {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Camera shift for one frame. Diagonals are not normalized.
    pub fn delta(&self, speed: f32) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= speed;
        }
        if self.down {
            d.y += speed;
        }
        if self.left {
            d.x -= speed;
        }
        if self.right {
            d.x += speed;
        }
        d
    }

    /// Angle the exhaust streams at: opposite to travel, last held flag wins
    /// (up, down, left, right order)
    pub fn exhaust_angle(&self) -> Option<f32> {
        use std::f32::consts::{FRAC_PI_2, PI};

        let mut angle = None;
        if self.up {
            angle = Some(FRAC_PI_2);
        }
        if self.down {
            angle = Some(-FRAC_PI_2);
        }
        if self.left {
            angle = Some(0.0);
        }
        if self.right {
            angle = Some(PI);
        }
        angle
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Screen-space anchor (always the viewport center)
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub speed: f32,
    /// Weapon facing angle (radians), derived from the pointer each frame
    pub facing: f32,
    pub movement: Movement,
    /// Frames until the next player bullet may fire
    pub shot_cooldown: u32,
}

impl Player {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            pos: anchor,
            radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            facing: 0.0,
            movement: Movement::default(),
            shot_cooldown: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply damage, clamping at zero. Returns true if this hit was fatal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        !self.is_alive()
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health / PLAYER_MAX_HEALTH).clamp(0.0, 1.0)
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    Boss,
}

impl EnemyKind {
    pub fn radius(self) -> f32 {
        match self {
            EnemyKind::Normal => ENEMY_RADIUS,
            EnemyKind::Boss => BOSS_RADIUS,
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            EnemyKind::Normal => ENEMY_HEALTH,
            EnemyKind::Boss => BOSS_HEALTH,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Normal => ENEMY_SPEED,
            EnemyKind::Boss => BOSS_SPEED,
        }
    }

    pub fn shoot_interval(self) -> i32 {
        match self {
            EnemyKind::Normal => ENEMY_SHOOT_INTERVAL,
            EnemyKind::Boss => BOSS_SHOOT_INTERVAL,
        }
    }

    /// Score awarded on death
    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Normal => SCORE_NORMAL,
            EnemyKind::Boss => SCORE_BOSS,
        }
    }
}

/// An enemy chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// World position
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Frames until the next shot (fires when <= 0)
    pub shoot_cooldown: i32,
    pub shoot_interval: i32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: kind.radius(),
            health: kind.max_health(),
            max_health: kind.max_health(),
            speed: kind.speed(),
            shoot_cooldown: 0,
            shoot_interval: kind.shoot_interval(),
            alive: true,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Step toward `target` and maybe fire at it.
    ///
    /// The cooldown is decremented every frame, including the one it fires
    /// on, so a fresh enemy fires immediately and then every `shoot_interval`
    /// frames.
    pub fn advance(&mut self, target: Vec2) -> Option<Bullet> {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > 0.0 {
            self.pos += to_target / dist * self.speed;
        }

        let mut shot = None;
        if self.shoot_cooldown <= 0 {
            let angle = to_target.y.atan2(to_target.x);
            shot = Some(Bullet::new(BulletOwner::Enemy, self.pos, angle));
            self.shoot_cooldown = self.shoot_interval;
        }
        self.shoot_cooldown -= 1;
        shot
    }

    /// Apply damage, clamping at zero. Returns true only for the killing hit.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Who fired a bullet; decides what it can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A straight-flying bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub owner: BulletOwner,
    /// World position
    pub pos: Vec2,
    /// Heading, fixed at creation
    pub angle: f32,
    pub speed: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn new(owner: BulletOwner, pos: Vec2, angle: f32) -> Self {
        Self {
            owner,
            pos,
            angle,
            speed: BULLET_SPEED,
            alive: true,
        }
    }

    pub fn advance(&mut self) {
        self.pos += direction(self.angle) * self.speed;
    }

    pub fn damage(&self) -> f32 {
        match self.owner {
            BulletOwner::Player => PLAYER_BULLET_DAMAGE,
            BulletOwner::Enemy => ENEMY_BULLET_DAMAGE,
        }
    }
}

/// Particle variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Movement trail, purely visual
    Exhaust,
    /// Flamethrower particle; burns the first enemy it touches
    Fire { hue: f32 },
}

/// A short-lived particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    /// World position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 at birth, dead at 0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
}

impl Particle {
    /// Exhaust puff drifting along `angle`
    pub fn exhaust(pos: Vec2, angle: f32, rng: &mut impl Rng) -> Self {
        let speed = rng.random::<f32>() * 2.0 + 1.0;
        Self {
            kind: ParticleKind::Exhaust,
            pos,
            vel: direction(angle) * speed,
            size: rng.random::<f32>() * 10.0 + 5.0,
            life: 1.0,
            decay: rng.random::<f32>() * 0.02 + 0.02,
        }
    }

    /// Fire particle travelling along `angle`
    pub fn fire(pos: Vec2, angle: f32, rng: &mut impl Rng) -> Self {
        let speed = rng.random::<f32>() * 2.0 + 3.0;
        let size = rng.random::<f32>() * 10.0 + 5.0;
        let decay = rng.random::<f32>() * 0.03 + 0.02;
        let hue = rng.random::<f32>() * 60.0;
        Self {
            kind: ParticleKind::Fire { hue },
            pos,
            vel: direction(angle) * speed,
            size,
            life: 1.0,
            decay,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.size *= match self.kind {
            ParticleKind::Exhaust => EXHAUST_SHRINK,
            ParticleKind::Fire { .. } => FIRE_SHRINK,
        };
        self.life = (self.life - self.decay).max(0.0);
    }

    pub fn is_fire(&self) -> bool {
        matches!(self.kind, ParticleKind::Fire { .. })
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn kill(&mut self) {
        self.life = 0.0;
    }
}

/// Things that happened during a step, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyKilled { id: u32, kind: EnemyKind, score_delta: u64 },
    BossIncoming,
    PlayerHit { health: f32 },
    GameOver { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Steps taken (stops advancing at game over)
    pub frame: u64,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
    pub camera: Camera,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub player_bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub score: u64,
    /// Kills since the last boss trigger, always in 0..KILLS_PER_BOSS
    pub kill_count: u32,
    /// Total enemy deaths this run
    pub total_kills: u32,
    /// Boss triggers this run
    pub bosses_spawned: u32,
    pub banner: Banner,
    pub banner_duration_ms: f32,
    pub spawn_clock: SpawnClock,
    pub game_over: bool,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    pub fn new(config: &SimConfig) -> Self {
        let viewport = config.viewport();
        Self {
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            frame: 0,
            viewport,
            camera: Camera::default(),
            player: Player::new(viewport * 0.5),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            player_bullets: Vec::new(),
            particles: Vec::new(),
            score: 0,
            kill_count: 0,
            total_kills: 0,
            bosses_spawned: 0,
            banner: Banner::Hidden,
            banner_duration_ms: config.banner_duration_ms,
            spawn_clock: SpawnClock::new(config.spawn_interval_ms),
            game_over: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Screen-space viewport center
    pub fn screen_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Player position in world coordinates
    pub fn player_world_pos(&self) -> Vec2 {
        self.camera.screen_to_world(self.player.pos)
    }

    /// Track a viewport resize; the player stays centered
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
            self.player.pos = self.screen_center();
        }
    }

    /// Add an enemy at a world position, returning its ID
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos));
        self.events.push(GameEvent::EnemySpawned { id, kind });
        log::debug!("spawned {:?} enemy {} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        id
    }

    pub fn banner_visible(&self) -> bool {
        self.banner.is_visible()
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// Take this step's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
