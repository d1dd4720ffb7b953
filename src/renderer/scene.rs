//! Scene building: a read-only pass over the world producing one frame of
//! geometry in viewport pixels plus the text overlays for the HUD.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{BULLET_RADIUS, WEAPON_LENGTH, WEAPON_WIDTH};
use crate::settings::Settings;
use crate::sim::{Enemy, Particle, ParticleKind, World};

/// Grid dot pitch in world pixels
pub const GRID_SPACING: f32 = 30.0;
pub const GRID_DOT_RADIUS: f32 = 2.0;
const GRID_DOT_SEGMENTS: u32 = 6;

/// Text drawn over the canvas by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Score(u64),
    BossIncoming,
    GameOver { score: u64 },
}

/// One frame of output
#[derive(Debug, Default)]
pub struct Frame {
    /// Triangle list in draw order
    pub vertices: Vec<Vertex>,
    pub overlays: Vec<Overlay>,
}

/// Build the frame for the current world state
pub fn build_frame(world: &World, settings: &Settings) -> Frame {
    let mut frame = Frame::default();

    if world.game_over {
        frame.overlays.push(Overlay::GameOver { score: world.score });
        return frame;
    }

    let segments = settings.quality.circle_segments();
    let v = &mut frame.vertices;

    if settings.show_grid {
        grid(v, world);
    }

    let cap = settings.max_particles();
    let skip = world.particles.len().saturating_sub(cap);
    for particle in world.particles.iter().skip(skip).filter(|p| p.is_alive()) {
        particle_glow(v, world, particle, segments);
    }

    for bullet in world.enemy_bullets.iter().filter(|b| b.alive) {
        let pos = world.camera.world_to_screen(bullet.pos);
        v.extend(shapes::circle(pos, BULLET_RADIUS, colors::ENEMY_BULLET, segments));
    }
    for bullet in world.player_bullets.iter().filter(|b| b.alive) {
        let pos = world.camera.world_to_screen(bullet.pos);
        v.extend(shapes::circle(pos, BULLET_RADIUS, colors::PLAYER_BULLET, segments));
    }

    for enemy in world.live_enemies() {
        enemy_body(v, world, enemy, segments);
    }

    player(v, world, segments);

    frame.overlays.push(Overlay::Score(world.score));
    if world.banner_visible() {
        frame.overlays.push(Overlay::BossIncoming);
    }

    frame
}

/// Dots on a fixed world lattice, scrolled by the camera
fn grid(v: &mut Vec<Vertex>, world: &World) {
    let offset = world.camera.offset;
    let start = (offset / GRID_SPACING).floor() * GRID_SPACING;
    let end = offset + world.viewport + Vec2::splat(GRID_SPACING);

    let mut x = start.x;
    while x < end.x {
        let mut y = start.y;
        while y < end.y {
            let pos = world.camera.world_to_screen(Vec2::new(x, y));
            v.extend(shapes::circle(pos, GRID_DOT_RADIUS, colors::GRID_DOT, GRID_DOT_SEGMENTS));
            y += GRID_SPACING;
        }
        x += GRID_SPACING;
    }
}

fn particle_glow(v: &mut Vec<Vertex>, world: &World, particle: &Particle, segments: u32) {
    let pos = world.camera.world_to_screen(particle.pos);
    let life = particle.life;
    let stops = match particle.kind {
        ParticleKind::Exhaust => [
            (0.0, [1.0, 0.784, 0.0, life]),
            (0.4, [1.0, 0.392, 0.0, life * 0.6]),
            (1.0, colors::TRANSPARENT_RED),
        ],
        ParticleKind::Fire { hue } => [
            (0.0, colors::hsla(hue, 1.0, 0.5, life)),
            (0.5, colors::hsla(hue - 20.0, 1.0, 0.5, life * 0.5)),
            (1.0, colors::TRANSPARENT_RED),
        ],
    };
    v.extend(shapes::radial_gradient(pos, particle.size, &stops, segments));
}

fn enemy_body(v: &mut Vec<Vertex>, world: &World, enemy: &Enemy, segments: u32) {
    let pos = world.camera.world_to_screen(enemy.pos);
    let color = if enemy.is_boss() {
        colors::BOSS
    } else {
        colors::ENEMY
    };
    v.extend(shapes::circle(pos, enemy.radius, color, segments));

    let bar = Vec2::new(enemy.radius * 2.0, if enemy.is_boss() { 8.0 } else { 4.0 });
    let top_left = Vec2::new(pos.x - bar.x / 2.0, pos.y - enemy.radius - 8.0);
    v.extend(shapes::meter(
        top_left,
        bar,
        enemy.health_fraction(),
        colors::BAR_BACKGROUND,
        color,
    ));
}

fn player(v: &mut Vec<Vertex>, world: &World, segments: u32) {
    let player = &world.player;
    let center = player.pos;

    v.extend(shapes::radial_gradient(
        center,
        player.radius,
        &[
            (0.0, colors::PLAYER_CORE),
            (0.5, colors::PLAYER_MID),
            (1.0, colors::PLAYER_RIM),
        ],
        segments,
    ));

    let bar = Vec2::new(player.radius * 2.0, 6.0);
    let top_left = Vec2::new(center.x - bar.x / 2.0, center.y - player.radius - 10.0);
    v.extend(shapes::meter(
        top_left,
        bar,
        player.health_fraction(),
        colors::BAR_BACKGROUND,
        colors::PLAYER_HEALTH,
    ));

    v.extend(shapes::rotated_bar(
        center,
        player.facing,
        WEAPON_LENGTH,
        WEAPON_WIDTH,
        colors::WEAPON,
    ));
}
