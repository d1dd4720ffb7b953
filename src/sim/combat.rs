//! Collision and combat resolution
//!
//! All hit tests are plain circle checks at the current positions (no swept
//! tests; fast bullets may tunnel through thin targets). Hits only flip
//! `alive` flags and clamp health; `prune` compacts the collections once per
//! step.

use super::spawner;
use super::state::{Bullet, GameEvent, World};
use crate::consts::{DESPAWN_RADIUS, FIRE_DAMAGE, KILLS_PER_BOSS};
use crate::distance;

/// Damage the enemy at `index`. On the killing hit, award score, advance the
/// kill counter, and trigger a boss every `KILLS_PER_BOSS` kills.
///
/// Returns true if this call killed the enemy. Stale indices and enemies that
/// are already dead are ignored.
pub fn damage_enemy(world: &mut World, index: usize, amount: f32) -> bool {
    let Some(enemy) = world.enemies.get_mut(index) else {
        return false;
    };
    if !enemy.take_damage(amount) {
        return false;
    }

    let (id, kind) = (enemy.id, enemy.kind);
    let score_delta = kind.score();
    world.score += score_delta;
    world.kill_count += 1;
    world.total_kills += 1;
    world.events.push(GameEvent::EnemyKilled {
        id,
        kind,
        score_delta,
    });
    log::debug!("enemy {} ({:?}) killed, score {}", id, kind, world.score);

    if world.kill_count >= KILLS_PER_BOSS {
        world.kill_count = 0;
        spawner::spawn_boss(world);
    }
    true
}

/// Let the fire particle at `index` burn the first live enemy it overlaps.
/// At most one enemy per particle per frame; the particle dies on contact.
pub fn fire_particle_scan(world: &mut World, index: usize) {
    let Some(particle) = world.particles.get(index) else {
        return;
    };
    if !particle.is_fire() {
        return;
    }
    let (pos, size) = (particle.pos, particle.size);

    let hit = world
        .enemies
        .iter()
        .rposition(|e| e.alive && distance(pos, e.pos) < e.radius + size);

    if let Some(enemy_index) = hit {
        damage_enemy(world, enemy_index, FIRE_DAMAGE);
        world.particles[index].kill();
    }
}

/// Move enemy bullets and apply hits on the player
pub fn advance_enemy_bullets(world: &mut World) {
    let target = world.player_world_pos();

    for bullet in world.enemy_bullets.iter_mut().filter(|b| b.alive) {
        bullet.advance();

        if !world.player.is_alive() || distance(bullet.pos, target) >= world.player.radius {
            continue;
        }

        bullet.alive = false;
        let fatal = world.player.take_damage(bullet.damage());
        world.events.push(GameEvent::PlayerHit {
            health: world.player.health,
        });

        if fatal {
            world.game_over = true;
            world.events.push(GameEvent::GameOver { score: world.score });
            log::info!("game over, final score {}", world.score);
        }
    }
}

/// Player bullets vs enemies. A bullet hits at most one enemy.
pub fn resolve_player_bullets(world: &mut World) {
    for bullet_index in 0..world.player_bullets.len() {
        let bullet = &world.player_bullets[bullet_index];
        if !bullet.alive {
            continue;
        }
        let (pos, damage) = (bullet.pos, bullet.damage());

        let hit = world
            .enemies
            .iter()
            .rposition(|e| e.alive && distance(pos, e.pos) < e.radius);

        if let Some(enemy_index) = hit {
            world.player_bullets[bullet_index].alive = false;
            damage_enemy(world, enemy_index, damage);
        }
    }
}

/// Drop dead entities and bullets beyond the despawn radius
pub fn prune(world: &mut World) {
    let player = world.player_world_pos();
    let keep = |b: &Bullet| b.alive && distance(b.pos, player) <= DESPAWN_RADIUS;

    world.particles.retain(|p| p.is_alive());
    world.enemies.retain(|e| e.alive);
    world.enemy_bullets.retain(keep);
    world.player_bullets.retain(keep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::config::SimConfig;
    use crate::sim::state::{BulletOwner, EnemyKind, Particle};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quiet_world() -> World {
        World::new(&SimConfig {
            spawn_interval_ms: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_third_kill_spawns_boss() {
        let mut world = quiet_world();
        world.kill_count = 2;
        world.spawn_enemy(EnemyKind::Normal, Vec2::new(10.0, 10.0));
        world.enemies[0].health = 10.0;

        assert!(damage_enemy(&mut world, 0, PLAYER_BULLET_DAMAGE));
        assert_eq!(world.kill_count, 0);
        assert_eq!(world.score, SCORE_NORMAL);
        assert_eq!(world.enemies.len(), 2);
        assert!(world.enemies[1].is_boss());
        assert!(world.banner_visible());
        assert_eq!(world.bosses_spawned, 1);
    }

    #[test]
    fn test_boss_kill_scores_fifty() {
        let mut world = quiet_world();
        world.spawn_enemy(EnemyKind::Boss, Vec2::ZERO);
        assert!(damage_enemy(&mut world, 0, BOSS_HEALTH));
        assert_eq!(world.score, SCORE_BOSS);
        assert_eq!(world.kill_count, 1);
    }

    #[test]
    fn test_dead_or_missing_enemy_ignored() {
        let mut world = quiet_world();
        assert!(!damage_enemy(&mut world, 3, 10.0));

        world.spawn_enemy(EnemyKind::Normal, Vec2::ZERO);
        assert!(damage_enemy(&mut world, 0, 1000.0));
        assert!(!damage_enemy(&mut world, 0, 1000.0));
        assert_eq!(world.score, SCORE_NORMAL);
        assert_eq!(world.total_kills, 1);
    }

    #[test]
    fn test_fire_particle_hits_one_enemy_once() {
        let mut world = quiet_world();
        world.spawn_enemy(EnemyKind::Normal, Vec2::new(0.0, 0.0));
        world.spawn_enemy(EnemyKind::Normal, Vec2::new(2.0, 0.0));

        let mut rng = Pcg32::seed_from_u64(1);
        world.particles.push(Particle::fire(Vec2::new(1.0, 0.0), 0.0, &mut rng));
        fire_particle_scan(&mut world, 0);

        let burned: Vec<_> = world
            .enemies
            .iter()
            .filter(|e| e.health < ENEMY_HEALTH)
            .collect();
        assert_eq!(burned.len(), 1);
        assert_eq!(burned[0].health, ENEMY_HEALTH - FIRE_DAMAGE);
        assert!(!world.particles[0].is_alive());
    }

    #[test]
    fn test_exhaust_never_damages() {
        let mut world = quiet_world();
        world.spawn_enemy(EnemyKind::Normal, Vec2::ZERO);
        let mut rng = Pcg32::seed_from_u64(1);
        world.particles.push(Particle::exhaust(Vec2::ZERO, 0.0, &mut rng));
        fire_particle_scan(&mut world, 0);
        assert_eq!(world.enemies[0].health, ENEMY_HEALTH);
    }

    #[test]
    fn test_player_bullet_hits_single_enemy() {
        let mut world = quiet_world();
        world.spawn_enemy(EnemyKind::Normal, Vec2::new(100.0, 100.0));
        world.spawn_enemy(EnemyKind::Normal, Vec2::new(101.0, 100.0));
        world
            .player_bullets
            .push(Bullet::new(BulletOwner::Player, Vec2::new(100.5, 100.0), 0.0));

        resolve_player_bullets(&mut world);

        let total: f32 = world.enemies.iter().map(|e| e.health).sum();
        assert_eq!(total, 2.0 * ENEMY_HEALTH - PLAYER_BULLET_DAMAGE);
        assert!(!world.player_bullets[0].alive);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut world = quiet_world();
        let target = world.player_world_pos();
        world
            .enemy_bullets
            .push(Bullet::new(BulletOwner::Enemy, target - Vec2::new(10.0, 0.0), 0.0));

        advance_enemy_bullets(&mut world);

        assert_eq!(world.player.health, PLAYER_MAX_HEALTH - ENEMY_BULLET_DAMAGE);
        assert!(!world.enemy_bullets[0].alive);
        assert!(!world.game_over);
    }

    #[test]
    fn test_prune_despawn_radius() {
        let mut world = quiet_world();
        let p = world.player_world_pos();
        for offset in [0.0, 999.0, 1000.0, 1000.5, 5000.0] {
            world
                .enemy_bullets
                .push(Bullet::new(BulletOwner::Enemy, p + Vec2::new(offset, 0.0), 0.0));
            world
                .player_bullets
                .push(Bullet::new(BulletOwner::Player, p - Vec2::new(0.0, offset), 0.0));
        }
        prune(&mut world);
        assert_eq!(world.enemy_bullets.len(), 3);
        assert_eq!(world.player_bullets.len(), 3);
    }
}
