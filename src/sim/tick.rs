//! Per-frame simulation step
//!
//! Core game loop that advances the world by one frame. Motion is in pixels
//! per frame; the frame delta only drives the spawn and banner timers.

use glam::Vec2;
use rand::Rng;

use super::combat;
use super::spawner;
use super::state::{Bullet, BulletOwner, Movement, Particle, World};
use crate::consts::*;
use crate::{angle_to, direction};

/// Normalized input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub movement: Movement,
    /// Pointer position in viewport-local pixels
    pub pointer: Vec2,
    /// Flamethrower held
    pub fire: bool,
    /// Gun held
    pub shoot: bool,
}

/// Advance the world by one frame. A no-op once the game is over.
pub fn tick(world: &mut World, input: &TickInput, dt_ms: f32) {
    if world.game_over {
        return;
    }

    // A bad timestamp must not poison the timers
    let dt_ms = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };
    world.frame += 1;
    log::trace!(
        "tick {}: dt={:.1}ms enemies={} particles={} bullets={}/{}",
        world.frame,
        dt_ms,
        world.enemies.len(),
        world.particles.len(),
        world.enemy_bullets.len(),
        world.player_bullets.len()
    );

    spawner::update_timers(world, dt_ms);

    // Aim at the pointer
    let center = world.screen_center();
    world.player.facing = angle_to(center, input.pointer);
    world.player.movement = input.movement;

    // Moving scrolls the camera; the player stays centered
    let delta = input.movement.delta(world.player.speed);
    world.camera.translate(delta);

    if let Some(angle) = input.movement.exhaust_angle() {
        emit_exhaust(world, angle);
    }
    if input.fire {
        emit_fire(world);
    }
    fire_gun(world, input.shoot);

    // Particles first; fire particles burn enemies as they move
    for i in 0..world.particles.len() {
        world.particles[i].advance();
        combat::fire_particle_scan(world, i);
    }

    let target = world.player_world_pos();
    for enemy in world.enemies.iter_mut().filter(|e| e.alive) {
        if let Some(shot) = enemy.advance(target) {
            world.enemy_bullets.push(shot);
        }
    }

    combat::advance_enemy_bullets(world);

    for bullet in world.player_bullets.iter_mut().filter(|b| b.alive) {
        bullet.advance();
    }

    combat::resolve_player_bullets(world);
    combat::prune(world);
}

/// Exhaust puffs at the player, streaming away from the direction of travel
fn emit_exhaust(world: &mut World, angle: f32) {
    let origin = world.player_world_pos();
    for _ in 0..EXHAUST_PER_FRAME {
        let rng = world.rng();
        let jitter = rng.random_range(-EXHAUST_JITTER..EXHAUST_JITTER);
        let particle = Particle::exhaust(origin, angle + jitter, rng);
        world.particles.push(particle);
    }
}

/// Flamethrower: particles scattered along the pointer ray, each drifting on a
/// slightly jittered heading
fn emit_fire(world: &mut World) {
    let origin = world.player_world_pos();
    let aim = world.player.facing;
    let reach = world.viewport.x;
    let radius = world.player.radius;

    for _ in 0..FIRE_PER_FRAME {
        let rng = world.rng();
        let along = radius + rng.random::<f32>() * reach;
        let jitter = rng.random_range(-FIRE_JITTER..FIRE_JITTER);
        let particle = Particle::fire(origin + direction(aim) * along, aim + jitter, rng);
        world.particles.push(particle);
    }
}

/// Player gun: one bullet per cooldown window while held
fn fire_gun(world: &mut World, held: bool) {
    let player = &mut world.player;
    player.shot_cooldown = player.shot_cooldown.saturating_sub(1);
    if !held || player.shot_cooldown > 0 {
        return;
    }
    player.shot_cooldown = PLAYER_SHOT_COOLDOWN;

    let facing = player.facing;
    let origin = world.player_world_pos();
    world
        .player_bullets
        .push(Bullet::new(BulletOwner::Player, origin, facing));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::SimConfig;
    use crate::sim::state::{EnemyKind, GameEvent};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quiet_world() -> World {
        World::new(&SimConfig {
            spawn_interval_ms: 0.0,
            ..Default::default()
        })
    }

    fn idle(world: &World) -> TickInput {
        TickInput {
            pointer: world.screen_center() + Vec2::new(1.0, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_enemy_fires_once_per_interval() {
        let mut world = quiet_world();
        let player = world.player_world_pos();
        world.spawn_enemy(EnemyKind::Normal, player + Vec2::new(100.0, 0.0));
        let input = idle(&world);

        tick(&mut world, &input, SIM_DT_MS);
        assert_eq!(world.enemy_bullets.len(), 1);
        assert!(direction(world.enemy_bullets[0].angle).x < -0.99);

        let mut hits = 0;
        for frame in 2..=60 {
            tick(&mut world, &input, SIM_DT_MS);
            hits += world
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
                .count();
            assert_eq!(
                world.enemy_bullets.len() + hits,
                1,
                "extra shot by frame {}",
                frame
            );
        }

        tick(&mut world, &input, SIM_DT_MS);
        hits += world
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(world.enemy_bullets.len() + hits, 2);
    }

    #[test]
    fn test_enemy_bullet_kills_player() {
        let mut world = quiet_world();
        world.player.health = 3.0;
        let player = world.player_world_pos();
        world
            .enemy_bullets
            .push(Bullet::new(BulletOwner::Enemy, player, 0.0));

        let input = idle(&world);
        tick(&mut world, &input, SIM_DT_MS);

        assert!(world.player.health <= 0.0);
        assert!(world.game_over);
        assert!(world.enemy_bullets.is_empty());
        assert!(world.events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_fire_particle_kills_weak_enemy() {
        let mut world = quiet_world();
        let spot = world.player_world_pos() + Vec2::new(200.0, 0.0);
        world.spawn_enemy(EnemyKind::Normal, spot);
        world.enemies[0].health = 10.0;

        let mut rng = Pcg32::seed_from_u64(9);
        world.particles.push(Particle::fire(spot, 0.0, &mut rng));

        let input = idle(&world);
        tick(&mut world, &input, SIM_DT_MS);

        assert!(world.enemies.is_empty());
        assert_eq!(world.score, SCORE_NORMAL);
        assert_eq!(world.kill_count, 1);
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_third_kill_by_bullet_spawns_boss() {
        let mut world = quiet_world();
        world.kill_count = 2;
        let spot = world.player_world_pos() + Vec2::new(300.0, 0.0);
        world.spawn_enemy(EnemyKind::Normal, spot);
        world.enemies[0].health = 10.0;
        // Fired from just behind the enemy so it is inside after one move
        world
            .player_bullets
            .push(Bullet::new(BulletOwner::Player, spot - Vec2::new(5.0, 0.0), 0.0));

        let input = idle(&world);
        tick(&mut world, &input, SIM_DT_MS);

        assert_eq!(world.kill_count, 0);
        assert_eq!(world.enemies.len(), 1);
        assert!(world.enemies[0].is_boss());
        assert!(world.banner_visible());
        assert!(world.player_bullets.is_empty());
    }

    #[test]
    fn test_game_over_is_inert() {
        let mut world = World::new(&SimConfig::default());
        let input = TickInput {
            movement: Movement {
                up: true,
                ..Default::default()
            },
            fire: true,
            shoot: true,
            ..idle(&world)
        };
        for _ in 0..30 {
            tick(&mut world, &input, SIM_DT_MS);
        }
        world.game_over = true;

        let before = world.clone();
        for _ in 0..10 {
            tick(&mut world, &input, 1000.0);
        }

        assert_eq!(world.frame, before.frame);
        assert_eq!(world.score, before.score);
        assert_eq!(world.camera, before.camera);
        assert_eq!(world.player.health, before.player.health);
        assert_eq!(world.enemies.len(), before.enemies.len());
        assert_eq!(world.particles.len(), before.particles.len());
        assert_eq!(world.enemy_bullets.len(), before.enemy_bullets.len());
        assert_eq!(world.player_bullets.len(), before.player_bullets.len());
    }

    #[test]
    fn test_diagonal_move_scrolls_both_axes() {
        let mut world = quiet_world();
        let input = TickInput {
            movement: Movement {
                up: true,
                right: true,
                ..Default::default()
            },
            ..idle(&world)
        };
        tick(&mut world, &input, SIM_DT_MS);

        assert_eq!(world.camera.offset, Vec2::new(PLAYER_SPEED, -PLAYER_SPEED));
        assert_eq!(world.player.pos, world.screen_center());
        assert_eq!(world.particles.len(), EXHAUST_PER_FRAME);
    }

    #[test]
    fn test_fire_emits_along_pointer() {
        let mut world = quiet_world();
        let center = world.screen_center();
        let input = TickInput {
            pointer: center + Vec2::new(0.0, 50.0),
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT_MS);

        assert!((world.player.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(world.particles.len(), FIRE_PER_FRAME);
        let origin = world.player_world_pos();
        assert!(world.particles.iter().all(|p| p.pos.y > origin.y));
    }

    #[test]
    fn test_gun_respects_cooldown() {
        let mut world = quiet_world();
        let input = TickInput {
            shoot: true,
            ..idle(&world)
        };
        for _ in 0..PLAYER_SHOT_COOLDOWN {
            tick(&mut world, &input, SIM_DT_MS);
        }
        assert_eq!(world.player_bullets.len(), 1);
        tick(&mut world, &input, SIM_DT_MS);
        assert_eq!(world.player_bullets.len(), 2);
    }

    #[test]
    fn test_periodic_spawn_from_step() {
        let mut world = World::new(&SimConfig::default());
        let input = idle(&world);
        // Long frames are clamped, so a second takes four of them
        for _ in 0..4 {
            tick(&mut world, &input, 1000.0);
        }
        assert_eq!(world.live_enemies().count(), 1);
    }

    #[test]
    fn test_non_finite_dt_keeps_timers_running() {
        let mut world = World::new(&SimConfig::default());
        world.banner.trigger(2000.0);
        let input = idle(&world);

        tick(&mut world, &input, f32::NAN);
        tick(&mut world, &input, f32::INFINITY);
        assert_eq!(world.frame, 2);
        assert!(world.spawn_clock.elapsed_ms.is_finite());

        for _ in 0..8 {
            tick(&mut world, &input, MAX_FRAME_MS);
        }
        assert!(!world.banner_visible());
        assert_eq!(world.live_enemies().count(), 2);
    }

    #[test]
    fn test_determinism() {
        let mut world1 = World::new(&SimConfig::default());
        let mut world2 = World::new(&SimConfig::default());

        let inputs = [
            TickInput {
                movement: Movement {
                    left: true,
                    ..Default::default()
                },
                pointer: Vec2::new(900.0, 100.0),
                fire: true,
                shoot: false,
            },
            TickInput {
                pointer: Vec2::new(100.0, 600.0),
                shoot: true,
                ..Default::default()
            },
        ];

        for i in 0..400 {
            let input = &inputs[(i / 50) % inputs.len()];
            tick(&mut world1, input, SIM_DT_MS);
            tick(&mut world2, input, SIM_DT_MS);
        }

        assert_eq!(world1.frame, world2.frame);
        assert_eq!(world1.score, world2.score);
        assert_eq!(world1.enemies.len(), world2.enemies.len());
        assert_eq!(world1.particles.len(), world2.particles.len());
        for (a, b) in world1.enemies.iter().zip(&world2.enemies) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.health, b.health);
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_input() -> impl Strategy<Value = TickInput> {
            (
                any::<[bool; 4]>(),
                0.0f32..1280.0,
                0.0f32..720.0,
                any::<bool>(),
                any::<bool>(),
            )
                .prop_map(|(keys, x, y, fire, shoot)| TickInput {
                    movement: Movement {
                        up: keys[0],
                        down: keys[1],
                        left: keys[2],
                        right: keys[3],
                    },
                    pointer: Vec2::new(x, y),
                    fire,
                    shoot,
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn stored_values_never_negative(
                seed in any::<u64>(),
                inputs in proptest::collection::vec(arb_input(), 1..120),
            ) {
                let mut world = World::new(&SimConfig { seed, ..Default::default() });
                for input in &inputs {
                    tick(&mut world, input, SIM_DT_MS * 4.0);
                    prop_assert!(world.player.health >= 0.0);
                    prop_assert!(world.enemies.iter().all(|e| e.health > 0.0 && e.radius > 0.0));
                    prop_assert!(world.particles.iter().all(|p| p.life > 0.0 && p.size > 0.0));
                    prop_assert!(world.kill_count < KILLS_PER_BOSS);
                }
            }

            #[test]
            fn bullets_stay_within_despawn_radius(
                seed in any::<u64>(),
                inputs in proptest::collection::vec(arb_input(), 1..200),
            ) {
                let mut world = World::new(&SimConfig { seed, ..Default::default() });
                for input in &inputs {
                    tick(&mut world, input, SIM_DT_MS * 6.0);
                    let p = world.player_world_pos();
                    for b in world.enemy_bullets.iter().chain(&world.player_bullets) {
                        prop_assert!(crate::distance(b.pos, p) <= DESPAWN_RADIUS);
                    }
                }
            }

            #[test]
            fn kill_counter_cycles(kills in 0u32..40) {
                let mut world = quiet_world();
                for n in 0..kills {
                    let id = world.spawn_enemy(EnemyKind::Normal, Vec2::new(n as f32, 0.0));
                    let index = world.enemies.iter().position(|e| e.id == id).unwrap();
                    prop_assert!(combat::damage_enemy(&mut world, index, ENEMY_HEALTH));
                }
                prop_assert_eq!(world.kill_count, kills % KILLS_PER_BOSS);
                prop_assert_eq!(world.bosses_spawned, kills / KILLS_PER_BOSS);
                prop_assert_eq!(world.score, kills as u64 * SCORE_NORMAL);
                let bosses = world.enemies.iter().filter(|e| e.is_boss()).count() as u32;
                prop_assert_eq!(bosses, kills / KILLS_PER_BOSS);
            }
        }
    }
}
