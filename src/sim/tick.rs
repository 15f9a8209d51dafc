//! Per-frame simulation step
//!
//! Frame order: pause gate, clock, player, animals, hens, projectiles,
//! power-ups, win check, then the purely visual layers (particles,
//! rainbows, sky, camera). Once a level is complete only the visual
//! layers keep running, so the finishing slow motion plays out.

use glam::{Vec2, Vec3};

use super::collision::{resolve_obstacles, within_planar_radius};
use super::particles::ParticleEffect;
use super::projectile::{Projectile, ProjectileOwner, nearest_target, spread_directions};
use super::rainbow::{Rainbow, update_rainbows};
use super::session::{LevelCompletion, star_rating};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::planar_distance;

/// Autopilot fires when its quarry is this close
const AUTOPILOT_FIRE_RANGE: f32 = 20.0;
/// Heart trail particles per heart per frame
const TRAIL_PER_FRAME: usize = 2;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Screen-space movement intent (zero = none)
    pub move_dir: Vec2,
    /// Walk-to point on the ground; overrides `move_dir`
    pub move_target: Option<Vec3>,
    /// Fire held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the simulation drive the player (demo / headless runs)
    pub autopilot: bool,
}

/// Advance the game by one rendered frame of `raw_dt` wall-clock seconds
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause && !state.session.is_complete {
        state.session.is_paused = !state.session.is_paused;
        events.push(if state.session.is_paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
    }

    // Don't tick if paused
    if state.session.is_paused {
        return events;
    }

    let real_dt = state.clock.cap(raw_dt);
    let dt = state.time.update(real_dt, &mut state.rng);

    if state.has_level() && !state.session.is_complete {
        step_gameplay(state, input, dt, &mut events);
    }

    state.particles.update(dt);
    update_rainbows(&mut state.rainbows, dt);
    state.day_night.update(dt);
    if let Some(weather) = state.weather.update(dt, &mut state.rng) {
        events.push(GameEvent::WeatherChanged { weather });
    }
    let shake = state.time.camera_offset();
    state.camera.follow(state.player.position, dt, shake);

    events
}

fn step_gameplay(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    state.session.elapsed += dt;

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    // Player
    if let Some(target) = input.move_target {
        state.player.set_move_target(target);
    }
    let speed_mult = state.powerups.player_speed_multiplier();
    state.player.update_movement(dt, input.move_dir, speed_mult);
    let radius = state.player.radius;
    resolve_obstacles(
        &mut state.player.position,
        radius,
        &state.obstacles,
        WORLD_HALF_EXTENT,
    );

    state.player.tick_cooldown(dt);
    if input.fire && state.player.can_fire() {
        fire_hearts(state, events);
    }

    // Animals see the player's post-collision position
    let player_pos = state.player.position;
    let animal_dt = dt * state.powerups.animal_time_scale();
    for animal in state.animals.iter_mut() {
        let was_transformed = animal.is_transformed;
        animal.update(animal_dt, player_pos, &state.obstacles, &mut state.rng);
        if !was_transformed {
            let r = animal.radius;
            resolve_obstacles(&mut animal.position, r, &state.obstacles, WORLD_HALF_EXTENT);
        }
    }

    // Hens
    let mut throws = Vec::new();
    for hen in state.hens.iter_mut() {
        if let Some(throw) = hen.update(dt, player_pos, &mut state.rng) {
            throws.push((hen.id, throw));
        }
    }
    for (hen_id, throw) in throws {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::egg(id, throw.origin, throw.direction));
        events.push(GameEvent::EggThrown { hen_id });
    }

    update_projectiles(state, dt, events);

    for kind in state.powerups.update(dt, player_pos, &mut state.rng) {
        events.push(GameEvent::PowerUpCollected { kind });
    }

    check_level_complete(state, events);
}

fn fire_hearts(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let multi_shot = state.powerups.multi_shot();
    let homing = state.powerups.homing();
    let origin = state.player.muzzle();

    let directions = spread_directions(state.player.facing, multi_shot);
    for dir in &directions {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::heart(id, origin, *dir, homing));
    }

    let count = directions.len() as u32;
    state.session.projectiles_fired += count;
    state.player.start_cooldown();
    state.emit(
        ParticleEffect::MuzzleFlash,
        origin,
        if multi_shot { 25 } else { 10 },
    );
    events.push(GameEvent::HeartsFired { count, homing });
}

fn update_projectiles(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    for i in 0..state.projectiles.len() {
        if state.projectiles[i].homing {
            let from = state.projectiles[i].position;
            let target = nearest_target(
                from,
                state
                    .animals
                    .iter()
                    .filter(|a| !a.is_transformed)
                    .map(|a| (a.id, a.position)),
            );
            state.projectiles[i].target = target;
        }
        let target_pos = state.projectiles[i]
            .target
            .and_then(|id| state.animal(id))
            .map(|a| a.position);

        let projectile = &mut state.projectiles[i];
        projectile.update(dt, target_pos);
        let owner = projectile.owner;
        let position = projectile.position;
        let alive = projectile.active;

        if owner == ProjectileOwner::Player {
            state.emit(ParticleEffect::HeartTrail, position, TRAIL_PER_FRAME);
        }
        if !alive {
            continue;
        }

        match owner {
            ProjectileOwner::Player => heart_collisions(state, i, events),
            ProjectileOwner::Hazard => egg_collisions(state, i, events),
        }
    }

    state.projectiles.retain(|p| p.active);
}

/// Hearts hit the first untransformed horse in range, else the first live hen
fn heart_collisions(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) {
    let position = state.projectiles[index].position;
    let radius = state.projectiles[index].hit_radius();

    if let Some(a) = state
        .animals
        .iter()
        .position(|a| !a.is_transformed && within_planar_radius(position, a.position, radius))
    {
        state.projectiles[index].deactivate();
        let animal_pos = state.animals[a].position;
        state.emit(ParticleEffect::Starburst, animal_pos, 200);

        let animal = &mut state.animals[a];
        let animal_id = animal.id;
        let transformed = animal.hit();
        if transformed {
            animal.transform();
            log::debug!("horse {} transformed", animal_id);
            state.session.animals_remaining = state.session.animals_remaining.saturating_sub(1);
            state.time.shake(0.3, 0.4);
            state.emit(ParticleEffect::Transformation, animal_pos, 300);
            state.rainbows.push(Rainbow::new(animal_pos));
            if state.session.animals_remaining == 0 {
                state.time.trigger_slow_mo();
            }
        }
        events.push(GameEvent::AnimalHit {
            animal_id,
            transformed,
        });
        return;
    }

    if let Some(h) = state
        .hens
        .iter()
        .position(|h| h.is_alive() && within_planar_radius(position, h.position, HEN_HIT_RADIUS))
    {
        state.projectiles[index].deactivate();
        let hen = &mut state.hens[h];
        hen.roast();
        let hen_id = hen.id;
        let hen_pos = hen.position;
        state.emit(ParticleEffect::HenPoof, hen_pos, 60);
        state.emit(ParticleEffect::Confetti, hen_pos, 100);
        state.time.shake(0.15, 0.2);
        events.push(GameEvent::HenRoasted { hen_id });
    }
}

/// Eggs revert the first unicorn in range
fn egg_collisions(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) {
    let position = state.projectiles[index].position;
    let radius = state.projectiles[index].hit_radius();

    let Some(a) = state
        .animals
        .iter()
        .position(|a| a.is_transformed && within_planar_radius(position, a.position, radius))
    else {
        return;
    };

    state.projectiles[index].deactivate();
    let animal = &mut state.animals[a];
    if !animal.revert(&mut state.rng) {
        return;
    }
    let animal_id = animal.id;
    let animal_pos = animal.position;
    log::debug!("horse {} reverted by an egg", animal_id);

    state.session.animals_remaining += 1;
    state.emit(ParticleEffect::Confetti, animal_pos, 200);
    state.emit(ParticleEffect::EggSplat, animal_pos, 50);
    state.emit(ParticleEffect::Smoke, animal_pos, 80);
    state.emit(ParticleEffect::Revert, animal_pos, 100);
    state.time.shake(0.4, 0.5);
    events.push(GameEvent::AnimalReverted { animal_id });
}

/// Fires exactly once per level
fn check_level_complete(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let session = &mut state.session;
    if session.animals_remaining > 0 || session.is_complete {
        return;
    }
    session.is_complete = true;

    let stars = star_rating(
        session.total_animals,
        session.projectiles_fired,
        session.elapsed,
        session.par_time,
    );
    session.stars = Some(stars);

    let completion = LevelCompletion {
        level_id: session.level_id,
        stars,
        projectiles_fired: session.projectiles_fired,
        animals_transformed: session.total_animals,
        time: session.elapsed,
    };
    log::info!(
        "level {} complete in {:.1}s: {} stars, accuracy {:.0}%",
        completion.level_id,
        completion.time,
        stars,
        session.accuracy() * 100.0
    );
    events.push(GameEvent::LevelComplete(completion));
}

/// Walk toward the nearest horse and fire once in range; otherwise go
/// pick up the nearest power-up.
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let quarry = state
        .animals
        .iter()
        .filter(|a| !a.is_transformed)
        .min_by(|a, b| {
            planar_distance(player.position, a.position)
                .total_cmp(&planar_distance(player.position, b.position))
        });

    if let Some(animal) = quarry {
        input.move_target = Some(animal.position);
        let in_range = planar_distance(player.position, animal.position) <= AUTOPILOT_FIRE_RANGE;
        let to_animal = (animal.position - player.position).with_y(0.0);
        let aimed = to_animal
            .try_normalize()
            .is_some_and(|dir| dir.dot(player.facing) > 0.95);
        input.fire = in_range && aimed;
        return;
    }

    if let Some(pickup) = state.powerups.pickups.iter().min_by(|a, b| {
        planar_distance(player.position, a.position)
            .total_cmp(&planar_distance(player.position, b.position))
    }) {
        input.move_target = Some(pickup.position);
    }
}
