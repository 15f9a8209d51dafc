//! Game state and per-frame snapshot
//!
//! `GameState` owns every entity collection for the current level. Only
//! `tick` and `load_level` add or remove entities.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animal::{Animal, AnimalKind, BehaviorState};
use super::camera::CameraRig;
use super::clock::{FrameClock, TimeControl};
use super::environment::{DayNightCycle, TimeOfDay, Weather, WeatherSystem};
use super::hazard::Hen;
use super::level::{LevelConfig, LevelError, Theme};
use super::obstacle::{Obstacle, ObstacleKind};
use super::particles::{ParticleEffect, ParticlePool};
use super::player::Player;
use super::powerup::{PowerUpKind, PowerUpManager};
use super::projectile::{Projectile, ProjectileOwner};
use super::rainbow::Rainbow;
use super::session::{LevelCompletion, SessionState};
use super::terrain;

/// Things that happened during a frame, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    LevelLoaded { level_id: u32 },
    Paused,
    Resumed,
    HeartsFired { count: u32, homing: bool },
    AnimalHit { animal_id: u32, transformed: bool },
    AnimalReverted { animal_id: u32 },
    HenRoasted { hen_id: u32 },
    EggThrown { hen_id: u32 },
    PowerUpCollected { kind: PowerUpKind },
    WeatherChanged { weather: Weather },
    LevelComplete(LevelCompletion),
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub theme: Theme,
    pub level_name: String,
    pub player: Player,
    /// Sorted by id
    pub animals: Vec<Animal>,
    pub obstacles: Vec<Obstacle>,
    pub hens: Vec<Hen>,
    pub projectiles: Vec<Projectile>,
    pub particles: ParticlePool,
    pub clock: FrameClock,
    pub time: TimeControl,
    pub powerups: PowerUpManager,
    pub rainbows: Vec<Rainbow>,
    pub day_night: DayNightCycle,
    pub weather: WeatherSystem,
    pub camera: CameraRig,
    pub session: SessionState,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// An empty world (no level loaded)
    pub fn new(seed: u64, particle_capacity: usize) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            theme: Theme::Meadow,
            level_name: String::new(),
            player: Player::new(Vec3::ZERO),
            animals: Vec::new(),
            obstacles: Vec::new(),
            hens: Vec::new(),
            projectiles: Vec::new(),
            particles: ParticlePool::with_capacity(particle_capacity),
            clock: FrameClock::default(),
            time: TimeControl::new(),
            powerups: PowerUpManager::new(),
            rainbows: Vec::new(),
            day_night: DayNightCycle::default(),
            weather: WeatherSystem::default(),
            camera: CameraRig::default(),
            session: SessionState::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True once a level has been loaded
    pub fn has_level(&self) -> bool {
        self.session.total_animals > 0
    }

    /// Replace the current level
    ///
    /// The level is validated first; on error nothing is touched.
    pub fn load_level(&mut self, level: &LevelConfig) -> Result<(), LevelError> {
        level.validate()?;

        self.theme = level.theme;
        self.level_name = level.name.clone();
        self.projectiles.clear();
        self.rainbows.clear();
        self.particles.clear();
        self.powerups.reset();
        self.time.reset();

        let day_night_enabled = self.day_night.enabled;
        self.day_night = DayNightCycle {
            enabled: day_night_enabled,
            ..Default::default()
        };
        self.weather = WeatherSystem::new(self.weather.enabled);

        self.player = Player::new(level.player_start);

        self.obstacles = level
            .obstacles
            .iter()
            .map(|spawn| {
                let pos = terrain::ground_point(spawn.position.x, spawn.position.z);
                Obstacle::new(spawn.kind, pos, spawn.variant.unwrap_or(0))
            })
            .collect();

        self.animals.clear();
        for spawn in &level.animals {
            let id = self.next_entity_id();
            let animal = Animal::new(id, spawn.kind, spawn.position.x, spawn.position.z, &mut self.rng);
            self.animals.push(animal);
        }

        self.hens.clear();
        for _ in 0..level.hazard_count() {
            let id = self.next_entity_id();
            let hen = Hen::spawn_random(id, &mut self.rng);
            self.hens.push(hen);
        }

        self.session = SessionState::new(level.id, self.animals.len() as u32, level.par_time);
        self.camera.snap_to(self.player.position);

        log::info!(
            "loaded level {} '{}': {} animals, {} obstacles, {} hens",
            level.id,
            level.name,
            self.animals.len(),
            self.obstacles.len(),
            self.hens.len()
        );
        Ok(())
    }

    /// Look up a live animal by id
    pub fn animal(&self, id: u32) -> Option<&Animal> {
        self.animals.iter().find(|a| a.id == id)
    }

    /// Emit particles from the shared pool
    pub fn emit(&mut self, effect: ParticleEffect, origin: Vec3, count: usize) -> usize {
        self.particles.emit(effect, origin, Some(count), &mut self.rng)
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            level_name: self.level_name.clone(),
            theme: self.theme,
            player: PlayerView {
                position: self.player.position,
                facing: self.player.facing,
                speed: self.player.speed,
                move_target: self.player.move_target,
            },
            animals: self
                .animals
                .iter()
                .map(|a| AnimalView {
                    id: a.id,
                    kind: a.kind,
                    position: a.position,
                    rotation: a.rotation,
                    state: a.state,
                    transformed: a.is_transformed,
                    flash: a.revert_flash_remaining > 0.0,
                })
                .collect(),
            hens: self
                .hens
                .iter()
                .map(|h| HenView {
                    id: h.id,
                    position: h.position,
                    rotation: h.rotation,
                    roasted: h.roasted,
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    kind: o.kind,
                    position: o.position,
                    variant: o.variant,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    owner: p.owner,
                    position: p.position,
                    direction: p.direction,
                })
                .collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    position: p.position,
                    rotation: p.rotation,
                    color: p.color,
                    scale: p.scale,
                    opacity: p.opacity,
                })
                .collect(),
            pickups: self
                .powerups
                .pickups
                .iter()
                .map(|p| PickupView {
                    kind: p.kind,
                    position: p.position,
                })
                .collect(),
            active_powerups: self.powerups.active_kinds(),
            rainbows: self
                .rainbows
                .iter()
                .map(|r| RainbowView {
                    position: r.position,
                    opacity: r.opacity(),
                })
                .collect(),
            camera_position: self.camera.render_position(),
            camera_look_at: self.camera.look_at,
            time_scale: self.time.time_scale(),
            time_of_day: self.day_night.phase(),
            ambient_intensity: self.day_night.ambient_intensity(),
            visibility: self.day_night.visibility_multiplier(),
            weather: self.weather.current,
            fog_density: self.weather.fog_density(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub position: Vec3,
    pub facing: Vec3,
    pub speed: f32,
    pub move_target: Option<Vec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalView {
    pub id: u32,
    pub kind: AnimalKind,
    pub position: Vec3,
    pub rotation: f32,
    pub state: BehaviorState,
    pub transformed: bool,
    /// Drawing the white revert flash
    pub flash: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HenView {
    pub id: u32,
    pub position: Vec3,
    pub rotation: f32,
    pub roasted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub variant: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileView {
    pub id: u32,
    pub owner: ProjectileOwner,
    pub position: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleView {
    pub position: Vec3,
    pub rotation: Vec3,
    pub color: u32,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupView {
    pub kind: PowerUpKind,
    pub position: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RainbowView {
    pub position: Vec3,
    pub opacity: f32,
}

/// Everything presentation needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub session: SessionState,
    pub level_name: String,
    pub theme: Theme,
    pub player: PlayerView,
    pub animals: Vec<AnimalView>,
    pub hens: Vec<HenView>,
    pub obstacles: Vec<ObstacleView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub pickups: Vec<PickupView>,
    pub active_powerups: Vec<PowerUpKind>,
    pub rainbows: Vec<RainbowView>,
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub time_scale: f32,
    pub time_of_day: TimeOfDay,
    pub ambient_intensity: f32,
    pub visibility: f32,
    pub weather: Weather,
    pub fog_density: f32,
}
