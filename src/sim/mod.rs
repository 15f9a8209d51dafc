//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, passed explicitly to every consumer
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod animal;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod environment;
pub mod hazard;
pub mod level;
pub mod obstacle;
pub mod particles;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod rainbow;
pub mod session;
pub mod state;
pub mod terrain;
pub mod tick;

pub use animal::{Animal, AnimalKind, BehaviorState, find_hiding_spot};
pub use clock::{FrameClock, TimeControl};
pub use collision::{CollisionResult, circle_contact, resolve_obstacles};
pub use level::{LevelCatalog, LevelConfig, LevelError, Theme};
pub use obstacle::{Obstacle, ObstacleEffect, ObstacleKind};
pub use particles::{ParticleEffect, ParticlePool};
pub use powerup::PowerUpKind;
pub use projectile::{Projectile, ProjectileOwner};
pub use session::{LevelCompletion, SessionState, star_rating};
pub use state::{GameEvent, GameState, Snapshot};
pub use tick::{TickInput, tick};
