//! Static level obstacles
//!
//! Obstacles are placed once at level load and never move. Solidity is
//! decided purely by collision radius: radius 0 means walk-through.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Every obstacle type across the nine themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
    // Common
    Tree,
    Bush,
    Castle,
    Mushroom,
    Crystal,
    River,
    Bridge,
    Mud,
    Flowers,
    // Desert
    Cactus,
    SandDune,
    Oasis,
    Pyramid,
    // Winter
    Snowman,
    IceCrystal,
    FrozenPond,
    SnowPine,
    // Swamp
    DeadTree,
    LilyPad,
    SwampGas,
    // Volcano
    LavaPool,
    VolcanicRock,
    Obsidian,
    // Beach
    PalmTree,
    BeachUmbrella,
    Sandcastle,
    TidePool,
    // Haunted
    Tombstone,
    GhostTree,
    Pumpkin,
    Cobweb,
}

/// Advisory gameplay metadata
///
/// Only the collision radius is read by the resolver; these flags travel
/// with the obstacle for presentation (minimap, tooltips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObstacleEffect {
    pub blocks_movement: bool,
    pub slows_movement: bool,
    pub attracts_horses: bool,
}

impl ObstacleEffect {
    const BLOCK: Self = Self {
        blocks_movement: true,
        slows_movement: false,
        attracts_horses: false,
    };
    const SLOW: Self = Self {
        blocks_movement: false,
        slows_movement: true,
        attracts_horses: false,
    };
    const ATTRACT: Self = Self {
        blocks_movement: false,
        slows_movement: false,
        attracts_horses: true,
    };
    const NONE: Self = Self {
        blocks_movement: false,
        slows_movement: false,
        attracts_horses: false,
    };
}

impl ObstacleKind {
    pub fn collision_radius(&self) -> f32 {
        use ObstacleKind::*;
        match self {
            Tree => 1.5,
            Bush => 1.8,
            Castle => 12.0,
            Mushroom => 1.2,
            Crystal => 1.0,
            Cactus => 1.0,
            SandDune => 3.0,
            Pyramid => 4.0,
            Snowman => 1.2,
            IceCrystal => 1.0,
            SnowPine => 1.5,
            DeadTree => 1.2,
            VolcanicRock => 2.0,
            Obsidian => 1.0,
            PalmTree => 1.0,
            BeachUmbrella => 0.8,
            Sandcastle => 1.5,
            Tombstone => 0.8,
            GhostTree => 1.2,
            Pumpkin => 0.6,
            River | Bridge | Mud | Flowers | Oasis | FrozenPond | LilyPad | SwampGas
            | LavaPool | TidePool | Cobweb => 0.0,
        }
    }

    pub fn effect(&self) -> ObstacleEffect {
        use ObstacleKind::*;
        match self {
            Bridge | LilyPad => ObstacleEffect::NONE,
            Mud | FrozenPond | SwampGas | TidePool | Cobweb => ObstacleEffect::SLOW,
            Flowers | Oasis => ObstacleEffect::ATTRACT,
            // River and lava are drawn as barriers but have no collision radius
            _ => ObstacleEffect::BLOCK,
        }
    }

    /// Walk-through decoration or terrain effect
    pub fn is_pass_through(&self) -> bool {
        self.collision_radius() == 0.0
    }
}

/// A placed obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub collision_radius: f32,
    pub effect: ObstacleEffect,
    /// Visual variant (presentation only)
    pub variant: u32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, position: Vec3, variant: u32) -> Self {
        Self {
            kind,
            position,
            collision_radius: kind.collision_radius(),
            effect: kind.effect(),
            variant,
        }
    }
}
