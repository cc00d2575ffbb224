use std::collections::HashSet;
use std::path::Path;

use engine::{
    resolve_velocity, Aabb, AnimationCycle, CameraTracker, InputSnapshot, Simulation, SpriteKey,
    SpriteSheet, Vec2, WorldMap, TILE_LENGTH, VEC2_ZERO,
};
use tracing::{debug, info};

const PLAYER_NAME: &str = "Leto";
const PLAYER_WALK_SPEED: f64 = 3.0;
const PLAYER_MAX_HEALTH: u32 = 100;
const PLAYER_SWORD_DAMAGE: u32 = 25;
const ENEMY_WALK_SPEED: f64 = 4.0;
// Center-to-center; must exceed the 32-unit body separation at which the
// walk-into-player stop kicks in, or enemies stall without ever swinging.
const ENEMY_ATTACK_RANGE: f64 = 40.0;
// An enemy keeps walking toward its old target until it gets this close,
// then re-reads the player's position; retargeting every tick makes it
// thrash around a moving player.
const ENEMY_TARGET_ARRIVAL_RADIUS: f64 = 2.0 * TILE_LENGTH;
const FALLBACK_SHEET_DIMENSIONS: (u32, u32) = (64, 64);

include!("types.rs");
include!("entities.rs");
include!("systems.rs");
include!("session.rs");
