use std::fs;
use std::path::Path;
use std::time::Duration;

use engine::{LoopConfig, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::gameplay::Difficulty;

const DEFAULT_UPDATE_PERIOD_MS: u64 = 1000 / 30;
const DEFAULT_ANIMATE_PERIOD_MS: u64 = 1000 / 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum SavedDifficulty {
    Easy,
    Medium,
    Hard,
}

impl SavedDifficulty {
    fn to_difficulty(self) -> Difficulty {
        match self {
            Self::Easy => Difficulty::Easy,
            Self::Medium => Difficulty::Medium,
            Self::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct SavedVec2 {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct SavedEnemySpawn {
    position: SavedVec2,
    max_health: u32,
    sword_damage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedSettings {
    difficulty: SavedDifficulty,
    #[serde(default)]
    update_period_ms: Option<u64>,
    #[serde(default)]
    animate_period_ms: Option<u64>,
    player_spawn: SavedVec2,
    enemies: Vec<SavedEnemySpawn>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EnemySpawn {
    pub(crate) pos: Vec2,
    pub(crate) max_health: u32,
    pub(crate) sword_damage: u32,
}

/// Runtime settings: difficulty scaling, the two tick periods, and the
/// spawn roster. A missing or malformed settings file is reported and
/// replaced by the defaults; bad configuration never stops the game.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) update_period: Duration,
    pub(crate) animate_period: Duration,
    pub(crate) player_spawn: Vec2,
    pub(crate) enemies: Vec<EnemySpawn>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            update_period: Duration::from_millis(DEFAULT_UPDATE_PERIOD_MS),
            animate_period: Duration::from_millis(DEFAULT_ANIMATE_PERIOD_MS),
            player_spawn: Vec2::new(100.0, 100.0),
            enemies: Vec::new(),
        }
    }
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Self {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "settings_file_unreadable");
                return Self::default();
            }
        };
        match parse_settings(&source) {
            Ok(settings) => {
                info!(
                    path = %path.display(),
                    enemy_count = settings.enemies.len(),
                    "settings_loaded"
                );
                settings
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "settings_file_malformed");
                Self::default()
            }
        }
    }

    pub(crate) fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            update_period: self.update_period,
            animate_period: self.animate_period,
            ..LoopConfig::default()
        }
    }
}

fn parse_settings(source: &str) -> Result<Settings, String> {
    let mut deserializer = serde_json::Deserializer::from_str(source);
    let saved: SavedSettings = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| format!("{} (at {})", error, error.path()))?;

    Ok(Settings {
        difficulty: saved.difficulty.to_difficulty(),
        update_period: Duration::from_millis(
            saved.update_period_ms.unwrap_or(DEFAULT_UPDATE_PERIOD_MS).max(1),
        ),
        animate_period: Duration::from_millis(
            saved
                .animate_period_ms
                .unwrap_or(DEFAULT_ANIMATE_PERIOD_MS)
                .max(1),
        ),
        player_spawn: Vec2::new(saved.player_spawn.x, saved.player_spawn.y),
        enemies: saved
            .enemies
            .into_iter()
            .map(|spawn| EnemySpawn {
                pos: Vec2::new(spawn.position.x, spawn.position.y),
                max_health: spawn.max_health,
                sword_damage: spawn.sword_damage,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "difficulty": "Hard",
        "update_period_ms": 20,
        "player_spawn": { "x": 250.0, "y": 300.0 },
        "enemies": [
            { "position": { "x": 600.0, "y": 300.0 }, "max_health": 80, "sword_damage": 20 }
        ]
    }"#;

    #[test]
    fn parses_well_formed_settings() {
        let settings = parse_settings(WELL_FORMED).expect("settings parse");
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.update_period, Duration::from_millis(20));
        assert_eq!(
            settings.animate_period,
            Duration::from_millis(DEFAULT_ANIMATE_PERIOD_MS)
        );
        assert_eq!(settings.player_spawn, Vec2::new(250.0, 300.0));
        assert_eq!(settings.enemies.len(), 1);
        assert_eq!(settings.enemies[0].max_health, 80);
    }

    #[test]
    fn malformed_settings_name_the_offending_path() {
        let source = WELL_FORMED.replace("80", "\"eighty\"");
        let error = parse_settings(&source).expect_err("bad health rejected");
        assert!(error.contains("max_health"), "error={error}");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Path::new("does/not/exist.json"));
        assert_eq!(settings, Settings::default());
    }
}
