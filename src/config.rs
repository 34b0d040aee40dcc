use anyhow::Result;
use mdsandbox_world::{AnimalManagerConfig, EnemyManagerConfig, GameConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/sandbox.toml";

/// Everything `config/sandbox.toml` can set. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub world: WorldSection,
    pub day_night: DayNightSection,
    pub enemies: EnemyManagerConfig,
    pub animals: AnimalManagerConfig,
    pub simulation: SimulationSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldSection {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
}

impl Default for WorldSection {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            width: game.width,
            height: game.height,
            seed: game.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DayNightSection {
    pub day_duration_ms: f64,
    /// Fraction of the day at start (0 = dawn, 0.25 = noon).
    pub start_time: f64,
}

impl Default for DayNightSection {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            day_duration_ms: game.day_duration_ms,
            start_time: game.start_time,
        }
    }
}

/// Headless run length when the command line does not override it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationSection {
    pub ticks: u64,
    pub dt_ms: f32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            ticks: 3600,
            dt_ms: 1000.0 / 60.0,
        }
    }
}

impl SandboxConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|err| {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                SandboxConfig::default()
            }),
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Sandbox config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SandboxConfig::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.world.width,
            height: self.world.height,
            seed: self.world.seed,
            day_duration_ms: self.day_night.day_duration_ms,
            start_time: self.day_night.start_time,
            enemies: self.enemies,
            animals: self.animals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = SandboxConfig::parse(
            r#"
            [world]
            seed = 42

            [enemies]
            max_enemies = 2
            "#,
        )
        .expect("partial config parses");
        assert_eq!(cfg.world.seed, 42);
        assert_eq!(cfg.world.width, 300);
        assert_eq!(cfg.enemies.max_enemies, 2);
        assert_eq!(cfg.enemies.spawn_interval_ms, 20_000.0);
        assert_eq!(cfg.animals, AnimalManagerConfig::default());
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "mdsandbox_bad_config_{}.toml",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::write(&path, "[world\nseed = ").expect("write config");
        assert_eq!(SandboxConfig::load_from_path(&path), SandboxConfig::default());
        let _ = fs::remove_file(&path);

        assert_eq!(
            SandboxConfig::load_from_path(Path::new("definitely/missing.toml")),
            SandboxConfig::default()
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = std::env::temp_dir().join(format!(
            "mdsandbox_config_{}/sandbox.toml",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut cfg = SandboxConfig::default();
        cfg.world.seed = 7;
        cfg.day_night.start_time = 0.5;
        cfg.save_to_path(&path).expect("save config");
        assert_eq!(SandboxConfig::load_from_path(&path), cfg);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn shipped_config_parses() {
        let contents = include_str!("../config/sandbox.toml");
        let cfg = SandboxConfig::parse(contents).expect("shipped config parses");
        assert_eq!(cfg.game_config().width, 300);
    }
}
