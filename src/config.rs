//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`PLAT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use platformer_math::Vec2;
use platformer_physics::PhysicsConfig;

use crate::scene::BodyTemplate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSettings,
    /// Tick loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Bodies spawned at startup
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`PLAT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // PLAT_PHYSICS__WORLD_WIDTH=320 -> physics.world_width = 320
        figment = figment.merge(Env::prefixed("PLAT_").split("__"));

        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the physics step cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.world_width.is_finite() && physics.world_width > 0.0) {
            return Err(ConfigError::invalid(format!(
                "physics.world_width must be positive, got {}",
                physics.world_width
            )));
        }
        if !(physics.separation.is_finite() && physics.separation >= 0.0) {
            return Err(ConfigError::invalid(format!(
                "physics.separation must be non-negative, got {}",
                physics.separation
            )));
        }
        if !(physics.vertical_first_speed.is_finite() && physics.vertical_first_speed >= 0.0) {
            return Err(ConfigError::invalid(format!(
                "physics.vertical_first_speed must be non-negative, got {}",
                physics.vertical_first_speed
            )));
        }
        if !physics.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::invalid("physics.gravity must be finite"));
        }
        if self.simulation.tick_rate == 0 {
            return Err(ConfigError::invalid("simulation.tick_rate must be at least 1"));
        }
        Ok(())
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravity [x, y] (negative y = downward)
    pub gravity: [f32; 2],
    /// Viewport width used for horizontal wraparound
    pub world_width: f32,
    /// Vertical speed above which y is resolved before x
    pub vertical_first_speed: f32,
    /// Gap left between resolved bodies
    pub separation: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        let defaults = PhysicsConfig::default();
        Self {
            gravity: [defaults.gravity.x, defaults.gravity.y],
            world_width: defaults.world_width,
            vertical_first_speed: defaults.vertical_first_speed,
            separation: defaults.separation,
        }
    }
}

impl PhysicsSettings {
    /// Convert to the physics crate's configuration
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig::new(Vec2::from(self.gravity))
            .with_world_width(self.world_width)
            .with_vertical_first_speed(self.vertical_first_speed)
            .with_separation(self.separation)
    }
}

/// Tick loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per second
    pub tick_rate: u32,
    /// Number of ticks the headless run simulates
    pub ticks: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            ticks: 300,
        }
    }
}

impl SimulationConfig {
    /// Fixed tick length in seconds
    pub fn delta(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Scene configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub bodies: Vec<BodyTemplate>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log every contact notification
    pub log_contacts: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_contacts: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Error for a value that parsed but cannot be used
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.physics.gravity, [0.0, -60.0]);
        assert_eq!(config.physics.vertical_first_speed, 5.0);
        assert_eq!(config.simulation.tick_rate, 60);
        assert!(config.scene.bodies.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("world_width"));
        assert!(toml.contains("tick_rate"));
    }

    #[test]
    fn test_to_physics_config() {
        let settings = PhysicsSettings {
            gravity: [1.0, -9.0],
            world_width: 320.0,
            vertical_first_speed: 7.5,
            separation: 0.05,
        };
        let physics = settings.to_physics_config();
        assert_eq!(physics.gravity, Vec2::new(1.0, -9.0));
        assert_eq!(physics.world_width, 320.0);
        assert_eq!(physics.vertical_first_speed, 7.5);
        assert_eq!(physics.separation, 0.05);
    }

    #[test]
    fn test_validate_rejects_bad_physics() {
        let mut config = AppConfig::default();
        config.physics.world_width = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.physics.separation = -0.1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.physics.vertical_first_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.simulation.tick_rate = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tick_rate"));
    }

    #[test]
    fn test_partial_physics_section() {
        let config: AppConfig = toml::from_str("[physics]\ngravity = [0.0, -10.0]\n").unwrap();
        assert_eq!(config.physics.gravity, [0.0, -10.0]);
        assert_eq!(config.physics.world_width, 800.0);
        assert_eq!(config.physics.vertical_first_speed, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delta_from_tick_rate() {
        let sim = SimulationConfig { tick_rate: 50, ticks: 1 };
        assert!((sim.delta() - 0.02).abs() < 1e-6);
    }
}
