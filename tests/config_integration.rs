//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables,
//! and that the shipped scene builds and runs.

use std::fs;
use std::path::PathBuf;

use platformer::config::AppConfig;
use platformer::scene::SceneBuilder;
use platformer::simulation::{GameplayDispatcher, Simulation};
use platformer_physics::{BodyType, CollisionGroup};
use serial_test::serial;

/// Fresh scratch directory for config files
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("platformer-config-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ==================== Environment ====================

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("PLAT_PHYSICS__WORLD_WIDTH", "320.0");
    let config = AppConfig::load();
    std::env::remove_var("PLAT_PHYSICS__WORLD_WIDTH");

    assert_eq!(config.unwrap().physics.world_width, 320.0);
}

#[test]
#[serial]
fn test_env_override_invalid_value_rejected() {
    std::env::set_var("PLAT_SIMULATION__TICK_RATE", "0");
    let config = AppConfig::load();
    std::env::remove_var("PLAT_SIMULATION__TICK_RATE");

    let err = config.unwrap_err();
    assert!(err.to_string().contains("tick_rate"));
}

// ==================== Files ====================

#[test]
#[serial]
fn test_default_config_file() {
    let config = AppConfig::load().unwrap();

    assert_eq!(config.physics.gravity, [0.0, -60.0]);
    assert_eq!(config.simulation.tick_rate, 60);

    let player = config
        .scene
        .bodies
        .iter()
        .find(|b| b.name == "player")
        .expect("default scene has a player");
    assert_eq!(player.kind, BodyType::Dynamic);
    assert_eq!(player.group, CollisionGroup::Player);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    fs::write(
        dir.join("default.toml"),
        "[physics]\nworld_width = 400.0\nseparation = 0.02\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[physics]\nworld_width = 200.0\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.physics.world_width, 200.0);
    assert_eq!(config.physics.separation, 0.02);
    // Untouched sections keep their defaults
    assert_eq!(config.debug.log_level, "info");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_partial_sections_fill_in_defaults() {
    let dir = scratch_dir("partial");
    fs::write(
        dir.join("default.toml"),
        "[physics]\ngravity = [0.0, -30.0]\n\n[simulation]\nticks = 10\n\n[debug]\nlog_contacts = true\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.physics.gravity, [0.0, -30.0]);
    assert_eq!(config.physics.world_width, 800.0);
    assert_eq!(config.physics.separation, 0.01);
    assert_eq!(config.simulation.ticks, 10);
    assert_eq!(config.simulation.tick_rate, 60);
    assert!(config.debug.log_contacts);
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_partial_section_reaches_validation() {
    let dir = scratch_dir("partial-invalid");
    fs::write(dir.join("default.toml"), "[physics]\nworld_width = -5.0\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    fs::remove_dir_all(&dir).unwrap();

    assert!(err.to_string().contains("physics.world_width must be positive"));
    assert!(!err.to_string().contains("missing field"));
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let dir = std::env::temp_dir().join("platformer-config-does-not-exist");
    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.physics.world_width, 800.0);
    assert!(config.scene.bodies.is_empty());
}

#[test]
#[serial]
fn test_invalid_file_value_rejected() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("default.toml"), "[physics]\nseparation = -1.0\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().contains("physics.separation must be non-negative"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_malformed_file_rejected() {
    let dir = scratch_dir("malformed");
    fs::write(dir.join("default.toml"), "[physics]\nworld_width = \"wide\"\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));

    fs::remove_dir_all(&dir).unwrap();
}

// ==================== Scene ====================

#[test]
#[serial]
fn test_scene_from_file() {
    let dir = scratch_dir("scene");
    fs::write(
        dir.join("default.toml"),
        r#"
[physics]
gravity = [0.0, -60.0]

[[scene.bodies]]
name = "ground"
rect = [0.0, -1.0, 50.0, 1.0]

[[scene.bodies]]
name = "box"
kind = "dynamic"
rect = [10.0, 2.0, 1.0, 1.0]
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    let scene = SceneBuilder::from_templates(config.physics.to_physics_config(), &config.scene.bodies).unwrap();
    let mut simulation = Simulation::new(scene, config.simulation.delta());
    let mut dispatcher = GameplayDispatcher::for_scene(simulation.scene(), false);
    simulation.run(60, &mut dispatcher);

    let body = simulation.scene().body("box").unwrap();
    assert!(body.is_on_ground());
    assert!((body.bounds.y - 0.01).abs() < 0.02);
}

#[test]
#[serial]
fn test_default_scene_runs() {
    let config = AppConfig::load().unwrap();
    let scene = SceneBuilder::from_templates(config.physics.to_physics_config(), &config.scene.bodies).unwrap();
    let count = scene.entities().len();

    let mut dispatcher = GameplayDispatcher::for_scene(&scene, false);
    let mut simulation = Simulation::new(scene, config.simulation.delta());
    let reports = simulation.run(config.simulation.ticks, &mut dispatcher);

    assert_eq!(reports.len(), config.simulation.ticks as usize);
    let purged: usize = reports.iter().map(|r| r.purged.len()).sum();
    assert_eq!(simulation.scene().world.body_count() + purged, count);
}
