//! Platformer - headless physics simulation
//!
//! Loads the configured scene, runs it for a fixed number of ticks and logs
//! where every body ended up.

use platformer::config::AppConfig;
use platformer::scene::SceneBuilder;
use platformer::simulation::{GameplayDispatcher, Simulation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    env_logger::Builder::new()
        .parse_filters(&config.debug.log_level)
        .init();

    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let scene = SceneBuilder::from_templates(config.physics.to_physics_config(), &config.scene.bodies)?;
    log::info!(
        "Loaded scene with {} bodies, running {} ticks at {} Hz",
        scene.entities().len(),
        config.simulation.ticks,
        config.simulation.tick_rate
    );

    let mut dispatcher = GameplayDispatcher::for_scene(&scene, config.debug.log_contacts);
    let mut simulation = Simulation::new(scene, config.simulation.delta());

    for _ in 0..config.simulation.ticks {
        let report = simulation.step(&mut dispatcher);
        if !report.purged.is_empty() {
            log::debug!("tick {}: {} bodies removed", report.tick, report.purged.len());
        }
    }

    let scene = simulation.scene();
    for (_, body) in scene.world.bodies() {
        let name = scene.name(body.user_data()).unwrap_or("<unnamed>");
        let position = body.position();
        let velocity = body.velocity();
        log::info!(
            "{:<12} pos=({:8.3}, {:8.3}) vel=({:7.3}, {:7.3}) grounded={}",
            name,
            position.x,
            position.y,
            velocity.x,
            velocity.y,
            body.is_on_ground()
        );
    }
    log::info!(
        "Finished after {} ticks: {} collected, {} stomped",
        simulation.tick(),
        dispatcher.collected(),
        dispatcher.stomped()
    );

    Ok(())
}
