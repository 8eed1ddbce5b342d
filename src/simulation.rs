//! Fixed-tick simulation
//!
//! Drives a [`Scene`] one tick at a time:
//! - Physics stepping
//! - Gameplay reactions to contacts (pickups, stomps)
//! - Purging destroyed bodies

use platformer_physics::{BodyKey, CollisionDispatcher, CollisionGroup, Contactant};

use crate::scene::{EntityId, Scene};

/// Result of a single tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Dynamic bodies resting on static geometry after the tick
    pub grounded: usize,
    /// Entities removed from the world at the end of the tick
    pub purged: Vec<EntityId>,
}

/// Runs a scene at a fixed timestep
pub struct Simulation {
    scene: Scene,
    delta: f32,
    tick: u64,
}

impl Simulation {
    /// Create a simulation stepping `delta` seconds per tick
    ///
    /// # Panics
    /// Panics if `delta` is not a positive finite number.
    pub fn new(scene: Scene, delta: f32) -> Self {
        assert!(delta.is_finite() && delta > 0.0, "tick delta must be positive, got {}", delta);
        Self { scene, delta, tick: 0 }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Run one tick
    pub fn step<D: CollisionDispatcher<EntityId>>(&mut self, dispatcher: &mut D) -> TickReport {
        self.tick += 1;
        self.scene.world.step(self.delta, dispatcher);

        let purged: Vec<EntityId> = self
            .scene
            .world
            .purge_destroyed()
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        for id in &purged {
            log::debug!(
                "tick {}: removed {}",
                self.tick,
                self.scene.name(*id).unwrap_or("<unnamed>")
            );
        }

        let grounded = self
            .scene
            .world
            .bodies()
            .filter(|(_, body)| body.is_on_ground())
            .count();

        TickReport {
            tick: self.tick,
            grounded,
            purged,
        }
    }

    /// Run `ticks` ticks, returning the report of each
    pub fn run<D: CollisionDispatcher<EntityId>>(&mut self, ticks: u32, dispatcher: &mut D) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step(dispatcher)).collect()
    }
}

/// Dispatcher implementing the demo's gameplay rules
///
/// - A `Player` touching a `Pickup` collects it.
/// - A `Player` landing on an `Enemy` stomps it.
///
/// Both remove the other body from the world.
pub struct GameplayDispatcher {
    names: Vec<String>,
    groups: Vec<CollisionGroup>,
    log_contacts: bool,
    removals: Vec<BodyKey>,
    collected: u32,
    stomped: u32,
}

impl GameplayDispatcher {
    /// Snapshot entity names and groups from `scene`
    pub fn for_scene(scene: &Scene, log_contacts: bool) -> Self {
        let mut names = Vec::with_capacity(scene.entities().len());
        let mut groups = Vec::with_capacity(scene.entities().len());
        for entity in scene.entities() {
            names.push(entity.name.clone());
            groups.push(
                scene
                    .world
                    .get_body(entity.key)
                    .map(|body| body.collision_group)
                    .unwrap_or_default(),
            );
        }
        Self {
            names,
            groups,
            log_contacts,
            removals: Vec::new(),
            collected: 0,
            stomped: 0,
        }
    }

    /// Pickups collected so far
    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// Enemies stomped so far
    pub fn stomped(&self) -> u32 {
        self.stomped
    }

    fn group(&self, id: EntityId) -> CollisionGroup {
        self.groups.get(id.0 as usize).copied().unwrap_or_default()
    }

    fn name(&self, id: EntityId) -> &str {
        self.names.get(id.0 as usize).map(String::as_str).unwrap_or("<unnamed>")
    }

    fn log(&self, what: &str, mover: Contactant<EntityId>, other: Contactant<EntityId>) {
        if self.log_contacts {
            log::debug!("{} {} {}", self.name(mover.user_data), what, self.name(other.user_data));
        }
    }

    fn try_collect(&mut self, mover: Contactant<EntityId>, other: Contactant<EntityId>) {
        if self.group(mover.user_data) == CollisionGroup::Player
            && self.group(other.user_data) == CollisionGroup::Pickup
            && !self.removals.contains(&other.key)
        {
            log::info!("{} collected {}", self.name(mover.user_data), self.name(other.user_data));
            self.collected += 1;
            self.removals.push(other.key);
        }
    }
}

impl CollisionDispatcher<EntityId> for GameplayDispatcher {
    fn on_touch_side(&mut self, mover: Contactant<EntityId>, other: Contactant<EntityId>) {
        self.log("touched", mover, other);
        self.try_collect(mover, other);
    }

    fn on_landed_on(&mut self, mover: Contactant<EntityId>, other: Contactant<EntityId>) {
        self.log("landed on", mover, other);
        self.try_collect(mover, other);

        if self.group(mover.user_data) == CollisionGroup::Player
            && self.group(other.user_data) == CollisionGroup::Enemy
            && !self.removals.contains(&other.key)
        {
            log::info!("{} stomped {}", self.name(mover.user_data), self.name(other.user_data));
            self.stomped += 1;
            self.removals.push(other.key);
        }
    }

    fn on_jumped_under(&mut self, mover: Contactant<EntityId>, other: Contactant<EntityId>) {
        self.log("jumped under", mover, other);
        self.try_collect(mover, other);
    }

    fn take_removals(&mut self) -> Vec<BodyKey> {
        std::mem::take(&mut self.removals)
    }
}
