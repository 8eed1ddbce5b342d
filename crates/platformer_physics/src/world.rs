//! Physics world and simulation

use crate::body::{Body, BodyKey, StepContext};
use crate::collision::{LinearScan, Obstacle};
use crate::dispatch::CollisionDispatcher;
use crate::error::PhysicsError;
use platformer_math::Vec2;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration (negative y = down)
    ///
    /// A resting body only keeps ground contact every tick while
    /// `|gravity.y| * delta^2 > separation`.
    pub gravity: Vec2,
    /// Horizontal extent of the world; bodies crossing an edge collide
    /// against geometry on the opposite side
    pub world_width: f32,
    /// Vertical speed above which the vertical pass runs before the
    /// horizontal one
    pub vertical_first_speed: f32,
    /// Gap left between a resolved body and the obstacle it hit
    pub separation: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -60.0),
            world_width: 800.0,
            vertical_first_speed: 5.0,
            separation: 0.01,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    pub fn with_world_width(mut self, world_width: f32) -> Self {
        self.world_width = world_width;
        self
    }

    pub fn with_vertical_first_speed(mut self, speed: f32) -> Self {
        self.vertical_first_speed = speed;
        self
    }

    pub fn with_separation(mut self, separation: f32) -> Self {
        self.separation = separation;
        self
    }
}

/// The physics world containing all bodies
///
/// Bodies are updated one at a time in insertion order. Each update sees
/// every other body as it stands at that moment, so bodies updated earlier
/// in a tick present their already-moved positions to later ones.
pub struct PhysicsWorld<T> {
    /// All bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, Body<T>>,
    /// Update order
    order: Vec<BodyKey>,
    /// Obstacle snapshot rebuilt before each body update
    scratch: Vec<Obstacle<T>>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl<T: Copy> PhysicsWorld<T> {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            order: Vec::new(),
            scratch: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: Body<T>) -> BodyKey {
        let body_type = body.body_type();
        let key = self.bodies.insert(body);
        self.order.push(key);
        log::debug!("Added {:?} body {:?}", body_type, key);
        key
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<Body<T>> {
        let body = self.bodies.remove(key)?;
        self.order.retain(|k| *k != key);
        log::debug!("Removed body {:?}", key);
        Some(body)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&Body<T>> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut Body<T>> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world, destroyed ones included
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys in update order
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.order.iter().copied()
    }

    /// Iterate over all bodies in update order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body<T>)> + '_ {
        self.order.iter().map(move |key| (*key, &self.bodies[*key]))
    }

    /// Mark a body for removal
    ///
    /// The body becomes inert immediately but stays in the world until
    /// [`purge_destroyed`](Self::purge_destroyed) runs.
    pub fn destroy(&mut self, key: BodyKey) -> Result<(), PhysicsError> {
        let body = self.bodies.get_mut(key).ok_or(PhysicsError::BodyNotFound(key))?;
        body.destroy();
        Ok(())
    }

    /// Remove every destroyed body, returning each key with its user data
    pub fn purge_destroyed(&mut self) -> Vec<(BodyKey, T)> {
        let doomed: Vec<BodyKey> = self
            .order
            .iter()
            .copied()
            .filter(|key| self.bodies[*key].is_destroyed())
            .collect();

        let mut purged = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(body) = self.bodies.remove(key) {
                purged.push((key, body.user_data()));
            }
        }
        if !purged.is_empty() {
            self.order.retain(|key| self.bodies.contains_key(*key));
            log::debug!("Purged {} destroyed bodies", purged.len());
        }
        purged
    }

    /// Add to a body's velocity
    pub fn apply_impulse(&mut self, key: BodyKey, dx: f32, dy: f32) -> Result<(), PhysicsError> {
        let body = self.bodies.get_mut(key).ok_or(PhysicsError::BodyNotFound(key))?;
        body.apply_impulse(dx, dy);
        Ok(())
    }

    /// Step the physics simulation forward by `delta` seconds
    ///
    /// Updates every body once, in insertion order.
    pub fn step<D: CollisionDispatcher<T>>(&mut self, delta: f32, dispatcher: &mut D) {
        for index in 0..self.order.len() {
            let key = self.order[index];
            self.advance(key, delta, dispatcher);
        }
    }

    /// Update a single body against the current state of the world
    pub fn update_body<D: CollisionDispatcher<T>>(
        &mut self,
        key: BodyKey,
        delta: f32,
        dispatcher: &mut D,
    ) -> Result<(), PhysicsError> {
        if !self.bodies.contains_key(key) {
            log::warn!("Tried to update missing body {:?}", key);
            return Err(PhysicsError::BodyNotFound(key));
        }
        self.advance(key, delta, dispatcher);
        Ok(())
    }

    fn advance<D: CollisionDispatcher<T>>(&mut self, key: BodyKey, delta: f32, dispatcher: &mut D) {
        let collides = match self.bodies.get(key) {
            Some(body) => body.is_dynamic() && !body.is_destroyed(),
            None => return,
        };

        self.scratch.clear();
        if collides {
            for other in &self.order {
                if let Some(body) = self.bodies.get(*other) {
                    self.scratch.push(body.as_obstacle(*other));
                }
            }
        }

        let ctx = StepContext {
            key,
            config: &self.config,
        };
        let scan = LinearScan::new(&self.scratch);
        if let Some(body) = self.bodies.get_mut(key) {
            body.update(delta, &ctx, &scan, dispatcher);
        }

        for removed in dispatcher.take_removals() {
            if let Some(body) = self.bodies.get_mut(removed) {
                body.destroy();
            }
        }
    }
}

impl<T: Copy> Default for PhysicsWorld<T> {
    fn default() -> Self {
        Self::new()
    }
}
