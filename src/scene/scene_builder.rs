//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for populating a platformer world.

use platformer_math::Rect;
use platformer_physics::{Body, BodyKey, BodyType, PhysicsConfig, PhysicsWorld};

use super::template::{BodyTemplate, SceneError};

/// Index of an entity in its [`Scene`], stored as the body's user data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A named body in a scene
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEntity {
    pub name: String,
    pub key: BodyKey,
}

/// A built world together with the names of its bodies
pub struct Scene {
    pub world: PhysicsWorld<EntityId>,
    entities: Vec<SceneEntity>,
}

impl Scene {
    /// All entities, indexed by `EntityId`
    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(id.0 as usize)
    }

    /// Name of an entity, if it exists
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.entity(id).map(|e| e.name.as_str())
    }

    /// Look up a body key by entity name
    pub fn key(&self, name: &str) -> Option<BodyKey> {
        self.entities.iter().find(|e| e.name == name).map(|e| e.key)
    }

    /// The body registered under `name`, unless it has been purged
    pub fn body(&self, name: &str) -> Option<&Body<EntityId>> {
        self.key(name).and_then(|key| self.world.get_body(key))
    }
}

/// Builder for constructing platformer scenes
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new()
///     .with_physics(PhysicsConfig::default())
///     .add_floor("ground", 0.0, 800.0)
///     .add_body("player", Rect::new(10.0, 1.0, 1.0, 2.0), BodyType::Dynamic, |b| b)
///     .build();
/// ```
pub struct SceneBuilder {
    world: PhysicsWorld<EntityId>,
    entities: Vec<SceneEntity>,
}

impl SceneBuilder {
    /// Create a new scene builder with default physics
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(),
            entities: Vec::new(),
        }
    }

    /// Replace the physics configuration
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world.config = config;
        self
    }

    /// Add a one unit thick static floor whose top edge sits at `top`
    pub fn add_floor(self, name: &str, top: f32, width: f32) -> Self {
        self.add_body(name, Rect::new(0.0, top - 1.0, width, 1.0), BodyType::Static, |b| b)
    }

    /// Add a body, letting `configure` adjust it before insertion
    ///
    /// # Panics
    /// Panics if `bounds` has a negative or non-finite size, or if `name` is
    /// already taken. Use [`add_template`](Self::add_template) for input
    /// that should be rejected with an error instead.
    pub fn add_body<F>(mut self, name: &str, bounds: Rect, body_type: BodyType, configure: F) -> Self
    where
        F: FnOnce(Body<EntityId>) -> Body<EntityId>,
    {
        assert!(!self.contains(name), "duplicate body name: {}", name);
        let id = self.next_id();
        let body = configure(Body::new(bounds, body_type, id));
        self.insert(name.to_string(), body);
        self
    }

    /// Add a body described by a configuration template
    pub fn add_template(mut self, template: &BodyTemplate) -> Result<Self, SceneError> {
        if self.contains(&template.name) {
            return Err(SceneError::DuplicateName(template.name.clone()));
        }
        let id = self.next_id();
        let body = template.to_body(id)?;
        self.insert(template.name.clone(), body);
        Ok(self)
    }

    /// Build a scene from a physics configuration and a list of templates
    pub fn from_templates(config: PhysicsConfig, templates: &[BodyTemplate]) -> Result<Scene, SceneError> {
        let builder = templates
            .iter()
            .try_fold(Self::new().with_physics(config), |builder, t| builder.add_template(t))?;
        Ok(builder.build())
    }

    /// Number of bodies added so far
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn build(self) -> Scene {
        log::debug!("Built scene with {} bodies", self.entities.len());
        Scene {
            world: self.world,
            entities: self.entities,
        }
    }

    /// Whether a body named `name` has been added
    pub fn contains(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name == name)
    }

    fn next_id(&self) -> EntityId {
        EntityId(self.entities.len() as u32)
    }

    fn insert(&mut self, name: String, body: Body<EntityId>) {
        let key = self.world.add_body(body);
        self.entities.push(SceneEntity { name, key });
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
