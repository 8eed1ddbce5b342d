//! Serializable body descriptions

use std::fmt;

use serde::{Deserialize, Serialize};

use platformer_math::{Rect, Vec2};
use platformer_physics::{Body, BodyType, CollisionGroup};

/// A body as written in the scene configuration
///
/// ```toml
/// [[scene.bodies]]
/// name = "player"
/// kind = "dynamic"
/// rect = [10.0, 40.0, 1.0, 2.0]
/// group = "player"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: BodyType,
    /// [x, y, width, height], bottom-left anchored
    pub rect: [f32; 4],
    #[serde(default)]
    pub velocity: [f32; 2],
    /// [x, y] restitution
    #[serde(default)]
    pub restitution: [f32; 2],
    #[serde(default = "default_gravity_scale")]
    pub gravity_scale: f32,
    #[serde(default)]
    pub x_damping: f32,
    #[serde(default)]
    pub group: CollisionGroup,
}

fn default_gravity_scale() -> f32 {
    1.0
}

impl BodyTemplate {
    /// Template for a static box
    pub fn fixed(name: impl Into<String>, rect: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            kind: BodyType::Static,
            rect,
            velocity: [0.0, 0.0],
            restitution: [0.0, 0.0],
            gravity_scale: default_gravity_scale(),
            x_damping: 0.0,
            group: CollisionGroup::All,
        }
    }

    pub fn bounds(&self) -> Rect {
        let [x, y, width, height] = self.rect;
        Rect::new(x, y, width, height)
    }

    /// Build the physics body, attaching `user_data`
    pub fn to_body<T: Copy>(&self, user_data: T) -> Result<Body<T>, SceneError> {
        let bounds = self.bounds();
        if !bounds.is_well_formed() {
            return Err(SceneError::InvalidBounds {
                name: self.name.clone(),
                rect: self.rect,
            });
        }
        if !Vec2::from(self.velocity).is_finite() {
            return Err(SceneError::InvalidVelocity(self.name.clone()));
        }

        let body = Body::new(bounds, self.kind, user_data)
            .with_velocity(Vec2::from(self.velocity))
            .with_restitution(self.restitution[0], self.restitution[1])
            .with_gravity_scale(self.gravity_scale)
            .with_x_damping(self.x_damping)
            .with_group(self.group);
        Ok(body)
    }
}

/// Error type for scene construction
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Negative or non-finite rectangle
    InvalidBounds { name: String, rect: [f32; 4] },
    /// Non-finite starting velocity
    InvalidVelocity(String),
    /// Two bodies share a name
    DuplicateName(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidBounds { name, rect } => {
                write!(f, "Body '{}' has invalid bounds {:?}", name, rect)
            }
            SceneError::InvalidVelocity(name) => write!(f, "Body '{}' has a non-finite velocity", name),
            SceneError::DuplicateName(name) => write!(f, "Duplicate body name: {}", name),
        }
    }
}

impl std::error::Error for SceneError {}
