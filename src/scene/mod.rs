//! Scene construction utilities
//!
//! This module provides a declarative API for populating a physics world,
//! either fluently from code or from `[[scene.bodies]]` entries in the
//! configuration.

mod scene_builder;
mod template;

pub use scene_builder::{EntityId, Scene, SceneBuilder, SceneEntity};
pub use template::{BodyTemplate, SceneError};
