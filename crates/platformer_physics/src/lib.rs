//! 2D platformer physics for the authoritative game server
//!
//! This crate provides the per-tick body update used by the server:
//! - Velocity integration with gravity and horizontal damping
//! - Axis-separated collision resolution against axis-aligned boxes
//! - Collision-group filtering and ground detection
//! - Horizontal world wraparound
//! - Contact notifications through a dispatcher trait

pub mod body;
pub mod collision;
pub mod dispatch;
pub mod error;
pub mod world;

// Re-export commonly used types
pub use body::{Body, BodyKey, BodyType, StepContext};
pub use collision::{should_collide, BroadPhase, CollisionGroup, ContactSides, LinearScan, Obstacle};
pub use dispatch::{CollisionDispatcher, ContactEvent, ContactKind, ContactLog, Contactant, NoopDispatcher};
pub use error::PhysicsError;
pub use world::{PhysicsConfig, PhysicsWorld};
