//! Platformer - authoritative physics server
//!
//! Loads configuration and a scene description, then drives the
//! `platformer_physics` step at a fixed tick rate.

pub mod config;
pub mod scene;
pub mod simulation;
