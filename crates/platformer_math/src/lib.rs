//! 2D Mathematics Library
//!
//! Geometry primitives used by the platformer physics step.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Rect`] - Axis-aligned rectangle anchored at its bottom-left corner

mod vec2;
pub mod rect;

pub use vec2::Vec2;
pub use rect::Rect;
