//! Core engine types and utilities for OpenPhase.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Time management
//! - Common movement components

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
