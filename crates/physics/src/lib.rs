//! Physics and geometry queries for OpenPhase, built on Rapier3D.
//!
//! World units are centimeters (capsule half-heights around 88, probe
//! distances in the hundreds), so gravity and speeds are scaled accordingly.

pub mod collision;
pub mod physics_world;
pub mod queries;

pub use collision::CollisionGroup;
pub use physics_world::PhysicsWorld;
pub use queries::ProbeHit;
