//! Fire-and-forget debug draw hooks.
//!
//! The probe pipeline narrates every query it makes through this trait.
//! Draws are cosmetic: implementations must not feed anything back into
//! gameplay.

use engine_core::Vec3;

/// Sink for per-frame debug shapes.
pub trait DebugDraw {
    fn line(&mut self, from: Vec3, to: Vec3, tag: &str);
    fn sphere(&mut self, center: Vec3, radius: f32, tag: &str);
}

/// Routes debug shapes to the log at trace level.
pub struct LogDraw;

impl DebugDraw for LogDraw {
    fn line(&mut self, from: Vec3, to: Vec3, tag: &str) {
        log::trace!(target: "debug_draw", "line [{}] {:?} -> {:?}", tag, from, to);
    }

    fn sphere(&mut self, center: Vec3, radius: f32, tag: &str) {
        log::trace!(target: "debug_draw", "sphere [{}] {:?} r={}", tag, center, radius);
    }
}

/// Discards everything. Used by tests.
pub struct NullDraw;

impl DebugDraw for NullDraw {
    fn line(&mut self, _from: Vec3, _to: Vec3, _tag: &str) {}
    fn sphere(&mut self, _center: Vec3, _radius: f32, _tag: &str) {}
}
