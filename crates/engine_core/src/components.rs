//! Common movement components shared across the engine.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }

    /// Speed on the horizontal plane, ignoring vertical motion.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.linear.x, 0.0, self.linear.z).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_speed_ignores_y() {
        let v = Velocity::new(Vec3::new(3.0, 100.0, 4.0));
        assert!((v.horizontal_speed() - 5.0).abs() < 1e-5);
    }
}
