//! First-person camera model: pose, look controls, and field of view.
//!
//! No projection math lives here; the shift ability animates `fov_degrees`
//! and whatever renders the world reads it.

use engine_core::Transform;
use glam::Vec3;

/// FPS camera with mouse look and a mutable field of view.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Radians of rotation per mouse count.
    pub sensitivity: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 70.0,
            sensitivity: 0.002,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Process mouse movement for FPS look controls.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * self.sensitivity;
        self.pitch -= delta_y * self.sensitivity;

        // Clamp pitch to prevent flipping
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.transform.rotation =
            glam::Quat::from_rotation_y(self.yaw) * glam::Quat::from_rotation_x(self.pitch);
    }

    /// Set yaw and pitch directly (in radians) and rebuild rotation.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = pitch.clamp(-max_pitch, max_pitch);
        self.transform.rotation =
            glam::Quat::from_rotation_y(self.yaw) * glam::Quat::from_rotation_x(self.pitch);
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Get current yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamps_short_of_vertical() {
        let mut cam = Camera::default();
        cam.process_mouse(0.0, -100_000.0);
        assert!(cam.pitch() < std::f32::consts::FRAC_PI_2);
        let f = cam.forward();
        // Still has some horizontal component
        assert!(f.x.abs() + f.z.abs() > 1e-4);
    }

    #[test]
    fn yaw_half_turn_reverses_forward() {
        let mut cam = Camera::default();
        cam.set_yaw_pitch(std::f32::consts::PI, 0.0);
        assert!((cam.forward() - Vec3::Z).length() < 1e-4);
    }
}
