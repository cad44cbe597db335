//! Timed interpolation for the shift: position travel with an FOV punch,
//! then an independent FOV decay back to baseline.

use engine_core::Vec3;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One frame of transition output.
#[derive(Debug, Clone, Copy)]
pub struct TransitionFrame {
    pub position: Vec3,
    pub fov: f32,
    pub finished: bool,
}

/// In-flight shift: interpolates position and field of view over `duration`
/// seconds. Both land exactly on their targets at completion.
#[derive(Debug, Clone)]
pub struct ShiftTransition {
    origin: Vec3,
    destination: Vec3,
    elapsed: f32,
    duration: f32,
    fov_baseline: f32,
    fov_peak: f32,
}

impl ShiftTransition {
    pub fn new(
        origin: Vec3,
        destination: Vec3,
        duration: f32,
        fov_baseline: f32,
        fov_peak: f32,
    ) -> Self {
        Self {
            origin,
            destination,
            elapsed: 0.0,
            duration,
            fov_baseline,
            fov_peak,
        }
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    /// Advance by `dt` and produce this frame's position and FOV.
    pub fn advance(&mut self, dt: f32) -> TransitionFrame {
        self.elapsed += dt;
        let alpha = (self.elapsed / self.duration).min(1.0);
        TransitionFrame {
            position: self.origin.lerp(self.destination, alpha),
            fov: lerp(self.fov_baseline, self.fov_peak, alpha),
            finished: self.elapsed >= self.duration,
        }
    }
}

/// FOV decay after a shift: blends from the attained FOV back to baseline
/// over twice the shift duration, snapping exactly at the end.
#[derive(Debug, Clone)]
pub struct FovReturn {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl FovReturn {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    /// Advance by `dt`; returns the FOV for this frame and whether the decay
    /// has completed.
    pub fn advance(&mut self, dt: f32) -> (f32, bool) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return (self.to, true);
        }
        let alpha = self.elapsed / self.duration;
        (lerp(self.from, self.to, alpha), false)
    }
}
