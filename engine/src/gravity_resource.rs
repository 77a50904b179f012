use bevy_ecs::resource::Resource;
use glam::Vec2;

/// Engine-wide gravity. The engine never integrates it itself; consumers read it
/// and fold it into a body's velocity before each tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub gravity_normal: Vec2,
    pub gravity_magnitude: f32,
}

impl Default for Gravity {
    fn default() -> Self {
        // Screen space: +y points down.
        Self {
            gravity_normal: Vec2::Y,
            gravity_magnitude: 0.0072,
        }
    }
}

impl Gravity {
    /// Falls back to straight down for a zero direction.
    pub fn new(gravity_direction: Vec2, gravity_magnitude: f32) -> Self {
        Self {
            gravity_normal: gravity_direction.try_normalize().unwrap_or(Vec2::Y),
            gravity_magnitude,
        }
    }

    pub fn gravity_vector(&self) -> Vec2 {
        self.gravity_normal * self.gravity_magnitude
    }

    pub fn up(&self) -> Vec2 {
        -self.gravity_normal
    }
}
