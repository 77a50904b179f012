use glam::Vec2;

/// Axis-aligned box owned by a body.
///
/// `position` is local to the owning body; the engine produces a world-space
/// copy (via [`Aabb::translated`]) before running any geometric test. A
/// disabled box takes no part in collision or region detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub position: Vec2,
    pub size: Vec2,
    pub enabled: bool,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            enabled: true,
        }
    }
}

impl Aabb {
    /// Negative size components are clamped to zero.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size: size.max(Vec2::ZERO),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.half_size()
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// Same box, shifted by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
    }
}
