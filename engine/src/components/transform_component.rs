use glam::Vec2;

use crate::handles::BodyHandle;

/// Local placement of a body. The global position is this offset composed with
/// every ancestor's local position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformComponent {
    pub position: Vec2,
    pub parent: Option<BodyHandle>,
}

impl TransformComponent {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            parent: None,
        }
    }
}
