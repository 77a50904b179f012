use bevy_ecs::message::Message;
use glam::Vec2;

use crate::handles::BodyHandle;

/// Written to the engine's `Messages<CollisionEvent>` queue.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub entity: BodyHandle,
    pub event_type: CollisionEventType,
    pub collision_info: Option<CollisionInfo>,
    pub other_entity: BodyHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub normal: Vec2,           // Direction from the other entity toward this one
    pub time: f32,              // Fraction of the tick at contact
    pub contact_position: Vec2, // Collider position of the mover at contact
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventType {
    /// Two rigid bodies collided during a tick.
    Hit,
    /// A region started overlapping another body.
    Enter,
    /// A region stopped overlapping another body.
    Exit,
}
