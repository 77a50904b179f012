use bevy_ecs::{message::Messages, resource::Resource};

use crate::{
    handles::BodyHandle,
    physics::{
        collision::CollisionData,
        collision_event::{CollisionEvent, CollisionEventType, CollisionInfo},
    },
};

/// Events produced by the engine. Nothing is delivered until the owner drains
/// it, or forwards it into an ECS world with [`EventQueue::forward_to`].
#[derive(Resource, Default)]
pub struct EventQueue {
    messages: Messages<CollisionEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: CollisionEvent) {
        self.messages.write(event);
    }

    /// Queues a `Hit` for each participant, with the normal oriented toward the receiver.
    pub fn push_hit(&mut self, collision: &CollisionData) {
        for entity in [collision.collider_a, collision.collider_b] {
            self.push(CollisionEvent {
                entity,
                event_type: CollisionEventType::Hit,
                collision_info: Some(CollisionInfo {
                    normal: collision.normal_for(entity),
                    time: collision.time,
                    contact_position: collision.position,
                }),
                other_entity: collision.other(entity),
            });
        }
    }

    pub fn push_transition(
        &mut self,
        entity: BodyHandle,
        other_entity: BodyHandle,
        event_type: CollisionEventType,
    ) {
        self.push(CollisionEvent {
            entity,
            event_type,
            collision_info: None,
            other_entity,
        });
    }

    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        self.messages.drain().collect()
    }

    /// Moves every queued event into `target`, such as a `World`'s message resource.
    pub fn forward_to(&mut self, target: &mut Messages<CollisionEvent>) {
        target.write_batch(self.messages.drain());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
