use crate::{
    handles::BodyHandle,
    physics::{
        collision_event::CollisionEventType, collision_system::static_aabb,
        physics_system::PhysicsEngine,
    },
};

impl PhysicsEngine {
    /// Updates every region's overlap set from committed positions and queues
    /// `Enter` / `Exit` events on both sides of each transition.
    pub fn interact_regions(&mut self) {
        let regions = self.regions.clone();
        let others: Vec<BodyHandle> = self
            .regions
            .iter()
            .chain(self.rigid_bodies.iter())
            .copied()
            .collect();

        for &region in &regions {
            for &other in &others {
                if other == region {
                    continue;
                }
                let overlapping = self.overlaps(region, other);
                let was_inside = self
                    .bodies
                    .get(region)
                    .is_some_and(|body| body.is_inside(other));

                match (was_inside, overlapping) {
                    (false, true) => self.transition(region, other, CollisionEventType::Enter),
                    (true, false) => self.transition(region, other, CollisionEventType::Exit),
                    _ => {}
                }
            }
        }
    }

    /// Current overlap of two bodies under the same rules the sweep uses.
    fn overlaps(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
            return false;
        };
        if !body_a.is_collidable() || !body_b.is_collidable() {
            return false;
        }
        if !body_a.filter.interacts(&body_b.filter) {
            return false;
        }
        match (self.world_aabb(a), self.world_aabb(b)) {
            (Some(aabb_a), Some(aabb_b)) => static_aabb(&aabb_a, &aabb_b),
            _ => false,
        }
    }

    /// A region peer records its own side when its turn comes, so only rigid
    /// bodies are updated from here.
    fn transition(&mut self, region: BodyHandle, other: BodyHandle, kind: CollisionEventType) {
        let other_is_region = self
            .bodies
            .get(other)
            .is_some_and(|body| body.is_region());

        let mut sides = vec![(region, other)];
        if !other_is_region {
            sides.push((other, region));
        }

        for (entity, peer) in sides {
            let Some(body) = self.bodies.get_mut(entity) else {
                continue;
            };
            match kind {
                CollisionEventType::Exit => {
                    body.regions_inside.remove(&peer);
                }
                _ => {
                    body.regions_inside.insert(peer);
                }
            }
            log::debug!("{:?}: {} / {:?}", kind, body.name, peer);
            self.events.push_transition(entity, peer, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        components::collision_filter_component::CollisionFilter,
        handles::BodyHandle,
        physics::{
            body::PhysicsBody, collision_event::CollisionEventType,
            physics_system::PhysicsEngine,
        },
    };
    use glam::Vec2;

    fn count(engine: &mut PhysicsEngine, entity: BodyHandle, kind: CollisionEventType) -> usize {
        engine
            .drain_events()
            .into_iter()
            .filter(|event| event.entity == entity && event.event_type == kind)
            .count()
    }

    #[test]
    fn enter_then_exit_once_each() {
        let mut engine = PhysicsEngine::new();
        let trigger = engine.add_sprite(PhysicsBody::region("trigger", Vec2::ZERO, Vec2::splat(50.0)));
        let crate_body = engine.add_sprite(PhysicsBody::kinematic(
            "crate",
            Vec2::new(10.0, 10.0),
            Vec2::splat(10.0),
            Vec2::ZERO,
            true,
        ));

        engine.update(16.0).unwrap();
        let events = engine.drain_events();
        let enters: Vec<_> = events
            .iter()
            .filter(|e| e.event_type == CollisionEventType::Enter)
            .map(|e| (e.entity, e.other_entity))
            .collect();
        assert_eq!(enters, vec![(trigger, crate_body), (crate_body, trigger)]);
        assert_eq!(engine.regions_inside(trigger), vec![crate_body]);
        assert_eq!(engine.regions_inside(crate_body), vec![trigger]);

        // Steady overlap fires nothing.
        engine.update(16.0).unwrap();
        assert!(engine.drain_events().is_empty());

        engine.set_velocity(crate_body, Vec2::new(10.0, 0.0)).unwrap();
        engine.update(16.0).unwrap();
        assert_eq!(count(&mut engine, trigger, CollisionEventType::Exit), 1);
        assert!(engine.regions_inside(trigger).is_empty());
        assert!(engine.regions_inside(crate_body).is_empty());

        engine.update(16.0).unwrap();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn exit_is_queued_for_both_sides() {
        let mut engine = PhysicsEngine::new();
        let trigger = engine.add_sprite(PhysicsBody::region("trigger", Vec2::ZERO, Vec2::splat(50.0)));
        let crate_body = engine.add_sprite(PhysicsBody::kinematic(
            "crate",
            Vec2::new(10.0, 10.0),
            Vec2::splat(10.0),
            Vec2::ZERO,
            true,
        ));
        engine.update(16.0).unwrap();
        engine.drain_events();

        engine.set_velocity(crate_body, Vec2::new(10.0, 0.0)).unwrap();
        engine.update(16.0).unwrap();
        let exits: Vec<_> = engine
            .drain_events()
            .into_iter()
            .filter(|e| e.event_type == CollisionEventType::Exit)
            .map(|e| (e.entity, e.other_entity))
            .collect();
        assert_eq!(exits, vec![(trigger, crate_body), (crate_body, trigger)]);
    }

    #[test]
    fn overlapping_regions_each_record_the_other() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_sprite(PhysicsBody::region("a", Vec2::ZERO, Vec2::splat(20.0)));
        let b = engine.add_sprite(PhysicsBody::region("b", Vec2::new(10.0, 10.0), Vec2::splat(20.0)));

        engine.interact_regions();
        assert_eq!(engine.regions_inside(a), vec![b]);
        assert_eq!(engine.regions_inside(b), vec![a]);
        assert_eq!(count(&mut engine, a, CollisionEventType::Enter), 1);

        engine.interact_regions();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn masked_and_disabled_bodies_are_ignored() {
        let mut engine = PhysicsEngine::new();
        let trigger = engine.add_sprite(
            PhysicsBody::region("trigger", Vec2::ZERO, Vec2::splat(50.0))
                .with_filter(CollisionFilter::new(0b01, 0b01)),
        );
        engine.add_sprite(
            PhysicsBody::static_body("masked", Vec2::ZERO, Vec2::splat(10.0))
                .with_filter(CollisionFilter::new(0b10, 0b10)),
        );
        let disabled = engine.add_sprite(PhysicsBody::static_body("disabled", Vec2::ZERO, Vec2::splat(10.0)));
        if let Some(collider) = engine.body_mut(disabled).and_then(|body| body.collider.as_mut()) {
            collider.enabled = false;
        }

        engine.interact_regions();
        assert!(engine.regions_inside(trigger).is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn removed_bodies_leave_overlap_sets() {
        let mut engine = PhysicsEngine::new();
        let trigger = engine.add_sprite(PhysicsBody::region("trigger", Vec2::ZERO, Vec2::splat(50.0)));
        let wall = engine.add_sprite(PhysicsBody::static_body("wall", Vec2::ZERO, Vec2::splat(10.0)));
        engine.interact_regions();
        assert_eq!(engine.regions_inside(trigger), vec![wall]);

        engine.remove_sprite(wall);
        assert!(engine.regions_inside(trigger).is_empty());
    }
}
