use bevy_ecs::{message::Messages, resource::Resource};
use glam::Vec2;
use slotmap::SlotMap;

use crate::{
    axis::Axis,
    components::aabb_component::Aabb,
    gravity_resource::Gravity,
    handles::BodyHandle,
    physics::{
        body::PhysicsBody,
        collision::{CollisionData, CollisionResolutionData},
        collision_event::CollisionEvent,
        collision_event_dispatcher::EventQueue,
        collision_system::{SweepBody, broad_box, get_dist, minkowski_swept_aabb, static_aabb},
        physics_error::PhysicsError,
        physics_resource::{PhysicsFrameData, TickPhase, WorkingState},
        resolution_system::{Participant, resolve_collision},
    },
    settings::PhysicsSettings,
    utils::scope_timer::ScopeTimer,
};

/// Owns every registered body and runs detection, resolution and the region pass.
#[derive(Resource)]
pub struct PhysicsEngine {
    pub(crate) bodies: SlotMap<BodyHandle, PhysicsBody>,
    // Registration order, which fixes processing order.
    pub(crate) regions: Vec<BodyHandle>,
    pub(crate) rigid_bodies: Vec<BodyHandle>,
    settings: PhysicsSettings,
    gravity: Gravity,
    pub(crate) events: EventQueue,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::with_settings(PhysicsSettings::default())
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PhysicsSettings) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            regions: Vec::new(),
            rigid_bodies: Vec::new(),
            gravity: settings.gravity(),
            settings,
            events: EventQueue::default(),
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Gravity magnitude. The engine never applies it; consumers fold it into velocities.
    pub fn get_gravity(&self) -> f32 {
        self.gravity.gravity_magnitude
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drops every body and any undelivered events.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.regions.clear();
        self.rigid_bodies.clear();
        self.events.clear();
    }

    /// Registers `body` and, recursively, every child it was built with.
    pub fn add_sprite(&mut self, mut body: PhysicsBody) -> BodyHandle {
        let children = std::mem::take(&mut body.children);
        let is_region = body.is_region();
        if body.collider.is_none() {
            log::warn!("Registering {} without a collider", body.name);
        }

        let handle = self.bodies.insert_with_key(|handle| {
            body.handle = Some(handle);
            body
        });
        if is_region {
            self.regions.push(handle);
        } else {
            self.rigid_bodies.push(handle);
        }

        for mut child in children {
            child.transform.parent = Some(handle);
            self.add_sprite(child);
        }
        handle
    }

    pub fn add_sprites(&mut self, bodies: impl IntoIterator<Item = PhysicsBody>) -> Vec<BodyHandle> {
        bodies.into_iter().map(|body| self.add_sprite(body)).collect()
    }

    /// Unregisters `handle` together with every body parented under it.
    pub fn remove_sprite(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        if !self.bodies.contains_key(handle) {
            log::warn!("Tried to remove unknown body {:?}", handle);
            return None;
        }

        let mut doomed = vec![handle];
        let mut index = 0;
        while let Some(&parent) = doomed.get(index) {
            doomed.extend(
                self.bodies
                    .iter()
                    .filter(|(_, body)| body.transform.parent == Some(parent))
                    .map(|(child, _)| child),
            );
            index += 1;
        }

        self.regions.retain(|h| !doomed.contains(h));
        self.rigid_bodies.retain(|h| !doomed.contains(h));
        for (_, body) in self.bodies.iter_mut() {
            body.regions_inside.retain(|h| !doomed.contains(h));
        }

        let mut removed = None;
        for h in doomed {
            let body = self.bodies.remove(h);
            if h == handle {
                removed = body;
            }
        }
        removed
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.bodies.iter()
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(PhysicsBody::velocity)
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody)?;
        if body.set_velocity(velocity) {
            Ok(())
        } else {
            Err(PhysicsError::UnsupportedCollider {
                name: body.name.clone(),
            })
        }
    }

    /// Handles of the regions (or bodies, for a region) currently overlapping `handle`.
    pub fn regions_inside(&self, handle: BodyHandle) -> Vec<BodyHandle> {
        self.bodies
            .get(handle)
            .map(|body| body.regions_inside().collect())
            .unwrap_or_default()
    }

    /// Local position composed with every ancestor's local position.
    pub fn global_position(&self, handle: BodyHandle) -> Option<Vec2> {
        let mut body = self.bodies.get(handle)?;
        let mut position = body.transform.position;
        // Bounded walk, a hand-edited parent cycle must not hang the engine.
        for _ in 0..self.bodies.len() {
            let Some(parent) = body.transform.parent.and_then(|p| self.bodies.get(p)) else {
                break;
            };
            position += parent.transform.position;
            body = parent;
        }
        Some(position)
    }

    pub fn set_global_position(&mut self, handle: BodyHandle, position: Vec2) -> Result<(), PhysicsError> {
        let parent = self
            .bodies
            .get(handle)
            .ok_or(PhysicsError::UnknownBody)?
            .transform
            .parent;
        let parent_position = parent
            .and_then(|p| self.global_position(p))
            .unwrap_or(Vec2::ZERO);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.transform.position = position - parent_position;
        }
        Ok(())
    }

    /// World-space collider of `handle`, if it has one.
    pub fn world_aabb(&self, handle: BodyHandle) -> Option<Aabb> {
        let collider = self.bodies.get(handle)?.collider?;
        Some(collider.translated(self.global_position(handle)?))
    }

    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        self.events.drain()
    }

    /// Moves pending events into an ECS world's message queue instead of returning them.
    pub fn forward_events(&mut self, target: &mut Messages<CollisionEvent>) {
        self.events.forward_to(target);
    }

    /// Advances every kinematic body by `dt`, then runs the region pass.
    ///
    /// On error the tick is abandoned: no body position or velocity changes and
    /// none of the tick's hits are logged or queued.
    pub fn update(&mut self, dt: f32) -> Result<(), PhysicsError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        let _timer = ScopeTimer::new("physics update", self.bodies.len());

        for &handle in &self.rigid_bodies {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.reset_frame_collisions();
            }
        }

        let mut frame = PhysicsFrameData::new(dt);
        let order = self.kinematic_order();
        log::debug!("Physics update dt={} over {} kinematic bodies", dt, order.len());

        for handle in order {
            self.sweep(&mut frame, handle)?;
        }
        self.commit(&mut frame)?;
        self.interact_regions();
        Ok(())
    }

    /// Pushable kinematic bodies first, then unpushable ones, each in registration order.
    fn kinematic_order(&self) -> Vec<BodyHandle> {
        let (pushable, unpushable): (Vec<BodyHandle>, Vec<BodyHandle>) = self
            .rigid_bodies
            .iter()
            .copied()
            .filter(|&h| self.bodies.get(h).is_some_and(PhysicsBody::is_kinematic))
            .partition(|&h| {
                self.bodies
                    .get(h)
                    .and_then(PhysicsBody::mobility)
                    .is_some_and(|mobility| mobility.is_pushable())
            });
        pushable.into_iter().chain(unpushable).collect()
    }

    fn state(&self, frame: &PhysicsFrameData, handle: BodyHandle) -> Option<WorkingState> {
        if let Some(state) = frame.working_state(handle) {
            return Some(state);
        }
        Some(WorkingState {
            position: self.global_position(handle)?,
            velocity: self.bodies.get(handle)?.velocity(),
        })
    }

    /// Snapshot for the sweep test, or `None` for bodies that cannot collide.
    fn sweep_body(&self, frame: &PhysicsFrameData, handle: BodyHandle) -> Option<SweepBody> {
        let body = self.bodies.get(handle)?;
        let collider = body.collider.filter(|collider| collider.enabled)?;
        let mobility = body.mobility()?;
        let state = self.state(frame, handle)?;
        Some(SweepBody {
            handle,
            aabb: collider.translated(state.position),
            velocity: state.velocity,
            mobility,
        })
    }

    /// Nearest valid collision for `mover` from its current working state.
    ///
    /// Candidates pass the filter and relative-velocity broad-phase tests, then
    /// rank by mobility class and distance. Only the top-ranked candidate gets
    /// the exact sweep; if that misses there is no collision this pass.
    pub(crate) fn check_collisions(
        &self,
        frame: &PhysicsFrameData,
        mover: BodyHandle,
        last_partner: Option<BodyHandle>,
    ) -> Option<CollisionData> {
        let dt = frame.delta_time;
        let mover_body = self.bodies.get(mover)?;
        let a = self.sweep_body(frame, mover)?;

        let mut candidates: Vec<(u8, f32, SweepBody)> = Vec::new();
        for &handle in &self.rigid_bodies {
            if handle == mover
                || Some(handle) == last_partner
                || frame.already_resolved(mover, handle)
            {
                continue;
            }
            let Some(other) = self.bodies.get(handle) else {
                continue;
            };
            if !mover_body.filter.interacts(&other.filter) {
                continue;
            }
            let Some(b) = self.sweep_body(frame, handle) else {
                continue;
            };
            if !static_aabb(&broad_box(&a.aabb, a.velocity - b.velocity, dt), &b.aabb) {
                continue;
            }
            candidates.push((
                b.mobility.precedence(),
                get_dist(&a.aabb, &b.aabb, a.velocity),
                b,
            ));
        }

        candidates.sort_by(|x, y| x.0.cmp(&y.0).then(x.1.total_cmp(&y.1)));
        log::trace!(
            "{} has {} collision candidates",
            mover_body.name,
            candidates.len()
        );

        let (_, _, nearest) = candidates.first()?;
        minkowski_swept_aabb(&a, nearest, dt).filter(|collision| collision.normal != Vec2::ZERO)
    }

    fn participant<'a>(
        &'a self,
        frame: &PhysicsFrameData,
        handle: BodyHandle,
    ) -> Result<Participant<'a>, PhysicsError> {
        let body = self.bodies.get(handle).ok_or(PhysicsError::UnknownBody)?;
        let unsupported = || PhysicsError::UnsupportedCollider {
            name: body.name.clone(),
        };
        let sweep = self.sweep_body(frame, handle).ok_or_else(unsupported)?;
        let offset = body.collider.ok_or_else(unsupported)?.position;
        Ok(Participant {
            name: &body.name,
            sweep,
            offset,
        })
    }

    /// Collide-and-slide for one kinematic body. All trial placements live in
    /// `frame` and are discarded before returning.
    fn sweep(&mut self, frame: &mut PhysicsFrameData, mover: BodyHandle) -> Result<(), PhysicsError> {
        let dt = frame.delta_time;
        frame.advance(mover, TickPhase::Detecting);

        let mut last_partner = None;
        let mut collision = self.check_collisions(frame, mover, last_partner);

        if collision.is_none() {
            let state = self.state(frame, mover).ok_or(PhysicsError::UnknownBody)?;
            let mobility = self
                .bodies
                .get(mover)
                .and_then(PhysicsBody::mobility)
                .ok_or(PhysicsError::UnknownBody)?;
            frame.record(
                mover,
                CollisionResolutionData::free_move(
                    mover,
                    mobility,
                    state.position + state.velocity * dt,
                    state.velocity,
                ),
            );
        }

        for _ in 0..self.settings.max_slide_iterations {
            let Some(current) = collision else {
                break;
            };
            frame.advance(mover, TickPhase::Resolving);

            let a = self.participant(frame, current.collider_a)?;
            let b = self.participant(frame, current.collider_b)?;
            let resolution = resolve_collision(frame, &current, &a, &b)?;
            log::trace!(
                "{} hit {} at t={} normal={}",
                a.name,
                b.name,
                current.time,
                current.normal
            );

            frame.record(current.collider_a, resolution.clone());
            frame.record(current.collider_b, resolution.clone());

            frame.record_hit(current);

            // Rewind each participant by one tick of its new velocity, so the
            // next sweep covers exactly the motion that ends at its final placement.
            for handle in [current.collider_a, current.collider_b] {
                if let Ok((position, velocity)) = resolution.finals_for(handle) {
                    frame.set_working_state(
                        handle,
                        WorkingState {
                            position: position - velocity * dt,
                            velocity,
                        },
                    );
                }
            }

            last_partner = Some(current.collider_b);
            frame.advance(mover, TickPhase::Detecting);
            collision = self.check_collisions(frame, mover, last_partner);
        }

        frame.advance(mover, TickPhase::Committing);
        frame.restore_working_states();
        Ok(())
    }

    /// Applies every recorded resolution, strongest opponent and earliest contact
    /// first. Once an axis is settled by a collision, later entries cannot touch it.
    fn commit(&mut self, frame: &mut PhysicsFrameData) -> Result<(), PhysicsError> {
        let mut placements = Vec::new();

        for (handle, mut resolutions) in frame.take_resolutions() {
            let Some(body) = self.bodies.get(handle) else {
                continue;
            };
            if !body.is_kinematic() {
                continue;
            }

            resolutions.sort_by(|x, y| {
                x.opponent_precedence(handle)
                    .cmp(&y.opponent_precedence(handle))
                    .then(x.contact_time().total_cmp(&y.contact_time()))
            });

            let mut position = self.global_position(handle).ok_or(PhysicsError::UnknownBody)?;
            let mut velocity = body.velocity();
            let mut open = [true; 2];

            for resolution in &resolutions {
                let (final_position, final_velocity) =
                    resolution.finals_for(handle).map_err(|err| match err {
                        PhysicsError::IncompleteResolution { axis, .. } => {
                            PhysicsError::IncompleteResolution {
                                name: body.name.clone(),
                                axis,
                            }
                        }
                        other => other,
                    })?;

                for axis in Axis::ALL {
                    if open[axis.index()] {
                        position = axis.with_component(position, axis.component(final_position));
                        velocity = axis.with_component(velocity, axis.component(final_velocity));
                    }
                }

                if let Some(axis) = resolution.settled_axis() {
                    open[axis.index()] = false;
                }
                if open == [false; 2] {
                    break;
                }
            }

            placements.push((handle, position, velocity));
        }

        // Nothing is written back until every body's placement is known.
        for (handle, position, velocity) in placements {
            self.set_global_position(handle, position)?;
            if let Some(body) = self.bodies.get_mut(handle) {
                body.set_velocity(velocity);
            }
            frame.advance(handle, TickPhase::Committed);
        }

        for hit in frame.take_hits() {
            for handle in [hit.collider_a, hit.collider_b] {
                if let Some(body) = self.bodies.get_mut(handle) {
                    body.log_collision(hit);
                }
            }
            self.events.push_hit(&hit);
        }
        Ok(())
    }
}
