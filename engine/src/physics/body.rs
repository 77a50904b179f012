// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use glam::Vec2;
use std::collections::HashSet;

use crate::{
    components::{
        aabb_component::Aabb,
        collision_filter_component::CollisionFilter,
        physics_component::{BodyType, KinematicState, Mobility},
        transform_component::TransformComponent,
    },
    handles::BodyHandle,
    physics::collision::CollisionData,
};

pub const DEFAULT_FRICTION: f32 = 0.8;

/// One registered collision body: a region, a static body or a kinematic body.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub name: String,
    /// Set by the engine on registration.
    pub handle: Option<BodyHandle>,
    pub transform: TransformComponent,
    pub collider: Option<Aabb>,
    pub filter: CollisionFilter,
    pub body_type: BodyType,
    pub friction: f32,
    pub(crate) regions_inside: HashSet<BodyHandle>,
    pub(crate) last_frame_collisions: Vec<CollisionData>,
    /// Bodies registered together with this one, as its children.
    pub(crate) children: Vec<PhysicsBody>,
}

impl PhysicsBody {
    fn new(name: impl Into<String>, position: Vec2, body_type: BodyType) -> Self {
        Self {
            name: name.into(),
            handle: None,
            transform: TransformComponent::new(position),
            collider: None,
            filter: CollisionFilter::default(),
            body_type,
            friction: DEFAULT_FRICTION,
            regions_inside: HashSet::new(),
            last_frame_collisions: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An overlap-only body with a collider at its origin.
    pub fn region(name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self::new(name, position, BodyType::Region).with_collider(Aabb::new(Vec2::ZERO, size))
    }

    pub fn static_body(name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self::new(name, position, BodyType::Static).with_collider(Aabb::new(Vec2::ZERO, size))
    }

    pub fn kinematic(
        name: impl Into<String>,
        position: Vec2,
        size: Vec2,
        velocity: Vec2,
        pushable: bool,
    ) -> Self {
        Self::new(
            name,
            position,
            BodyType::Kinematic(KinematicState { velocity, pushable }),
        )
        .with_collider(Aabb::new(Vec2::ZERO, size))
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Non-positive values keep the current friction.
    pub fn with_friction(mut self, friction: f32) -> Self {
        if friction > 0.0 {
            self.friction = friction;
        } else {
            log::warn!(
                "Ignoring non-positive friction {} for {}",
                friction,
                self.name
            );
        }
        self
    }

    pub fn with_collider(mut self, collider: Aabb) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn without_collider(mut self) -> Self {
        self.collider = None;
        self
    }

    pub fn with_child(mut self, child: PhysicsBody) -> Self {
        self.children.push(child);
        self
    }

    pub fn mobility(&self) -> Option<Mobility> {
        self.body_type.mobility()
    }

    pub fn is_region(&self) -> bool {
        !self.body_type.is_rigid()
    }

    pub fn is_kinematic(&self) -> bool {
        matches!(self.body_type, BodyType::Kinematic(_))
    }

    pub fn velocity(&self) -> Vec2 {
        self.body_type.velocity()
    }

    /// Returns false for bodies that cannot move.
    pub fn set_velocity(&mut self, velocity: Vec2) -> bool {
        match &mut self.body_type {
            BodyType::Kinematic(state) => {
                state.velocity = velocity;
                true
            }
            _ => false,
        }
    }

    pub fn set_pushable(&mut self, pushable: bool) -> bool {
        match &mut self.body_type {
            BodyType::Kinematic(state) => {
                state.pushable = pushable;
                true
            }
            _ => false,
        }
    }

    /// Whether the collider takes part in detection at all.
    pub fn is_collidable(&self) -> bool {
        self.collider.is_some_and(|collider| collider.enabled)
    }

    pub fn frame_collisions(&self) -> &[CollisionData] {
        &self.last_frame_collisions
    }

    pub fn regions_inside(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.regions_inside.iter().copied()
    }

    pub fn is_inside(&self, other: BodyHandle) -> bool {
        self.regions_inside.contains(&other)
    }

    pub(crate) fn log_collision(&mut self, collision: CollisionData) {
        self.last_frame_collisions.push(collision);
    }

    pub(crate) fn reset_frame_collisions(&mut self) {
        self.last_frame_collisions.clear();
    }

    /// True when something collided with this body from below last tick,
    /// `up` being the direction away from the ground.
    pub fn is_on_ground(&self, up: Vec2) -> bool {
        self.ground_platform(up).is_some()
    }

    /// The body this one stood on last tick.
    pub fn ground_platform(&self, up: Vec2) -> Option<BodyHandle> {
        let handle = self.handle?;
        self.last_frame_collisions
            .iter()
            .find(|collision| collision.involves(handle) && collision.normal_for(handle) == up)
            .map(|collision| collision.other(handle))
    }
}
