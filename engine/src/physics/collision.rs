use glam::Vec2;

use crate::{
    axis::Axis,
    components::physics_component::Mobility,
    handles::BodyHandle,
    physics::physics_error::PhysicsError,
};

/// A detected contact between a moving body (A) and an obstacle (B).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    /// Fraction of the tick at which contact happens, in `[0, 1]`.
    pub time: f32,
    /// Unit normal on a single axis, pointing from B toward A.
    pub normal: Vec2,
    /// World position of A's collider at contact, relative to B's start-of-tick placement.
    pub position: Vec2,
    pub collider_a: BodyHandle,
    pub collider_b: BodyHandle,
}

impl CollisionData {
    /// The normal as seen by `body`: unchanged for A, flipped for B.
    pub fn normal_for(&self, body: BodyHandle) -> Vec2 {
        if self.collider_a == body {
            self.normal
        } else {
            -self.normal
        }
    }

    pub fn other(&self, body: BodyHandle) -> BodyHandle {
        if self.collider_a == body {
            self.collider_b
        } else {
            self.collider_a
        }
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.collider_a == body || self.collider_b == body
    }
}

/// Final body-space placement of the participants of one resolved collision.
///
/// `collision` is `None` for the free move of a body that hit nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolutionData {
    pub collision: Option<CollisionData>,

    pub collider_a: BodyHandle,
    pub mobility_a: Mobility,
    pub collider_a_final_position: Vec2,
    pub collider_a_final_velocity: Vec2,

    pub collider_b: Option<BodyHandle>,
    pub mobility_b: Option<Mobility>,
    pub collider_b_final_position: Option<Vec2>,
    pub collider_b_final_velocity: Option<Vec2>,
}

impl CollisionResolutionData {
    pub fn free_move(
        body: BodyHandle,
        mobility: Mobility,
        final_position: Vec2,
        velocity: Vec2,
    ) -> Self {
        Self {
            collision: None,
            collider_a: body,
            mobility_a: mobility,
            collider_a_final_position: final_position,
            collider_a_final_velocity: velocity,
            collider_b: None,
            mobility_b: None,
            collider_b_final_position: None,
            collider_b_final_velocity: None,
        }
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.collider_a == body || self.collider_b == Some(body)
    }

    /// Final position and velocity for `body`.
    ///
    /// Errors when `body` is the B side of a resolution that carries no finals for it.
    pub fn finals_for(&self, body: BodyHandle) -> Result<(Vec2, Vec2), PhysicsError> {
        if self.collider_a == body {
            return Ok((
                self.collider_a_final_position,
                self.collider_a_final_velocity,
            ));
        }
        if self.collider_b != Some(body) {
            return Err(PhysicsError::MismatchedCollider);
        }
        match (
            self.collider_b_final_position,
            self.collider_b_final_velocity,
        ) {
            (Some(position), Some(velocity)) => Ok((position, velocity)),
            _ => Err(PhysicsError::IncompleteResolution {
                name: format!("{:?}", body),
                axis: None,
            }),
        }
    }

    /// Precedence class of whatever `body` collided with. Free moves rank after
    /// every real opponent.
    pub fn opponent_precedence(&self, body: BodyHandle) -> u8 {
        let opponent = if self.collider_a == body {
            self.mobility_b
        } else {
            Some(self.mobility_a)
        };
        match (self.collision, opponent) {
            (Some(_), Some(mobility)) => mobility.precedence(),
            _ => u8::MAX,
        }
    }

    pub fn contact_time(&self) -> f32 {
        self.collision.map_or(1.0, |collision| collision.time)
    }

    /// Axis this resolution settles for `body`, if any.
    pub fn settled_axis(&self) -> Option<Axis> {
        self.collision
            .and_then(|collision| crate::axis::axis_of(collision.normal))
    }
}
