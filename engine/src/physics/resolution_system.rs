use glam::Vec2;

use crate::{
    axis::{Axis, axis_of},
    components::physics_component::Mobility,
    physics::{
        collision::{CollisionData, CollisionResolutionData},
        collision_system::SweepBody,
        physics_error::PhysicsError,
        physics_resource::PhysicsFrameData,
    },
};

/// A body taking part in a resolution. `offset` is the collider's position
/// relative to the body, used to turn collider placements back into body placements.
#[derive(Debug, Clone, Copy)]
pub struct Participant<'a> {
    pub name: &'a str,
    pub sweep: SweepBody,
    pub offset: Vec2,
}

/// Position and velocity component for one body on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisFinal {
    position: f32,
    velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisOutcome {
    a: AxisFinal,
    b: Option<AxisFinal>,
    lock_a: bool,
    lock_b: bool,
}

fn free_move(body: &SweepBody, axis: Axis, dt: f32) -> AxisFinal {
    let velocity = axis.component(body.velocity);
    AxisFinal {
        position: axis.component(body.aabb.position) + velocity * dt,
        velocity,
    }
}

/// Resolution along the collision normal. `a_pushable` / `b_pushable` are the
/// effective flags for this axis, after the tick's locks.
fn resolve_normal_axis(
    axis: Axis,
    collision: &CollisionData,
    a: &SweepBody,
    a_pushable: bool,
    b: &SweepBody,
    b_pushable: bool,
    dt: f32,
) -> AxisOutcome {
    let t = collision.time;
    let side = axis.component(collision.normal);
    let a_velocity = axis.component(a.velocity);
    let b_velocity = axis.component(b.velocity);
    let a_start = axis.component(a.aabb.position);
    let b_start = axis.component(b.aabb.position);

    if b.mobility == Mobility::Static {
        return AxisOutcome {
            a: AxisFinal {
                position: axis.component(collision.position),
                velocity: 0.0,
            },
            b: None,
            lock_a: true,
            lock_b: false,
        };
    }

    // B moved during the contact time, and the contact position is in B's start frame.
    let a_contact = axis.component(collision.position) + b_velocity * dt * t;
    let b_contact = b_start + b_velocity * dt * t;

    match (a_pushable, b_pushable) {
        (true, true) => AxisOutcome {
            a: AxisFinal {
                position: a_contact,
                velocity: b_velocity,
            },
            b: Some(AxisFinal {
                position: b_contact,
                velocity: a_velocity,
            }),
            lock_a: false,
            lock_b: false,
        },
        (true, false) => {
            let b_end = b_start + b_velocity * dt;
            let a_position = if side > 0.0 {
                b_end + axis.component(b.aabb.size)
            } else {
                b_end - axis.component(a.aabb.size)
            };
            AxisOutcome {
                a: AxisFinal {
                    position: a_position,
                    velocity: b_velocity,
                },
                b: Some(AxisFinal {
                    position: b_end,
                    velocity: b_velocity,
                }),
                lock_a: true,
                lock_b: false,
            }
        }
        (false, true) => {
            let a_end = a_start + a_velocity * dt;
            let b_position = if side > 0.0 {
                a_end - axis.component(b.aabb.size)
            } else {
                a_end + axis.component(a.aabb.size)
            };
            AxisOutcome {
                a: AxisFinal {
                    position: a_end,
                    velocity: a_velocity,
                },
                b: Some(AxisFinal {
                    position: b_position,
                    velocity: a_velocity,
                }),
                lock_a: false,
                lock_b: true,
            }
        }
        (false, false) => AxisOutcome {
            a: AxisFinal {
                position: a_contact,
                velocity: 0.0,
            },
            b: Some(AxisFinal {
                position: b_contact,
                velocity: 0.0,
            }),
            lock_a: true,
            lock_b: true,
        },
    }
}

/// Resolves `collision` one axis at a time and records the new locks in `frame`.
///
/// Errors when the mover is not kinematic, or when a kinematic B ends up
/// without a final placement on some axis.
pub fn resolve_collision(
    frame: &mut PhysicsFrameData,
    collision: &CollisionData,
    a: &Participant,
    b: &Participant,
) -> Result<CollisionResolutionData, PhysicsError> {
    if !a.sweep.mobility.is_kinematic() {
        return Err(PhysicsError::UnsupportedCollider {
            name: a.name.to_string(),
        });
    }

    let dt = frame.delta_time;
    let normal_axis = axis_of(collision.normal);
    let a_locks = frame.locked_axes(a.sweep.handle);
    let b_locks = frame.locked_axes(b.sweep.handle);

    let mut a_position = Vec2::ZERO;
    let mut a_velocity = Vec2::ZERO;
    let mut b_position = b.sweep.mobility.is_kinematic().then_some(Vec2::ZERO);
    let mut b_velocity = b_position;

    for axis in Axis::ALL {
        let outcome = if normal_axis == Some(axis) {
            let a_pushable = a.sweep.mobility.is_pushable() && !a_locks.is_locked(axis);
            let b_pushable = b.sweep.mobility.is_pushable() && !b_locks.is_locked(axis);
            resolve_normal_axis(axis, collision, &a.sweep, a_pushable, &b.sweep, b_pushable, dt)
        } else {
            AxisOutcome {
                a: free_move(&a.sweep, axis, dt),
                b: b.sweep
                    .mobility
                    .is_kinematic()
                    .then(|| free_move(&b.sweep, axis, dt)),
                lock_a: false,
                lock_b: false,
            }
        };

        log::trace!(
            "Resolved {} against {} on {}: {:?}",
            a.name,
            b.name,
            axis,
            outcome
        );

        a_position = axis.with_component(a_position, outcome.a.position);
        a_velocity = axis.with_component(a_velocity, outcome.a.velocity);

        match (outcome.b, b_position.as_mut(), b_velocity.as_mut()) {
            (Some(finals), Some(position), Some(velocity)) => {
                *position = axis.with_component(*position, finals.position);
                *velocity = axis.with_component(*velocity, finals.velocity);
            }
            (None, None, None) => {}
            _ => {
                return Err(PhysicsError::IncompleteResolution {
                    name: b.name.to_string(),
                    axis: Some(axis),
                });
            }
        }

        if outcome.lock_a {
            frame.lock_axis(a.sweep.handle, axis);
        }
        if outcome.lock_b {
            frame.lock_axis(b.sweep.handle, axis);
        }
    }

    Ok(CollisionResolutionData {
        collision: Some(*collision),
        collider_a: a.sweep.handle,
        mobility_a: a.sweep.mobility,
        collider_a_final_position: a_position - a.offset,
        collider_a_final_velocity: a_velocity,
        collider_b: Some(b.sweep.handle),
        mobility_b: Some(b.sweep.mobility),
        collider_b_final_position: b_position.map(|position| position - b.offset),
        collider_b_final_velocity: b_velocity,
    })
}
