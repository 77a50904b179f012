// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use glam::Vec2;

use crate::{
    axis::{Axis, axis_of, sign_or_one},
    components::{aabb_component::Aabb, physics_component::Mobility},
    handles::BodyHandle,
    physics::collision::CollisionData,
};

/// Snapshot of one participant of a sweep test, collider already in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepBody {
    pub handle: BodyHandle,
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub mobility: Mobility,
}

/// Result of a ray against a padded box. `position` is where the ray origin sits at contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub time: f32,
    pub normal: Vec2,
    pub position: Vec2,
}

/// Box covering both where `aabb` starts and where it ends after moving by `velocity * dt`.
pub fn broad_box(aabb: &Aabb, velocity: Vec2, dt: f32) -> Aabb {
    let travel = velocity * dt;
    let mut position = aabb.position;
    for axis in Axis::ALL {
        if axis.component(velocity) <= 0.0 {
            position = axis.with_component(position, axis.component(position + travel));
        }
    }
    Aabb::new(position, travel.abs() + aabb.size)
}

/// Strict overlap: boxes that only share an edge do not overlap.
pub fn static_aabb(a: &Aabb, b: &Aabb) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_max.x > b_min.x && a_min.x < b_max.x && a_max.y > b_min.y && a_min.y < b_max.y
}

/// Separating-axis test for two boxes that already overlap.
///
/// The axis with the smaller overlap wins, ties going to y. The normal points
/// from B toward A and `position` pushes A out to B's face on that axis.
pub fn sat_aabb(a: &SweepBody, b: &SweepBody) -> Option<CollisionData> {
    let half_a = a.aabb.half_size();
    let half_b = b.aabb.half_size();
    let delta = a.aabb.center() - b.aabb.center();
    let penetration = half_a + half_b - delta.abs();

    if penetration.x <= 0.0 || penetration.y <= 0.0 {
        return None;
    }

    let axis = if penetration.x < penetration.y {
        Axis::X
    } else {
        Axis::Y
    };
    let sign = sign_or_one(axis.component(delta));
    let push = axis.component(penetration) * sign;

    Some(CollisionData {
        time: 0.0,
        normal: axis.unit() * sign,
        position: axis.with_component(
            a.aabb.position,
            axis.component(a.aabb.position) + push,
        ),
        collider_a: a.handle,
        collider_b: b.handle,
    })
}

/// Slab test of the segment `start -> start + delta * dt` against `target` grown by `padding`.
///
/// A segment running parallel to an axis misses unless it lies strictly inside
/// that slab. Equal entry times on both axes report a y normal.
pub fn ray_aabb(
    start: Vec2,
    delta: Vec2,
    target: &Aabb,
    padding: Vec2,
    dt: f32,
) -> Option<RayHit> {
    if delta == Vec2::ZERO {
        return None;
    }

    let center = target.center();
    let reach = target.half_size() + padding;

    let mut near = Vec2::splat(f32::NEG_INFINITY);
    let mut far = Vec2::splat(f32::INFINITY);
    let mut sign = Vec2::ONE;

    for axis in Axis::ALL {
        let k = axis.index();
        let travel = delta[k] * dt;
        if travel == 0.0 {
            if start[k] <= center[k] - reach[k] || start[k] >= center[k] + reach[k] {
                return None;
            }
            continue;
        }
        let scale = 1.0 / travel;
        sign[k] = scale.signum();
        near[k] = (center[k] - sign[k] * reach[k] - start[k]) * scale;
        far[k] = (center[k] + sign[k] * reach[k] - start[k]) * scale;
    }

    if near.x > far.y || near.y > far.x {
        return None;
    }

    let near_time = near.x.max(near.y);
    let far_time = far.x.min(far.y);
    if near_time >= 1.0 || far_time <= 0.0 {
        return None;
    }

    let time = near_time.clamp(0.0, 1.0);
    let normal = if near.x > near.y {
        Vec2::new(-sign.x, 0.0)
    } else {
        Vec2::new(0.0, -sign.y)
    };

    Some(RayHit {
        time,
        normal,
        position: start + delta * dt * time,
    })
}

/// Swept test of A against B over `dt`, in B's frame of reference.
///
/// `position` is A's collider position at contact, relative to where B was at
/// the start of the tick. It sits flush against B's face, except when B is
/// pushable and A is not: then it is the raw point where the sweep stopped.
pub fn minkowski_swept_aabb(a: &SweepBody, b: &SweepBody, dt: f32) -> Option<CollisionData> {
    if a.mobility == Mobility::Static && b.mobility == Mobility::Static {
        return sat_aabb(a, b);
    }

    let relative_velocity = a.velocity - b.velocity;
    if relative_velocity == Vec2::ZERO {
        if static_aabb(&a.aabb, &b.aabb) {
            return sat_aabb(a, b);
        }
        return None;
    }

    let half_a = a.aabb.half_size();
    let hit = ray_aabb(a.aabb.center(), relative_velocity, &b.aabb, half_a, dt)?;
    let axis = axis_of(hit.normal)?;

    let raw = hit.position - half_a;
    let position = if b.mobility.is_pushable() && !a.mobility.is_pushable() {
        raw
    } else {
        let face = axis.component(b.aabb.center())
            + axis.component(b.aabb.half_size() + half_a) * axis.component(hit.normal)
            - axis.component(half_a);
        axis.with_component(raw, face)
    };

    log::trace!(
        "Sweep {:?} against {:?}: t={} normal={} position={}",
        a.handle,
        b.handle,
        hit.time,
        hit.normal,
        position
    );

    Some(CollisionData {
        time: hit.time,
        normal: hit.normal,
        position,
        collider_a: a.handle,
        collider_b: b.handle,
    })
}

/// Gap between the mover's leading edge and the target's facing edge along the
/// direction of motion. Axes without motion, and targets already passed, count as infinitely far.
pub fn get_dist(mover: &Aabb, target: &Aabb, velocity: Vec2) -> f32 {
    let mut dist = Vec2::splat(f32::INFINITY);
    for axis in Axis::ALL {
        let speed = axis.component(velocity);
        let gap = if speed > 0.0 {
            axis.component(target.min()) - axis.component(mover.max())
        } else if speed < 0.0 {
            axis.component(mover.min()) - axis.component(target.max())
        } else {
            continue;
        };
        if gap >= 0.0 {
            dist = axis.with_component(dist, gap);
        }
    }
    dist.x.min(dist.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn handles() -> (BodyHandle, BodyHandle) {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    fn body(handle: BodyHandle, position: Vec2, size: Vec2, velocity: Vec2, mobility: Mobility) -> SweepBody {
        SweepBody {
            handle,
            aabb: Aabb::new(position, size),
            velocity,
            mobility,
        }
    }

    #[test]
    fn broad_box_covers_start_and_end() {
        let aabb = Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0));

        let right_down = broad_box(&aabb, Vec2::new(1.0, 2.0), 2.0);
        assert_eq!(right_down.position, Vec2::new(10.0, 10.0));
        assert_eq!(right_down.size, Vec2::new(6.0, 8.0));

        let left_up = broad_box(&aabb, Vec2::new(-1.0, -2.0), 2.0);
        assert_eq!(left_up.position, Vec2::new(8.0, 6.0));
        assert_eq!(left_up.size, Vec2::new(6.0, 8.0));

        let still = broad_box(&aabb, Vec2::ZERO, 2.0);
        assert_eq!(still, aabb);
    }

    #[test]
    fn static_overlap_is_symmetric_and_strict() {
        let boxes = [
            Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
            Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0)),
            Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)),
            Aabb::new(Vec2::new(-3.0, 9.0), Vec2::new(2.0, 2.0)),
            Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(0.0, 0.0)),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(static_aabb(a, b), static_aabb(b, a));
            }
        }
        assert!(static_aabb(&boxes[0], &boxes[1]));
        // Shared edge only.
        assert!(!static_aabb(&boxes[0], &boxes[2]));
    }

    #[test]
    fn sat_picks_shallower_axis() {
        let (ha, hb) = handles();
        let a = body(ha, Vec2::new(8.0, 0.0), Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);
        let b = body(hb, Vec2::ZERO, Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);

        let collision = sat_aabb(&a, &b).unwrap();
        assert_eq!(collision.normal, Vec2::new(1.0, 0.0));
        assert_eq!(collision.position, Vec2::new(10.0, 0.0));
        assert_eq!(collision.time, 0.0);
    }

    #[test]
    fn sat_ties_go_to_y_with_positive_sign() {
        let (ha, hb) = handles();
        let a = body(ha, Vec2::ZERO, Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);
        let b = body(hb, Vec2::ZERO, Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);

        let collision = sat_aabb(&a, &b).unwrap();
        assert_eq!(collision.normal, Vec2::new(0.0, 1.0));
        assert_eq!(collision.position, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn sat_without_overlap_is_none() {
        let (ha, hb) = handles();
        let a = body(ha, Vec2::new(10.0, 0.0), Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);
        let b = body(hb, Vec2::ZERO, Vec2::splat(10.0), Vec2::ZERO, Mobility::Static);
        assert!(sat_aabb(&a, &b).is_none());
    }

    #[test]
    fn ray_hits_padded_box() {
        let target = Aabb::new(Vec2::new(0.0, 960.0), Vec2::new(1280.0, 128.0));
        let hit = ray_aabb(
            Vec2::new(116.0, 940.0),
            Vec2::new(0.0, 0.5),
            &target,
            Vec2::splat(16.0),
            16.0,
        )
        .unwrap();
        assert_relative_eq!(hit.time, 0.5);
        assert_eq!(hit.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(hit.position.y, 944.0);
    }

    #[test]
    fn ray_misses() {
        let target = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        // Too short.
        assert!(ray_aabb(Vec2::new(0.0, 5.0), Vec2::new(1.0, 0.0), &target, Vec2::ZERO, 5.0).is_none());
        // Moving away.
        assert!(ray_aabb(Vec2::new(0.0, 5.0), Vec2::new(-1.0, 0.0), &target, Vec2::ZERO, 50.0).is_none());
        // Parallel, outside the slab.
        assert!(ray_aabb(Vec2::new(0.0, 15.0), Vec2::new(1.0, 0.0), &target, Vec2::ZERO, 50.0).is_none());
        // Parallel, exactly on the slab boundary.
        assert!(ray_aabb(Vec2::new(0.0, 10.0), Vec2::new(1.0, 0.0), &target, Vec2::ZERO, 50.0).is_none());
        // No motion at all.
        assert!(ray_aabb(Vec2::new(15.0, 5.0), Vec2::ZERO, &target, Vec2::ZERO, 50.0).is_none());
    }

    #[test]
    fn ray_corner_tie_reports_y() {
        let target = Aabb::new(Vec2::new(10.0, 10.0), Vec2::splat(10.0));
        let hit = ray_aabb(Vec2::ZERO, Vec2::ONE, &target, Vec2::ZERO, 20.0).unwrap();
        assert_relative_eq!(hit.time, 0.5);
        assert_eq!(hit.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn swept_hit_snaps_to_face() {
        let (ha, hb) = handles();
        let player = body(ha, Vec2::new(100.0, 924.0), Vec2::splat(32.0), Vec2::new(0.0, 0.5), Mobility::KinematicPushable);
        let ground = body(hb, Vec2::new(0.0, 960.0), Vec2::new(1280.0, 128.0), Vec2::ZERO, Mobility::Static);

        let collision = minkowski_swept_aabb(&player, &ground, 16.0).unwrap();
        assert_relative_eq!(collision.time, 0.5);
        assert_eq!(collision.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(collision.position.y, 928.0);
        assert_relative_eq!(collision.position.x, 100.0);
        assert_eq!(collision.collider_a, ha);
        assert_eq!(collision.collider_b, hb);
    }

    #[test]
    fn swept_diagonal_hit_has_single_axis_normal() {
        let (ha, hb) = handles();
        let mover = body(ha, Vec2::new(0.0, 0.0), Vec2::splat(10.0), Vec2::new(1.0, 2.0), Mobility::KinematicPushable);
        let floor = body(hb, Vec2::new(-100.0, 20.0), Vec2::new(400.0, 10.0), Vec2::ZERO, Mobility::Static);

        let collision = minkowski_swept_aabb(&mover, &floor, 10.0).unwrap();
        assert_eq!(collision.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(collision.time, 0.5);
        assert_relative_eq!(collision.position.y, 10.0);
        assert_relative_eq!(collision.position.x, 5.0);
    }

    #[test]
    fn swept_and_static_agree_without_relative_motion() {
        let (ha, hb) = handles();
        let a = body(ha, Vec2::new(8.0, 1.0), Vec2::splat(10.0), Vec2::new(1.0, 0.0), Mobility::KinematicPushable);
        let b = body(hb, Vec2::ZERO, Vec2::splat(10.0), Vec2::new(1.0, 0.0), Mobility::KinematicPushable);

        let swept = minkowski_swept_aabb(&a, &b, 16.0).unwrap();
        let sat = sat_aabb(&a, &b).unwrap();
        assert_eq!(swept.normal, sat.normal);
        assert_eq!(swept.position, sat.position);
    }

    #[test]
    fn no_relative_motion_and_no_overlap_is_none() {
        let (ha, hb) = handles();
        let a = body(ha, Vec2::new(20.0, 0.0), Vec2::splat(10.0), Vec2::X, Mobility::KinematicPushable);
        let b = body(hb, Vec2::ZERO, Vec2::splat(10.0), Vec2::X, Mobility::KinematicPushable);
        assert!(minkowski_swept_aabb(&a, &b, 16.0).is_none());
    }

    #[test]
    fn unpushable_against_pushable_keeps_raw_point() {
        let (ha, hb) = handles();
        let platform = body(ha, Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(2.0, 0.0), Mobility::KinematicUnpushable);
        let crate_body = body(hb, Vec2::new(15.0, 0.0), Vec2::new(10.0, 10.0), Vec2::ZERO, Mobility::KinematicPushable);

        // Contact after 5 of the 20 units of travel.
        let collision = minkowski_swept_aabb(&platform, &crate_body, 10.0).unwrap();
        assert_relative_eq!(collision.time, 0.25);
        assert_eq!(collision.normal, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(collision.position.x, 5.0);
    }

    #[test]
    fn distance_follows_motion() {
        let mover = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let right = Aabb::new(Vec2::new(15.0, 0.0), Vec2::splat(10.0));
        let left = Aabb::new(Vec2::new(-30.0, 0.0), Vec2::splat(10.0));

        assert_eq!(get_dist(&mover, &right, Vec2::new(1.0, 0.0)), 5.0);
        assert_eq!(get_dist(&mover, &left, Vec2::new(-1.0, 0.0)), 20.0);
        // Already behind the mover.
        assert_eq!(get_dist(&mover, &left, Vec2::new(1.0, 0.0)), f32::INFINITY);
        assert_eq!(get_dist(&mover, &right, Vec2::ZERO), f32::INFINITY);
    }
}
