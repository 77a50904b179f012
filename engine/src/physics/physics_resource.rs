use bevy_ecs::resource::Resource;
use glam::Vec2;
use std::collections::HashMap;

use crate::{
    axis::Axis,
    handles::BodyHandle,
    physics::collision::{CollisionData, CollisionResolutionData},
};

/// Where a body is within the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    #[default]
    Idle,
    Detecting,
    Resolving,
    Committing,
    Committed,
}

impl TickPhase {
    pub fn can_advance_to(self, next: TickPhase) -> bool {
        matches!(
            (self, next),
            (TickPhase::Idle, TickPhase::Detecting)
                | (TickPhase::Detecting, TickPhase::Resolving)
                | (TickPhase::Detecting, TickPhase::Committing)
                | (TickPhase::Resolving, TickPhase::Detecting)
                | (TickPhase::Resolving, TickPhase::Committing)
                | (TickPhase::Committing, TickPhase::Committed)
        )
    }
}

/// Speculative position and velocity of a body while its sweep is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingState {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Per-axis "locally unpushable" flags, set once a body is blocked on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockedAxes {
    x: bool,
    y: bool,
}

impl LockedAxes {
    pub fn is_locked(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn lock(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = true,
            Axis::Y => self.y = true,
        }
    }
}

/// Tick-scoped context threaded through detection, resolution and commit.
/// Built at the start of `update` and dropped at the end of it.
#[derive(Resource, Debug, Default)]
pub struct PhysicsFrameData {
    pub delta_time: f32,
    resolutions: HashMap<BodyHandle, Vec<CollisionResolutionData>>,
    // Keys in first-touched order so the commit pass is deterministic.
    resolution_order: Vec<BodyHandle>,
    locked_axes: HashMap<BodyHandle, LockedAxes>,
    working: HashMap<BodyHandle, WorkingState>,
    phases: HashMap<BodyHandle, TickPhase>,
    // Reported only once the tick commits.
    hits: Vec<CollisionData>,
}

impl PhysicsFrameData {
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            ..Default::default()
        }
    }

    pub fn record(&mut self, body: BodyHandle, resolution: CollisionResolutionData) {
        if !self.resolutions.contains_key(&body) {
            self.resolution_order.push(body);
        }
        self.resolutions.entry(body).or_default().push(resolution);
    }

    pub fn resolutions(&self, body: BodyHandle) -> &[CollisionResolutionData] {
        self.resolutions.get(&body).map_or(&[], Vec::as_slice)
    }

    pub fn take_resolutions(&mut self) -> Vec<(BodyHandle, Vec<CollisionResolutionData>)> {
        let mut resolutions = std::mem::take(&mut self.resolutions);
        std::mem::take(&mut self.resolution_order)
            .into_iter()
            .filter_map(|body| resolutions.remove(&body).map(|list| (body, list)))
            .collect()
    }

    /// True when `body` already has a resolution this tick that involves `other`.
    pub fn already_resolved(&self, body: BodyHandle, other: BodyHandle) -> bool {
        self.resolutions(body).iter().any(|resolution| {
            resolution.collision.is_some() && resolution.involves(other)
        })
    }

    pub fn record_hit(&mut self, collision: CollisionData) {
        self.hits.push(collision);
    }

    pub fn take_hits(&mut self) -> Vec<CollisionData> {
        std::mem::take(&mut self.hits)
    }

    pub fn locked_axes(&self, body: BodyHandle) -> LockedAxes {
        self.locked_axes.get(&body).copied().unwrap_or_default()
    }

    pub fn lock_axis(&mut self, body: BodyHandle, axis: Axis) {
        self.locked_axes.entry(body).or_default().lock(axis);
    }

    pub fn working_state(&self, body: BodyHandle) -> Option<WorkingState> {
        self.working.get(&body).copied()
    }

    pub fn set_working_state(&mut self, body: BodyHandle, state: WorkingState) {
        self.working.insert(body, state);
    }

    /// Throws away all speculative state, so the next sweep starts from the real bodies.
    pub fn restore_working_states(&mut self) {
        self.working.clear();
    }

    pub fn phase(&self, body: BodyHandle) -> TickPhase {
        self.phases.get(&body).copied().unwrap_or_default()
    }

    /// Moves `body` to `next`. Invalid transitions are logged and ignored.
    pub fn advance(&mut self, body: BodyHandle, next: TickPhase) -> bool {
        let current = self.phase(body);
        if !current.can_advance_to(next) {
            log::warn!(
                "Ignoring tick phase transition {:?} -> {:?} for {:?}",
                current,
                next,
                body
            );
            return false;
        }
        self.phases.insert(body, next);
        true
    }
}
