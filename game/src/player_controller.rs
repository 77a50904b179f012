use bevy_ecs::prelude::*;
use collide2d::{BodyHandle, PhysicsEngine, PhysicsError};

use crate::{input_controller::InputState, time_resource::TimeResource};

/// Side-scroller movement settings. Speeds are in pixels per millisecond.
#[derive(Resource, Debug, Clone)]
pub struct PlayerController {
    pub body: BodyHandle,
    pub speed: f32,
    pub jump_speed: f32,
}

impl PlayerController {
    pub fn new(body: BodyHandle) -> Self {
        Self {
            body,
            speed: 0.25,
            jump_speed: 0.6,
        }
    }

    /// Turns the current input into the player's velocity for the next tick.
    pub fn apply_input(
        &self,
        input: &InputState,
        engine: &mut PhysicsEngine,
        dt: f32,
    ) -> Result<(), PhysicsError> {
        let gravity = engine.gravity();
        let up = gravity.up();
        let across = up.perp();

        let body = engine.body(self.body).ok_or(PhysicsError::UnknownBody)?;
        let velocity = body.velocity();
        let grounded = body.is_on_ground(up);
        let ground_friction = body
            .ground_platform(up)
            .and_then(|platform| engine.body(platform))
            .map(|platform| platform.friction);

        let mut along = velocity.dot(across);
        let mut vertical = velocity.dot(up);

        let intent = input.keys.horizontal();
        if intent != 0.0 {
            along = intent * self.speed;
        } else if let Some(friction) = ground_friction {
            along -= along * friction;
        }

        if grounded && input.keys.jump {
            vertical = self.jump_speed;
            log::debug!("jump");
        } else if grounded {
            vertical = vertical.max(0.0);
        }

        let next = across * along + up * vertical + gravity.gravity_vector() * dt;
        engine.set_velocity(self.body, next)
    }
}

/// Applies the scripted input to the player's body.
pub fn apply_player_input(
    input_state: Res<InputState>,
    controller: Res<PlayerController>,
    time: Res<TimeResource>,
    mut engine: ResMut<PhysicsEngine>,
) {
    if let Err(e) = controller.apply_input(&input_state, &mut engine, time.fixed_dt()) {
        log::warn!("Player input skipped: {}", e);
    }
}
