use bevy_ecs::prelude::*;
use collide2d::{BodyHandle, CollisionFilter, Gravity, PhysicsBody, PhysicsEngine, PhysicsError};
use glam::Vec2;
use rand::random_range;

use crate::time_resource::TimeResource;

pub const LEVEL_WIDTH: f32 = 1280.0;
pub const GROUND_Y: f32 = 960.0;

const WORLD_LAYER: u32 = 0b01;
const DECOR_LAYER: u32 = 0b10;

/// A platform that patrols between two x bounds.
#[derive(Debug, Clone)]
pub struct MovingPlatform {
    pub body: BodyHandle,
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
}

impl MovingPlatform {
    /// Reverses direction once the platform has reached a bound.
    pub fn patrol(&self, engine: &mut PhysicsEngine) -> Result<(), PhysicsError> {
        let x = engine.global_position(self.body).ok_or(PhysicsError::UnknownBody)?.x;
        let vx = engine.velocity(self.body).ok_or(PhysicsError::UnknownBody)?.x;
        let next = if x <= self.min_x {
            self.speed
        } else if x >= self.max_x {
            -self.speed
        } else if vx == 0.0 {
            self.speed
        } else {
            vx
        };
        engine.set_velocity(self.body, Vec2::new(next, 0.0))
    }
}

#[derive(Resource, Debug)]
pub struct Level {
    pub player: BodyHandle,
    pub platform: MovingPlatform,
    pub goal: BodyHandle,
    pub crates: Vec<BodyHandle>,
}

pub fn patrol_platforms(level: Res<Level>, mut engine: ResMut<PhysicsEngine>) {
    if let Err(e) = level.platform.patrol(&mut engine) {
        log::warn!("Platform patrol skipped: {}", e);
    }
}

/// Crates have no controller, so they only fall.
pub fn apply_crate_gravity(
    level: Res<Level>,
    gravity: Res<Gravity>,
    time: Res<TimeResource>,
    mut engine: ResMut<PhysicsEngine>,
) {
    let pull = gravity.gravity_vector() * time.fixed_dt();
    for &handle in &level.crates {
        if let Some(velocity) = engine.velocity(handle) {
            if let Err(e) = engine.set_velocity(handle, velocity + pull) {
                log::warn!("Crate gravity skipped: {}", e);
            }
        }
    }
}

pub fn build_level(engine: &mut PhysicsEngine, crate_count: usize) -> Level {
    let world = CollisionFilter::new(WORLD_LAYER, WORLD_LAYER);

    engine.add_sprites([
        PhysicsBody::static_body("ground", Vec2::new(0.0, GROUND_Y), Vec2::new(LEVEL_WIDTH, 64.0))
            .with_filter(world),
        PhysicsBody::static_body("left_wall", Vec2::new(-64.0, 0.0), Vec2::new(64.0, GROUND_Y))
            .with_filter(world),
        PhysicsBody::static_body("right_wall", Vec2::new(LEVEL_WIDTH, 0.0), Vec2::new(64.0, GROUND_Y))
            .with_filter(world),
        // Ice: barely slows whatever slides on it.
        PhysicsBody::static_body("ice", Vec2::new(900.0, GROUND_Y - 16.0), Vec2::new(256.0, 16.0))
            .with_filter(world)
            .with_friction(0.05),
    ]);

    // Background props only interact with each other.
    engine.add_sprite(
        PhysicsBody::static_body("backdrop", Vec2::new(200.0, 600.0), Vec2::new(400.0, 200.0))
            .with_filter(CollisionFilter::new(DECOR_LAYER, DECOR_LAYER)),
    );

    let goal = engine.add_sprite(
        PhysicsBody::region("goal", Vec2::new(1100.0, GROUND_Y - 160.0), Vec2::new(96.0, 160.0))
            .with_filter(world),
    );

    let platform_body = engine.add_sprite(
        PhysicsBody::kinematic(
            "platform",
            Vec2::new(320.0, 760.0),
            Vec2::new(128.0, 16.0),
            Vec2::new(0.1, 0.0),
            false,
        )
        .with_filter(world),
    );

    // The player carries a feet sensor as a child region.
    let player = engine.add_sprite(
        PhysicsBody::kinematic("player", Vec2::new(96.0, GROUND_Y - 48.0), Vec2::new(24.0, 48.0), Vec2::ZERO, true)
            .with_filter(world)
            .with_child(
                PhysicsBody::region("player_feet", Vec2::new(4.0, 44.0), Vec2::new(16.0, 8.0))
                    .with_filter(world),
            ),
    );

    let crates = (0..crate_count)
        .map(|i| {
            let size = random_range(16.0..40.0);
            let position = Vec2::new(
                random_range(160.0..LEVEL_WIDTH - 200.0),
                random_range(100.0..500.0),
            );
            engine.add_sprite(
                PhysicsBody::kinematic(format!("crate_{}", i), position, Vec2::splat(size), Vec2::ZERO, true)
                    .with_filter(world),
            )
        })
        .collect();

    Level {
        player,
        platform: MovingPlatform {
            body: platform_body,
            min_x: 240.0,
            max_x: 720.0,
            speed: 0.1,
        },
        goal,
        crates,
    }
}
