// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
mod input_controller;
mod level;
mod player_controller;
mod settings;
mod time_resource;

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use collide2d::{CollisionEvent, CollisionEventType, PhysicsEngine, PhysicsError};
use input_controller::{update_input_state, InputState, KeyButtons};
use level::{apply_crate_gravity, build_level, patrol_platforms, Level};
use player_controller::{apply_player_input, PlayerController};
use std::path::PathBuf;
use thiserror::Error;
use time_resource::TimeResource;

const DEFAULT_TICKS: u64 = 600;
const CRATE_COUNT: usize = 24;

#[derive(Debug, Error)]
enum DemoError {
    #[error("Physics Error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Invalid tick count: {0}")]
    InvalidTicks(String),
}

/// First error returned by the physics step; the loop stops once it is set.
#[derive(Resource, Default)]
struct PhysicsFault(Option<PhysicsError>);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Usage: `collide2d-demo [settings.toml] [ticks]`
fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u64>().map_err(|_| DemoError::InvalidTicks(raw))?,
        None => DEFAULT_TICKS,
    };

    let settings = settings::load_user_settings(settings_path.as_deref());
    log::info!("Physics settings: {:?}", settings);

    let mut engine = PhysicsEngine::with_settings(settings);
    let level = build_level(&mut engine, CRATE_COUNT);

    let mut world = World::new();
    world.insert_resource(engine.gravity());
    world.insert_resource(PlayerController::new(level.player));
    world.insert_resource(level);
    world.insert_resource(engine);
    world.insert_resource(demo_script());
    world.insert_resource(TimeResource::default());
    world.init_resource::<PhysicsFault>();
    world.init_resource::<Messages<CollisionEvent>>();

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_input_state,
            apply_player_input,
            patrol_platforms,
            apply_crate_gravity,
            step_physics,
            log_collision_events,
            TimeResource::advance_time,
        )
            .chain(),
    );

    while world.resource::<TimeResource>().tick_count() < ticks {
        schedule.run(&mut world);
        if let Some(e) = world.resource_mut::<PhysicsFault>().0.take() {
            return Err(e.into());
        }
    }

    let time = world.resource::<TimeResource>();
    let player = world.resource::<PlayerController>().body;
    let position = world
        .resource::<PhysicsEngine>()
        .global_position(player)
        .unwrap_or_default();
    log::info!(
        "Finished {} ticks ({:.1} s), player at ({:.1}, {:.1})",
        time.tick_count(),
        time.total_time() / 1000.0,
        position.x,
        position.y
    );
    Ok(())
}

/// Walk right, hop twice, then drift back left.
fn demo_script() -> InputState {
    let right = KeyButtons { right: true, ..Default::default() };
    let left = KeyButtons { left: true, ..Default::default() };
    let jump = KeyButtons { jump: true, ..Default::default() };
    InputState::default()
        .hold(30, 300, right)
        .hold(120, 124, jump)
        .hold(240, 244, jump)
        .hold(360, 480, left)
}

fn step_physics(
    time: Res<TimeResource>,
    mut engine: ResMut<PhysicsEngine>,
    mut messages: ResMut<Messages<CollisionEvent>>,
    mut fault: ResMut<PhysicsFault>,
) {
    match engine.update(time.fixed_dt()) {
        Ok(()) => engine.forward_events(&mut messages),
        Err(e) => fault.0 = Some(e),
    }
}

fn log_collision_events(
    time: Res<TimeResource>,
    engine: Res<PhysicsEngine>,
    level: Res<Level>,
    mut messages: ResMut<Messages<CollisionEvent>>,
) {
    let name = |handle| {
        engine
            .body(handle)
            .map(|body| body.name.as_str())
            .unwrap_or("?")
    };

    for event in messages.drain() {
        match event.event_type {
            CollisionEventType::Hit => log::trace!(
                "tick {}: {} hit {}",
                time.tick_count(),
                name(event.entity),
                name(event.other_entity)
            ),
            kind => {
                if event.entity == level.goal && event.other_entity == level.player {
                    log::info!("tick {}: player {:?} the goal", time.tick_count(), kind);
                } else {
                    log::debug!(
                        "tick {}: {:?} {} / {}",
                        time.tick_count(),
                        kind,
                        name(event.entity),
                        name(event.other_entity)
                    );
                }
            }
        }
    }
}
