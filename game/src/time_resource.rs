use bevy_ecs::prelude::*;

/// Fixed-step clock for the demo loop. Times are in milliseconds, matching
/// the units the physics engine integrates velocities in.
#[derive(Resource, Debug, Clone)]
pub struct TimeResource {
    simulation_fixed_dt: f32,
    total_time: f64,
    tick_count: u64,
}

impl Default for TimeResource {
    fn default() -> Self {
        TimeResource {
            simulation_fixed_dt: 1000.0 / 60.0, // 60 Hz
            total_time: 0.0,
            tick_count: 0,
        }
    }
}

impl TimeResource {
    pub fn new(tick_rate: u32) -> Self {
        TimeResource {
            simulation_fixed_dt: 1000.0 / tick_rate.max(1) as f32,
            ..Default::default()
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.simulation_fixed_dt
    }

    pub fn advance(&mut self) {
        self.total_time += self.simulation_fixed_dt as f64;
        self.tick_count += 1;
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_time(mut time: ResMut<TimeResource>) {
        time.advance();
    }
}
