// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Swept AABB collision detection and resolution for 2D games.
//!
//! Register bodies with [`PhysicsEngine::add_sprite`], set velocities, and call
//! [`PhysicsEngine::update`] once per tick.

pub mod axis;
pub mod components;
pub mod gravity_resource;
pub mod handles;
pub mod physics;
pub mod settings;
pub mod utils;

pub use components::{
    aabb_component::Aabb,
    collision_filter_component::CollisionFilter,
    physics_component::{BodyType, KinematicState, Mobility},
    transform_component::TransformComponent,
};
pub use gravity_resource::Gravity;
pub use handles::BodyHandle;
pub use physics::{
    body::PhysicsBody,
    collision::{CollisionData, CollisionResolutionData},
    collision_event::{CollisionEvent, CollisionEventType, CollisionInfo},
    physics_error::PhysicsError,
    physics_system::PhysicsEngine,
};
pub use settings::{PhysicsSettings, SettingsError};
