pub mod body;
pub mod collision;
pub mod collision_event;
pub mod collision_event_dispatcher;
pub mod collision_system;
pub mod physics_error;
pub mod physics_resource;
pub mod physics_system;
pub mod region_system;
pub mod resolution_system;
