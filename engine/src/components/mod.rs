pub mod aabb_component;
pub mod collision_filter_component;
pub mod physics_component;
pub mod transform_component;
