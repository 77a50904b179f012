use slotmap::new_key_type;

new_key_type! {
    /// A handle to a body registered with the [`PhysicsEngine`](crate::PhysicsEngine).
    pub struct BodyHandle;
}
