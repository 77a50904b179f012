use thiserror::Error;

use crate::axis::Axis;

/// Failures that abort a physics tick. Each one means an internal invariant
/// broke; ordinary "nothing was hit" results are `Option::None` instead.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),

    #[error("Body handle is not registered")]
    UnknownBody,

    #[error("Unsupported collider type for {name}")]
    UnsupportedCollider { name: String },

    #[error("Incomplete resolution data for {name} on axis {}", axis.map_or("?".to_string(), |a| a.to_string()))]
    IncompleteResolution { name: String, axis: Option<Axis> },

    #[error("Resolution does not involve the body it was applied to")]
    MismatchedCollider,
}
