/// XF3D Core Library - Pose math, transform sequencing, and scene state
///
/// This library provides the stateless math and the interaction state for
/// the transform editor: 4x4 affine construction and decomposition, the
/// recorded-operation sequencer, the orbit camera, and primitive meshes.
/// It knows nothing about windows or terminals; frontends drive it.

pub mod geometry;
pub mod projection;
pub mod scene;
pub mod sequencer;
pub mod transform;

// Re-export commonly used types
pub use geometry::{axis_lines, Axis, AxisLine, Mesh, Triangle, Vertex};
pub use projection::{OrbitCamera, ProjectionMode};
pub use scene::{PrimitiveKind, SceneInstance, SceneKind, SceneState, StackCounts};
pub use sequencer::{AffineOp, RecordingMode, SequencerError, TransformSequencer};
pub use transform::{local_to_world, world_to_local, ObjectPose, Transform};
