/// Recorded affine operation buffer and matrix replay
use nalgebra::{Matrix4, Vector3};
use thiserror::Error;

use crate::transform::{ObjectPose, Transform};

/// A single recorded affine operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AffineOp {
    /// Displacement in the coordinate frame active when the op is applied
    Translate { delta: Vector3<f32> },
    /// Rotation about an axis by a signed angle in degrees. In-system usage
    /// always passes a unit coordinate axis, but arbitrary axes are accepted.
    Rotate { axis: Vector3<f32>, angle_deg: f32 },
    /// Uniform scale on all three axes
    Scale { factor: f32 },
}

impl AffineOp {
    /// Build the operation's own 4x4 matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        match self {
            AffineOp::Translate { delta } => Transform::translation(delta),
            AffineOp::Rotate { axis, angle_deg } => {
                Transform::rotation_axis_angle(axis, *angle_deg)
            }
            AffineOp::Scale { factor } => Transform::scaling(*factor),
        }
    }
}

/// Whether edits are applied directly or appended to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    #[default]
    Idle,
    Recording,
}

/// Contract violations on the sequencer. Rejected calls never touch state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequencerError {
    #[error("operation recorded while not in recording mode")]
    NotRecording,
    #[error("replay requested while still recording")]
    StillRecording,
    #[error("replay requested with an empty buffer")]
    EmptyBuffer,
}

/// Records an ordered sequence of affine operations and replays them against
/// an object pose by composing one matrix and decomposing the result.
///
/// At most one buffer is open at a time: starting a new recording discards
/// the previous one, ending a recording keeps the buffer for replay.
#[derive(Debug, Clone, Default)]
pub struct TransformSequencer {
    ops: Vec<AffineOp>,
    mode: RecordingMode,
}

impl TransformSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.mode == RecordingMode::Recording
    }

    /// The buffered operations, in application order
    pub fn ops(&self) -> &[AffineOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Clear the buffer and start appending
    pub fn begin_recording(&mut self) {
        self.ops.clear();
        self.mode = RecordingMode::Recording;
    }

    /// Stop appending; the buffer is kept for replay
    pub fn end_recording(&mut self) {
        self.mode = RecordingMode::Idle;
    }

    /// Append an operation to the open buffer
    pub fn record(&mut self, op: AffineOp) -> Result<(), SequencerError> {
        if !self.is_recording() {
            return Err(SequencerError::NotRecording);
        }
        self.ops.push(op);
        Ok(())
    }

    /// Compose the buffered operations with the target's own transform and
    /// decompose the product back into a pose.
    ///
    /// Starting from identity, each buffered op's matrix is right-multiplied
    /// in recorded order, then the target's pose matrix
    /// (`T * Rz * Ry * Rx * S`). The caller is responsible for storing the
    /// returned pose; the target itself is never touched.
    pub fn replay(&self, target: &ObjectPose) -> Result<ObjectPose, SequencerError> {
        if self.is_recording() {
            return Err(SequencerError::StillRecording);
        }
        if self.ops.is_empty() {
            return Err(SequencerError::EmptyBuffer);
        }

        let mut composed = Matrix4::identity();
        for op in &self.ops {
            composed *= op.matrix();
        }
        composed *= target.matrix();

        Ok(ObjectPose::from_matrix(&composed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn record_all(sequencer: &mut TransformSequencer, ops: &[AffineOp]) {
        sequencer.begin_recording();
        for op in ops {
            sequencer.record(*op).unwrap();
        }
        sequencer.end_recording();
    }

    #[test]
    fn test_pure_translations_sum() {
        let mut sequencer = TransformSequencer::new();
        record_all(
            &mut sequencer,
            &[
                AffineOp::Translate {
                    delta: Vector3::new(0.1, 0.0, 0.0),
                },
                AffineOp::Translate {
                    delta: Vector3::new(0.1, 0.0, 0.0),
                },
                AffineOp::Translate {
                    delta: Vector3::new(0.0, 0.2, -0.5),
                },
            ],
        );

        let result = sequencer.replay(&ObjectPose::identity()).unwrap();
        assert!((result.translation - Vector3::new(0.2, 0.2, -0.5)).norm() < EPS);
        assert!(result.rotation_deg.norm() < EPS);
        assert!((result.scale - 1.0).abs() < EPS);
    }

    #[test]
    fn test_single_x_rotation_recovered() {
        let mut sequencer = TransformSequencer::new();
        record_all(
            &mut sequencer,
            &[AffineOp::Rotate {
                axis: Vector3::x(),
                angle_deg: 30.0,
            }],
        );

        let result = sequencer.replay(&ObjectPose::identity()).unwrap();
        assert!((result.rotation_deg.x - 30.0).abs() < EPS);
        assert!(result.rotation_deg.y.abs() < EPS);
        assert!(result.rotation_deg.z.abs() < EPS);
    }

    #[test]
    fn test_single_uniform_scale_recovered() {
        let mut sequencer = TransformSequencer::new();
        record_all(&mut sequencer, &[AffineOp::Scale { factor: 2.0 }]);

        let result = sequencer.replay(&ObjectPose::identity()).unwrap();
        assert!((result.scale - 2.0).abs() < EPS);
        assert!(result.translation.norm() < EPS);
        assert!(result.rotation_deg.norm() < EPS);
    }

    #[test]
    fn test_rotation_and_scale_mix_decomposes() {
        let mut sequencer = TransformSequencer::new();
        record_all(
            &mut sequencer,
            &[
                AffineOp::Rotate {
                    axis: Vector3::x(),
                    angle_deg: 30.0,
                },
                AffineOp::Scale { factor: 2.0 },
            ],
        );

        let result = sequencer.replay(&ObjectPose::identity()).unwrap();
        assert!((result.rotation_deg.x - 30.0).abs() < EPS);
        assert!((result.scale - 2.0).abs() < EPS);
    }

    #[test]
    fn test_replay_against_posed_target() {
        let target = ObjectPose::new(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), 1.0);

        let mut sequencer = TransformSequencer::new();
        record_all(
            &mut sequencer,
            &[AffineOp::Translate {
                delta: Vector3::new(0.0, 2.0, 0.0),
            }],
        );

        let result = sequencer.replay(&target).unwrap();
        assert!((result.translation - Vector3::new(1.0, 2.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let sequencer = TransformSequencer::new();
        let err = sequencer.replay(&ObjectPose::identity()).unwrap_err();
        assert_eq!(err, SequencerError::EmptyBuffer);
    }

    #[test]
    fn test_replay_while_recording_rejected() {
        let mut sequencer = TransformSequencer::new();
        sequencer.begin_recording();
        sequencer
            .record(AffineOp::Scale { factor: 2.0 })
            .unwrap();

        let err = sequencer.replay(&ObjectPose::identity()).unwrap_err();
        assert_eq!(err, SequencerError::StillRecording);
    }

    #[test]
    fn test_record_while_idle_rejected() {
        let mut sequencer = TransformSequencer::new();
        let err = sequencer
            .record(AffineOp::Scale { factor: 2.0 })
            .unwrap_err();
        assert_eq!(err, SequencerError::NotRecording);
        assert!(sequencer.is_empty());
    }

    #[test]
    fn test_begin_recording_discards_previous_buffer() {
        let mut sequencer = TransformSequencer::new();
        sequencer.begin_recording();
        sequencer
            .record(AffineOp::Scale { factor: 2.0 })
            .unwrap();
        sequencer
            .record(AffineOp::Rotate {
                axis: Vector3::y(),
                angle_deg: 45.0,
            })
            .unwrap();

        sequencer.begin_recording();
        assert!(sequencer.is_empty());
    }

    #[test]
    fn test_end_recording_retains_buffer() {
        let mut sequencer = TransformSequencer::new();
        sequencer.begin_recording();
        sequencer
            .record(AffineOp::Translate {
                delta: Vector3::new(1.0, 0.0, 0.0),
            })
            .unwrap();
        sequencer.end_recording();

        assert_eq!(sequencer.len(), 1);
        assert!(sequencer.replay(&ObjectPose::identity()).is_ok());
    }
}
