/// Interaction state threaded through event handling and rendering.
///
/// One `SceneState` is constructed at startup and owns everything the key
/// handlers mutate: the selectable object poses, the orbit camera, the
/// transform sequencer, and the scene arrangement toggles.
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Axis;
use crate::projection::OrbitCamera;
use crate::sequencer::{AffineOp, RecordingMode, SequencerError, TransformSequencer};
use crate::transform::{ObjectPose, Transform};

/// Number of selectable objects
pub const OBJECT_COUNT: usize = 3;

/// Horizontal spacing between shoe-box grid columns
pub const GRID_X_SEPARATION: f32 = 1.5;
/// Depth spacing between shoe-box grid rows
pub const GRID_Z_SEPARATION: f32 = 2.5;

/// The mesh a scene instance is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Cube,
    Cone,
    Sphere,
    ShoeBox,
}

impl PrimitiveKind {
    pub fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "cube",
            PrimitiveKind::Cone => "cone",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::ShoeBox => "shoe-box",
        }
    }
}

/// The selectable objects, in selection-key order
const OBJECT_KINDS: [PrimitiveKind; OBJECT_COUNT] = [
    PrimitiveKind::Cube,
    PrimitiveKind::Cone,
    PrimitiveKind::Sphere,
];

/// Which arrangement is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// The three selectable primitives under direct transform editing
    Objects,
    /// A single shoe-box
    ShoeBox,
    /// A vertical stack of shoe-boxes
    ShoeBoxTower,
    /// An X by Y by Z grid of shoe-boxes
    ShoeBoxGrid,
}

impl SceneKind {
    pub fn next(self) -> Self {
        match self {
            SceneKind::Objects => SceneKind::ShoeBox,
            SceneKind::ShoeBox => SceneKind::ShoeBoxTower,
            SceneKind::ShoeBoxTower => SceneKind::ShoeBoxGrid,
            SceneKind::ShoeBoxGrid => SceneKind::Objects,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Objects => "objects",
            SceneKind::ShoeBox => "shoe-box",
            SceneKind::ShoeBoxTower => "tower",
            SceneKind::ShoeBoxGrid => "grid",
        }
    }
}

/// Shoe-box repetition counts per axis, each at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackCounts {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Default for StackCounts {
    fn default() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }
}

/// One drawable: a mesh kind plus its model matrix
#[derive(Debug, Clone)]
pub struct SceneInstance {
    pub kind: PrimitiveKind,
    pub model: Matrix4<f32>,
}

pub struct SceneState {
    poses: [ObjectPose; OBJECT_COUNT],
    selected: usize,
    pub camera: OrbitCamera,
    sequencer: TransformSequencer,
    scene: SceneKind,
    stacks: StackCounts,
    show_axes: bool,
}

impl SceneState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            poses: [ObjectPose::identity(); OBJECT_COUNT],
            selected: 0,
            camera: OrbitCamera::new(width, height),
            sequencer: TransformSequencer::new(),
            scene: SceneKind::Objects,
            stacks: StackCounts::default(),
            show_axes: true,
        }
    }

    // Object selection ------------------------------------------------

    /// Select one of the manipulable objects; out-of-range indices are
    /// ignored
    pub fn select_object(&mut self, index: usize) {
        if index < OBJECT_COUNT {
            self.selected = index;
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_kind(&self) -> PrimitiveKind {
        OBJECT_KINDS[self.selected]
    }

    pub fn selected_pose(&self) -> &ObjectPose {
        &self.poses[self.selected]
    }

    // Transform edits -------------------------------------------------
    //
    // While idle the edit mutates the selected pose directly; while
    // recording it appends the equivalent operation to the buffer instead.

    pub fn translate_selected(&mut self, local_delta: Vector3<f32>) {
        if self.sequencer.is_recording() {
            self.sequencer
                .record(AffineOp::Translate { delta: local_delta })
                .ok();
            return;
        }
        self.poses[self.selected].translate_local(&local_delta);
    }

    pub fn rotate_selected(&mut self, axis: Axis, angle_deg: f32) {
        if self.sequencer.is_recording() {
            let axis = match axis {
                Axis::X => Vector3::x(),
                Axis::Y => Vector3::y(),
                Axis::Z => Vector3::z(),
            };
            self.sequencer
                .record(AffineOp::Rotate { axis, angle_deg })
                .ok();
            return;
        }

        let delta = match axis {
            Axis::X => Vector3::new(angle_deg, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, angle_deg, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, angle_deg),
        };
        self.poses[self.selected].rotate(&delta);
    }

    pub fn scale_selected(&mut self, factor: f32) {
        if self.sequencer.is_recording() {
            self.sequencer.record(AffineOp::Scale { factor }).ok();
            return;
        }
        self.poses[self.selected].rescale(factor);
    }

    // Sequencer driving -----------------------------------------------

    /// Enter or leave recording mode; returns the mode now in effect
    pub fn toggle_recording(&mut self) -> RecordingMode {
        if self.sequencer.is_recording() {
            self.sequencer.end_recording();
        } else {
            self.sequencer.begin_recording();
        }
        self.sequencer.mode()
    }

    /// Replay the recorded buffer against the selected object and store the
    /// recovered pose. On rejection the pose is left untouched and the
    /// sequencer error is passed back to the caller.
    pub fn replay_on_selected(&mut self) -> Result<(), SequencerError> {
        let replayed = self.sequencer.replay(&self.poses[self.selected])?;
        self.poses[self.selected] = replayed;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.sequencer.is_recording()
    }

    pub fn recorded_ops(&self) -> usize {
        self.sequencer.len()
    }

    // Scene arrangement -----------------------------------------------

    pub fn scene(&self) -> SceneKind {
        self.scene
    }

    pub fn set_scene(&mut self, scene: SceneKind) {
        self.scene = scene;
    }

    pub fn cycle_scene(&mut self) {
        self.scene = self.scene.next();
    }

    pub fn toggle_axes(&mut self) {
        self.show_axes = !self.show_axes;
    }

    pub fn show_axes(&self) -> bool {
        self.show_axes
    }

    pub fn stacks(&self) -> StackCounts {
        self.stacks
    }

    /// Grow or shrink the shoe-box repetition count along one axis; counts
    /// never drop below 1
    pub fn adjust_stacks(&mut self, axis: Axis, delta: i32) {
        let count = match axis {
            Axis::X => &mut self.stacks.x,
            Axis::Y => &mut self.stacks.y,
            Axis::Z => &mut self.stacks.z,
        };
        *count = (*count as i32 + delta).max(1) as u32;
    }

    // Rendering -------------------------------------------------------

    /// Everything to draw for the current arrangement, as mesh kinds with
    /// model matrices
    pub fn instances(&self) -> Vec<SceneInstance> {
        match self.scene {
            SceneKind::Objects => vec![SceneInstance {
                kind: self.selected_kind(),
                model: self.poses[self.selected].matrix(),
            }],
            SceneKind::ShoeBox => vec![SceneInstance {
                kind: PrimitiveKind::ShoeBox,
                model: Matrix4::identity(),
            }],
            SceneKind::ShoeBoxTower => (0..self.stacks.y)
                .map(|y| SceneInstance {
                    kind: PrimitiveKind::ShoeBox,
                    model: Transform::translation(&Vector3::new(0.0, y as f32, 0.0)),
                })
                .collect(),
            SceneKind::ShoeBoxGrid => {
                let mut instances = Vec::new();
                for y in 0..self.stacks.y {
                    for x in 0..self.stacks.x {
                        for z in 0..self.stacks.z {
                            instances.push(SceneInstance {
                                kind: PrimitiveKind::ShoeBox,
                                model: Transform::translation(&Vector3::new(
                                    x as f32 * GRID_X_SEPARATION,
                                    y as f32,
                                    z as f32 * GRID_Z_SEPARATION,
                                )),
                            });
                        }
                    }
                }
                instances
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn state() -> SceneState {
        SceneState::new(80, 40)
    }

    #[test]
    fn test_defaults() {
        let state = state();
        assert_eq!(state.selected_index(), 0);
        assert_eq!(state.selected_kind(), PrimitiveKind::Cube);
        assert_eq!(state.scene(), SceneKind::Objects);
        assert_eq!(state.stacks(), StackCounts { x: 1, y: 1, z: 1 });
        assert!(state.show_axes());
        assert!(!state.is_recording());
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut state = state();
        state.select_object(2);
        state.select_object(7);
        assert_eq!(state.selected_index(), 2);
        assert_eq!(state.selected_kind(), PrimitiveKind::Sphere);
    }

    #[test]
    fn test_direct_translate_respects_object_rotation() {
        let mut state = state();
        state.rotate_selected(Axis::Y, 90.0);
        state.translate_selected(Vector3::new(0.1, 0.0, 0.0));

        let pose = state.selected_pose();
        assert!((pose.translation - Vector3::new(0.0, 0.0, -0.1)).norm() < EPS);
    }

    #[test]
    fn test_recording_appends_instead_of_mutating() {
        let mut state = state();
        state.toggle_recording();
        state.translate_selected(Vector3::new(0.1, 0.0, 0.0));
        state.rotate_selected(Axis::X, 2.0);
        state.scale_selected(1.1);

        assert_eq!(state.recorded_ops(), 3);
        let pose = state.selected_pose();
        assert!(pose.translation.norm() < EPS);
        assert!(pose.rotation_deg.norm() < EPS);
        assert!((pose.scale - 1.0).abs() < EPS);
    }

    #[test]
    fn test_replay_applies_buffer_to_selected() {
        let mut state = state();
        state.toggle_recording();
        state.translate_selected(Vector3::new(0.5, 0.0, 0.0));
        state.translate_selected(Vector3::new(0.0, 0.5, 0.0));
        state.toggle_recording();

        state.replay_on_selected().unwrap();
        let pose = state.selected_pose();
        assert!((pose.translation - Vector3::new(0.5, 0.5, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_rejected_replay_leaves_pose_unchanged() {
        let mut state = state();
        state.translate_selected(Vector3::new(1.0, 0.0, 0.0));

        // Empty buffer
        let before = *state.selected_pose();
        assert_eq!(
            state.replay_on_selected().unwrap_err(),
            SequencerError::EmptyBuffer
        );
        assert_eq!(*state.selected_pose(), before);

        // Still recording
        state.toggle_recording();
        state.scale_selected(2.0);
        assert_eq!(
            state.replay_on_selected().unwrap_err(),
            SequencerError::StillRecording
        );
        assert_eq!(*state.selected_pose(), before);
    }

    #[test]
    fn test_stack_counts_clamp_at_one() {
        let mut state = state();
        state.adjust_stacks(Axis::Y, -1);
        state.adjust_stacks(Axis::Y, -1);
        assert_eq!(state.stacks().y, 1);

        state.adjust_stacks(Axis::Y, 1);
        state.adjust_stacks(Axis::Y, 1);
        assert_eq!(state.stacks().y, 3);
    }

    #[test]
    fn test_cycle_scene_wraps() {
        let mut state = state();
        for _ in 0..4 {
            state.cycle_scene();
        }
        assert_eq!(state.scene(), SceneKind::Objects);
    }

    #[test]
    fn test_tower_instances_follow_stack_count() {
        let mut state = state();
        state.set_scene(SceneKind::ShoeBoxTower);
        state.adjust_stacks(Axis::Y, 2);

        let instances = state.instances();
        assert_eq!(instances.len(), 3);
        assert!(instances
            .iter()
            .all(|i| i.kind == PrimitiveKind::ShoeBox));
        assert!((instances[2].model[(1, 3)] - 2.0).abs() < EPS);
    }

    #[test]
    fn test_grid_instances_use_separations() {
        let mut state = state();
        state.set_scene(SceneKind::ShoeBoxGrid);
        state.adjust_stacks(Axis::X, 1);
        state.adjust_stacks(Axis::Z, 1);

        let instances = state.instances();
        assert_eq!(instances.len(), 4);

        let far = instances.last().unwrap();
        assert!((far.model[(0, 3)] - GRID_X_SEPARATION).abs() < EPS);
        assert!((far.model[(2, 3)] - GRID_Z_SEPARATION).abs() < EPS);
    }

    #[test]
    fn test_objects_scene_draws_only_selection() {
        let mut state = state();
        state.select_object(1);

        let instances = state.instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].kind, PrimitiveKind::Cone);
    }
}
