/// Affine matrix construction and pose decomposition
use nalgebra::{Matrix4, Unit, Vector3};

/// Canonical pose of a manipulable object: translation, Euler rotation
/// (degrees), and a single uniform scale factor.
///
/// The rotation matrix is composed as `Rz * Ry * Rx` (X-rotation innermost)
/// and the full pose matrix in the fixed order `T * Rz * Ry * Rx * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub translation: Vector3<f32>,
    pub rotation_deg: Vector3<f32>,
    pub scale: f32,
}

impl ObjectPose {
    pub fn new(translation: Vector3<f32>, rotation_deg: Vector3<f32>, scale: f32) -> Self {
        Self {
            translation,
            rotation_deg,
            scale,
        }
    }

    /// The untransformed pose: zero translation and rotation, scale one
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation_deg: Vector3::zeros(),
            scale: 1.0,
        }
    }

    /// Build the pose's 4x4 matrix: `T * Rz * Ry * Rx * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::translation(&self.translation)
            * Transform::rotation_from_euler_deg(&self.rotation_deg)
            * Transform::scaling(self.scale)
    }

    /// Recover a pose from a composed affine matrix.
    ///
    /// Translation is read from the translation column, scale as the norm of
    /// the first rotation column. The scale estimate assumes the matrix
    /// carries a uniform, skew-free scale; feeding it a non-uniform scale
    /// yields a wrong pose rather than an error. Rotation angles come from
    /// the X-Y-Z Euler extraction on the scale-normalized upper 3x3; with
    /// `cos(ry)` near zero (gimbal lock) the split between `rx` and `rz` is
    /// numerically unstable and the result, while a valid pose, may be
    /// visually surprising.
    pub fn from_matrix(m: &Matrix4<f32>) -> Self {
        let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        let scale = Vector3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]).norm();

        // Divide the uniform scale back out before reading angles
        let inv = if scale > 0.0 { 1.0 / scale } else { 1.0 };
        let ry = (-m[(2, 0)] * inv).clamp(-1.0, 1.0).asin();
        let cy = ry.cos();
        let rx = (m[(2, 1)] * inv / cy).atan2(m[(2, 2)] * inv / cy);
        let rz = (m[(1, 0)] * inv / cy).atan2(m[(0, 0)] * inv / cy);

        Self {
            translation,
            rotation_deg: Vector3::new(rx.to_degrees(), ry.to_degrees(), rz.to_degrees()),
            scale,
        }
    }

    /// Translate along the object's local axes by rotating the displacement
    /// into world space first
    pub fn translate_local(&mut self, local_delta: &Vector3<f32>) {
        self.translation += local_to_world(&self.rotation_deg, local_delta);
    }

    /// Add to the Euler angles, in degrees
    pub fn rotate(&mut self, delta_deg: &Vector3<f32>) {
        self.rotation_deg += delta_deg;
    }

    /// Multiply the uniform scale factor
    pub fn rescale(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

impl Default for ObjectPose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 4x4 affine matrices
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(delta: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(delta)
    }

    /// Create a rotation matrix about the X axis (angle in degrees)
    pub fn rotation_x(angle_deg: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(angle_deg.to_radians(), 0.0, 0.0))
    }

    /// Create a rotation matrix about the Y axis (angle in degrees)
    pub fn rotation_y(angle_deg: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle_deg.to_radians(), 0.0))
    }

    /// Create a rotation matrix about the Z axis (angle in degrees)
    pub fn rotation_z(angle_deg: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle_deg.to_radians()))
    }

    /// Create a rotation matrix about an arbitrary axis (angle in degrees)
    pub fn rotation_axis_angle(axis: &Vector3<f32>, angle_deg: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Unit::new_normalize(*axis), angle_deg.to_radians())
    }

    /// Create a uniform scaling matrix
    pub fn scaling(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Create an Euler rotation matrix from per-axis angles in degrees,
    /// applied in order Z, Y, X (X innermost)
    pub fn rotation_from_euler_deg(rotation_deg: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_z(rotation_deg.z)
            * Self::rotation_y(rotation_deg.y)
            * Self::rotation_x(rotation_deg.x)
    }
}

/// Rotate a local-frame displacement into world space using an object's
/// current Euler rotation
pub fn local_to_world(rotation_deg: &Vector3<f32>, local: &Vector3<f32>) -> Vector3<f32> {
    Transform::rotation_from_euler_deg(rotation_deg).transform_vector(local)
}

/// Rotate a world-frame displacement back into an object's local frame.
/// The rotation block is orthonormal, so the transpose is the exact inverse.
pub fn world_to_local(rotation_deg: &Vector3<f32>, world: &Vector3<f32>) -> Vector3<f32> {
    Transform::rotation_from_euler_deg(rotation_deg)
        .transpose()
        .transform_vector(world)
}
