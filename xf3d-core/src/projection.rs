/// Orbit camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Closest the camera may orbit to the origin; zooming in stops here
/// instead of flipping through the scene
pub const MIN_RADIUS: f32 = 0.5;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A camera orbiting the origin on a sphere, described by distance and two
/// angles in degrees
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub radius: f32,
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub aspect: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            radius: 3.0,
            azimuth_deg: 45.0,
            elevation_deg: 20.0,
            aspect: width as f32 / height.max(1) as f32,
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Swing the camera around the origin by delta angles (in degrees)
    pub fn orbit(&mut self, d_azimuth_deg: f32, d_elevation_deg: f32) {
        self.azimuth_deg += d_azimuth_deg;
        self.elevation_deg += d_elevation_deg;
    }

    /// Move toward (negative delta) or away from the origin, clamped at
    /// [`MIN_RADIUS`]
    pub fn zoom(&mut self, d_radius: f32) {
        self.radius = (self.radius + d_radius).max(MIN_RADIUS);
    }

    /// Eye position on the orbit sphere
    pub fn eye(&self) -> Point3<f32> {
        let azimuth = self.azimuth_deg.to_radians();
        let elevation = self.elevation_deg.to_radians();

        Point3::new(
            self.radius * elevation.cos() * azimuth.cos(),
            self.radius * elevation.sin(),
            self.radius * elevation.cos() * azimuth.sin(),
        )
    }

    /// Create the view matrix (camera transformation), always looking at
    /// the origin
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // View extent follows the orbit radius so zoom keys work in
                // both modes
                let height = self.radius;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Points behind the eye (or on the projection plane) are dropped
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_camera_creation() {
        let camera = OrbitCamera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < EPS);
    }

    #[test]
    fn test_eye_placement() {
        let mut camera = OrbitCamera::new(800, 600);
        camera.radius = 2.0;

        camera.azimuth_deg = 0.0;
        camera.elevation_deg = 0.0;
        assert!((camera.eye() - Point3::new(2.0, 0.0, 0.0)).norm() < EPS);

        camera.azimuth_deg = 90.0;
        assert!((camera.eye() - Point3::new(0.0, 0.0, 2.0)).norm() < EPS);

        camera.azimuth_deg = 0.0;
        camera.elevation_deg = 90.0;
        assert!((camera.eye() - Point3::new(0.0, 2.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_zoom_clamps_at_min_radius() {
        let mut camera = OrbitCamera::new(800, 600);
        camera.radius = 0.6;

        camera.zoom(-0.2);
        camera.zoom(-0.2);
        assert!((camera.radius - MIN_RADIUS).abs() < EPS);

        camera.zoom(0.2);
        assert!((camera.radius - (MIN_RADIUS + 0.2)).abs() < EPS);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = OrbitCamera::new(80, 40);
        let (x, y, _depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();

        assert!((x - 40.0).abs() < 0.5);
        assert!((y - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_point_behind_eye_is_dropped() {
        let mut camera = OrbitCamera::new(80, 40);
        camera.radius = 3.0;
        camera.azimuth_deg = 0.0;
        camera.elevation_deg = 0.0;

        // Eye sits at (3, 0, 0) looking at the origin; this point is behind it
        let behind = Point3::new(5.0, 0.0, 0.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }
}
