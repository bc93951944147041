/// Geometry primitives for 3D rendering
use std::f32::consts::PI;

use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A coordinate-axis line segment through the origin
#[derive(Debug, Clone, Copy)]
pub struct AxisLine {
    pub axis: Axis,
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

/// The three coordinate axes as line segments of the given half extent
pub fn axis_lines(half_extent: f32) -> [AxisLine; 3] {
    let h = half_extent;
    [
        AxisLine {
            axis: Axis::X,
            start: Point3::new(-h, 0.0, 0.0),
            end: Point3::new(h, 0.0, 0.0),
        },
        AxisLine {
            axis: Axis::Y,
            start: Point3::new(0.0, -h, 0.0),
            end: Point3::new(0.0, h, 0.0),
        },
        AxisLine {
            axis: Axis::Z,
            start: Point3::new(0.0, 0.0, -h),
            end: Point3::new(0.0, 0.0, h),
        },
    ]
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a quad as two triangles sharing a flat normal
    fn add_quad(&mut self, corners: [Point3<f32>; 4], normal: Vector3<f32>) {
        let v = |p: Point3<f32>| Vertex {
            position: p,
            normal,
        };
        self.add_triangle(Triangle::new(v(corners[0]), v(corners[1]), v(corners[2])));
        self.add_triangle(Triangle::new(v(corners[0]), v(corners[2]), v(corners[3])));
    }

    /// Bake an affine transform into the mesh. Positions are transformed
    /// and flat face normals recomputed from the new winding.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.triangles.len());
        for triangle in &self.triangles {
            let mut vertices = triangle.vertices;
            for vertex in &mut vertices {
                vertex.position = matrix.transform_point(&vertex.position);
            }

            let mut moved = Triangle::new(vertices[0], vertices[1], vertices[2]);
            let normal = moved.calculate_normal();
            for vertex in &mut moved.vertices {
                vertex.normal = normal;
            }
            mesh.add_triangle(moved);
        }
        mesh
    }

    /// Merge another mesh's triangles into this one
    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Create an axis-aligned cube centered at the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = Point3::new;

        // Each face: outward normal plus corners wound counter-clockwise
        // viewed from outside
        let faces = [
            (
                Vector3::new(0.0, 0.0, 1.0),
                [p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)],
            ),
            (
                Vector3::new(0.0, 0.0, -1.0),
                [p(-h, -h, -h), p(-h, h, -h), p(h, h, -h), p(h, -h, -h)],
            ),
            (
                Vector3::new(0.0, 1.0, 0.0),
                [p(-h, h, -h), p(-h, h, h), p(h, h, h), p(h, h, -h)],
            ),
            (
                Vector3::new(0.0, -1.0, 0.0),
                [p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)],
            ),
            (
                Vector3::new(1.0, 0.0, 0.0),
                [p(h, -h, -h), p(h, h, -h), p(h, h, h), p(h, -h, h)],
            ),
            (
                Vector3::new(-1.0, 0.0, 0.0),
                [p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)],
            ),
        ];

        let mut mesh = Self::with_capacity(12);
        for (normal, corners) in faces {
            mesh.add_quad(corners, normal);
        }
        mesh
    }

    /// Create a cone with its base circle in the XZ plane and the apex up
    /// the Y axis, centered at the origin
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let apex = Point3::new(0.0, half, 0.0);
        let base_center = Point3::new(0.0, -half, 0.0);

        let rim = |i: u32| {
            let angle = 2.0 * PI * i as f32 / segments as f32;
            Point3::new(radius * angle.cos(), -half, radius * angle.sin())
        };

        let mut mesh = Self::with_capacity(2 * segments as usize);
        for i in 0..segments {
            let a = rim(i);
            let b = rim(i + 1);

            // Side face, flat-shaded
            let mut side = Triangle::new(
                Vertex::new(apex.x, apex.y, apex.z, 0.0, 0.0, 0.0),
                Vertex::new(b.x, b.y, b.z, 0.0, 0.0, 0.0),
                Vertex::new(a.x, a.y, a.z, 0.0, 0.0, 0.0),
            );
            let normal = side.calculate_normal();
            for vertex in &mut side.vertices {
                vertex.normal = normal;
            }
            mesh.add_triangle(side);

            // Base fan, facing down
            mesh.add_triangle(Triangle::new(
                Vertex::new(base_center.x, base_center.y, base_center.z, 0.0, -1.0, 0.0),
                Vertex::new(a.x, a.y, a.z, 0.0, -1.0, 0.0),
                Vertex::new(b.x, b.y, b.z, 0.0, -1.0, 0.0),
            ));
        }
        mesh
    }

    /// Create a UV sphere centered at the origin. `rings` is the number of
    /// latitude bands, `segments` the slices per band.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let at = |ring: u32, segment: u32| {
            let theta = PI * ring as f32 / rings as f32;
            let phi = 2.0 * PI * segment as f32 / segments as f32;
            Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            )
        };
        let vertex = |p: Point3<f32>| {
            // A sphere's outward normal is just the normalized position
            let n = p.coords / radius;
            Vertex::new(p.x, p.y, p.z, n.x, n.y, n.z)
        };

        let mut mesh = Self::with_capacity((2 * segments * (rings - 1)) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let p00 = at(ring, segment);
                let p01 = at(ring, segment + 1);
                let p10 = at(ring + 1, segment);
                let p11 = at(ring + 1, segment + 1);

                if ring > 0 {
                    mesh.add_triangle(Triangle::new(vertex(p00), vertex(p01), vertex(p11)));
                }
                if ring < rings - 1 {
                    mesh.add_triangle(Triangle::new(vertex(p00), vertex(p11), vertex(p10)));
                }
            }
        }
        mesh
    }

    /// Create the two-part stacked box used by the shoe-box scenes: an
    /// elongated base with a thin overhanging lid
    pub fn shoe_box() -> Self {
        let base = Self::cube(1.0)
            .transformed(&Matrix4::new_nonuniform_scaling(&Vector3::new(
                1.0, 1.0, 2.0,
            )));
        let lid = Self::cube(1.0).transformed(
            &(Matrix4::new_translation(&Vector3::new(0.0, 0.4, 0.0))
                * Matrix4::new_nonuniform_scaling(&Vector3::new(1.1, 0.2, 2.1))),
        );

        let mut mesh = base;
        mesh.extend(lid);
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_cube_triangle_count() {
        assert_eq!(Mesh::cube(2.0).triangles.len(), 12);
    }

    #[test]
    fn test_cone_triangle_count() {
        // One side face and one base-fan face per segment
        assert_eq!(Mesh::cone(0.5, 1.0, 16).triangles.len(), 32);
    }

    #[test]
    fn test_sphere_triangle_count() {
        // Pole bands contribute one triangle per segment, the rest two
        assert_eq!(Mesh::sphere(0.5, 8, 4).triangles.len(), 48);
    }

    #[test]
    fn test_shoe_box_is_two_cubes() {
        assert_eq!(Mesh::shoe_box().triangles.len(), 24);
    }

    #[test]
    fn test_transformed_moves_positions() {
        let moved = Mesh::cube(2.0)
            .transformed(&Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)));

        for triangle in &moved.triangles {
            for vertex in &triangle.vertices {
                assert!(vertex.position.x >= 9.0 - EPS);
            }
        }
    }

    #[test]
    fn test_transformed_keeps_outward_normals() {
        let moved = Mesh::cube(2.0)
            .transformed(&Matrix4::new_translation(&Vector3::new(0.0, 5.0, 0.0)));

        // Winding is preserved, so every face normal still points away from
        // the (moved) cube center
        for triangle in &moved.triangles {
            let center = (triangle.vertices[0].position.coords
                + triangle.vertices[1].position.coords
                + triangle.vertices[2].position.coords)
                / 3.0
                - Vector3::new(0.0, 5.0, 0.0);
            assert!(triangle.calculate_normal().dot(&center) > 0.0);
        }
    }

    #[test]
    fn test_axis_lines_span_both_sides() {
        let lines = axis_lines(2.0);
        assert_eq!(lines.len(), 3);
        assert!((lines[0].start.x + 2.0).abs() < EPS);
        assert!((lines[0].end.x - 2.0).abs() < EPS);
        assert_eq!(lines[1].axis, Axis::Y);
    }
}
