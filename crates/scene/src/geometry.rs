use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Tessellated geometry: parallel position/normal arrays plus triangle indices.
///
/// Winding is counter-clockwise when viewed from outside the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Parametric geometry for the shapes the demo draws.
///
/// The parameters are the authoring surface; `tessellate` produces the
/// triangle soup a backend uploads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Axis-aligned box centered on the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Rectangle in the XY plane facing +Z, centered on the origin.
    Plane { width: f32, height: f32 },
    /// UV sphere centered on the origin.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Geometry::Plane { width, height } => plane_mesh(width, height),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere_mesh(radius, width_segments.max(3), height_segments.max(2)),
        }
    }
}

fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    // Four vertices per face so normals stay flat.
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0,  1.0], [[-hw, -hh,  hd], [ hw, -hh,  hd], [ hw,  hh,  hd], [-hw,  hh,  hd]]),
        ([0.0, 0.0, -1.0], [[ hw, -hh, -hd], [-hw, -hh, -hd], [-hw,  hh, -hd], [ hw,  hh, -hd]]),
        ([ 1.0, 0.0, 0.0], [[ hw, -hh,  hd], [ hw, -hh, -hd], [ hw,  hh, -hd], [ hw,  hh,  hd]]),
        ([-1.0, 0.0, 0.0], [[-hw, -hh, -hd], [-hw, -hh,  hd], [-hw,  hh,  hd], [-hw,  hh, -hd]]),
        ([0.0,  1.0, 0.0], [[-hw,  hh,  hd], [ hw,  hh,  hd], [ hw,  hh, -hd], [-hw,  hh, -hd]]),
        ([0.0, -1.0, 0.0], [[-hw, -hh, -hd], [ hw, -hh, -hd], [ hw, -hh,  hd], [-hw, -hh,  hd]]),
    ];

    let mut data = MeshData::default();
    for (normal, corners) in faces {
        let base = data.positions.len() as u32;
        for corner in corners {
            data.positions.push(corner);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    data
}

fn plane_mesh(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width / 2.0, height / 2.0);
    MeshData {
        positions: vec![
            [-hw, -hh, 0.0],
            [hw, -hh, 0.0],
            [hw, hh, 0.0],
            [-hw, hh, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut data = MeshData::default();

    for ring in 0..=height_segments {
        let theta = ring as f32 / height_segments as f32 * PI;
        let (ring_radius, y) = (theta.sin() * radius, theta.cos() * radius);
        for step in 0..=width_segments {
            let phi = step as f32 / width_segments as f32 * TAU;
            let position = [ring_radius * phi.cos(), y, ring_radius * phi.sin()];
            data.positions.push(position);
            data.normals.push([
                position[0] / radius,
                position[1] / radius,
                position[2] / radius,
            ]);
        }
    }

    let stride = width_segments + 1;
    for ring in 0..height_segments {
        for step in 0..width_segments {
            let a = ring * stride + step;
            let b = a + stride;
            data.indices.extend_from_slice(&[a, b + 1, b, a, a + 1, b + 1]);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_24_vertices_and_12_triangles() {
        let data = Geometry::Box {
            width: 1.0,
            height: 2.0,
            depth: 3.0,
        }
        .tessellate();
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        // Extents match the requested dimensions.
        let max_y = data.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn plane_is_two_triangles_facing_plus_z() {
        let data = Geometry::Plane {
            width: 4.0,
            height: 4.0,
        }
        .tessellate();
        assert_eq!(data.triangle_count(), 2);
        assert!(data.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let radius = 0.05;
        let data = Geometry::Sphere {
            radius,
            width_segments: 24,
            height_segments: 24,
        }
        .tessellate();
        for p in &data.positions {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - radius).abs() < 1e-5);
        }
        assert_eq!(data.triangle_count(), 24 * 24 * 2);
    }

    #[test]
    fn sphere_indices_stay_in_range() {
        let data = Geometry::Sphere {
            radius: 1.0,
            width_segments: 8,
            height_segments: 6,
        }
        .tessellate();
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
    }
}
