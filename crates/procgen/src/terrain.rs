//! Terrain mesh construction from a finished heightfield.
//!
//! Vertex `(x, y)` of the grid gets index `x * height + y`, matching the
//! heightfield's storage order. Each grid cell becomes two triangles wound so
//! that a flat field faces +Y.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::height_bands::height_color;
use crate::heightfield::Heightfield;

/// World-space height of a normalized value of 1.0.
pub const HEIGHT_SCALE: f32 = 50.0;

/// Interleaved vertex for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Height-band color.
    pub color: [f32; 4],
}

/// Triangulated terrain surface as parallel per-vertex arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub positions: Vec<Vec3>,
    /// Vertex indices, three per triangle.
    pub triangles: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<[f32; 4]>,
    pub normals: Vec<Vec3>,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Interleave the parallel arrays into GPU-ready vertices.
    pub fn to_vertices(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .zip(&self.colors)
            .map(|(((p, n), uv), color)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
                color: *color,
            })
            .collect()
    }

    /// Recompute smooth normals from positions and triangle winding.
    pub fn recalculate_normals(&mut self) {
        self.normals = calculate_normals(&self.positions, &self.triangles);
    }

    /// Lowest and highest vertex Y.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        if self.positions.is_empty() {
            return None;
        }
        Some(
            self.positions
                .iter()
                .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y))),
        )
    }
}

/// Build the mesh for `field`, lifting heights by `height_scale`.
///
/// Indices are `u32`, so the field must have at most `u32::MAX` cells;
/// `TerrainSettings::validate` rejects larger grids.
pub fn build_mesh(field: &Heightfield, height_scale: f32) -> TerrainMesh {
    let width = field.width();
    let height = field.height();
    let vertex_count = width * height;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut triangles = Vec::with_capacity((width - 1) * (height - 1) * 6);

    for x in 0..width {
        for y in 0..height {
            let h = field.get(x, y);
            positions.push(Vec3::new(x as f32, h * height_scale, y as f32));
            uvs.push(Vec2::new(x as f32 / width as f32, y as f32 / height as f32));
            colors.push(height_color(h));

            if x < width - 1 && y < height - 1 {
                let v00 = (x * height + y) as u32;
                let v01 = v00 + 1;
                let v10 = v00 + height as u32;
                let v11 = v10 + 1;

                triangles.extend_from_slice(&[v00, v11, v10]);
                triangles.extend_from_slice(&[v00, v01, v11]);
            }
        }
    }

    let normals = calculate_normals(&positions, &triangles);

    log::debug!(
        "terrain mesh {}x{}: {} vertices, {} triangles",
        width,
        height,
        positions.len(),
        triangles.len() / 3
    );

    TerrainMesh {
        positions,
        triangles,
        uvs,
        colors,
        normals,
    }
}

/// Average the unit face normals of every triangle touching each vertex.
fn calculate_normals(positions: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in triangles.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let v0 = positions[i0];
        let v1 = positions[i1];
        let v2 = positions[i2];

        let n = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        normals[i0] += n;
        normals[i1] += n;
        normals[i2] += n;
    }

    // Vertices with no triangles (1-wide fields) point straight up.
    for n in &mut normals {
        *n = n.try_normalize().unwrap_or(Vec3::Y);
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_sizes_match_grid() {
        for (w, h) in [(2, 2), (5, 3), (10, 10), (7, 12)] {
            let field = Heightfield::filled(w, h, 0.5).unwrap();
            let mesh = build_mesh(&field, HEIGHT_SCALE);
            assert_eq!(mesh.positions.len(), w * h);
            assert_eq!(mesh.uvs.len(), w * h);
            assert_eq!(mesh.colors.len(), w * h);
            assert_eq!(mesh.normals.len(), w * h);
            assert_eq!(mesh.triangles.len(), (w - 1) * (h - 1) * 6);
            assert!(mesh.triangles.iter().all(|&i| (i as usize) < w * h));
        }
    }

    #[test]
    fn non_square_grid_indices_stay_in_cell() {
        // Each triangle must join vertices at most one step apart on each axis.
        let field = Heightfield::new(4, 9).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        for tri in mesh.triangles.chunks_exact(3) {
            for &a in tri {
                for &b in tri {
                    let pa = mesh.positions[a as usize];
                    let pb = mesh.positions[b as usize];
                    assert!((pa.x - pb.x).abs() <= 1.0);
                    assert!((pa.z - pb.z).abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn triangles_are_not_degenerate() {
        let field = Heightfield::from_fn(6, 6, |x, y| ((x * y) % 3) as f32 * 0.3).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        for tri in mesh.triangles.chunks_exact(3) {
            assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    #[test]
    fn flat_field_faces_up() {
        let field = Heightfield::filled(5, 5, 0.3).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        for tri in mesh.triangles.chunks_exact(3) {
            let v0 = mesh.positions[tri[0] as usize];
            let v1 = mesh.positions[tri[1] as usize];
            let v2 = mesh.positions[tri[2] as usize];
            let face = (v1 - v0).cross(v2 - v0).normalize();
            assert!((face - Vec3::Y).length() < 1e-5);
        }
        for n in &mesh.normals {
            assert!((*n - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn slope_normals_lean_downhill() {
        // Height rises with x, so normals tilt toward -x.
        let field = Heightfield::from_fn(4, 4, |x, _| x as f32 * 0.1).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        for n in &mesh.normals {
            assert!(n.x < 0.0);
            assert!(n.y > 0.0);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn vertex_attributes() {
        let field = Heightfield::from_fn(4, 2, |x, _| x as f32 / 3.0).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        // (x=3, y=1) sits at index 3 * 2 + 1.
        let i = 7;
        assert_eq!(mesh.positions[i], Vec3::new(3.0, HEIGHT_SCALE, 1.0));
        assert_eq!(mesh.uvs[i], Vec2::new(0.75, 0.5));
        assert_eq!(mesh.colors[i], height_color(1.0));
        assert_eq!(mesh.colors[0], height_color(0.0));
    }

    #[test]
    fn single_row_has_no_triangles() {
        let field = Heightfield::filled(6, 1, 0.9).unwrap();
        let mesh = build_mesh(&field, HEIGHT_SCALE);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.triangles.is_empty());
        assert!(mesh.normals.iter().all(|&n| n == Vec3::Y));
    }

    #[test]
    fn interleaved_vertices_mirror_arrays() {
        let field = Heightfield::from_fn(3, 3, |x, y| (x + y) as f32 / 4.0).unwrap();
        let mesh = build_mesh(&field, 10.0);
        let verts = mesh.to_vertices();
        assert_eq!(verts.len(), 9);
        assert_eq!(verts[4].position, mesh.positions[4].to_array());
        assert_eq!(verts[4].color, mesh.colors[4]);
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 12 * 4);
        assert_eq!(bytemuck::cast_slice::<TerrainVertex, u8>(&verts).len(), 9 * 48);
    }

    #[test]
    fn recalculating_normals_is_stable() {
        let field = Heightfield::from_fn(5, 5, |x, y| ((x as f32).sin() + y as f32) * 0.1).unwrap();
        let mut mesh = build_mesh(&field, HEIGHT_SCALE);
        let before = mesh.normals.clone();
        mesh.recalculate_normals();
        assert_eq!(before, mesh.normals);
    }
}
