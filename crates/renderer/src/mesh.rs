//! Mesh payloads ready for upload.

use procgen::TerrainMesh;

use crate::assets::{AssetStore, Material, TERRAIN_MATERIAL};
use crate::vertex::Vertex;

/// Interleaved vertex and index data before GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_terrain(mesh: &TerrainMesh) -> Self {
        Self {
            vertices: mesh.to_vertices(),
            indices: mesh.triangles.clone(),
        }
    }

    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Terrain mesh plus the material it should be drawn with.
#[derive(Debug, Clone)]
pub struct TerrainRenderable {
    pub mesh: MeshData,
    /// `None` when the terrain material is unavailable; draw with vertex colors only.
    pub material: Option<Material>,
}

impl TerrainRenderable {
    /// Interleave `mesh` and resolve the terrain material.
    pub fn prepare(mesh: &TerrainMesh, assets: &dyn AssetStore) -> Self {
        let material = match assets.load_material(TERRAIN_MATERIAL) {
            Ok(material) => Some(material),
            Err(e) => {
                log::warn!("Terrain material not found, using vertex colors: {}", e);
                None
            }
        };
        Self {
            mesh: MeshData::from_terrain(mesh),
            material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use procgen::{build_mesh, Heightfield, HEIGHT_SCALE};

    fn sample_mesh() -> TerrainMesh {
        let field = Heightfield::from_fn(4, 3, |x, y| (x + y) as f32 / 5.0).unwrap();
        build_mesh(&field, HEIGHT_SCALE)
    }

    #[test]
    fn byte_views_cover_buffers() {
        let data = MeshData::from_terrain(&sample_mesh());
        assert_eq!(data.vertex_bytes().len(), 12 * std::mem::size_of::<Vertex>());
        assert_eq!(data.index_bytes().len(), data.indices.len() * 4);
        assert_eq!(data.num_indices(), 3 * 2 * 6);
    }

    #[test]
    fn missing_material_is_not_fatal() {
        let renderable = TerrainRenderable::prepare(&sample_mesh(), &MemoryAssets::new());
        assert!(renderable.material.is_none());
        assert_eq!(renderable.mesh.vertices.len(), 12);
    }

    #[test]
    fn material_attached_when_present() {
        let assets =
            MemoryAssets::new().with_material(TERRAIN_MATERIAL, Material::named("terrain"));
        let renderable = TerrainRenderable::prepare(&sample_mesh(), &assets);
        assert_eq!(renderable.material.map(|m| m.name), Some("terrain".to_string()));
    }
}
