//! Vertex layout description for terrain vertices.

pub use procgen::TerrainVertex as Vertex;

/// Attribute component formats a backend must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub fn size(self) -> usize {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub offset: usize,
    pub shader_location: u32,
    pub format: VertexFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub array_stride: usize,
    pub attributes: &'static [VertexAttribute],
}

static TERRAIN_ATTRIBUTES: [VertexAttribute; 4] = [
    // Position
    VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: VertexFormat::Float32x3,
    },
    // Normal
    VertexAttribute {
        offset: std::mem::size_of::<[f32; 3]>(),
        shader_location: 1,
        format: VertexFormat::Float32x3,
    },
    // UV
    VertexAttribute {
        offset: std::mem::size_of::<[f32; 6]>(),
        shader_location: 2,
        format: VertexFormat::Float32x2,
    },
    // Height-band color
    VertexAttribute {
        offset: std::mem::size_of::<[f32; 8]>(),
        shader_location: 3,
        format: VertexFormat::Float32x4,
    },
];

/// Layout of [`Vertex`]: position, normal, uv, color at locations 0..=3.
pub fn layout_with_color() -> VertexLayout {
    VertexLayout {
        array_stride: std::mem::size_of::<Vertex>(),
        attributes: &TERRAIN_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_tile_the_stride() {
        let layout = layout_with_color();
        let mut end = 0;
        for attr in layout.attributes {
            assert_eq!(attr.offset, end);
            end += attr.format.size();
        }
        assert_eq!(end, layout.array_stride);
    }
}
