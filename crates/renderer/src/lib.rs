//! Render-facing boundary for generated terrain: vertex layout, mesh payloads,
//! fog settings and asset lookup. No GPU backend lives here.

pub mod assets;
pub mod fog;
pub mod mesh;
pub mod vertex;

pub use assets::*;
pub use fog::*;
pub use mesh::*;
pub use vertex::*;
