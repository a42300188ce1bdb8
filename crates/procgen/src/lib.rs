//! Procedural terrain generation: heightfield synthesis, normal
//! reconstruction, and quad-grid meshing.

pub mod heightfield;
pub mod normals;
pub mod terrain;

pub use heightfield::*;
pub use normals::*;
pub use terrain::*;
