//! Mesh converter (source surfaces -> indexed mesh description -> static mesh payload)

mod description;
mod static_mesh;

// Re-export public API
pub use description::{build_mesh_description, MeshStats};
pub use static_mesh::{
    asset_name, convert_static_mesh, resolve_material_slots, ConvertedMesh, MaterialSlot,
    StaticBuildSettings,
};
