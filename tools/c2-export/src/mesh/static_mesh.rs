//! Static mesh payload

use c2_common::{IndexedMesh, SourceMesh};
use serde::Serialize;

use super::description::{build_mesh_description, MeshStats};
use crate::error::{ConvertError, Result};
use crate::settings::MeshSettings;

/// Material slot bound to one polygon group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialSlot {
    /// Slot name (the surface name)
    pub name: String,
    /// Resolved material names; empty means the host's default material
    pub materials: Vec<String>,
}

/// Build options handed to the consuming static mesh build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StaticBuildSettings {
    pub recompute_normals: bool,
    pub recompute_tangents: bool,
    pub remove_degenerates: bool,
    pub generate_lightmap_uvs: bool,
    pub src_lightmap_index: u32,
    pub dst_lightmap_index: u32,
    pub use_mikktspace: bool,
}

impl StaticBuildSettings {
    /// Settings for a mesh declaring `uv_set_count` UV sets; lightmap UVs land in the
    /// reserved channel after them
    pub fn for_uv_sets(uv_set_count: usize) -> Self {
        Self {
            recompute_normals: false,
            recompute_tangents: true,
            remove_degenerates: false,
            generate_lightmap_uvs: true,
            src_lightmap_index: 0,
            dst_lightmap_index: uv_set_count as u32,
            use_mikktspace: true,
        }
    }
}

/// Result of static mesh conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedMesh {
    pub name: String,
    pub mesh: IndexedMesh,
    pub materials: Vec<MaterialSlot>,
    pub build_settings: StaticBuildSettings,
    pub stats: MeshStats,
}

/// Engine asset name; namespace separators are flattened
pub fn asset_name(name: &str) -> String {
    name.replace("::", "_")
}

/// One material slot per surface, in surface order
pub fn resolve_material_slots(source: &SourceMesh) -> Result<Vec<MaterialSlot>> {
    source
        .surfaces
        .iter()
        .map(|surface| {
            let materials = surface
                .materials
                .iter()
                .map(|&index| {
                    source
                        .materials
                        .get(index as usize)
                        .map(|m| m.name.clone())
                        .ok_or_else(|| ConvertError::MaterialIndexOutOfRange {
                            surface: surface.name.clone(),
                            index,
                            count: source.materials.len(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(MaterialSlot {
                name: surface.name.clone(),
                materials,
            })
        })
        .collect()
}

/// Convert a source mesh into a static mesh payload
pub fn convert_static_mesh(source: &SourceMesh, settings: &MeshSettings) -> Result<ConvertedMesh> {
    let name = asset_name(&source.name);
    let materials = resolve_material_slots(source)?;
    let (mesh, stats) = build_mesh_description(source, settings.dedup)?;
    stats.log(&name);

    tracing::info!(
        "Converted static mesh '{}': {} vertices, {} triangles, {} material slots",
        name,
        mesh.vertices.len(),
        mesh.triangle_count(),
        materials.len()
    );

    Ok(ConvertedMesh {
        name,
        mesh,
        materials,
        build_settings: StaticBuildSettings::for_uv_sets(source.uv_set_count),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use c2_common::{Face, SourceMaterial, SourceVertex, Surface};
    use glam::{Vec3, Vec4};

    fn source() -> SourceMesh {
        let vertex = |x: f32| SourceVertex {
            position: Vec3::new(x, x * x, 0.0),
            normal: Vec3::Z,
            color: Vec4::ONE,
            uvs: vec![],
            weights: vec![],
        };
        SourceMesh {
            name: "mdl::barrel".into(),
            uv_set_count: 2,
            surfaces: vec![
                Surface {
                    name: "wood".into(),
                    vertices: vec![vertex(0.0), vertex(1.0), vertex(2.0)],
                    faces: vec![Face::new(0, 1, 2)],
                    materials: vec![1, 0],
                },
                Surface {
                    name: "bare".into(),
                    vertices: vec![vertex(3.0), vertex(4.0), vertex(5.0)],
                    faces: vec![Face::new(0, 1, 2)],
                    materials: vec![],
                },
            ],
            bones: vec![],
            materials: vec![
                SourceMaterial { name: "mtl_wood".into() },
                SourceMaterial { name: "mtl_wood_wet".into() },
            ],
        }
    }

    #[test]
    fn test_asset_name() {
        assert_eq!(asset_name("mdl::barrel"), "mdl_barrel");
        assert_eq!(asset_name("plain"), "plain");
    }

    #[test]
    fn test_material_slots_follow_surfaces() {
        let slots = resolve_material_slots(&source()).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].name, "wood");
        assert_eq!(slots[0].materials, vec!["mtl_wood_wet", "mtl_wood"]);
        assert!(slots[1].materials.is_empty());
    }

    #[test]
    fn test_material_index_out_of_range() {
        let mut mesh = source();
        mesh.surfaces[1].materials = vec![7];
        assert_eq!(
            resolve_material_slots(&mesh).unwrap_err(),
            ConvertError::MaterialIndexOutOfRange {
                surface: "bare".into(),
                index: 7,
                count: 2
            }
        );
    }

    #[test]
    fn test_convert_static_mesh() {
        let converted = convert_static_mesh(&source(), &MeshSettings::default()).unwrap();
        assert_eq!(converted.name, "mdl_barrel");
        assert_eq!(converted.mesh.triangle_count(), 2);
        assert_eq!(converted.build_settings.dst_lightmap_index, 2);
        assert!(converted.build_settings.generate_lightmap_uvs);
        assert!(!converted.build_settings.recompute_normals);
        assert_eq!(converted.stats.missing_uv_vertices, 6);
    }
}
