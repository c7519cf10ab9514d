//! Source asset generators for the integration tests
//!
//! Builds small parsed meshes and animations in memory and writes them as the JSON the export
//! tool reads.

#![allow(dead_code)]

use std::path::Path;

use c2_common::{
    AnimationHeader, AnimationType, BoneKeyframes, BoneWeight, Face, Keyframe, SourceAnimation,
    SourceBone, SourceMaterial, SourceMesh, SourceVertex, Surface,
};
use glam::{Quat, Vec2, Vec3, Vec4};

pub const ARM_BONES: [&str; 3] = ["tag_origin", "j_shoulder", "j_elbow"];

fn vertex(position: Vec3, uv: Vec2, weights: Vec<BoneWeight>) -> SourceVertex {
    SourceVertex {
        position,
        normal: Vec3::Z,
        color: Vec4::ONE,
        uvs: vec![uv],
        weights,
    }
}

fn weight(bone: u32, weight: f32) -> BoneWeight {
    BoneWeight { bone, weight }
}

/// Two-quad crate: one surface per quad, second quad has a degenerate face
pub fn crate_mesh() -> SourceMesh {
    let quad = |z: f32| {
        vec![
            vertex(Vec3::new(0.0, 0.0, z), Vec2::new(0.0, 0.0), vec![]),
            vertex(Vec3::new(1.0, 0.0, z), Vec2::new(1.0, 0.0), vec![]),
            vertex(Vec3::new(1.0, 1.0, z), Vec2::new(1.0, 1.0), vec![]),
            vertex(Vec3::new(0.0, 1.0, z), Vec2::new(0.0, 1.0), vec![]),
        ]
    };

    SourceMesh {
        name: "mdl::crate".into(),
        uv_set_count: 1,
        surfaces: vec![
            Surface {
                name: "lid".into(),
                vertices: quad(1.0),
                faces: vec![Face::new(0, 1, 2), Face::new(0, 2, 3)],
                materials: vec![0],
            },
            Surface {
                name: "base".into(),
                vertices: quad(0.0),
                faces: vec![Face::new(0, 1, 2), Face::new(0, 2, 3), Face::new(1, 1, 3)],
                materials: vec![1],
            },
        ],
        bones: vec![],
        materials: vec![
            SourceMaterial {
                name: "mtl_crate_lid".into(),
            },
            SourceMaterial {
                name: "mtl_crate_base".into(),
            },
        ],
    }
}

/// Three-bone arm strip skinned along X
pub fn arm_mesh() -> SourceMesh {
    let vertices = vec![
        vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0), vec![weight(1, 1.0)]),
        vertex(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0), vec![weight(1, 1.0)]),
        vertex(
            Vec3::new(10.0, 0.0, 0.0),
            Vec2::new(0.5, 0.0),
            vec![weight(1, 0.5), weight(2, 0.5)],
        ),
        vertex(
            Vec3::new(10.0, 1.0, 0.0),
            Vec2::new(0.5, 1.0),
            vec![weight(1, 0.5), weight(2, 0.5), weight(0, 0.0)],
        ),
        vertex(Vec3::new(20.0, 0.0, 0.0), Vec2::new(1.0, 0.0), vec![weight(2, 1.0)]),
        vertex(Vec3::new(20.0, 1.0, 0.0), Vec2::new(1.0, 1.0), vec![weight(2, 1.0)]),
    ];

    SourceMesh {
        name: "vm::arm".into(),
        uv_set_count: 1,
        surfaces: vec![Surface {
            name: "sleeve".into(),
            vertices,
            faces: vec![
                Face::new(0, 2, 1),
                Face::new(1, 2, 3),
                Face::new(2, 4, 3),
                Face::new(3, 4, 5),
            ],
            materials: vec![0],
        }],
        bones: vec![
            SourceBone {
                name: ARM_BONES[0].into(),
                parent: -1,
                local_position: Vec3::ZERO,
                local_rotation: Quat::IDENTITY,
            },
            SourceBone {
                name: ARM_BONES[1].into(),
                parent: 0,
                local_position: Vec3::new(0.0, 0.0, 50.0),
                local_rotation: Quat::IDENTITY,
            },
            SourceBone {
                name: ARM_BONES[2].into(),
                parent: 1,
                local_position: Vec3::new(10.0, 0.0, 0.0),
                local_rotation: Quat::from_rotation_z(15f32.to_radians()),
            },
        ],
        materials: vec![SourceMaterial {
            name: "mtl_sleeve".into(),
        }],
    }
}

/// Elbow swing: sparse position and rotation keys on the elbow, one unknown bone
pub fn swing_animation(anim_type: AnimationType) -> SourceAnimation {
    SourceAnimation {
        header: AnimationHeader {
            frame_rate: 30.0,
            frame_count: 20,
            anim_type,
        },
        bones: vec![
            BoneKeyframes {
                name: "j_elbow".into(),
                positions: vec![
                    Keyframe::new(0, Vec3::ZERO),
                    Keyframe::new(10, Vec3::new(0.0, 4.0, 0.0)),
                    Keyframe::new(20, Vec3::ZERO),
                ],
                rotations: vec![
                    Keyframe::new(5, Quat::IDENTITY),
                    Keyframe::new(15, Quat::from_rotation_z(60f32.to_radians())),
                ],
                scales: vec![],
            },
            BoneKeyframes {
                name: "j_wrist_twist".into(),
                positions: vec![Keyframe::new(0, Vec3::ONE)],
                ..Default::default()
            },
        ],
    }
}

/// Single-frame pose offsetting the shoulder
pub fn idle_pose() -> SourceAnimation {
    SourceAnimation {
        header: AnimationHeader {
            frame_rate: 30.0,
            frame_count: 0,
            anim_type: AnimationType::Absolute,
        },
        bones: vec![BoneKeyframes {
            name: "j_shoulder".into(),
            positions: vec![Keyframe::new(0, Vec3::new(0.0, 0.0, 60.0))],
            rotations: vec![Keyframe::new(0, Quat::IDENTITY)],
            scales: vec![],
        }],
    }
}

/// Write any source asset as JSON
pub fn write<T: serde::Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
