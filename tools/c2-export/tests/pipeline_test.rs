//! Pipeline tests for c2-export
//!
//! Drives the conversion API end to end on generated source assets: mesh description ->
//! skin -> skeleton, animation resampling against the built skeleton, and manifest builds.

mod test_assets;

use c2_common::{AnimationType, ClipTracks, Rotator};
use c2_export::animation::{convert_animation, PoseSampler, ReferencePose};
use c2_export::manifest::{build_all, load_manifest, validate};
use c2_export::settings::{AnimationSettings, MeshSettings, TrackOutput, VertexDedup};
use c2_export::{convert_skeletal_mesh, convert_skeleton, convert_static_mesh};
use glam::Vec3;
use tempfile::tempdir;

fn assert_vec3_near(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, 1e-4), "{:?} != {:?}", a, b);
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn test_static_mesh_skips_degenerate_faces() {
    let source = test_assets::crate_mesh();
    let converted = convert_static_mesh(&source, &MeshSettings::default()).unwrap();

    assert_eq!(converted.name, "mdl_crate");
    assert_eq!(source.face_count(), 5);
    assert_eq!(converted.mesh.triangle_count(), 4);
    assert_eq!(converted.stats.degenerate_faces, 1);
    assert_eq!(converted.mesh.vertices.len(), source.vertex_count());

    for (_, triangle) in converted.mesh.triangles() {
        let [a, b, c] = triangle.map(|i| converted.mesh.vertex_instances[i as usize].vertex);
        assert!(a != b && b != c && c != a);
    }

    let slots: Vec<_> = converted.materials.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(slots, vec!["lid", "base"]);
    assert_eq!(converted.materials[1].materials, vec!["mtl_crate_base"]);
}

#[test]
fn test_static_mesh_is_deterministic() {
    let source = test_assets::crate_mesh();
    let settings = MeshSettings::default();
    let first = convert_static_mesh(&source, &settings).unwrap();
    let second = convert_static_mesh(&source, &settings).unwrap();
    assert_eq!(first.mesh, second.mesh);
}

#[test]
fn test_static_mesh_dedup_keeps_distinct_quads() {
    // The two quads differ in Z, so nothing merges
    let settings = MeshSettings {
        dedup: VertexDedup::PositionAndAttributes,
        ..Default::default()
    };
    let converted = convert_static_mesh(&test_assets::crate_mesh(), &settings).unwrap();
    assert_eq!(converted.mesh.vertices.len(), 8);
    assert_eq!(converted.stats.merged_vertices, 0);
}

#[test]
fn test_skeletal_mesh_pipeline() {
    let source = test_assets::arm_mesh();
    let converted = convert_skeletal_mesh(&source, &MeshSettings::default()).unwrap();

    assert_eq!(converted.skeleton_name, "SK_vm_arm");
    assert_eq!(converted.depth(), 3);
    assert_eq!(converted.skeleton.depths, vec![1, 2, 3]);

    let skin = &converted.skin;
    assert_eq!(skin.points.len(), 6);
    assert_eq!(skin.faces.len(), 4);
    assert_eq!(skin.wedges.len(), 12);
    assert_eq!(skin.influences.len(), 8);
    assert_eq!(converted.skin_stats.dropped_weights, 1);
    assert!(!skin.has_vertex_colors);
    assert_eq!(skin.num_tex_coords, 2);

    // Winding is reversed relative to the source face (0, 2, 1)
    let face = skin.faces[0];
    let corners = face.wedge_indices.map(|w| skin.wedges[w as usize].vertex_index);
    assert_eq!(corners, [1, 2, 0]);

    assert_eq!(skin.bounds.min, Vec3::ZERO);
    assert_eq!(skin.bounds.max, Vec3::new(20.0, 1.0, 0.0));
    assert_eq!(skin.bones[2].parent, Some(1));
}

// ============================================================================
// Animations
// ============================================================================

#[test]
fn test_relative_animation_dense() {
    let skeleton = convert_skeleton(&test_assets::arm_mesh(), &MeshSettings::default())
        .unwrap()
        .skeleton;
    let source = test_assets::swing_animation(AnimationType::Relative);

    let converted = convert_animation(
        "swing",
        &source,
        &skeleton,
        ReferencePose::BindPose,
        &AnimationSettings::default(),
    )
    .unwrap();

    assert_eq!(converted.stats.unmatched_bones, 1);
    assert_eq!(converted.stats.seeded_bones, 3);
    assert_eq!(converted.stats.keyed_bones, 1);

    let ClipTracks::Dense(tracks) = &converted.clip.tracks else {
        panic!("expected dense tracks");
    };
    assert_eq!(tracks.len(), 3);
    assert!(tracks.iter().all(|t| t.len() == 21));

    let elbow = &tracks[2];
    // Halfway between the frame 0 and 10 keys, Y mirrored, offset by the bind translation
    assert_vec3_near(elbow.positions[5], Vec3::new(10.0, -2.0, 0.0));
    // Rotation keys start at frame 5; earlier frames repeat the first key
    assert!(elbow.rotations[0].abs_diff_eq(elbow.rotations[5], 1e-6));
    // Last rotation key is yaw 60, negated
    let yaw = Rotator::from_quat(elbow.rotations[20]).yaw;
    assert!((yaw + 60.0).abs() < 1e-3);
}

#[test]
fn test_curve_output_matches_dense_at_keyframes() {
    let skeleton = convert_skeleton(&test_assets::arm_mesh(), &MeshSettings::default())
        .unwrap()
        .skeleton;
    let source = test_assets::swing_animation(AnimationType::Additive);

    let dense = convert_animation(
        "swing",
        &source,
        &skeleton,
        ReferencePose::BindPose,
        &AnimationSettings::default(),
    )
    .unwrap()
    .clip;
    let curves = convert_animation(
        "swing",
        &source,
        &skeleton,
        ReferencePose::BindPose,
        &AnimationSettings {
            output: TrackOutput::Curves,
            ..Default::default()
        },
    )
    .unwrap()
    .clip;

    for frame in [0, 10, 20] {
        let d = dense.local_transform("j_elbow", frame).unwrap();
        let c = curves.local_transform("j_elbow", frame).unwrap();
        assert_vec3_near(d.translation, c.translation);
    }
    for frame in [5, 15] {
        let d = dense.local_transform("j_elbow", frame).unwrap();
        let c = curves.local_transform("j_elbow", frame).unwrap();
        assert!(d.rotation.dot(c.rotation).abs() > 0.9999, "frame {}", frame);
    }

    // Unkeyed bones only carry their rest key
    let ClipTracks::Curves(bones) = &curves.tracks else {
        panic!("expected curves");
    };
    let shoulder = bones.iter().find(|c| c.bone == "j_shoulder").unwrap();
    assert!(shoulder.has_no_knots());
    assert_eq!(shoulder.rest_key, Some(skeleton.ref_pose[1]));
}

// ============================================================================
// Manifest
// ============================================================================

#[test]
fn test_manifest_build() {
    let dir = tempdir().expect("Failed to create temp dir");
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).unwrap();

    test_assets::write(&src.join("crate.json"), &test_assets::crate_mesh()).unwrap();
    test_assets::write(&src.join("arm.json"), &test_assets::arm_mesh()).unwrap();
    test_assets::write(
        &src.join("swing.json"),
        &test_assets::swing_animation(AnimationType::Relative),
    )
    .unwrap();
    test_assets::write(&src.join("idle.json"), &test_assets::idle_pose()).unwrap();

    let manifest_path = dir.path().join("assets.toml");
    std::fs::write(
        &manifest_path,
        r#"
[output]
dir = "out"

[meshes]
crate = "src/crate.json"
arm = { path = "src/arm.json", kind = "skeletal" }

[animations]
swing = { path = "src/swing.json", skeleton = "src/arm.json" }
swing_idle = { path = "src/swing.json", skeleton = "src/arm.json", reference_pose = "src/idle.json" }
"#,
    )
    .unwrap();

    let manifest = load_manifest(&manifest_path).unwrap();
    validate(&manifest).unwrap();
    build_all(&manifest, None).unwrap();

    let out = dir.path().join("out");
    for file in [
        "crate.mesh.json",
        "arm.skmesh.json",
        "swing.anim.json",
        "swing_idle.anim.json",
    ] {
        assert!(out.join(file).exists(), "{} should exist", file);
    }

    let read = |name: &str| -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(out.join(name)).unwrap()).unwrap()
    };

    let mesh = read("crate.mesh.json");
    assert_eq!(mesh["name"], "mdl_crate");
    assert_eq!(mesh["build_settings"]["dst_lightmap_index"], 1);

    let skmesh = read("arm.skmesh.json");
    assert_eq!(skmesh["skeleton"]["depth"], 3);

    // The shoulder is not keyed; it holds the sampled reference pose instead of the bind pose
    let shoulder_z = |anim: &serde_json::Value| {
        let bones = anim["clip"]["tracks"]["bones"].as_array().unwrap();
        let shoulder = bones.iter().find(|b| b["bone"] == "j_shoulder").unwrap();
        shoulder["positions"][0][2].as_f64().unwrap()
    };
    assert_eq!(read("swing.anim.json")["clip"]["tracks"]["mode"], "dense");
    assert_eq!(shoulder_z(&read("swing.anim.json")), 50.0);
    assert_eq!(shoulder_z(&read("swing_idle.anim.json")), 60.0);
}

#[test]
fn test_manifest_build_reports_structural_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut mesh = test_assets::arm_mesh();
    mesh.bones[1].parent = 2;
    test_assets::write(&dir.path().join("arm.json"), &mesh).unwrap();

    let manifest_path = dir.path().join("assets.toml");
    std::fs::write(
        &manifest_path,
        "[meshes]\narm = { path = \"arm.json\", kind = \"skeletal\" }\n",
    )
    .unwrap();

    let manifest = load_manifest(&manifest_path).unwrap();
    let err = build_all(&manifest, Some(&dir.path().join("out"))).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("arm"), "{}", message);
    assert!(message.contains("j_shoulder"), "{}", message);
}
