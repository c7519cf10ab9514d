//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and coordinates asset conversion.
//!
//! ```toml
//! [output]
//! dir = "converted/"
//!
//! [settings.mesh]
//! dedup = "none"
//!
//! [meshes]
//! barrel = "src/barrel.json"
//! viewhands = { path = "src/viewhands.json", kind = "skeletal" }
//!
//! [animations]
//! reload = { path = "src/reload.json", skeleton = "src/viewhands.json" }
//! reload_add = { path = "src/reload_add.json", skeleton = "src/viewhands.json", reference_pose = "src/idle.json" }
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use anyhow::{bail, Context, Result};
use c2_common::{AnimationClip, ReferenceSkeleton};
use hashbrown::HashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::animation::{convert_animation, ReferencePose};
use crate::formats::{
    asset_stem, read_source_animation, read_source_mesh, write_json, ANIMATION_EXT, MESH_EXT,
    SKELETAL_MESH_EXT,
};
use crate::mesh::convert_static_mesh;
use crate::settings::{AnimationSettings, ImportSettings};
use crate::skeleton::convert_skeleton;
use crate::skin::convert_skeletal_mesh;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub settings: ImportSettings,
    #[serde(default)]
    pub meshes: HashMap<String, MeshEntry>,
    #[serde(default)]
    pub animations: HashMap<String, AnimationEntry>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("converted/")
}

/// Mesh payload to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    #[default]
    Static,
    Skeletal,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        kind: MeshKind,
    },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path, .. } => path,
        }
    }

    pub fn kind(&self) -> MeshKind {
        match self {
            MeshEntry::Simple(_) => MeshKind::Static,
            MeshEntry::Detailed { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationEntry {
    pub path: PathBuf,
    /// Source mesh whose bones form the target skeleton
    pub skeleton: PathBuf,
    /// Source animation sampled at `settings.animation.pose_frame` as the reference pose
    #[serde(default)]
    pub reference_pose: Option<PathBuf>,
}

impl Manifest {
    /// Resolve a manifest path against the manifest directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Mesh entries sorted by name
    pub fn sorted_meshes(&self) -> Vec<(&String, &MeshEntry)> {
        let mut entries: Vec<_> = self.meshes.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Animation entries sorted by name
    pub fn sorted_animations(&self) -> Vec<(&String, &AnimationEntry)> {
        let mut entries: Vec<_> = self.animations.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Parse manifest text; relative paths resolve against `base_dir`
pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<Manifest> {
    let mut manifest: Manifest = toml::from_str(content)?;
    manifest.base_dir = base_dir.to_path_buf();
    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_manifest(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    // Check that all source files exist
    for (name, entry) in manifest.sorted_meshes() {
        let path = manifest.resolve(entry.path());
        if !path.exists() {
            bail!("Mesh '{}' source not found: {:?}", name, path);
        }
    }
    for (name, entry) in manifest.sorted_animations() {
        let path = manifest.resolve(&entry.path);
        if !path.exists() {
            bail!("Animation '{}' source not found: {:?}", name, path);
        }
        let skeleton = manifest.resolve(&entry.skeleton);
        if !skeleton.exists() {
            bail!("Animation '{}' skeleton not found: {:?}", name, skeleton);
        }
        if let Some(reference) = &entry.reference_pose {
            let reference = manifest.resolve(reference);
            if !reference.exists() {
                bail!("Animation '{}' reference pose not found: {:?}", name, reference);
            }
        }
    }
    Ok(())
}

/// Convert a source animation for use as a reference pose sequence
pub fn convert_reference_clip(
    path: &Path,
    skeleton: &ReferenceSkeleton,
    settings: &AnimationSettings,
) -> Result<AnimationClip> {
    let source = read_source_animation(path)?;
    let converted = convert_animation(
        &asset_stem(path),
        &source,
        skeleton,
        ReferencePose::BindPose,
        settings,
    )
    .with_context(|| format!("Failed to convert reference pose {:?}", path))?;
    Ok(converted.clip)
}

/// Build all assets from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.resolve(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let settings = &manifest.settings;

    // Convert meshes
    for (name, entry) in manifest.sorted_meshes() {
        let source = read_source_mesh(&manifest.resolve(entry.path()))?;
        match entry.kind() {
            MeshKind::Static => {
                let output = output_dir.join(format!("{}.{}", name, MESH_EXT));
                tracing::info!("Converting static mesh: {} -> {:?}", name, output);
                let converted = convert_static_mesh(&source, &settings.mesh)
                    .with_context(|| format!("Failed to convert mesh '{}'", name))?;
                write_json(&output, &converted)?;
            }
            MeshKind::Skeletal => {
                let output = output_dir.join(format!("{}.{}", name, SKELETAL_MESH_EXT));
                tracing::info!("Converting skeletal mesh: {} -> {:?}", name, output);
                let converted = convert_skeletal_mesh(&source, &settings.mesh)
                    .with_context(|| format!("Failed to convert skeletal mesh '{}'", name))?;
                write_json(&output, &converted)?;
            }
        }
    }

    // Convert animations; skeletons are shared between entries
    let mut skeletons: HashMap<PathBuf, ReferenceSkeleton> = HashMap::new();
    for (name, entry) in manifest.sorted_animations() {
        let output = output_dir.join(format!("{}.{}", name, ANIMATION_EXT));
        tracing::info!("Converting animation: {} -> {:?}", name, output);

        let skeleton_path = manifest.resolve(&entry.skeleton);
        if !skeletons.contains_key(&skeleton_path) {
            let mesh = read_source_mesh(&skeleton_path)?;
            let converted = convert_skeleton(&mesh, &settings.mesh)
                .with_context(|| format!("Failed to build skeleton from {:?}", skeleton_path))?;
            skeletons.insert(skeleton_path.clone(), converted.skeleton);
        }
        let skeleton = &skeletons[&skeleton_path];

        let reference_clip = match &entry.reference_pose {
            Some(path) => Some(convert_reference_clip(
                &manifest.resolve(path),
                skeleton,
                &settings.animation,
            )?),
            None => None,
        };
        let reference = match &reference_clip {
            Some(clip) => ReferencePose::Sampled {
                sampler: clip,
                frame: settings.animation.pose_frame,
            },
            None => ReferencePose::BindPose,
        };

        let source = read_source_animation(&manifest.resolve(&entry.path))?;
        let converted = convert_animation(name, &source, skeleton, reference, &settings.animation)
            .with_context(|| format!("Failed to convert animation '{}'", name))?;
        write_json(&output, &converted)?;
    }

    Ok(())
}
