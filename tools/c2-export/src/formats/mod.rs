//! File formats of the export tool
//!
//! Parsed source assets are read as JSON; converted payloads are written as pretty JSON with a
//! per-kind file extension.

use anyhow::{Context, Result};
use c2_common::{SourceAnimation, SourceMesh};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Static mesh payload extension
pub const MESH_EXT: &str = "mesh.json";
/// Skeletal mesh payload extension
pub const SKELETAL_MESH_EXT: &str = "skmesh.json";
/// Reference skeleton extension
pub const SKELETON_EXT: &str = "skel.json";
/// Animation clip extension
pub const ANIMATION_EXT: &str = "anim.json";

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}: {:?}", what, path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}: {:?}", what, path))
}

/// Read a parsed source mesh
pub fn read_source_mesh(path: &Path) -> Result<SourceMesh> {
    read_json(path, "source mesh")
}

/// Read a parsed source animation
pub fn read_source_animation(path: &Path) -> Result<SourceAnimation> {
    read_json(path, "source animation")
}

/// Write a converted payload as pretty-printed JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write output: {:?}", path))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// File stem used as the asset name when none is given (`foo.anim.json` -> `foo`)
pub fn asset_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
