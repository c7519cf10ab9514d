//! c2-export - C2 asset export tool
//!
//! Converts parsed C2 meshes and SEAnim animations (JSON) to engine import payloads
//! (.mesh.json, .skmesh.json, .skel.json, .anim.json)

use anyhow::{Context, Result};
use c2_common::AnimationType;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use modules from library
use c2_export::animation::{self, ReferencePose};
use c2_export::formats::{
    asset_stem, read_source_animation, read_source_mesh, write_json, ANIMATION_EXT, MESH_EXT,
    SKELETAL_MESH_EXT, SKELETON_EXT,
};
use c2_export::settings::{ImportSettings, TrackOutput};
use c2_export::{manifest, mesh, skeleton, skin};

#[derive(Parser)]
#[command(name = "c2-export")]
#[command(about = "C2 asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Export a static mesh
    Mesh {
        /// Input source mesh (JSON)
        input: PathBuf,

        /// Output .mesh.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Export a skinned mesh with its skeleton
    SkeletalMesh {
        /// Input source mesh (JSON)
        input: PathBuf,

        /// Output .skmesh.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Export the reference skeleton of a mesh
    Skeleton {
        /// Input source mesh (JSON)
        input: PathBuf,

        /// Output .skel.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Export an animation clip
    Animation {
        /// Input source animation (JSON)
        input: PathBuf,

        /// Source mesh providing the skeleton
        #[arg(short = 'k', long)]
        skeleton: PathBuf,

        /// Output .anim.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Source animation providing the reference pose (default: bind pose)
        #[arg(short, long)]
        reference_pose: Option<PathBuf>,

        /// Frame of the reference pose animation to sample
        #[arg(long)]
        pose_frame: Option<u32>,

        /// Override the animation type (absolute, relative, additive)
        #[arg(long, value_parser = parse_anim_type)]
        anim_type: Option<AnimationType>,

        /// Emit per-axis curves instead of dense tracks
        #[arg(long)]
        curves: bool,
    },
}

fn parse_anim_type(value: &str) -> Result<AnimationType, String> {
    match value.to_ascii_lowercase().as_str() {
        "absolute" => Ok(AnimationType::Absolute),
        "relative" | "delta" => Ok(AnimationType::Relative),
        "additive" => Ok(AnimationType::Additive),
        other => Err(format!(
            "unknown animation type '{}' (use absolute, relative, or additive)",
            other
        )),
    }
}

fn load_settings(path: Option<&Path>) -> Result<ImportSettings> {
    match path {
        Some(path) => ImportSettings::load(path),
        None => Ok(ImportSettings::default()),
    }
}

/// Output next to the input: `dir/name.json` -> `dir/name.<ext>`
fn default_output(input: &Path, ext: &str) -> PathBuf {
    input.with_file_name(format!("{}.{}", asset_stem(input), ext))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building assets from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh {
            input,
            output,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let output = output.unwrap_or_else(|| default_output(&input, MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let source = read_source_mesh(&input)?;
            let converted = mesh::convert_static_mesh(&source, &settings.mesh)
                .with_context(|| format!("Failed to convert mesh {:?}", input))?;
            write_json(&output, &converted)?;
            tracing::info!("Done!");
        }

        Commands::SkeletalMesh {
            input,
            output,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let output = output.unwrap_or_else(|| default_output(&input, SKELETAL_MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let source = read_source_mesh(&input)?;
            let converted = skin::convert_skeletal_mesh(&source, &settings.mesh)
                .with_context(|| format!("Failed to convert skeletal mesh {:?}", input))?;
            write_json(&output, &converted)?;
            tracing::info!("Done!");
        }

        Commands::Skeleton {
            input,
            output,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let output = output.unwrap_or_else(|| default_output(&input, SKELETON_EXT));
            tracing::info!("Exporting skeleton {:?} -> {:?}", input, output);

            let source = read_source_mesh(&input)?;
            let converted = skeleton::convert_skeleton(&source, &settings.mesh)
                .with_context(|| format!("Failed to build skeleton from {:?}", input))?;
            write_json(&output, &converted)?;
            tracing::info!("Done!");
        }

        Commands::Animation {
            input,
            skeleton: skeleton_path,
            output,
            settings,
            reference_pose,
            pose_frame,
            anim_type,
            curves,
        } => {
            let mut settings = load_settings(settings.as_deref())?;
            if let Some(frame) = pose_frame {
                settings.animation.pose_frame = frame;
            }
            if anim_type.is_some() {
                settings.animation.anim_type = anim_type;
            }
            if curves {
                settings.animation.output = TrackOutput::Curves;
            }

            let output = output.unwrap_or_else(|| default_output(&input, ANIMATION_EXT));
            tracing::info!("Exporting animation {:?} -> {:?}", input, output);

            let mesh = read_source_mesh(&skeleton_path)?;
            let skeleton = skeleton::convert_skeleton(&mesh, &settings.mesh)
                .with_context(|| format!("Failed to build skeleton from {:?}", skeleton_path))?
                .skeleton;

            let reference_clip = match &reference_pose {
                Some(path) => Some(manifest::convert_reference_clip(
                    path,
                    &skeleton,
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

            let source = read_source_animation(&input)?;
            let converted = animation::convert_animation(
                &asset_stem(&input),
                &source,
                &skeleton,
                reference,
                &settings.animation,
            )
            .with_context(|| format!("Failed to convert animation {:?}", input))?;
            write_json(&output, &converted)?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}
