//! Reference pose acquisition
//!
//! The reference pose is the per-bone local transform non-absolute animations are expressed
//! against. It comes either from the skeleton's bind pose or from another sequence sampled at
//! a fixed frame.

use c2_common::{AnimationClip, ClipTracks, ReferenceSkeleton, Rotator, Transform};
use glam::Vec3;

/// Source of per-bone local transforms at a given frame
pub trait PoseSampler {
    /// Local transform of `bone` at `frame`, `None` if the bone is not covered
    fn local_transform(&self, bone: &str, frame: u32) -> Option<Transform>;
}

impl PoseSampler for AnimationClip {
    fn local_transform(&self, bone: &str, frame: u32) -> Option<Transform> {
        match &self.tracks {
            ClipTracks::Dense(tracks) => tracks
                .iter()
                .find(|t| t.bone == bone)
                .and_then(|t| t.sample(frame as usize)),
            ClipTracks::Curves(curves) => {
                let curve = curves.iter().find(|c| c.bone == bone)?;
                let rest = curve.rest_key.unwrap_or(Transform::IDENTITY);
                let time = frame as f32 / self.frame_rate;

                let translation = axes_or(curve.translation.evaluate(time), rest.translation);
                let scale = axes_or(curve.scale.evaluate(time), rest.scale);
                let rotation = match curve.rotation.evaluate(time) {
                    [None, None, None] => rest.rotation,
                    [roll, pitch, yaw] => {
                        let base = Rotator::from_quat(rest.rotation);
                        Rotator::new(
                            pitch.unwrap_or(base.pitch),
                            yaw.unwrap_or(base.yaw),
                            roll.unwrap_or(base.roll),
                        )
                        .to_quat()
                    }
                };

                Some(Transform {
                    translation,
                    rotation,
                    scale,
                })
            }
        }
    }
}

fn axes_or(axes: [Option<f32>; 3], fallback: Vec3) -> Vec3 {
    Vec3::new(
        axes[0].unwrap_or(fallback.x),
        axes[1].unwrap_or(fallback.y),
        axes[2].unwrap_or(fallback.z),
    )
}

/// Where the reference pose of a conversion comes from
#[derive(Clone, Copy, Default)]
pub enum ReferencePose<'a> {
    /// The skeleton's bind pose
    #[default]
    BindPose,
    /// Another sequence evaluated at `frame`
    Sampled {
        sampler: &'a dyn PoseSampler,
        frame: u32,
    },
}

/// Reference transform for every skeleton bone, in skeleton order
///
/// Bones the sampler does not cover fall back to their bind transform.
pub fn resolve_reference_pose(
    skeleton: &ReferenceSkeleton,
    source: ReferencePose<'_>,
) -> Vec<Transform> {
    match source {
        ReferencePose::BindPose => skeleton.ref_pose.clone(),
        ReferencePose::Sampled { sampler, frame } => {
            let mut fallbacks = 0;
            let pose = skeleton
                .bones
                .iter()
                .zip(&skeleton.ref_pose)
                .map(|(bone, bind)| {
                    sampler.local_transform(&bone.name, frame).unwrap_or_else(|| {
                        fallbacks += 1;
                        *bind
                    })
                })
                .collect();
            if fallbacks > 0 {
                tracing::debug!(
                    "Reference pose: {} bones not covered by the sampled sequence, using bind pose",
                    fallbacks
                );
            }
            pose
        }
    }
}
