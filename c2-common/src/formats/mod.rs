//! C2 asset data formats
//!
//! Plain data structures exchanged between the external file reader, the conversion core, and
//! the host integration layer. No binary layout is defined here: source types derive
//! `Deserialize` and output types derive `Serialize` so both sides can be exchanged as JSON.
//!
//! - [`source`] - parsed proprietary mesh and animation data (conversion input)
//! - [`mesh`] - indexed mesh description (vertex / vertex instance / polygon group)
//! - [`skin`] - skin-ready payload (points, wedges, faces, influences, bones)
//! - [`skeleton`] - reference skeleton with hierarchy depth
//! - [`animation`] - dense tracks or per-axis curve knots

pub mod animation;
pub mod mesh;
pub mod skeleton;
pub mod skin;
pub mod source;

pub use animation::*;
pub use mesh::*;
pub use skeleton::*;
pub use skin::*;
pub use source::*;
