//! Parser for BVH and Acclaim ASF/AMC motion capture files.
//!
//! Both formats are loaded into the same two pieces:
//!
//! * a [`Skeleton`]: the joint tree, flattened depth-first with the root at index 0,
//! * a [`MotionData`]: root positions and per-joint rotations for every frame.
//!
//! ```no_run
//! use mocap_anim_parser::parse::load_bvh_from_file;
//!
//! let (mut skeleton, motion) = load_bvh_from_file("walk.bvh")?;
//! for frame in 0..motion.frame_count() {
//!     skeleton.set_pose(&motion, frame);
//!     let world = skeleton.world_transforms();
//!     // hand `world` to a renderer
//! #   let _ = world;
//! }
//! # Ok::<(), mocap_anim_parser::ParseError>(())
//! ```
//!
//! ASF/AMC come in two files; the motion is read against the parsed skeleton:
//!
//! ```no_run
//! use mocap_anim_parser::{parse, LoadOptions};
//!
//! let options = LoadOptions::default();
//! let asf = parse::load_asf_from_file("subject.asf", &options)?;
//! let motion = parse::load_amc_from_file("subject_01.amc", &asf, &options)?;
//! let mut skeleton = asf.into_skeleton();
//! skeleton.set_pose(&motion, 0);
//! # Ok::<(), mocap_anim_parser::ParseError>(())
//! ```

mod amc_parsing;
mod asf_parsing;
mod bvh_parsing;
pub mod config;
pub mod error;
pub mod parse;
mod pose;
pub mod skeleton;
pub mod types;
mod utils;

pub use asf_parsing::{AsfSkeleton, BoneDefinition};
pub use config::LoadOptions;
pub use error::{ParseError, Result};
pub use skeleton::{Joint, Skeleton};
pub use types::{AngleUnit, Channel, MotionData};
