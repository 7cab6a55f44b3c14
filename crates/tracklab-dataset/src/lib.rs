//! # Tracklab-Dataset
//!
//! Everything between a directory of tracking outputs and a
//! [`MarkerGroup`](tracklab_core::MarkerGroup):
//!
//! - [`DatasetLayout`]: path conventions, loaded from file or environment
//! - [`discover_subjects`]: which subjects were tracked for which body part
//! - [`TrialFiles`] / [`GroupTrial`]: one subject's files and marker groups
//! - [`FeatureFiles`]: preprocessed traces and train/val/test feature splits
//! - [`quantile_scaling`]: percentile rescaling of traces
//! - [`batch`]: the same pipelines run in parallel over many subjects

pub mod batch;
pub mod body_part;
pub mod config;
pub mod files;
pub mod scaling;
pub mod store;
pub mod subjects;
pub mod trial;

pub use batch::*;
pub use body_part::BodyPartKind;
pub use config::{DatasetLayout, FileConventions};
pub use files::*;
pub use scaling::*;
pub use store::*;
pub use subjects::*;
pub use trial::GroupTrial;
