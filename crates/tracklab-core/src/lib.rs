//! # Tracklab-Core
//!
//! Core types for organizing per-frame marker tracking output into
//! semantically meaningful groups and deriving geometric features from them.
//!
//! - [`Marker`]: one tracked point with `x`, `y` and confidence series
//! - [`MarkerGroup`]: an ordered, immutable bundle of markers exported as
//!   `[markers × frames]` arrays
//! - [`geometry`]: pairwise distances and the inscribed-quadrilateral area

pub mod error;
pub mod geometry;
pub mod marker;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use marker::*;
pub use types::*;
