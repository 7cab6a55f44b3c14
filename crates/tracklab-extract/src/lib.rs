//! # Tracklab-Extract
//!
//! Pattern-based selection of marker groups from wide tracking tables.
//!
//! ## Stages
//!
//! 1. **Source**: a [`TabularSource`] enumerates body-part labels and reads
//!    `(x, y, likelihood)` columns ([`WideTable`], [`DlcCsvSource`])
//! 2. **Match**: a [`LabelMatcher`] selects the labels of one group
//! 3. **Extract**: [`GroupExtractor`] builds the [`MarkerGroup`](tracklab_core::MarkerGroup)
//!    in source order
//! 4. **Canonicalize**: [`canonicalize_order`] imposes role order (e.g. the
//!    pupil's top/bottom/left/right) when geometry needs fixed corners

pub mod canonical;
pub mod csv_source;
pub mod extractor;
pub mod matcher;
pub mod presets;
pub mod source;

pub use canonical::*;
pub use csv_source::*;
pub use extractor::*;
pub use matcher::*;
pub use presets::*;
pub use source::*;
