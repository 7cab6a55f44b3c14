//! Per-subject output stores for preprocessed traces and feature splits.
//!
//! Layout under the output root:
//!
//! ```text
//! <output>/<body_part>/<subject>/preprocessed/trace.json
//! <output>/<body_part>/<subject>/features/trace.json
//! ```
//!
//! Traces carry NaN for untracked frames. JSON has no NaN, so matrices are
//! stored with `null` in their place.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, Axis};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracklab_core::{Error, MarkerGroup, Result};

use crate::body_part::BodyPartKind;
use crate::config::DatasetLayout;
use crate::files::TrialFiles;

/// Cleaned `[markers × frames]` coordinates of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTrace")]
pub struct PreprocessedTrace {
    pub names: Vec<String>,
    #[serde(with = "nan_matrix")]
    pub x: Array2<f64>,
    #[serde(with = "nan_matrix")]
    pub y: Array2<f64>,
}

impl PreprocessedTrace {
    pub fn new(names: Vec<String>, x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        if x.dim() != y.dim() {
            return Err(Error::ShapeMismatch {
                context: "preprocessed trace y".into(),
                expected: x.ncols(),
                actual: y.ncols(),
            });
        }
        if names.len() != x.nrows() {
            return Err(Error::Cardinality {
                expected: x.nrows(),
                actual: names.len(),
            });
        }
        Ok(Self { names, x, y })
    }

    pub fn from_group(group: &MarkerGroup) -> Self {
        Self {
            names: group.names(),
            x: group.x(),
            y: group.y(),
        }
    }

    /// Per-marker mean over frames, ignoring NaN
    pub fn mean(&self) -> MeanTrace {
        MeanTrace {
            names: self.names.clone(),
            x: nan_mean_rows(&self.x),
            y: nan_mean_rows(&self.y),
        }
    }
}

#[derive(Deserialize)]
struct StoredTrace {
    names: Vec<String>,
    #[serde(with = "nan_matrix")]
    x: Array2<f64>,
    #[serde(with = "nan_matrix")]
    y: Array2<f64>,
}

impl TryFrom<StoredTrace> for PreprocessedTrace {
    type Error = Error;

    fn try_from(stored: StoredTrace) -> Result<Self> {
        Self::new(stored.names, stored.x, stored.y)
    }
}

/// Time-averaged position of each marker
#[derive(Debug, Clone, PartialEq)]
pub struct MeanTrace {
    pub names: Vec<String>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

/// Contiguous run of frames `[start, end)` kept for modeling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSegment")]
pub struct TraceSegment {
    pub start: usize,
    pub end: usize,
    /// `[features × (end - start)]`
    #[serde(with = "nan_matrix")]
    pub data: Array2<f64>,
}

impl TraceSegment {
    pub fn new(start: usize, end: usize, data: Array2<f64>) -> Result<Self> {
        let span = end.checked_sub(start).ok_or_else(|| {
            Error::InvalidInput(format!("segment end {} before start {}", end, start))
        })?;
        if data.ncols() != span {
            return Err(Error::ShapeMismatch {
                context: format!("segment {}..{}", start, end),
                expected: span,
                actual: data.ncols(),
            });
        }
        Ok(Self { start, end, data })
    }

    pub fn n_frames(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Deserialize)]
struct StoredSegment {
    start: usize,
    end: usize,
    #[serde(with = "nan_matrix")]
    data: Array2<f64>,
}

impl TryFrom<StoredSegment> for TraceSegment {
    type Error = Error;

    fn try_from(stored: StoredSegment) -> Result<Self> {
        Self::new(stored.start, stored.end, stored.data)
    }
}

/// Train / validation / test segments of one subject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSplits {
    pub train: Vec<TraceSegment>,
    pub val: Vec<TraceSegment>,
    pub test: Vec<TraceSegment>,
}

impl FeatureSplits {
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.train.len(), self.val.len(), self.test.len())
    }
}

/// Output files of one subject's body part.
///
/// Construction creates the output directories.
#[derive(Debug, Clone)]
pub struct FeatureFiles {
    trial: TrialFiles,
    subject_dir: PathBuf,
    preprocessed_path: PathBuf,
    features_path: PathBuf,
}

impl FeatureFiles {
    /// `output_override` replaces the layout's output root
    pub fn new(
        layout: &DatasetLayout,
        subject: &str,
        part: BodyPartKind,
        output_override: Option<&Path>,
    ) -> Result<Self> {
        let trial = TrialFiles::new(layout, subject, part)?;
        let output_root = output_override.unwrap_or(layout.output_dir.as_path());
        let subject_dir = output_root.join(part.as_str()).join(subject);

        let preprocessed_dir = subject_dir.join(&layout.files.preprocessed_dir);
        let features_dir = subject_dir.join(&layout.files.features_dir);
        std::fs::create_dir_all(&preprocessed_dir)?;
        std::fs::create_dir_all(&features_dir)?;

        Ok(Self {
            trial,
            preprocessed_path: preprocessed_dir.join(&layout.files.trace_file),
            features_path: features_dir.join(&layout.files.trace_file),
            subject_dir,
        })
    }

    pub fn trial(&self) -> &TrialFiles {
        &self.trial
    }

    pub fn subject_dir(&self) -> &Path {
        &self.subject_dir
    }

    pub fn preprocessed_path(&self) -> &Path {
        &self.preprocessed_path
    }

    pub fn features_path(&self) -> &Path {
        &self.features_path
    }

    pub fn save_preprocessed(&self, trace: &PreprocessedTrace) -> Result<()> {
        write_json(&self.preprocessed_path, trace)?;
        info!(
            "Saved preprocessed trace ({} markers) to {}",
            trace.names.len(),
            self.preprocessed_path.display()
        );
        Ok(())
    }

    /// `None` when nothing was preprocessed yet
    pub fn load_preprocessed(&self) -> Result<Option<PreprocessedTrace>> {
        read_json(&self.preprocessed_path)
    }

    pub fn load_preprocessed_mean(&self) -> Result<Option<MeanTrace>> {
        Ok(self.load_preprocessed()?.map(|trace| trace.mean()))
    }

    pub fn save_features(&self, splits: &FeatureSplits) -> Result<()> {
        write_json(&self.features_path, splits)?;
        let (train, val, test) = splits.counts();
        info!(
            "Saved features for {} ({} train, {} val, {} test) to {}",
            self.trial.subject(),
            train,
            val,
            test,
            self.features_path.display()
        );
        Ok(())
    }

    /// `None` when no features were computed yet
    pub fn load_features(&self) -> Result<Option<FeatureSplits>> {
        read_json(&self.features_path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        debug!("No stored trace at {}", path.display());
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(Some(serde_json::from_reader(reader)?))
}

fn nan_mean_rows(values: &Array2<f64>) -> Array1<f64> {
    values.map_axis(Axis(1), |row| {
        let (sum, count) = row
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0_f64, 0usize), |(s, n), &v| (s + v, n + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    })
}

/// `Array2<f64>` as `{ "shape": [rows, cols], "data": [...] }` with NaN as null
mod nan_matrix {
    use ndarray::Array2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Stored {
        shape: (usize, usize),
        data: Vec<Option<f64>>,
    }

    pub fn serialize<S: Serializer>(values: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Stored {
            shape: values.dim(),
            data: values
                .iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array2<f64>, D::Error> {
        let stored = Stored::deserialize(deserializer)?;
        let data = stored
            .data
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Array2::from_shape_vec(stored.shape, data).map_err(serde::de::Error::custom)
    }
}
