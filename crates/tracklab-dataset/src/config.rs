//! Dataset layout configuration.
//!
//! Every path convention of the dataset lives here. Nothing else in the
//! workspace hardcodes a directory or file name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracklab_core::{Error, FrameTiming, Result};
use tracklab_extract::GroupSpec;

use crate::body_part::BodyPartKind;

/// Complete dataset layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetLayout {
    /// Root all relative input paths are resolved against
    pub base_path: PathBuf,

    /// Directory holding one sub-directory per tracking network
    pub networks_dir: PathBuf,

    /// Root of generated outputs (preprocessed traces, features)
    pub output_dir: PathBuf,

    /// Per-body-part input directory, relative to `networks_dir`, keyed by
    /// body-part name
    pub body_part_dirs: BTreeMap<String, PathBuf>,

    /// Marker groups extracted for each body part, keyed by body-part name
    pub groups: BTreeMap<String, GroupSpec>,

    /// File naming conventions
    pub files: FileConventions,

    /// Frame rate of the tracked videos
    pub video_fps: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConventions {
    /// Extension of the tracking table for a subject
    pub metadata_extension: String,

    /// Extension of the tracker's pickled metadata
    pub pickle_extension: String,

    /// Extension of raw and labeled videos
    pub video_extension: String,

    /// Marker distinguishing the labeled video from the raw one
    pub labeled_video_marker: String,

    /// Files expected per subject in a body-part directory
    pub files_per_subject: Option<usize>,

    /// Second `_`-separated token of files that belong to the rig dataset
    pub rig_tag: String,

    pub preprocessed_dir: String,
    pub features_dir: String,
    pub trace_file: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        let body_part_dirs = [
            (BodyPartKind::Paw, "paws-mic-2019-04-26/videos_small"),
            (BodyPartKind::Pupil, "eye-mic-2019-04-16/videos"),
            (BodyPartKind::Nostril, "nostril-mic-2019-04-22/videos"),
            (BodyPartKind::Tongue, "tongue-mic-2019-04-26/videos"),
        ]
        .into_iter()
        .map(|(part, dir)| (part.as_str().to_string(), PathBuf::from(dir)))
        .collect();

        let groups = [
            (BodyPartKind::Paw, GroupSpec::right_paw()),
            (BodyPartKind::Pupil, GroupSpec::pupil()),
        ]
        .into_iter()
        .map(|(part, spec)| (part.as_str().to_string(), spec))
        .collect();

        Self {
            base_path: PathBuf::new(),
            networks_dir: PathBuf::from("data/ibl/dlc-networks"),
            output_dir: PathBuf::from("/data/model_mpaw"),
            body_part_dirs,
            groups,
            files: FileConventions::default(),
            video_fps: 60.0,
        }
    }
}

impl Default for FileConventions {
    fn default() -> Self {
        Self {
            metadata_extension: ".csv".to_string(),
            pickle_extension: ".pickle".to_string(),
            video_extension: ".mp4".to_string(),
            labeled_video_marker: "label".to_string(),
            files_per_subject: Some(4),
            rig_tag: "iblrig".to_string(),
            preprocessed_dir: "preprocessed".to_string(),
            features_dir: "features".to_string(),
            trace_file: "trace.json".to_string(),
        }
    }
}

impl DatasetLayout {
    /// Load from a file, with `TRACKLAB_*` environment overrides.
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default()).map_err(config_error)?)
            .add_source(config::File::from(path.as_ref()))
            .add_source(env_source())
            .build()
            .map_err(config_error)?;

        let layout: Self = settings.try_deserialize().map_err(config_error)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load from environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default()).map_err(config_error)?)
            .add_source(env_source())
            .build()
            .map_err(config_error)?;

        let layout: Self = settings.try_deserialize().map_err(config_error)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        FrameTiming::new(self.video_fps)?;

        if self.files.files_per_subject == Some(0) {
            return Err(Error::Config("files_per_subject must be positive".into()));
        }
        for part in self.body_part_dirs.keys().chain(self.groups.keys()) {
            part.parse::<BodyPartKind>()
                .map_err(|_| Error::Config(format!("unknown body part '{}'", part)))?;
        }
        for (part, spec) in &self.groups {
            if !self.body_part_dirs.contains_key(part) {
                return Err(Error::Config(format!(
                    "group '{}' configured for {} which has no input directory",
                    spec.name, part
                )));
            }
        }
        Ok(())
    }

    /// Input directory of a body part
    pub fn input_dir(&self, part: BodyPartKind) -> Result<PathBuf> {
        let dir = self
            .body_part_dirs
            .get(part.as_str())
            .ok_or_else(|| Error::Config(format!("no input directory configured for {}", part)))?;
        Ok(self.base_path.join(&self.networks_dir).join(dir))
    }

    /// Output directory of one subject's body part
    pub fn subject_output_dir(&self, part: BodyPartKind, subject: &str) -> PathBuf {
        self.output_dir.join(part.as_str()).join(subject)
    }

    pub fn group_spec(&self, part: BodyPartKind) -> Result<&GroupSpec> {
        self.groups
            .get(part.as_str())
            .ok_or_else(|| Error::Config(format!("no marker group configured for {}", part)))
    }

    pub fn timing(&self) -> Result<FrameTiming> {
        FrameTiming::new(self.video_fps)
    }
}

/// `TRACKLAB_VIDEO_FPS`, `TRACKLAB_FILES__TRACE_FILE`, ...
fn env_source() -> config::Environment {
    config::Environment::with_prefix("TRACKLAB")
        .prefix_separator("_")
        .separator("__")
}

fn config_error(e: config::ConfigError) -> Error {
    Error::Config(e.to_string())
}
