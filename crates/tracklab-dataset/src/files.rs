//! File resolution inside body-part directories.
//!
//! A tracked trial is a flat set of files in its body-part directory, all
//! sharing the subject name: the tracking table, the tracker's pickled
//! metadata, the raw video and optionally a labeled copy of the video.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use tracklab_core::{Error, Result};
use tracklab_extract::DlcCsvSource;

use crate::body_part::BodyPartKind;
use crate::config::{DatasetLayout, FileConventions};

/// Names of the regular files directly inside `dir`, sorted
pub fn list_dir_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::FileResolution(format!(
            "directory {} does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    files.sort();
    Ok(files)
}

/// File names in which `pattern` matches anywhere
pub fn search_files(files: &[String], pattern: &str) -> Result<Vec<String>> {
    let re = Regex::new(pattern).map_err(|e| Error::InvalidPattern(e.to_string()))?;
    Ok(files.iter().filter(|f| re.is_match(f)).cloned().collect())
}

/// File names containing `needle`, in input order
pub fn filter_containing(files: &[String], needle: &str) -> Vec<String> {
    files.iter().filter(|f| f.contains(needle)).cloned().collect()
}

/// The single file name containing `needle`
pub fn find_unique(files: &[String], needle: &str) -> Result<String> {
    let mut found = filter_containing(files, needle);
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(Error::FileResolution(format!("no file matching '{}'", needle))),
        n => Err(Error::FileResolution(format!(
            "{} files match '{}': {:?}",
            n, needle, found
        ))),
    }
}

/// Raw video of a trial and, when rendered, its labeled copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFiles {
    pub raw: PathBuf,
    pub labeled: Option<PathBuf>,
}

/// Files of one subject in one body-part directory
#[derive(Debug, Clone)]
pub struct TrialFiles {
    input_dir: PathBuf,
    subject: String,
    part: BodyPartKind,
    conventions: FileConventions,
}

impl TrialFiles {
    pub fn new(layout: &DatasetLayout, subject: impl Into<String>, part: BodyPartKind) -> Result<Self> {
        Ok(Self {
            input_dir: layout.input_dir(part)?,
            subject: subject.into(),
            part,
            conventions: layout.files.clone(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn part(&self) -> BodyPartKind {
        self.part
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// All files of the subject, checked against the expected count
    pub fn subject_filenames(&self) -> Result<Vec<String>> {
        let files = filter_containing(&list_dir_files(&self.input_dir)?, &self.subject);

        if let Some(expected) = self.conventions.files_per_subject {
            if files.len() != expected {
                return Err(Error::FileResolution(format!(
                    "expected {} files for subject {} in {}, found {}",
                    expected,
                    self.subject,
                    self.input_dir.display(),
                    files.len()
                )));
            }
        }
        Ok(files)
    }

    /// Tracking table of the trial
    pub fn metadata_path(&self) -> Result<PathBuf> {
        self.unique_with_extension(&self.conventions.metadata_extension)
    }

    pub fn pickle_path(&self) -> Result<PathBuf> {
        self.unique_with_extension(&self.conventions.pickle_extension)
    }

    pub fn video_paths(&self) -> Result<VideoFiles> {
        let ext = &self.conventions.video_extension;
        let marker = &self.conventions.labeled_video_marker;
        let videos: Vec<String> = self
            .subject_filenames()?
            .into_iter()
            .filter(|f| f.ends_with(ext.as_str()))
            .collect();

        if videos.len() > 2 {
            return Err(Error::FileResolution(format!(
                "subject {} has {} videos, expected at most 2",
                self.subject,
                videos.len()
            )));
        }

        let (labeled, raw): (Vec<String>, Vec<String>) =
            videos.into_iter().partition(|f| f.contains(marker.as_str()));

        let raw = match raw.as_slice() {
            [one] => self.input_dir.join(one),
            [] => {
                return Err(Error::FileResolution(format!(
                    "no raw video for subject {}",
                    self.subject
                )))
            }
            _ => {
                return Err(Error::FileResolution(format!(
                    "several raw videos for subject {}: {:?}",
                    self.subject, raw
                )))
            }
        };

        Ok(VideoFiles {
            raw,
            labeled: labeled.first().map(|f| self.input_dir.join(f)),
        })
    }

    /// Open the tracking table
    pub fn load_source(&self) -> Result<DlcCsvSource> {
        let path = self.metadata_path()?;
        debug!("Loading {} trace for {} from {}", self.part, self.subject, path.display());
        DlcCsvSource::from_path(path)
    }

    fn unique_with_extension(&self, extension: &str) -> Result<PathBuf> {
        let matches: Vec<String> = self
            .subject_filenames()?
            .into_iter()
            .filter(|f| f.ends_with(extension))
            .collect();
        let name = find_unique(&matches, extension)?;
        Ok(self.input_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SUBJECT_FILES: [&str; 4] = [
        "20190416_iblrig_leftCamera.raw.KS003DeepCut_resnet50_eye.csv",
        "20190416_iblrig_leftCamera.raw.KS003DeepCut_resnet50_eye.pickle",
        "20190416_iblrig_leftCamera.raw.KS003.mp4",
        "20190416_iblrig_leftCamera.raw.KS003_labeled.mp4",
    ];

    fn layout_with_files(files: &[&str]) -> (tempfile::TempDir, DatasetLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::default().with_base_path(dir.path());
        let input = layout.input_dir(BodyPartKind::Pupil).unwrap();
        fs::create_dir_all(&input).unwrap();
        for f in files {
            fs::write(input.join(f), b"").unwrap();
        }
        fs::create_dir(input.join("KS003_cache")).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_search_helpers() {
        let files: Vec<String> = ["a_KS003.csv", "b_KS004.csv", "a_KS003.mp4"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(filter_containing(&files, "KS003").len(), 2);
        assert_eq!(search_files(&files, r"\.csv$").unwrap().len(), 2);
        assert_eq!(find_unique(&files, "KS004").unwrap(), "b_KS004.csv");
        assert!(matches!(find_unique(&files, "KS003"), Err(Error::FileResolution(_))));
        assert!(matches!(find_unique(&files, "KS999"), Err(Error::FileResolution(_))));
        assert!(matches!(search_files(&files, "("), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_list_dir_skips_directories() {
        let (_dir, layout) = layout_with_files(&SUBJECT_FILES);
        let files = list_dir_files(&layout.input_dir(BodyPartKind::Pupil).unwrap()).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_missing_directory() {
        let result = list_dir_files(Path::new("/nonexistent/tracklab/dir"));
        assert!(matches!(result, Err(Error::FileResolution(_))));
    }

    #[test]
    fn test_trial_file_resolution() {
        let (_dir, layout) = layout_with_files(&SUBJECT_FILES);
        let trial = TrialFiles::new(&layout, "KS003", BodyPartKind::Pupil).unwrap();

        assert_eq!(trial.subject_filenames().unwrap().len(), 4);
        assert!(trial.metadata_path().unwrap().ends_with(SUBJECT_FILES[0]));
        assert!(trial.pickle_path().unwrap().ends_with(SUBJECT_FILES[1]));

        let videos = trial.video_paths().unwrap();
        assert!(videos.raw.ends_with(SUBJECT_FILES[2]));
        assert!(videos.labeled.unwrap().ends_with(SUBJECT_FILES[3]));
    }

    #[test]
    fn test_wrong_file_count() {
        let (_dir, layout) = layout_with_files(&SUBJECT_FILES[..3]);
        let trial = TrialFiles::new(&layout, "KS003", BodyPartKind::Pupil).unwrap();
        assert!(matches!(trial.metadata_path(), Err(Error::FileResolution(_))));
    }

    #[test]
    fn test_raw_video_without_labeled_copy() {
        let mut layout_files = SUBJECT_FILES.to_vec();
        layout_files.pop();
        let (_dir, mut layout) = layout_with_files(&layout_files);
        layout.files.files_per_subject = None;

        let trial = TrialFiles::new(&layout, "KS003", BodyPartKind::Pupil).unwrap();
        let videos = trial.video_paths().unwrap();
        assert!(videos.raw.ends_with(SUBJECT_FILES[2]));
        assert_eq!(videos.labeled, None);
    }
}
