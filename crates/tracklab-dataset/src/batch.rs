//! Loading across many subjects, one independent pipeline per subject.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};
use tracklab_core::{FeatureSeries, Result};

use crate::body_part::BodyPartKind;
use crate::config::DatasetLayout;
use crate::store::{FeatureFiles, FeatureSplits, TraceSegment};
use crate::trial::GroupTrial;

/// Feature segments of many subjects, grouped by split
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitCollection {
    pub train: BTreeMap<String, Vec<TraceSegment>>,
    pub val: BTreeMap<String, Vec<TraceSegment>>,
    pub test: BTreeMap<String, Vec<TraceSegment>>,
}

impl SplitCollection {
    /// Subjects with stored features
    pub fn subjects(&self) -> Vec<&str> {
        self.train.keys().map(String::as_str).collect()
    }

    fn log_counts(&self) {
        for (split, sets) in [("Train", &self.train), ("Val", &self.val), ("Test", &self.test)] {
            info!("{} sets", split);
            for (subject, segments) in sets {
                info!("{} : {} sets", subject, segments.len());
            }
        }
    }
}

/// Load the stored feature splits of every subject in parallel.
///
/// Subjects without a feature file are skipped with a warning.
pub fn load_features_for_subjects<S>(
    layout: &DatasetLayout,
    subjects: &[S],
    part: BodyPartKind,
    output_override: Option<&Path>,
) -> Result<SplitCollection>
where
    S: AsRef<str> + Sync,
{
    let loaded = subjects
        .par_iter()
        .map(|subject| -> Result<(String, Option<FeatureSplits>)> {
            let subject = subject.as_ref();
            let files = FeatureFiles::new(layout, subject, part, output_override)?;
            Ok((subject.to_string(), files.load_features()?))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut collection = SplitCollection::default();
    for (subject, splits) in loaded {
        let Some(splits) = splits else {
            warn!("No {} features stored for {}, skipping", part, subject);
            continue;
        };
        collection.train.insert(subject.clone(), splits.train);
        collection.val.insert(subject.clone(), splits.val);
        collection.test.insert(subject, splits.test);
    }

    collection.log_counts();
    Ok(collection)
}

/// Pupil quadrilateral area of every subject in parallel.
///
/// Each subject succeeds or fails on its own.
pub fn quad_areas_for_subjects<S>(
    layout: &DatasetLayout,
    subjects: &[S],
) -> BTreeMap<String, Result<FeatureSeries>>
where
    S: AsRef<str> + Sync,
{
    subjects
        .par_iter()
        .map(|subject| {
            let subject = subject.as_ref();
            let area = GroupTrial::pupil(layout, subject).and_then(|trial| trial.pupil_quad_area());
            if let Err(e) = &area {
                warn!("Pupil area failed for {}: {}", subject, e);
            }
            (subject.to_string(), area)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_load_features_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::default()
            .with_base_path(dir.path())
            .with_output_dir(dir.path().join("out"));

        let stored = FeatureFiles::new(&layout, "KS003", BodyPartKind::Paw, None).unwrap();
        stored
            .save_features(&FeatureSplits {
                train: vec![TraceSegment::new(0, 2, array![[1.0, 2.0]]).unwrap()],
                val: vec![],
                test: vec![TraceSegment::new(4, 5, array![[3.0]]).unwrap()],
            })
            .unwrap();

        let collection =
            load_features_for_subjects(&layout, &["KS003", "KS004"], BodyPartKind::Paw, None).unwrap();

        assert_eq!(collection.subjects(), vec!["KS003"]);
        assert_eq!(collection.train["KS003"].len(), 1);
        assert!(collection.val["KS003"].is_empty());
        assert_eq!(collection.test["KS003"][0].start, 4);
    }

    #[test]
    fn test_quad_areas_report_per_subject() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::default().with_base_path(dir.path());

        let areas = quad_areas_for_subjects(&layout, &["KS003".to_string()]);
        assert_eq!(areas.len(), 1);
        assert!(areas["KS003"].is_err());
    }
}
