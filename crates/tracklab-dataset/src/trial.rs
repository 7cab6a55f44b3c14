//! Marker-group loaders for one subject's trial.

use tracing::info;
use tracklab_core::{Error, FeatureSeries, GroupArrays, MarkerGroup, QuadIndices, Result};
use tracklab_extract::GroupSpec;

use crate::body_part::BodyPartKind;
use crate::config::DatasetLayout;
use crate::files::TrialFiles;

/// Loads the configured marker group from a trial's tracking table
#[derive(Debug, Clone)]
pub struct GroupTrial {
    files: TrialFiles,
    spec: GroupSpec,
}

impl GroupTrial {
    pub fn new(files: TrialFiles, spec: GroupSpec) -> Self {
        Self { files, spec }
    }

    /// Trial of `part` with the group configured for it in the layout
    pub fn for_body_part(layout: &DatasetLayout, subject: &str, part: BodyPartKind) -> Result<Self> {
        let spec = layout.group_spec(part)?.clone();
        Ok(Self::new(TrialFiles::new(layout, subject, part)?, spec))
    }

    pub fn pupil(layout: &DatasetLayout, subject: &str) -> Result<Self> {
        Self::for_body_part(layout, subject, BodyPartKind::Pupil)
    }

    pub fn paw(layout: &DatasetLayout, subject: &str) -> Result<Self> {
        Self::for_body_part(layout, subject, BodyPartKind::Paw)
    }

    pub fn files(&self) -> &TrialFiles {
        &self.files
    }

    pub fn spec(&self) -> &GroupSpec {
        &self.spec
    }

    pub fn load_group(&self, impose_order: bool) -> Result<MarkerGroup> {
        let source = self.files.load_source()?;
        let group = self.spec.load(&source, impose_order)?;
        info!(
            "{} {} for {}: {:?}",
            self.files.part(),
            self.spec.name,
            self.files.subject(),
            group.names()
        );
        Ok(group)
    }

    /// Group as `[markers × frames]` arrays
    pub fn load_trace_raw(&self, impose_order: bool) -> Result<GroupArrays> {
        Ok(self.load_group(impose_order)?.into_arrays())
    }

    /// Inscribed-quadrilateral area per frame.
    ///
    /// Only defined for four-role groups, which are loaded in role order.
    pub fn pupil_quad_area(&self) -> Result<FeatureSeries> {
        match self.spec.expected_count() {
            Some(4) => {}
            other => {
                return Err(Error::InvalidInput(format!(
                    "group '{}' has {} roles, quadrilateral area needs 4",
                    self.spec.name,
                    other.unwrap_or(0)
                )))
            }
        }

        let group = self.load_group(true)?;
        let area = group.quadrilateral_area(QuadIndices::default())?;
        Ok(FeatureSeries::new(
            format!("{}_quad_area", self.spec.name),
            area.to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_pupil_trial(layout: &DatasetLayout) {
        let input = layout.input_dir(BodyPartKind::Pupil).unwrap();
        fs::create_dir_all(&input).unwrap();
        // left, top, right, bottom in column order
        fs::write(
            input.join("20190416_iblrig_leftCamera.raw.KS003_eye.csv"),
            "scorer,net,net,net,net,net,net,net,net,net,net,net,net\n\
             bodyparts,pupil_left_r,pupil_left_r,pupil_left_r,pupil_top_r,pupil_top_r,pupil_top_r,\
             pupil_right_r,pupil_right_r,pupil_right_r,pupil_bottom_r,pupil_bottom_r,pupil_bottom_r\n\
             coords,x,y,likelihood,x,y,likelihood,x,y,likelihood,x,y,likelihood\n\
             0,-1,0,1,0,1,1,1,0,1,0,-1,1\n\
             1,-2,0,1,0,2,1,2,0,1,0,-2,1\n",
        )
        .unwrap();
    }

    #[test]
    fn test_pupil_area_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut layout = DatasetLayout::default().with_base_path(dir.path());
        layout.files.files_per_subject = None;
        write_pupil_trial(&layout);

        let trial = GroupTrial::pupil(&layout, "KS003").unwrap();
        let arrays = trial.load_trace_raw(true).unwrap();
        assert_eq!(
            arrays.names,
            vec!["pupil_top_r", "pupil_bottom_r", "pupil_left_r", "pupil_right_r"]
        );

        let area = trial.pupil_quad_area().unwrap();
        assert_eq!(area.name, "pupil_quad_area");
        assert!((area.values[0] - 2.0).abs() < 1e-12);
        assert!((area.values[1] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_needs_four_roles() {
        let layout = DatasetLayout::default();
        let trial = GroupTrial::paw(&layout, "KS003").unwrap();
        assert!(matches!(trial.pupil_quad_area(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_unconfigured_group() {
        let layout = DatasetLayout::default();
        assert!(GroupTrial::for_body_part(&layout, "KS003", BodyPartKind::Tongue).is_err());
    }
}
