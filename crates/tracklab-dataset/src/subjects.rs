//! Subject discovery across body-part directories.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};
use tracklab_core::Result;

use crate::body_part::BodyPartKind;
use crate::config::DatasetLayout;
use crate::files::list_dir_files;

/// Subject name encoded in a rig tracking file name.
///
/// `<date>_<rig_tag>_<camera>.<kind>.<subject>...` yields `<subject>`; files
/// from other rigs yield `None`.
pub fn parse_subject_name(file: &str, rig_tag: &str) -> Option<String> {
    let mut tokens = file.split('_');
    let _date = tokens.next()?;
    if tokens.next()? != rig_tag {
        return None;
    }
    tokens
        .next()?
        .split('.')
        .nth(2)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Body parts tracked for every known subject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectTable {
    subjects: BTreeMap<String, BTreeSet<BodyPartKind>>,
}

impl SubjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: impl Into<String>, part: BodyPartKind) {
        self.subjects.entry(subject.into()).or_default().insert(part);
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Subject names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.subjects.keys().map(String::as_str).collect()
    }

    pub fn parts(&self, subject: &str) -> Option<&BTreeSet<BodyPartKind>> {
        self.subjects.get(subject)
    }

    pub fn has(&self, subject: &str, part: BodyPartKind) -> bool {
        self.parts(subject).map_or(false, |parts| parts.contains(&part))
    }

    pub fn with_part(&self, part: BodyPartKind) -> Vec<&str> {
        self.with_all(&[part])
    }

    /// Subjects tracked for every one of `parts`
    pub fn with_all(&self, parts: &[BodyPartKind]) -> Vec<&str> {
        self.subjects
            .iter()
            .filter(|(_, tracked)| parts.iter().all(|p| tracked.contains(p)))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<BodyPartKind>)> {
        self.subjects.iter().map(|(name, parts)| (name.as_str(), parts))
    }
}

/// Scan every configured body-part directory for rig tracking tables.
///
/// A subject appears once per body part it was tracked for. Directories that
/// do not exist are skipped.
pub fn discover_subjects(layout: &DatasetLayout) -> Result<SubjectTable> {
    let mut table = SubjectTable::new();

    for part in BodyPartKind::ALL {
        let dir = match layout.input_dir(part) {
            Ok(dir) => dir,
            Err(_) => {
                debug!("No input directory configured for {}", part);
                continue;
            }
        };
        if !dir.is_dir() {
            warn!("Input directory for {} not found: {}", part, dir.display());
            continue;
        }

        let mut found = 0;
        for file in list_dir_files(&dir)? {
            if !file.ends_with(&layout.files.metadata_extension) {
                continue;
            }
            if let Some(subject) = parse_subject_name(&file, &layout.files.rig_tag) {
                table.insert(subject, part);
                found += 1;
            }
        }
        info!("{}: {} tracked subjects", part, found);
    }

    Ok(table)
}
