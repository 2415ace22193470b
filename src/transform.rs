use std::fs;
use std::path::Path;

use rand::seq::index::sample;
use tracing::info;

use crate::annotation::{AnnotationStore, BuildReport};
use crate::catalog::PathCatalog;
use crate::config::{ClassSet, LabelMatcher};
use crate::constants::transform::{CLASS_PREFIX_SEPARATOR, SHUFFLE_EXTENSION};
use crate::errors::AnnotationError;
use crate::types::LabelAssignment;

/// Summary of a completed copy transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of files copied into the destination tree.
    pub files_copied: usize,
}

/// Copy a `source_root/<class>/<file>` tree into a flat
/// `dest_root/<class>_<file>` layout, creating `dest_root` when missing.
///
/// Classes are processed in configured order and each class directory in
/// catalog order. The class prefix keeps names from colliding across
/// classes; within a class, source names are already unique. The result is
/// the layout consumed by [`AnnotationStore::build_copy`].
///
/// No rollback: a failure partway leaves the files copied so far in place.
pub fn copy_with_class_prefix(
    source_root: &Path,
    dest_root: &Path,
    classes: &ClassSet,
) -> Result<CopyReport, AnnotationError> {
    fs::create_dir_all(dest_root)?;
    info!(
        source = %source_root.display(),
        dest = %dest_root.display(),
        "copying dataset into class-prefixed layout"
    );
    let mut files_copied = 0;
    for class_name in classes.names() {
        info!(class = class_name, "copying class directory");
        let entries = PathCatalog::new(source_root.join(class_name)).list()?;
        for entry in &entries {
            let new_name = format!(
                "{class_name}{CLASS_PREFIX_SEPARATOR}{original}",
                original = entry.file_name()
            );
            fs::copy(&entry.absolute_path, dest_root.join(&new_name))?;
            files_copied += 1;
        }
    }
    info!(files = files_copied, "copy transform completed");
    Ok(CopyReport { files_copied })
}

/// Copy a flat source directory into `dest_root` under `sample_count`
/// distinct names drawn uniformly without replacement from
/// `[0, max_name_value]`, returning the name-to-label assignment the
/// derived annotation build needs.
///
/// Each copied file's label is derived from its original path via `matcher`
/// (first configured class wins). Fails with
/// [`AnnotationError::InsufficientRange`] when the range cannot supply
/// `sample_count` distinct names, and with
/// [`AnnotationError::SampleCountMismatch`] when `sample_count` differs from
/// the number of source files: pairing drawn names with source files
/// positionally would otherwise silently drop data.
pub fn shuffle_subsample(
    source_root: &Path,
    dest_root: &Path,
    classes: &ClassSet,
    matcher: LabelMatcher,
    max_name_value: u32,
    sample_count: usize,
) -> Result<LabelAssignment, AnnotationError> {
    let available_names = max_name_value as usize + 1;
    if sample_count > available_names {
        return Err(AnnotationError::InsufficientRange {
            requested: sample_count,
            max_name_value,
        });
    }
    let entries = PathCatalog::new(source_root).list()?;
    if entries.len() != sample_count {
        return Err(AnnotationError::SampleCountMismatch {
            requested: sample_count,
            available: entries.len(),
        });
    }
    fs::create_dir_all(dest_root)?;
    info!(
        source = %source_root.display(),
        dest = %dest_root.display(),
        count = sample_count,
        "copying dataset into shuffled layout"
    );
    let mut rng = rand::rng();
    let drawn = sample(&mut rng, available_names, sample_count);
    let mut assignment = LabelAssignment::new();
    for (number, entry) in drawn.iter().zip(entries.iter()) {
        let label = matcher
            .classify(&entry.relative_path, classes)
            .ok_or_else(|| AnnotationError::UnclassifiedPath(entry.relative_path.clone()))?;
        let new_name = format!("{number}{SHUFFLE_EXTENSION}");
        fs::copy(&entry.absolute_path, dest_root.join(&new_name))?;
        assignment.insert(new_name, label.to_string());
    }
    info!(files = assignment.len(), "shuffle transform completed");
    Ok(assignment)
}

/// Produce the flat copy variant of a dataset and its annotation in one step.
pub fn build_copy_variant(
    source_root: &Path,
    dest_root: &Path,
    classes: &ClassSet,
    matcher: LabelMatcher,
    annotation_path: &Path,
) -> Result<BuildReport, AnnotationError> {
    copy_with_class_prefix(source_root, dest_root, classes)?;
    AnnotationStore::new(annotation_path).build_copy(dest_root, classes, matcher)
}

/// Produce the shuffled variant of a dataset and its annotation in one step.
pub fn build_shuffle_variant(
    source_root: &Path,
    dest_root: &Path,
    classes: &ClassSet,
    matcher: LabelMatcher,
    max_name_value: u32,
    sample_count: usize,
    annotation_path: &Path,
) -> Result<BuildReport, AnnotationError> {
    let assignment = shuffle_subsample(
        source_root,
        dest_root,
        classes,
        matcher,
        max_name_value,
        sample_count,
    )?;
    AnnotationStore::new(annotation_path).build_random(dest_root, &assignment)
}
