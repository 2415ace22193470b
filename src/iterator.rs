use std::path::Path;

use crate::annotation::{AnnotationRecord, AnnotationStore};
use crate::errors::AnnotationError;
use crate::types::{ClassName, PathString};

/// Forward-only cursor over the absolute paths of one class in an
/// annotation snapshot.
///
/// Construction eagerly loads the whole annotation into memory, so the
/// iterator is independent of the file afterwards and distinct instances
/// over the same path never interfere. The sequence is one-shot: once
/// exhausted it stays exhausted, and the viewer's wrap-around behavior is
/// achieved by constructing a fresh instance. The cursor survives between
/// [`ClassFilterIterator::advance`] calls, which supports the "next image"
/// interaction pattern.
pub struct ClassFilterIterator {
    records: Vec<AnnotationRecord>,
    target_label: ClassName,
    cursor: usize,
}

impl ClassFilterIterator {
    /// Load the annotation at `path` and filter for `target_label`.
    pub fn open(path: &Path, target_label: impl Into<ClassName>) -> Result<Self, AnnotationError> {
        let records = AnnotationStore::new(path).load()?;
        Ok(Self::from_records(records, target_label))
    }

    /// Build an iterator over an already-loaded record snapshot.
    pub fn from_records(
        records: Vec<AnnotationRecord>,
        target_label: impl Into<ClassName>,
    ) -> Self {
        Self {
            records,
            target_label: target_label.into(),
            cursor: 0,
        }
    }

    /// Absolute path of the next record matching the target label, in
    /// original record order, or `None` once the snapshot is exhausted.
    pub fn advance(&mut self) -> Option<PathString> {
        while self.cursor < self.records.len() {
            let record = &self.records[self.cursor];
            self.cursor += 1;
            if record.label == self.target_label {
                return Some(record.absolute_path.clone());
            }
        }
        None
    }
}

impl Iterator for ClassFilterIterator {
    type Item = PathString;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}
