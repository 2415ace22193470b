use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::{CatalogEntry, PathCatalog};
use crate::config::{ClassSet, LabelMatcher};
use crate::constants::annotation::{FIELD_COUNT, FIELD_SEPARATOR, RECORD_SEPARATOR};
use crate::errors::AnnotationError;
use crate::types::{ClassName, LabelAssignment, PathString};

/// One persisted annotation record.
///
/// Serialized as one line of three tab-separated fields, in this field
/// order, with no quoting or escaping. Paths containing tabs or newlines
/// corrupt the format; that limitation is inherited from the original
/// layout and not handled here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Absolute path to the image file.
    pub absolute_path: PathString,
    /// Path as catalogued, relative to the build's working directory.
    pub relative_path: PathString,
    /// Class label assigned at build time.
    pub label: ClassName,
}

impl AnnotationRecord {
    fn from_entry(entry: &CatalogEntry, label: &str) -> Self {
        Self {
            absolute_path: entry.absolute_path.to_string_lossy().into_owned(),
            relative_path: entry.relative_path.to_string_lossy().into_owned(),
            label: label.to_string(),
        }
    }

    /// Render the record as one annotation line, without the record separator.
    pub fn to_line(&self) -> String {
        format!(
            "{abs}{sep}{rel}{sep}{label}",
            abs = self.absolute_path,
            rel = self.relative_path,
            label = self.label,
            sep = FIELD_SEPARATOR,
        )
    }

    /// Parse one annotation line. `None` when the field count is wrong.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            absolute_path: fields[0].to_string(),
            relative_path: fields[1].to_string(),
            label: fields[2].to_string(),
        })
    }
}

/// Summary of a completed annotation build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of records written to the annotation file.
    pub records_written: usize,
}

/// Handle to one annotation file location.
///
/// Builds are full rebuilds: any pre-existing file at the path is deleted
/// before writing, so repeated builds with the same inputs are
/// byte-identical. The store does not enforce record uniqueness; callers
/// control what gets written. There is no partial-write recovery; a failed
/// build leaves the truncated file in place and the error reports how many
/// records had been flushed to disk before the failure.
pub struct AnnotationStore {
    path: PathBuf,
}

impl AnnotationStore {
    /// Create a handle for the annotation file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the annotation file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rebuild the annotation from a `dataset_root/<class>/<file>` tree.
    ///
    /// Classes are processed in configured order; within a class, records
    /// follow catalog order. Each entry is labeled with its directory's
    /// class name.
    pub fn build_direct(
        &self,
        dataset_root: &Path,
        classes: &ClassSet,
    ) -> Result<BuildReport, AnnotationError> {
        info!(path = %self.path.display(), "building direct annotation");
        let mut writer = RecordWriter::create(&self.path)?;
        for class_name in classes.names() {
            info!(class = class_name, "cataloguing class directory");
            let entries = PathCatalog::new(dataset_root.join(class_name)).list()?;
            for entry in &entries {
                writer.append(&AnnotationRecord::from_entry(entry, class_name))?;
            }
            writer.flush_batch()?;
        }
        let report = writer.finish()?;
        info!(records = report.records_written, "annotation build completed");
        Ok(report)
    }

    /// Rebuild the annotation from a flat directory whose file names encode
    /// the class (the `<class>_<original name>` copy layout).
    ///
    /// The directory is catalogued once; for each class in configured order,
    /// entries matching that class under `matcher` are emitted in catalog
    /// order. With [`LabelMatcher::Substring`] an entry may match more than
    /// one pass over overlapping names, which is why [`ClassSet`] rejects
    /// substring-overlapping class sets up front.
    pub fn build_copy(
        &self,
        dataset_dir: &Path,
        classes: &ClassSet,
        matcher: LabelMatcher,
    ) -> Result<BuildReport, AnnotationError> {
        info!(path = %self.path.display(), "building copy annotation");
        let entries = PathCatalog::new(dataset_dir).list()?;
        let mut writer = RecordWriter::create(&self.path)?;
        for class_name in classes.names() {
            info!(class = class_name, "filtering catalog for class");
            for entry in entries
                .iter()
                .filter(|entry| matcher.matches(&entry.relative_path, class_name))
            {
                writer.append(&AnnotationRecord::from_entry(entry, class_name))?;
            }
            writer.flush_batch()?;
        }
        let report = writer.finish()?;
        info!(records = report.records_written, "annotation build completed");
        Ok(report)
    }

    /// Rebuild the annotation from a flat directory plus an explicit
    /// name-to-label assignment (the shuffled layout, where names no longer
    /// encode the class).
    ///
    /// Records follow catalog order. Fails with
    /// [`AnnotationError::MissingLabel`] when a catalogued file has no entry
    /// in `assignment`.
    pub fn build_random(
        &self,
        dataset_dir: &Path,
        assignment: &LabelAssignment,
    ) -> Result<BuildReport, AnnotationError> {
        info!(path = %self.path.display(), "building random annotation");
        let entries = PathCatalog::new(dataset_dir).list()?;
        let mut writer = RecordWriter::create(&self.path)?;
        for entry in &entries {
            let name = entry.file_name();
            let label = assignment
                .get(name)
                .ok_or_else(|| AnnotationError::MissingLabel {
                    name: name.to_string(),
                })?;
            writer.append(&AnnotationRecord::from_entry(entry, label))?;
        }
        let report = writer.finish()?;
        info!(records = report.records_written, "annotation build completed");
        Ok(report)
    }

    /// Load the full record sequence in file order.
    pub fn load(&self) -> Result<Vec<AnnotationRecord>, AnnotationError> {
        if !self.path.exists() {
            return Err(AnnotationError::NotFound(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let record = AnnotationRecord::parse_line(line).ok_or_else(|| {
                AnnotationError::Configuration(format!("malformed annotation line: '{line}'"))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Append-only record writer that truncates the target on creation.
///
/// Appends land in the underlying writer's buffer; a record counts as
/// written only once a flush has carried it through, so the count reported
/// by [`AnnotationError::Write`] never includes records that were still
/// sitting in a dropped buffer when the failure hit.
struct RecordWriter<W: Write> {
    writer: W,
    buffered: usize,
    flushed: usize,
}

impl RecordWriter<BufWriter<File>> {
    fn create(path: &Path) -> Result<Self, AnnotationError> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            buffered: 0,
            flushed: 0,
        }
    }

    fn append(&mut self, record: &AnnotationRecord) -> Result<(), AnnotationError> {
        let mut line = record.to_line();
        line.push(RECORD_SEPARATOR);
        self.writer
            .write_all(line.as_bytes())
            .map_err(|source| AnnotationError::Write {
                written: self.flushed,
                source,
            })?;
        self.buffered += 1;
        Ok(())
    }

    fn flush_batch(&mut self) -> Result<(), AnnotationError> {
        self.writer
            .flush()
            .map_err(|source| AnnotationError::Write {
                written: self.flushed,
                source,
            })?;
        self.flushed = self.buffered;
        Ok(())
    }

    fn finish(mut self) -> Result<BuildReport, AnnotationError> {
        self.flush_batch()?;
        Ok(BuildReport {
            records_written: self.flushed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn record(abs: &str, label: &str) -> AnnotationRecord {
        AnnotationRecord {
            absolute_path: abs.to_string(),
            relative_path: abs.trim_start_matches('/').to_string(),
            label: label.to_string(),
        }
    }

    /// Accepts up to `limit` bytes, then fails every write.
    struct CappedSink {
        limit: usize,
        bytes: Vec<u8>,
    }

    impl io::Write for CappedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.bytes.len() + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
            }
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Buffers writes successfully but fails every flush.
    struct FlushFailSink;

    impl io::Write for FlushFailSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "device full"))
        }
    }

    #[test]
    fn write_failure_reports_only_flushed_records() {
        let first = record("/d/cat/0.jpg", "cat");
        let second = record("/d/cat/1.jpg", "cat");
        let third = record("/d/dog/0.jpg", "dog");
        let limit = first.to_line().len() + second.to_line().len() + 2;

        let mut writer = RecordWriter::new(CappedSink {
            limit,
            bytes: Vec::new(),
        });
        writer.append(&first).unwrap();
        writer.append(&second).unwrap();
        writer.flush_batch().unwrap();

        let err = writer.append(&third).unwrap_err();
        assert!(matches!(err, AnnotationError::Write { written: 2, .. }));
        assert_eq!(writer.writer.bytes.iter().filter(|b| **b == b'\n').count(), 2);
    }

    #[test]
    fn flush_failure_does_not_count_buffered_records() {
        let mut writer = RecordWriter::new(FlushFailSink);
        writer.append(&record("/d/cat/0.jpg", "cat")).unwrap();
        writer.append(&record("/d/cat/1.jpg", "cat")).unwrap();

        // Both records sit in the dropped buffer; none reached the sink's
        // durable side, so the reported count must stay at zero.
        let err = writer.flush_batch().unwrap_err();
        assert!(matches!(err, AnnotationError::Write { written: 0, .. }));
    }

    #[test]
    fn record_line_round_trip() {
        let record = AnnotationRecord {
            absolute_path: "/data/cat/0001.jpg".to_string(),
            relative_path: "dataset/cat/0001.jpg".to_string(),
            label: "cat".to_string(),
        };
        let line = record.to_line();
        assert_eq!(line, "/data/cat/0001.jpg\tdataset/cat/0001.jpg\tcat");
        assert_eq!(AnnotationRecord::parse_line(&line), Some(record));
    }

    #[test]
    fn parse_line_rejects_wrong_field_count() {
        assert_eq!(AnnotationRecord::parse_line("a\tb"), None);
        assert_eq!(AnnotationRecord::parse_line("a\tb\tc\td"), None);
        assert_eq!(AnnotationRecord::parse_line(""), None);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(temp.path().join("absent.csv"));
        assert!(matches!(store.load(), Err(AnnotationError::NotFound(_))));
    }

    #[test]
    fn load_rejects_malformed_lines() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("annotation.csv");
        fs::write(&path, "only_two\tfields\n").unwrap();
        let store = AnnotationStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(AnnotationError::Configuration(_))
        ));
    }
}
