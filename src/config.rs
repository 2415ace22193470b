use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::AnnotationError;
use crate::types::ClassName;

/// Validated, ordered set of class names for one dataset.
///
/// Names must be non-empty, unique, and pairwise non-substring. The last
/// rule keeps the legacy substring matcher unambiguous: a `cat`/`catalog`
/// pair is rejected here instead of mislabeling records later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSet {
    names: Vec<ClassName>,
}

impl ClassSet {
    /// Validate `names` and build the set, preserving the given order.
    pub fn new(names: Vec<ClassName>) -> Result<Self, AnnotationError> {
        if names.is_empty() {
            return Err(AnnotationError::Configuration(
                "at least one class name is required".to_string(),
            ));
        }
        for (idx, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(AnnotationError::Configuration(
                    "class names must be non-empty".to_string(),
                ));
            }
            for other in &names[idx + 1..] {
                if name == other {
                    return Err(AnnotationError::Configuration(format!(
                        "duplicate class name '{name}'"
                    )));
                }
                if name.contains(other.as_str()) || other.contains(name.as_str()) {
                    return Err(AnnotationError::Configuration(format!(
                        "class names '{name}' and '{other}' overlap as substrings"
                    )));
                }
            }
        }
        Ok(Self { names })
    }

    /// Class names in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Class names as a slice, in configured order.
    pub fn as_slice(&self) -> &[ClassName] {
        &self.names
    }

    /// Number of classes in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set holds no classes. Unreachable through [`ClassSet::new`].
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Strategy for deriving a class label from a file path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelMatcher {
    /// Legacy behavior: the class name appears anywhere in the rendered path.
    /// Kept as the default for compatibility with existing annotations.
    #[default]
    Substring,
    /// The class name is a whole path segment or a delimiter-bounded token
    /// of the file name (`cat` matches `cat_0001.jpg` but not
    /// `catalog_0001.jpg`). Recommended for new datasets.
    Token,
}

impl LabelMatcher {
    /// True when `path` carries `class_name` under this strategy.
    pub fn matches(&self, path: &Path, class_name: &str) -> bool {
        match self {
            LabelMatcher::Substring => path.to_string_lossy().contains(class_name),
            LabelMatcher::Token => {
                let segment = path
                    .components()
                    .any(|component| component.as_os_str().to_str() == Some(class_name));
                let token = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.split(['_', '-', '.']).any(|tok| tok == class_name))
                    .unwrap_or(false);
                segment || token
            }
        }
    }

    /// First configured class matching `path`, in class-set order.
    pub fn classify<'a>(&self, path: &Path, classes: &'a ClassSet) -> Option<&'a str> {
        classes.names().find(|class| self.matches(path, class))
    }
}

/// Program settings shared by the dataset tools and the desktop viewer,
/// loaded from a JSON settings document.
#[derive(Clone, Debug, Deserialize)]
pub struct DatasetConfig {
    /// Path to the annotation file consumed or produced by the tools.
    pub annotation_path: PathBuf,
    /// Ordered class names for the dataset.
    pub classes: Vec<ClassName>,
    /// Dataset root directory, when the tool needs one.
    #[serde(default)]
    pub dataset_root: Option<PathBuf>,
}

impl DatasetConfig {
    /// Load settings from a JSON file, validating the class list.
    pub fn load(path: &Path) -> Result<Self, AnnotationError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|err| {
            AnnotationError::Configuration(format!("invalid settings file: {err}"))
        })?;
        ClassSet::new(config.classes.clone())?;
        Ok(config)
    }

    /// Validated class set built from [`DatasetConfig::classes`].
    pub fn class_set(&self) -> Result<ClassSet, AnnotationError> {
        ClassSet::new(self.classes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Result<ClassSet, AnnotationError> {
        ClassSet::new(names.iter().map(|name| (*name).to_string()).collect())
    }

    #[test]
    fn class_set_preserves_order() {
        let set = classes(&["dog", "cat"]).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["dog", "cat"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn class_set_rejects_duplicates_and_substrings() {
        assert!(matches!(
            classes(&["cat", "cat"]),
            Err(AnnotationError::Configuration(_))
        ));
        assert!(matches!(
            classes(&["cat", "catalog"]),
            Err(AnnotationError::Configuration(_))
        ));
        assert!(matches!(
            classes(&["catalog", "cat"]),
            Err(AnnotationError::Configuration(_))
        ));
        assert!(matches!(
            classes(&[]),
            Err(AnnotationError::Configuration(_))
        ));
        assert!(matches!(
            classes(&[""]),
            Err(AnnotationError::Configuration(_))
        ));
    }

    #[test]
    fn substring_matcher_keeps_legacy_false_positives() {
        let path = Path::new("dataset_copy/catalog_0001.jpg");
        assert!(LabelMatcher::Substring.matches(path, "cat"));
        assert!(!LabelMatcher::Token.matches(path, "cat"));
    }

    #[test]
    fn token_matcher_accepts_prefixes_and_segments() {
        assert!(LabelMatcher::Token.matches(Path::new("dataset_copy/cat_0001.jpg"), "cat"));
        assert!(LabelMatcher::Token.matches(Path::new("dataset/cat/0001.jpg"), "cat"));
        assert!(!LabelMatcher::Token.matches(Path::new("dataset/dog/0001.jpg"), "cat"));
    }

    #[test]
    fn classify_returns_first_match_in_class_order() {
        let set = classes(&["cat", "dog"]).unwrap();
        let label = LabelMatcher::Token.classify(Path::new("copy/dog_0003.jpg"), &set);
        assert_eq!(label, Some("dog"));
        let none = LabelMatcher::Token.classify(Path::new("copy/bird_0003.jpg"), &set);
        assert_eq!(none, None);
    }

    #[test]
    fn dataset_config_load_validates_classes() {
        let temp = tempfile::tempdir().unwrap();
        let settings = temp.path().join("settings.json");

        fs::write(
            &settings,
            r#"{"annotation_path": "a.csv", "classes": ["cat", "catalog"]}"#,
        )
        .unwrap();
        assert!(matches!(
            DatasetConfig::load(&settings),
            Err(AnnotationError::Configuration(_))
        ));

        fs::write(
            &settings,
            r#"{"annotation_path": "a.csv", "classes": ["cat", "dog"], "dataset_root": "dataset"}"#,
        )
        .unwrap();
        let config = DatasetConfig::load(&settings).unwrap();
        assert_eq!(config.dataset_root.as_deref(), Some(Path::new("dataset")));
    }

    #[test]
    fn dataset_config_parses_viewer_settings() {
        let raw = r#"{"annotation_path": "annotation.csv", "classes": ["cat", "dog"]}"#;
        let config: DatasetConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.annotation_path, PathBuf::from("annotation.csv"));
        assert_eq!(config.classes, vec!["cat".to_string(), "dog".to_string()]);
        assert!(config.dataset_root.is_none());
        assert!(config.class_set().is_ok());
    }
}
