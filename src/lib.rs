#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Annotation record format, build operations, and loading.
pub mod annotation;
/// Single-scan directory catalogs.
pub mod catalog;
/// Validated class sets, label matching, and program settings.
pub mod config;
/// Centralized constants used across annotation, transform, and source modules.
pub mod constants;
/// Class-filtered iteration over annotation snapshots.
pub mod iterator;
/// Image source collaborator contract and naming helpers.
pub mod source;
/// Dataset transforms producing derived directory layouts.
pub mod transform;
/// Shared type aliases.
pub mod types;

mod errors;

pub use annotation::{AnnotationRecord, AnnotationStore, BuildReport};
pub use catalog::{CatalogEntry, PathCatalog};
pub use config::{ClassSet, DatasetConfig, LabelMatcher};
pub use errors::AnnotationError;
pub use iterator::ClassFilterIterator;
pub use source::{save_images, sequential_image_name, ImageSource};
pub use transform::{
    build_copy_variant, build_shuffle_variant, copy_with_class_prefix, shuffle_subsample,
    CopyReport,
};
pub use types::{ClassName, FileName, LabelAssignment, PathString};
