//! Collaborator contract for the image source that feeds dataset
//! directories, plus the sequential file-naming convention it saves under.
//!
//! The retrieval mechanism itself (the original system scraped a web image
//! search) lives outside this crate; only the paging interface and the
//! on-disk naming are specified here.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::PathCatalog;
use crate::constants::source::{IMAGE_EXTENSION, SEQUENTIAL_NAME_WIDTH};
use crate::errors::AnnotationError;
use crate::types::FileName;

/// External source of raw image bytes, paged by a cursor.
///
/// A page may yield zero or more blobs; retrying and advancing the cursor
/// are the implementor's concern.
pub trait ImageSource {
    /// Fetch one page of raw image blobs for `query`.
    fn fetch_page(&mut self, query: &str, page_cursor: u64)
        -> Result<Vec<Vec<u8>>, AnnotationError>;
}

/// Zero-padded sequential image file name, e.g. `0007.jpg` for index 7.
pub fn sequential_image_name(index: usize) -> FileName {
    format!("{index:0width$}{IMAGE_EXTENSION}", width = SEQUENTIAL_NAME_WIDTH)
}

/// Append `blobs` to `class_dir` using sequential names, creating the
/// directory when missing. Numbering continues from the existing file
/// count, so repeated pages extend the directory instead of overwriting it.
/// Returns the next free index.
pub fn save_images(class_dir: &Path, blobs: &[Vec<u8>]) -> Result<usize, AnnotationError> {
    fs::create_dir_all(class_dir)?;
    let mut index = PathCatalog::new(class_dir).list()?.len();
    for blob in blobs {
        fs::write(class_dir.join(sequential_image_name(index)), blob)?;
        index += 1;
    }
    info!(dir = %class_dir.display(), saved = blobs.len(), "saved image page");
    Ok(index)
}
