/// Constants describing the on-disk annotation record format.
pub mod annotation {
    /// Field separator within one annotation record.
    pub const FIELD_SEPARATOR: char = '\t';
    /// Record separator between annotation records.
    pub const RECORD_SEPARATOR: char = '\n';
    /// Fields per record: absolute path, relative path, label.
    pub const FIELD_COUNT: usize = 3;
}

/// Constants used by dataset transforms and derived layouts.
pub mod transform {
    /// Separator between the class prefix and the original file name
    /// in the flat copy layout (for example `cat_0001.jpg`).
    pub const CLASS_PREFIX_SEPARATOR: char = '_';
    /// Extension given to shuffled file names.
    pub const SHUFFLE_EXTENSION: &str = ".jpg";
    /// Default upper bound (inclusive) for drawn shuffle names.
    pub const DEFAULT_MAX_NAME_VALUE: u32 = 10_000;
    /// Default number of images drawn by the shuffle transform.
    pub const DEFAULT_SAMPLE_COUNT: usize = 2_000;
    /// Directory suffix conventionally used for the flat copy variant.
    pub const COPY_DIR_SUFFIX: &str = "_copy";
    /// Directory suffix conventionally used for the shuffled variant.
    pub const SHUFFLE_DIR_SUFFIX: &str = "_random";
}

/// Constants used by image-source file naming.
pub mod source {
    /// Zero-padded width of sequential image names (`0000.jpg`, `0001.jpg`, ...).
    pub const SEQUENTIAL_NAME_WIDTH: usize = 4;
    /// Extension given to downloaded images.
    pub const IMAGE_EXTENSION: &str = ".jpg";
}
