//! Command-line driver for the dataset workflows: build the direct
//! annotation, the flat class-prefixed copy variant, or the shuffled
//! variant. Derived variants land next to the source tree under the
//! conventional `_copy` / `_random` suffixes.
//!
//! ```text
//! cargo run --example annotate -- --data-dir dataset --classes cat dog \
//!     --annotation annotation.csv direct
//! cargo run --example annotate -- --settings settings.json direct
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use imageset::constants::transform::{
    COPY_DIR_SUFFIX, DEFAULT_MAX_NAME_VALUE, DEFAULT_SAMPLE_COUNT, SHUFFLE_DIR_SUFFIX,
};
use imageset::{
    build_copy_variant, build_shuffle_variant, AnnotationError, AnnotationStore, ClassSet,
    DatasetConfig, LabelMatcher,
};

#[derive(Parser)]
#[command(about = "Build image dataset annotations")]
struct Cli {
    /// JSON settings document (the viewer's `annotation_path` / `classes` /
    /// `dataset_root` file); individual flags override its values.
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Dataset root directory.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
    /// Ordered class names.
    #[arg(short, long, num_args = 1..)]
    classes: Vec<String>,
    /// Path of the annotation file to build.
    #[arg(short, long)]
    annotation: Option<PathBuf>,
    /// Label matching strategy used by the derived variants.
    #[arg(long, value_enum, default_value_t = MatcherArg::Substring)]
    matcher: MatcherArg,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum MatcherArg {
    /// Legacy substring containment.
    Substring,
    /// Delimiter-bounded token or path segment (recommended).
    Token,
}

impl From<MatcherArg> for LabelMatcher {
    fn from(arg: MatcherArg) -> Self {
        match arg {
            MatcherArg::Substring => LabelMatcher::Substring,
            MatcherArg::Token => LabelMatcher::Token,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Annotate the `root/<class>/<file>` dataset in place.
    Direct,
    /// Copy into `<root>_copy` with class-prefixed names and annotate it.
    Copy,
    /// Shuffle-subsample into `<root>_random` and annotate it.
    Random {
        /// Upper bound (inclusive) for drawn file-name numbers.
        #[arg(long, default_value_t = DEFAULT_MAX_NAME_VALUE)]
        max_name_value: u32,
        /// Number of images to draw; must match the source file count.
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        sample_count: usize,
    },
}

fn with_suffix(dir: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(dir.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn main() -> Result<(), AnnotationError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Some(DatasetConfig::load(path)?),
        None => None,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| settings.as_ref().and_then(|s| s.dataset_root.clone()))
        .ok_or_else(|| {
            AnnotationError::Configuration(
                "--data-dir or a settings file with dataset_root is required".to_string(),
            )
        })?;
    let annotation = cli
        .annotation
        .clone()
        .or_else(|| settings.as_ref().map(|s| s.annotation_path.clone()))
        .ok_or_else(|| {
            AnnotationError::Configuration(
                "--annotation or a settings file is required".to_string(),
            )
        })?;
    let class_names = if cli.classes.is_empty() {
        settings.as_ref().map(|s| s.classes.clone()).unwrap_or_default()
    } else {
        cli.classes.clone()
    };
    let classes = ClassSet::new(class_names)?;
    let matcher = LabelMatcher::from(cli.matcher);

    let report = match cli.command {
        Command::Direct => {
            AnnotationStore::new(&annotation).build_direct(&data_dir, &classes)?
        }
        Command::Copy => build_copy_variant(
            &data_dir,
            &with_suffix(&data_dir, COPY_DIR_SUFFIX),
            &classes,
            matcher,
            &annotation,
        )?,
        Command::Random {
            max_name_value,
            sample_count,
        } => build_shuffle_variant(
            &data_dir,
            &with_suffix(&data_dir, SHUFFLE_DIR_SUFFIX),
            &classes,
            matcher,
            max_name_value,
            sample_count,
            &annotation,
        )?,
    };

    println!(
        "wrote {} records to {}",
        report.records_written,
        annotation.display()
    );
    Ok(())
}
