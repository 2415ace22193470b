/// Class label for an image.
/// Examples: `cat`, `dog`
pub type ClassName = String;
/// Bare file name within one dataset directory.
/// Examples: `0001.jpg`, `cat_0001.jpg`, `42.jpg`
pub type FileName = String;
/// Path rendered as a string for annotation records.
/// Example: `dataset/cat/0001.jpg`
pub type PathString = String;
/// Mapping from derived file name to class label, in copy order.
///
/// Produced by the shuffle transform, where derived names no longer encode
/// their class; required input for the derived annotation build.
pub type LabelAssignment = indexmap::IndexMap<FileName, ClassName>;
