use std::path::{Path, PathBuf};

use crate::ImageExtension;

/// Deterministic output path without extension: `{dir}/{prefix}_{index}`.
///
/// `index` is the 1-based discovery index; it never shifts when earlier
/// candidates are skipped.
pub fn output_stem(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}_{index}"))
}

/// Appends `.{ext}` to a stem. Unlike `Path::with_extension` this keeps any
/// dots already present in the stem's file name.
pub fn with_extension(stem: &Path, ext: ImageExtension) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(ext.as_str());
    PathBuf::from(name)
}
