//! Display paths and output naming.

use std::path::{Component, Path, PathBuf};

use crate::filewalker::InputKind;

const FALLBACK_NAME: &str = "listing";

/// The folder-rooted path shown as heading text and used as anchor id.
///
/// Without a base (single-file mode) the file path is returned as given.
/// With a base directory the result is `<base dir name>/<path relative to base>`,
/// always joined with `/`.
pub fn display_path(base: Option<&Path>, file: &Path) -> String {
    let Some(base) = base else {
        return file.to_string_lossy().into_owned();
    };

    let relative = file.strip_prefix(base).unwrap_or(file);
    let mut segments = vec![dir_name(base)];
    segments.extend(
        relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    segments.join("/")
}

/// Final segment of a directory path. `.` and `..` are resolved first.
pub fn dir_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }

    dir.canonicalize()
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Base name used for the output file: the file stem for a file input, the
/// directory name for a directory input.
pub fn output_base_name(input: &Path, kind: InputKind) -> String {
    match kind {
        InputKind::Directory => dir_name(input),
        InputKind::File => input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_NAME.to_string()),
    }
}

/// `<dir>/<base name><suffix>`
pub fn output_path(dir: &Path, input: &Path, kind: InputKind, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", output_base_name(input, kind), suffix))
}
