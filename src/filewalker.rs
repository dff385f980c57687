use ignore::WalkBuilder;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::settings::ExtensionSet;

/// What the input path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::File => "file",
            InputKind::Directory => "directory",
        }
    }
}

/// Stats `path` once to decide between single-file and directory mode.
pub async fn classify(path: &Path) -> Result<InputKind, RenderError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| RenderError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(if metadata.is_dir() {
        InputKind::Directory
    } else {
        InputKind::File
    })
}

/// Collects every file under `root` whose extension is in `extensions`.
///
/// Entries are visited depth-first in directory-listing order; nothing is
/// sorted. Symlinks are followed, and a link back to an ancestor directory
/// fails the walk. Any unreadable directory fails the whole collection.
pub fn collect_files(
    root: &Path,
    extensions: &ExtensionSet,
    ignore_file: Option<&Path>,
) -> Result<Vec<PathBuf>, RenderError> {
    let mut builder = WalkBuilder::new(root);

    // Every file counts, hidden or gitignored alike
    builder.standard_filters(false).follow_links(true);

    if let Some(ignore_path) = ignore_file {
        if let Some(err) = builder.add_ignore(ignore_path) {
            return Err(RenderError::Config(format!(
                "invalid ignore file {}: {err}",
                ignore_path.display()
            )));
        }
    }

    let mut files = Vec::new();

    for result in builder.build() {
        let entry = result.map_err(|err| walk_error(root, err))?;
        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());

        if is_file && extensions.matches(entry.path()) {
            debug!("Collected: {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Peels the path/depth wrappers off a walk error and maps it to a render error.
fn walk_error(root: &Path, err: ignore::Error) -> RenderError {
    let mut path = root.to_path_buf();
    let mut err = err;

    loop {
        match err {
            ignore::Error::WithPath { path: inner_path, err: inner } => {
                path = inner_path;
                err = *inner;
            }
            ignore::Error::WithDepth { err: inner, .. } => err = *inner,
            ignore::Error::WithLineNumber { err: inner, .. } => err = *inner,
            ignore::Error::Loop { ancestor, child } => {
                return RenderError::SymlinkCycle { ancestor, child };
            }
            ignore::Error::Io(source) => return RenderError::DirectoryRead { path, source },
            other => {
                return RenderError::DirectoryRead {
                    path,
                    source: io::Error::other(other.to_string()),
                };
            }
        }
    }
}
