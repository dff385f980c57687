//! Section and document assembly.
//!
//! Files are read and highlighted concurrently, but every section lands at
//! the index its file had in discovery order, so the page body and the table
//! of contents always agree.

use content_inspector::{ContentType, inspect};
use log::{debug, warn};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::RenderError;
use crate::highlight::{Highlight, HtmlFragment};
use crate::paths::display_path;
use crate::settings::{ExtensionSet, extension_of};

const TITLE: &str = "Code Listing";
const SNIFF_LEN: usize = 8192;

/// A file selected for the listing. Its content is read later, once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFile {
    pub path: PathBuf,
    pub display_path: String,
    /// Extension without the leading `.`, case preserved. Empty if none.
    pub extension: String,
    /// Grammar hint; `None` means detect from content.
    pub language: Option<String>,
}

impl CodeFile {
    pub fn new(path: PathBuf, base: Option<&Path>, extensions: &ExtensionSet) -> Self {
        let extension = extension_of(&path).unwrap_or_default().to_string();
        let language = if !extension.is_empty() && extensions.matches(&path) {
            Some(extension.clone())
        } else {
            None
        };

        Self {
            display_path: display_path(base, &path),
            path,
            extension,
            language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSection {
    pub anchor: String,
    pub display_path: String,
    pub extension: String,
    pub code: HtmlFragment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub anchor: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOfContents {
    pub folder: String,
    pub entries: Vec<TocEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub toc: Option<TableOfContents>,
    pub sections: Vec<CodeSection>,
}

impl Document {
    /// Builds the page model. `folder` is set in directory mode and brings a
    /// table of contents with it.
    ///
    /// Anchors are made unique: a repeated display path gets `~k`, with the
    /// smallest `k >= 2` that no other section uses.
    pub fn assemble(mut sections: Vec<CodeSection>, folder: Option<&str>) -> Self {
        let taken: HashSet<String> = sections.iter().map(|s| s.anchor.clone()).collect();
        let mut used: HashSet<String> = HashSet::new();
        for section in &mut sections {
            if used.insert(section.anchor.clone()) {
                continue;
            }
            let mut k = 2;
            let mut anchor = format!("{}~{k}", section.anchor);
            while taken.contains(&anchor) || used.contains(&anchor) {
                k += 1;
                anchor = format!("{}~{k}", section.anchor);
            }
            warn!("Duplicate anchor '{}', renamed to '{anchor}'", section.anchor);
            used.insert(anchor.clone());
            section.anchor = anchor;
        }

        let toc = folder.map(|folder| TableOfContents {
            folder: folder.to_string(),
            entries: sections
                .iter()
                .map(|s| TocEntry {
                    anchor: s.anchor.clone(),
                    label: s.display_path.clone(),
                })
                .collect(),
        });

        let title = match folder {
            Some(folder) => format!("{TITLE} - {folder}"),
            None => TITLE.to_string(),
        };

        Self {
            title,
            toc,
            sections,
        }
    }
}

/// Reads and highlights every file, concurrently, preserving input order.
///
/// The first failure aborts the remaining work.
pub async fn load_sections(
    files: Vec<CodeFile>,
    highlighter: Arc<dyn Highlight>,
) -> Result<Vec<CodeSection>, RenderError> {
    let total = files.len();
    let mut tasks = JoinSet::new();

    for (index, file) in files.into_iter().enumerate() {
        let highlighter = Arc::clone(&highlighter);
        tasks.spawn(async move {
            let code = read_source(&file.path).await?;
            let section =
                tokio::task::spawn_blocking(move || render_section(file, &code, &*highlighter))
                    .await??;
            Ok::<_, RenderError>((index, section))
        });
    }

    let mut slots: Vec<Option<CodeSection>> = vec![None; total];
    while let Some(joined) = tasks.join_next().await {
        let (index, section) = joined??;
        slots[index] = Some(section);
    }

    Ok(slots.into_iter().flatten().collect())
}

fn render_section(
    file: CodeFile,
    code: &str,
    highlighter: &dyn Highlight,
) -> Result<CodeSection, RenderError> {
    debug!("Highlighting: {}", file.display_path);

    let code = highlighter
        .highlight(code, file.language.as_deref())
        .map_err(|source| RenderError::Highlight {
            path: file.path.clone(),
            source,
        })?;

    Ok(CodeSection {
        anchor: file.display_path.clone(),
        display_path: file.display_path,
        extension: file.extension,
        code,
    })
}

/// Reads a file as UTF-8 text. Binary content is an error.
pub async fn read_source(path: &Path) -> Result<String, RenderError> {
    let read_error = |source: io::Error| RenderError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = tokio::fs::read(path).await.map_err(read_error)?;

    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];
    match inspect(sample) {
        ContentType::BINARY => {
            return Err(read_error(io::Error::new(
                io::ErrorKind::InvalidData,
                "binary content",
            )));
        }
        ContentType::UTF_8_BOM => {
            bytes.drain(..3);
        }
        _ => {}
    }

    String::from_utf8(bytes)
        .map_err(|err| read_error(io::Error::new(io::ErrorKind::InvalidData, err)))
}
