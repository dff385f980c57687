//! # src2html Library
//!
//! Renders a source file, or every recognized source file under a directory,
//! into a single static HTML listing with syntax highlighting and, for
//! directories, a table of contents.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use src2html::{Config, run_src2html};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("myproject", std::env::current_dir()?);
//!     let outcome = run_src2html(config).await?;
//!     println!("wrote {}", outcome.output_path.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod filewalker;
pub mod highlight;
pub mod paths;
pub mod settings;
pub mod template;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use document::{CodeFile, CodeSection, Document};
pub use error::RenderError;
pub use filewalker::{InputKind, classify, collect_files};
pub use highlight::{Highlight, HtmlFragment, SyntectHighlighter};
pub use settings::{ExtensionSet, Settings};
pub use template::Templates;
pub use writer::write_document;

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub output_path: PathBuf,
    pub kind: InputKind,
    pub file_count: usize,
}

/// Renders `config.input` to a single HTML file using syntect highlighting.
pub async fn run_src2html(config: Config) -> Result<RenderOutcome, RenderError> {
    run_with_highlighter(config, Arc::new(SyntectHighlighter::new())).await
}

/// Same as [`run_src2html`] with a caller-supplied highlighter.
///
/// Nothing is written unless every file was read and highlighted.
pub async fn run_with_highlighter(
    config: Config,
    highlighter: Arc<dyn Highlight>,
) -> Result<RenderOutcome, RenderError> {
    config.settings.validate()?;

    let kind = classify(&config.input).await?;
    let extensions = config.settings.extension_set();
    let output_path = config.output_path.clone().unwrap_or_else(|| {
        paths::output_path(
            &config.output_dir,
            &config.input,
            kind,
            &config.settings.output_suffix,
        )
    });

    info!("Rendering {} {}", kind.as_str(), config.input.display());

    let (base, folder) = match kind {
        InputKind::Directory => (
            Some(config.input.as_path()),
            Some(paths::dir_name(&config.input)),
        ),
        InputKind::File => (None, None),
    };

    let sources = match kind {
        InputKind::Directory => {
            let found = scan_directory(&config, &extensions).await?;
            let found = exclude_output(found, &output_path);
            if found.is_empty() {
                return Err(RenderError::NoMatchingFiles {
                    root: config.input.clone(),
                });
            }
            found
        }
        InputKind::File => vec![config.input.clone()],
    };

    info!("Found {} file(s)", sources.len());

    let files: Vec<CodeFile> = sources
        .into_iter()
        .map(|path| CodeFile::new(path, base, &extensions))
        .collect();
    let file_count = files.len();

    let templates = Templates::load(config.settings.template_dir.as_deref()).await?;
    let sections = document::load_sections(files, highlighter).await?;
    let page = Document::assemble(sections, folder.as_deref());
    let html = templates.render(&page)?;

    write_document(&output_path, &html).await?;
    info!("Wrote: {}", output_path.display());

    Ok(RenderOutcome {
        output_path,
        kind,
        file_count,
    })
}

async fn scan_directory(
    config: &Config,
    extensions: &ExtensionSet,
) -> Result<Vec<PathBuf>, RenderError> {
    let root = config.input.clone();
    let extensions = extensions.clone();
    let ignore_file = config.ignore_file.clone();

    tokio::task::spawn_blocking(move || {
        collect_files(&root, &extensions, ignore_file.as_deref())
    })
    .await?
}

/// Drops a previous run's output if it sits inside the scanned tree.
fn exclude_output(found: Vec<PathBuf>, output_path: &Path) -> Vec<PathBuf> {
    let Ok(output) = output_path.canonicalize() else {
        return found;
    };

    found
        .into_iter()
        .filter(|path| {
            let is_output = path.canonicalize().is_ok_and(|p| p == output);
            if is_output {
                debug!("Skipping previous output: {}", path.display());
            }
            !is_output
        })
        .collect()
}
