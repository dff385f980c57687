use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::highlight::HighlightError;

/// Every way a render run can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("input not found: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no code files found in {}", root.display())]
    NoMatchingFiles { root: PathBuf },

    #[error("failed to read path {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("symlink cycle: {} points back to {}", child.display(), ancestor.display())]
    SymlinkCycle { ancestor: PathBuf, child: PathBuf },

    #[error("failed to read file {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to highlight {}", path.display())]
    Highlight {
        path: PathBuf,
        #[source]
        source: HighlightError,
    },

    #[error("failed to render template")]
    Template(#[from] minijinja::Error),

    #[error("failed to write output {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl RenderError {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RenderError::Task(_) => 1,
            RenderError::Config(_) => 2,
            RenderError::InputNotFound { .. } => 3,
            RenderError::NoMatchingFiles { .. } => 4,
            RenderError::DirectoryRead { .. } => 5,
            RenderError::SymlinkCycle { .. } => 6,
            RenderError::FileRead { .. } => 7,
            RenderError::Highlight { .. } => 8,
            RenderError::Template(_) => 9,
            RenderError::OutputWrite { .. } => 10,
        }
    }
}
