//! Static configuration: recognized extensions, text encoding, output naming
//! and the optional template directory.
//!
//! Settings are loaded once at startup (defaults, then an optional TOML file,
//! then CLI overrides) and passed down as an immutable value.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".py", ".java", ".html", ".css", ".jsx", ".tsx",
];
pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-code.html";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Extensions eligible for a directory scan.
    pub extensions: Vec<String>,
    /// Encoding used to decode source files. Only UTF-8 is supported.
    pub encoding: String,
    /// Appended to the input's base name to form the output file name.
    pub output_suffix: String,
    /// Directory holding replacement `document.html`, `section.html` and `toc.html`.
    pub template_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            encoding: DEFAULT_ENCODING.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            template_dir: None,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), RenderError> {
        let encoding = self.encoding.to_ascii_lowercase();
        if encoding != "utf-8" && encoding != "utf8" {
            return Err(RenderError::Config(format!(
                "unsupported encoding '{}', only utf-8 is supported",
                self.encoding
            )));
        }

        if self.output_suffix.is_empty() {
            return Err(RenderError::Config("output suffix must not be empty".into()));
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(RenderError::Config(format!(
                "output suffix '{}' must not contain a path separator",
                self.output_suffix
            )));
        }

        Ok(())
    }

    pub fn extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(self.extensions.as_slice())
    }
}

/// Case-insensitive, ordered set of file extensions, each stored with its
/// leading `.`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            let ext = format!(".{ext}");
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self {
            extensions: normalized,
        }
    }

    /// Exact match of the path's lower-cased extension (with its `.`).
    pub fn matches(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.contains(&format!(".{}", ext.to_lowercase())))
            .unwrap_or(false)
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// The extension of `path` without its leading `.`, case preserved.
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}
