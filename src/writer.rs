use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::RenderError;

/// Writes the finished page to `path`, replacing any existing file.
///
/// The content goes to a hidden sibling first and is renamed into place, so
/// a failed write never leaves a half-written page behind.
pub async fn write_document(path: &Path, html: &str) -> Result<(), RenderError> {
    let staging = staging_path(path);
    let write_error = |source: io::Error| RenderError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    debug!("Writing to staging file: {}", staging.display());

    if let Err(err) = write_staging(&staging, html).await {
        let _ = fs::remove_file(&staging).await;
        return Err(write_error(err));
    }

    if let Err(err) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(write_error(err));
    }

    Ok(())
}

async fn write_staging(staging: &Path, html: &str) -> io::Result<()> {
    let file = File::create(staging).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes()).await?;
    writer.flush().await?;
    writer.get_ref().sync_all().await?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.part"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_writes_and_overwrites() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("root-code.html");
        std::fs::write(&path, "old")?;

        write_document(&path, "<html></html>").await?;

        assert_eq!(std::fs::read_to_string(&path)?, "<html></html>");
        assert!(!dir.path().join(".root-code.html.part").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_parent_is_an_output_error() {
        let path = Path::new("/no/such/dir/out.html");
        let err = write_document(path, "x").await.unwrap_err();
        assert!(matches!(err, RenderError::OutputWrite { .. }));
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("out/a-code.html")),
            PathBuf::from("out/.a-code.html.part")
        );
    }
}
