//! Local file access

use async_trait::async_trait;
use discovery_runtime_common::{DiscoveryError, FileReader, Result};
use std::path::Path;

/// Reads discovery documents with `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl FileReader for FsReader {
    async fn read_text(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DiscoveryError::File {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "x"}}"#).unwrap();

        let text = FsReader.read_text(file.path()).await.unwrap();
        assert_eq!(text, r#"{"name": "x"}"#);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = FsReader
            .read_text(Path::new("/nonexistent/schema.json"))
            .await
            .unwrap_err();

        match err {
            DiscoveryError::File { path, source } => {
                assert_eq!(path, Path::new("/nonexistent/schema.json"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
