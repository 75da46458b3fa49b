//! Filesystem evidence source.
//!
//! Reads the files a step lists, relative to a configured root. Paths that
//! resolve outside the root, are missing, or are not UTF-8 text come back
//! as retrieval failures; they never abort the fetch.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::ports::{
    EvidenceBundle, EvidenceDocument, EvidenceError, EvidenceSource, RetrievalFailure,
};

/// Default per-file read limit (256 KiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 256 * 1024;

/// Evidence read from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileEvidenceSource {
    root: PathBuf,
    max_file_bytes: u64,
}

impl FileEvidenceSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_one(&self, root: &Path, requested: &str) -> Result<EvidenceDocument, String> {
        let candidate = {
            let p = Path::new(requested);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        let resolved = fs::canonicalize(&candidate)
            .await
            .map_err(|e| describe_io_error(&e))?;
        if !resolved.starts_with(root) {
            return Err("path is outside the evidence root".to_string());
        }

        let metadata = fs::metadata(&resolved)
            .await
            .map_err(|e| describe_io_error(&e))?;
        if !metadata.is_file() {
            return Err("not a regular file".to_string());
        }

        let file = fs::File::open(&resolved)
            .await
            .map_err(|e| describe_io_error(&e))?;
        let mut bytes = Vec::new();
        file.take(self.max_file_bytes + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| describe_io_error(&e))?;

        let truncated = bytes.len() as u64 > self.max_file_bytes;
        if truncated {
            bytes.truncate(self.max_file_bytes as usize);
        }

        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            // A cut may land inside a multi-byte character.
            Err(e) if truncated => {
                let valid = e.utf8_error().valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes).map_err(|_| "not valid UTF-8 text".to_string())?
            }
            Err(_) => return Err("not valid UTF-8 text".to_string()),
        };

        Ok(EvidenceDocument {
            path: requested.to_string(),
            content,
            truncated,
        })
    }
}

fn describe_io_error(err: &std::io::Error) -> String {
    match err.kind() {
        std::io::ErrorKind::NotFound => "file not found".to_string(),
        std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => err.to_string(),
    }
}

#[async_trait]
impl EvidenceSource for FileEvidenceSource {
    async fn fetch(&self, paths: &[String]) -> Result<EvidenceBundle, EvidenceError> {
        if paths.is_empty() {
            return Ok(EvidenceBundle::default());
        }

        let root = fs::canonicalize(&self.root).await.map_err(|e| {
            EvidenceError::RootUnavailable(format!("{}: {}", self.root.display(), e))
        })?;

        let mut bundle = EvidenceBundle::default();
        for path in paths {
            match self.read_one(&root, path).await {
                Ok(document) => bundle.documents.push(document),
                Err(reason) => {
                    tracing::warn!(path = %path, reason = %reason, "Evidence retrieval failed");
                    bundle.failures.push(RetrievalFailure::new(path.clone(), reason));
                }
            }
        }

        tracing::debug!(
            retrieved = bundle.documents.len(),
            failed = bundle.failures.len(),
            "Evidence fetched"
        );
        Ok(bundle)
    }
}
