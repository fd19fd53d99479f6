//! Local filesystem artifact store

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::{ArtifactStore, INPUT_FILE, METADATA_FILE, StoredFile, VIDEO_FILE};
use crate::download::ByteStream;
use crate::error::{DownloadError, Error, Result};
use crate::types::JobId;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Stores artifacts under `<base_dir>/jobs/<job_id>/`
#[derive(Clone, Debug)]
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn write_file(&self, id: JobId, name: &str, data: &[u8]) -> Result<StoredFile> {
        let path = self.job_dir(id).join(name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::persistence(&path, e))?;
        Ok(StoredFile {
            path,
            bytes: data.len() as u64,
        })
    }

    async fn copy_stream(
        path: &Path,
        mut stream: ByteStream,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| Error::persistence(path, e))?;
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                read = stream.read(&mut buf) => read.map_err(|e| DownloadError::StreamInterrupted {
                    reason: e.to_string(),
                })?,
            };
            if read == 0 {
                break;
            }
            file.write_all(&buf[..read])
                .await
                .map_err(|e| Error::persistence(path, e))?;
            written += read as u64;
        }

        file.flush().await.map_err(|e| Error::persistence(path, e))?;
        file.sync_all().await.map_err(|e| Error::persistence(path, e))?;
        Ok(written)
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn init_job(&self, id: JobId) -> Result<PathBuf> {
        let dir = self.job_dir(id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::persistence(&dir, e))?;
        Ok(dir)
    }

    async fn save_input(&self, id: JobId, data: &[u8]) -> Result<StoredFile> {
        self.write_file(id, INPUT_FILE, data).await
    }

    async fn save_metadata(&self, id: JobId, data: &[u8]) -> Result<StoredFile> {
        self.write_file(id, METADATA_FILE, data).await
    }

    async fn save_video(
        &self,
        id: JobId,
        stream: ByteStream,
        cancel: &CancellationToken,
    ) -> Result<StoredFile> {
        let path = self.job_dir(id).join(VIDEO_FILE);

        match Self::copy_stream(&path, stream, cancel).await {
            Ok(bytes) => Ok(StoredFile { path, bytes }),
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await
                    && remove_err.kind() != std::io::ErrorKind::NotFound
                {
                    tracing::warn!(
                        path = %path.display(),
                        error = %remove_err,
                        "failed to remove partial video file"
                    );
                }
                Err(e)
            }
        }
    }

    fn job_dir(&self, id: JobId) -> PathBuf {
        self.base_dir.join("jobs").join(id.to_string())
    }
}
