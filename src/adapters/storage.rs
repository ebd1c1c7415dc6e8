use crate::domain::model::StoredFile;
use crate::domain::ports::{FileWriter, Storage};
use crate::utils::error::Result;
use rand::RngCore;
use std::path::PathBuf;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Upload area on the local filesystem. Every file gets a random 32-hex name.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn random_name() -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

pub struct LocalFileWriter {
    file: File,
    stored_name: String,
    path: PathBuf,
}

impl Storage for LocalStorage {
    type Writer = LocalFileWriter;

    async fn create_file(&self) -> Result<LocalFileWriter> {
        fs::create_dir_all(&self.base_path).await?;

        let stored_name = Self::random_name();
        let path = self.base_path.join(&stored_name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        tracing::debug!("Receiving upload into {}", path.display());
        Ok(LocalFileWriter {
            file,
            stored_name,
            path,
        })
    }

    async fn remove_file(&self, file: &StoredFile) -> Result<()> {
        fs::remove_file(&file.path).await?;
        tracing::debug!("Removed upload {}", file.path.display());
        Ok(())
    }
}

impl LocalFileWriter {
    async fn sync(&mut self) -> Result<u64> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.file.metadata().await?.len())
    }
}

impl FileWriter for LocalFileWriter {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    async fn finish(mut self) -> Result<StoredFile> {
        match self.sync().await {
            Ok(size) => Ok(StoredFile {
                stored_name: self.stored_name,
                path: self.path,
                size,
            }),
            Err(e) => {
                self.discard().await;
                Err(e)
            }
        }
    }

    async fn discard(self) {
        let Self { file, path, .. } = self;
        drop(file);
        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("⚠️ Cannot remove partial upload {}: {}", path.display(), e);
        }
    }
}
