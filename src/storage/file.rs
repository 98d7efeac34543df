use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bytes::Bytes;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::task;
use uuid::Uuid;

use super::Storage;
use crate::AppError;

#[derive(Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub async fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir: PathBuf = dir.into();

        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create storage directory {}", dir.display()))?;

        if !dir.is_dir() {
            bail!("not a directory");
        }

        Ok(FileStorage { dir })
    }
}

/// Keys map to plain file names inside the storage directory.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('.') && !key.contains(['/', '\\'])
}

impl Storage for FileStorage {
    async fn get_object(&mut self, key: &str) -> crate::AppResult<Bytes> {
        if !is_valid_key(key) {
            return Err(AppError::NotFound);
        }

        let mut buf = Vec::with_capacity(1024);
        let mut file = BufReader::new(fs::File::open(self.dir.join(key)).await?);
        file.read_to_end(&mut buf).await?;

        Ok(buf.into())
    }

    async fn put_object(&mut self, key: &str, data: Bytes) -> crate::AppResult<()> {
        if !is_valid_key(key) {
            return Err(AppError::storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid object key: {key:?}"),
            )));
        }

        // the blocking task finishes (and cleans up) even if this future is dropped
        let dir = self.dir.clone();
        let key = key.to_owned();
        task::spawn_blocking(move || write_atomically(&dir, &key, &data))
            .await
            .map_err(AppError::storage)?
            .map_err(AppError::storage)
    }
}

/// Write to a temporary file beside the target, then rename it over the target.
fn write_atomically(dir: &Path, key: &str, data: &[u8]) -> io::Result<()> {
    let tmp_path = dir.join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

    let written = (|| {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, dir.join(key))
    })();

    if written.is_err() {
        _ = std::fs::remove_file(&tmp_path);
    }

    written
}
