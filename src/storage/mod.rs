use bytes::Bytes;

use crate::config;
use crate::models::PasteRecord;

pub mod file;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

/// A flat key -> blob store.
pub trait Storage {
    /// Get an object by key.
    async fn get_object(&mut self, key: &str) -> crate::AppResult<Bytes>;

    /// Put an object's data by key, replacing any existing object.
    async fn put_object(&mut self, key: &str, data: Bytes) -> crate::AppResult<()>;
}

#[derive(Clone)]
pub enum AnyStorage {
    File(file::FileStorage),
    Memory(memory::MemoryStorage),
    #[cfg(feature = "s3")]
    S3(s3::S3Storage),
}

impl AnyStorage {
    /// Build the backend selected in the configuration.
    pub async fn from_config(config: &config::Storage) -> anyhow::Result<Self> {
        let storage: AnyStorage = match config.kind {
            config::StorageKind::File => file::FileStorage::new(&config.file.dir).await?.into(),
            config::StorageKind::Memory => memory::MemoryStorage::default().into(),
            #[cfg(feature = "s3")]
            config::StorageKind::S3 => {
                let s3_config = config
                    .s3
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("storage kind is s3 but [storage.s3] is missing"))?;
                s3::S3Storage::new(
                    &s3_config.bucket,
                    s3_config.region.as_deref(),
                    s3_config.endpoint.as_deref(),
                    s3_config.prefix.as_deref(),
                )
                .await
                .into()
            }
        };
        Ok(storage)
    }
}

impl Storage for AnyStorage {
    async fn get_object(&mut self, key: &str) -> crate::AppResult<Bytes> {
        match self {
            AnyStorage::File(file) => file.get_object(key).await,
            AnyStorage::Memory(memory) => memory.get_object(key).await,
            #[cfg(feature = "s3")]
            AnyStorage::S3(s3) => s3.get_object(key).await,
        }
    }

    async fn put_object(&mut self, key: &str, data: Bytes) -> crate::AppResult<()> {
        match self {
            AnyStorage::File(file) => file.put_object(key, data).await,
            AnyStorage::Memory(memory) => memory.put_object(key, data).await,
            #[cfg(feature = "s3")]
            AnyStorage::S3(s3) => s3.put_object(key, data).await,
        }
    }
}

impl From<file::FileStorage> for AnyStorage {
    fn from(value: file::FileStorage) -> Self {
        AnyStorage::File(value)
    }
}

impl From<memory::MemoryStorage> for AnyStorage {
    fn from(value: memory::MemoryStorage) -> Self {
        AnyStorage::Memory(value)
    }
}

#[cfg(feature = "s3")]
impl From<s3::S3Storage> for AnyStorage {
    fn from(value: s3::S3Storage) -> Self {
        AnyStorage::S3(value)
    }
}

/// Object key a paste is stored under.
pub fn paste_key(id: &str) -> String {
    format!("{id}.json")
}

/// Serialize and store a paste record.
pub async fn put_paste(storage: &mut impl Storage, record: &PasteRecord) -> crate::AppResult<()> {
    let data = serde_json::to_vec(record)?;
    storage.put_object(&paste_key(&record.id), data.into()).await
}

/// Fetch the raw stored form of a paste.
pub async fn get_paste(storage: &mut impl Storage, id: &str) -> crate::AppResult<Bytes> {
    storage.get_object(&paste_key(id)).await
}
