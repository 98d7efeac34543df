use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::PasteRecord;
use crate::storage;
use crate::{App, AppError, AppResult};

/// How long a paste stays visible after creation.
pub const RETENTION_DAYS: i64 = 30;

/// Length of generated paste ids, in hex digits.
const ID_LEN: usize = 16;

const MAX_ID_LEN: usize = 64;

/// Store a new paste and return it.
pub async fn create(app: &mut App, code: &str, lang: &str) -> AppResult<PasteRecord> {
    if code.trim().is_empty() {
        return Err(AppError::EmptySnippet);
    }

    let record = PasteRecord {
        id: generate_id(),
        code: code.to_owned(),
        lang: lang.to_owned(),
        expires_at: Utc::now() + chrono::Duration::days(RETENTION_DAYS),
    };

    info!(
        "new paste: key='{id}', lang='{lang}', size={size}",
        id = record.id,
        size = record.code.len()
    );

    bounded(
        app.config.limits.storage_timeout(),
        storage::put_paste(&mut app.storage, &record),
    )
    .await?;

    Ok(record)
}

/// Fetch a live paste. Absent, expired and unreadable pastes are all `NotFound`.
pub async fn retrieve(app: &mut App, id: &str) -> AppResult<PasteRecord> {
    if !is_valid_id(id) {
        return Err(AppError::NotFound);
    }

    let data = bounded(
        app.config.limits.storage_timeout(),
        storage::get_paste(&mut app.storage, id),
    )
    .await?;

    let record: PasteRecord = match serde_json::from_slice(&data) {
        Ok(record) => record,
        Err(err) => {
            warn!("unreadable paste: key='{id}': {err}");
            return Err(AppError::NotFound);
        }
    };

    if !record.is_live_at(Utc::now()) {
        debug!("paste expired: key='{id}'");
        return Err(AppError::NotFound);
    }

    Ok(record)
}

fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Run a storage call, giving up after `limit`.
async fn bounded<T>(limit: Duration, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
    tokio::time::timeout(limit, call).await?
}
