use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{self, Language, PasteRecord};

fn default_lang() -> String {
    Language::DEFAULT_LABEL.to_owned()
}

#[derive(Deserialize)]
pub struct CreatePaste {
    pub code: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct PasteView {
    pub id: String,
    pub code: String,
    pub lang: String,
    pub language_name: String,
    pub expires_at: DateTime<Utc>,
}

impl From<PasteRecord> for PasteView {
    fn from(record: PasteRecord) -> Self {
        PasteView {
            language_name: models::display_name(&record.lang).to_owned(),
            id: record.id,
            code: record.code,
            lang: record.lang,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Serialize)]
pub struct LanguageEntry {
    pub label: &'static str,
    pub name: &'static str,
}

impl From<Language> for LanguageEntry {
    fn from(lang: Language) -> Self {
        LanguageEntry {
            label: lang.label(),
            name: lang.display_name(),
        }
    }
}
