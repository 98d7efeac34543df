use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored paste. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub id: String,
    pub code: String,
    pub lang: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub expires_at: DateTime<Utc>,
}

impl PasteRecord {
    /// Whether the paste is still visible at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Accepts RFC 3339 timestamps, and offset-less ones (read as UTC) from older records.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>()
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(serde::de::Error::custom)
}

/// Languages offered for display. Labels outside this set are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Sql,
    Python,
    Yaml,
    Javascript,
    Text,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Sql,
        Language::Python,
        Language::Yaml,
        Language::Javascript,
        Language::Text,
    ];

    pub const DEFAULT_LABEL: &'static str = "text";

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Sql => "sql",
            Language::Python => "python",
            Language::Yaml => "yaml",
            Language::Javascript => "javascript",
            Language::Text => "text",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Sql => "SQL",
            Language::Python => "Python",
            Language::Yaml => "Terraform / YAML",
            Language::Javascript => "JavaScript",
            Language::Text => "Plain Text",
        }
    }
}

/// Human-readable name for a stored label, falling back to the label itself.
pub fn display_name(label: &str) -> &str {
    Language::from_label(label).map_or(label, |lang| lang.display_name())
}
