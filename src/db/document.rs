use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Portal, Writeup};

/// One record as it appears in the persisted document.
///
/// Fields added after the first release are optional here and filled with
/// their defaults in [`StoredWriteup::into_writeup`], so older documents keep
/// decoding.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWriteup {
    pub title: String,
    pub course: String,
    pub notes: String,
    pub portal: Portal,
    pub due: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl StoredWriteup {
    pub fn into_writeup(self) -> Writeup {
        Writeup {
            title: self.title,
            course: self.course,
            notes: self.notes,
            portal: self.portal,
            due: self.due,
            is_done: self.is_done.unwrap_or(false),
        }
    }
}

impl From<&Writeup> for StoredWriteup {
    fn from(w: &Writeup) -> Self {
        Self {
            title: w.title.clone(),
            course: w.course.clone(),
            notes: w.notes.clone(),
            portal: w.portal,
            due: w.due,
            is_done: Some(w.is_done),
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Writeup>, serde_json::Error> {
    let rows: Vec<StoredWriteup> = serde_json::from_slice(bytes)?;
    Ok(rows.into_iter().map(StoredWriteup::into_writeup).collect())
}

pub fn encode(writeups: &[Writeup]) -> Result<Vec<u8>, serde_json::Error> {
    let rows: Vec<StoredWriteup> = writeups.iter().map(StoredWriteup::from).collect();
    serde_json::to_vec_pretty(&rows)
}

/// Pretty-prints a raw document for diagnostics, falling back to the raw text.
pub fn render(bytes: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}
