use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_COURSE: &str = "Unknown Course";
pub const DEFAULT_NOTES: &str = "No notes";

/// Submission destination of a writeup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Portal {
    #[default]
    #[serde(rename = "LMS")]
    Lms,
    #[serde(rename = "Classroom")]
    Classroom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Writeup {
    pub title: String,
    pub course: String,
    pub notes: String,
    pub portal: Portal,
    pub due: DateTime<Utc>,
    pub is_done: bool,
}

impl Writeup {
    /// True when this record is the one addressed by the (title, course, due) key.
    pub fn matches(&self, title: &str, course: &str, due: &DateTime<Utc>) -> bool {
        self.title == title && self.course == course && self.due == *due
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWriteupRequest {
    pub title: Option<String>,
    pub course: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub portal: Portal,
    pub due: DateTime<Utc>,
}

impl NewWriteupRequest {
    /// Builds the record to store. Completion is never taken from the caller.
    pub fn into_writeup(self) -> Writeup {
        Writeup {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            course: self.course.unwrap_or_else(|| DEFAULT_COURSE.to_string()),
            notes: self.notes.unwrap_or_else(|| DEFAULT_NOTES.to_string()),
            portal: self.portal,
            due: self.due,
            is_done: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkDoneRequest {
    pub title: String,
    pub course: String,
    pub due: DateTime<Utc>,
}
