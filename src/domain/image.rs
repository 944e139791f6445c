use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gallery entry ordered by the sorting strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    /// Capture date
    pub date: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

impl Image {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, size: u64) -> Self {
        Self {
            name: name.into(),
            date,
            size,
        }
    }
}
