use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last upload seen by the admin channel listener
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxEntry {
    #[serde(default)]
    pub last_uploaded_file_id: Option<String>,
    #[serde(default)]
    pub last_uploaded_file_name: Option<String>,
    #[serde(default)]
    pub last_upload_timestamp: Option<DateTime<Utc>>,
}

impl MailboxEntry {
    pub fn is_empty(&self) -> bool {
        self.last_uploaded_file_id.is_none()
    }
}

/// Payload posted when a new file arrives in the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailboxUpdate {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl MailboxUpdate {
    /// Stamps the update with `now`
    pub fn into_entry(self, now: DateTime<Utc>) -> MailboxEntry {
        MailboxEntry {
            last_uploaded_file_id: Some(self.file_id),
            last_uploaded_file_name: self.file_name,
            last_upload_timestamp: Some(now),
        }
    }
}
