// Version history entries for a file.
use super::comments::User;
use super::parse_timestamp;
use crate::core::error::Error;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub user: User,
}

impl Version {
    pub fn created_at(&self) -> Result<OffsetDateTime, Error> {
        parse_timestamp("created_at", &self.created_at)
    }

    /// Autosaves carry no label.
    pub fn is_named(&self) -> bool {
        self.label.as_deref().is_some_and(|label| !label.is_empty())
    }
}

#[derive(Deserialize)]
pub(crate) struct VersionsEnvelope {
    pub(crate) versions: Vec<Version>,
}
