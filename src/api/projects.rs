//! Purpose: Team project and project file listings.
//! Exports: `Project`, `ProjectFile`, `TeamProjects`, `ProjectFiles`.
//! Role: Serde envelopes for the listing endpoints.
//! Invariants: Project ids are kept as strings even when the server sends numbers.
use super::parse_timestamp;
use crate::core::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProjects {
    #[serde(default)]
    pub name: Option<String>,
    pub projects: Vec<Project>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub last_modified: String,
}

impl ProjectFile {
    pub fn last_modified_at(&self) -> Result<OffsetDateTime, Error> {
        parse_timestamp("last_modified", &self.last_modified)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFiles {
    #[serde(default)]
    pub name: Option<String>,
    pub files: Vec<ProjectFile>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, found {other}"
        ))),
    }
}
