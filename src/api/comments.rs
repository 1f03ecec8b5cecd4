//! Purpose: Comment payloads for the file comments endpoints.
//! Exports: `Comment`, `User`, `ClientMeta`, `NewComment`.
//! Role: Serde envelopes; timestamps stay strings and parse on demand.
//! Invariants: `client_meta` is either a canvas point or a node-relative offset, never both.
use super::parse_timestamp;
use crate::core::error::Error;
use crate::core::value::Vector2;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    pub handle: String,
    #[serde(default)]
    pub img_url: String,
}

/// Where a comment is pinned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMeta {
    NodeOffset { node_id: String, node_offset: Vector2 },
    Point(Vector2),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub file_key: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub user: User,
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
    pub message: String,
    #[serde(default)]
    pub client_meta: Option<ClientMeta>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl Comment {
    pub fn created_at(&self) -> Result<OffsetDateTime, Error> {
        parse_timestamp("created_at", &self.created_at)
    }

    pub fn resolved_at(&self) -> Result<Option<OffsetDateTime>, Error> {
        self.resolved_at
            .as_deref()
            .map(|text| parse_timestamp("resolved_at", text))
            .transpose()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.as_deref().is_some_and(|parent| !parent.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewComment {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_meta: Option<ClientMeta>,
}

impl NewComment {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            client_meta: None,
        }
    }

    pub fn at_point(mut self, x: f64, y: f64) -> Self {
        self.client_meta = Some(ClientMeta::Point(Vector2 { x, y }));
        self
    }

    pub fn on_node(mut self, node_id: impl Into<String>, x: f64, y: f64) -> Self {
        self.client_meta = Some(ClientMeta::NodeOffset {
            node_id: node_id.into(),
            node_offset: Vector2 { x, y },
        });
        self
    }
}

#[derive(Deserialize)]
pub(crate) struct CommentsEnvelope {
    pub(crate) comments: Vec<Comment>,
}
