//! Purpose: Public REST binding: client, credentials, and endpoint payloads.
//! Exports: `Client`, `AccessToken`, file/comment/image/project/version types, shared errors.
//! Role: Network-facing surface; document payloads are handed to the `core` decoders.
//! Invariants: Timestamps stay as server strings; parsing them is opt-in per accessor.
//! Invariants: Every fallible call returns the crate-wide `Error`.

mod auth;
mod client;
mod comments;
mod file;
mod images;
mod projects;
mod versions;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use auth::AccessToken;
pub use client::{Client, DEFAULT_BASE_URL, FileQuery};
pub use comments::{ClientMeta, Comment, NewComment, User};
pub use file::{ComponentMap, ComponentMeta, File, FileNode, FileNodes, document_from_json};
pub use images::{ImageExport, ImageRequest};
pub use projects::{Project, ProjectFile, ProjectFiles, TeamProjects};
pub use versions::Version;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) fn parse_timestamp(field: &str, text: &str) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(text, &Rfc3339).map_err(|err| {
        Error::malformed(format!("`{text}` is not an RFC 3339 timestamp"))
            .with_field(field)
            .with_source(err)
    })
}
