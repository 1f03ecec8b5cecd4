//! Purpose: Library crate behind the `figtree` CLI: document model, tree decoder, REST client.
//! Exports: `core` (node model, decoders, `Tree`, errors), `api` (client and endpoint payloads).
//! Role: Typed binding over the Figma REST API; the CLI is a thin layer on top.
//! Invariants: Decoding is all-or-nothing; a failed decode never yields a partial tree.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub(crate) mod json;

pub use crate::core::decode::{decode_document, decode_tree};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::node::{Node, NodeType};
pub use crate::core::tree::Tree;
