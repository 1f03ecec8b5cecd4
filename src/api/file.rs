//! Purpose: Decode the file and file-nodes response envelopes.
//! Exports: `File`, `FileNodes`, `FileNode`, `ComponentMeta`, `ComponentMap`, `document_from_json`.
//! Role: Envelope layer over the tree decoder; owns the non-tree metadata fields.
//! Invariants: `File::document` is always rooted at a DOCUMENT node.
//! Invariants: A `null` entry in the nodes map means the id did not resolve; it is kept as `None`.
use super::parse_timestamp;
use crate::core::decode::{decode_document, decode_tree};
use crate::core::error::Error;
use crate::core::fields::{DecodeResult, Fields};
use crate::core::node::Node;
use crate::core::tree::Tree;
use crate::json;
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub key: Option<String>,
    pub name: String,
    pub description: String,
}

impl ComponentMeta {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            key: fields.opt_string("key")?,
            name: fields.string("name")?,
            description: fields.opt_string("description")?.unwrap_or_default(),
        })
    }
}

/// Component metadata keyed by node id.
pub type ComponentMap = BTreeMap<String, ComponentMeta>;

#[derive(Debug)]
pub struct File {
    pub name: String,
    pub last_modified: String,
    pub thumbnail_url: Option<String>,
    pub version: String,
    pub schema_version: u64,
    pub document: Tree<Node>,
    pub components: ComponentMap,
}

impl File {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            name: fields.string("name")?,
            last_modified: fields.string("lastModified")?,
            thumbnail_url: fields.opt_string("thumbnailUrl")?,
            version: fields.string("version")?,
            schema_version: fields.opt_u64("schemaVersion")?.unwrap_or(0),
            document: fields.nested("document", decode_document)?,
            components: component_map(fields)?,
        })
    }

    pub fn last_modified_at(&self) -> Result<OffsetDateTime, Error> {
        parse_timestamp("lastModified", &self.last_modified)
    }
}

#[derive(Debug)]
pub struct FileNode {
    pub document: Tree<Node>,
    pub components: ComponentMap,
}

impl FileNode {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            document: fields.nested("document", decode_tree)?,
            components: component_map(fields)?,
        })
    }
}

#[derive(Debug)]
pub struct FileNodes {
    pub name: String,
    pub last_modified: String,
    pub version: Option<String>,
    pub nodes: BTreeMap<String, Option<FileNode>>,
}

impl FileNodes {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let entries = fields.nested("nodes", |nodes| Ok(Fields::of(nodes)?.object()))?;
        let mut nodes = BTreeMap::new();
        for (id, entry) in entries {
            let node = match entry {
                Value::Null => None,
                entry => Some(
                    FileNode::from_value(entry).map_err(|err| err.within(id).within("nodes"))?,
                ),
            };
            nodes.insert(id.clone(), node);
        }
        Ok(Self {
            name: fields.string("name")?,
            last_modified: fields.string("lastModified")?,
            version: fields.opt_string("version")?,
            nodes,
        })
    }

    pub fn get(&self, id: &str) -> Option<&FileNode> {
        self.nodes.get(id).and_then(Option::as_ref)
    }
}

/// Decode saved JSON that is either a full file response or a bare DOCUMENT node.
pub fn document_from_json(input: &[u8]) -> Result<Tree<Node>, Error> {
    let value = json::value_from_slice(input, "document json")?;
    let decoded = decode_saved(&value);
    json::release(value);
    decoded
}

fn decode_saved(value: &Value) -> Result<Tree<Node>, Error> {
    if Fields::of(value)?.has("document") {
        return File::from_value(value).map(|file| file.document);
    }
    decode_document(value)
}

fn component_map(fields: Fields<'_>) -> DecodeResult<ComponentMap> {
    let Some(components) = fields.get("components") else {
        return Ok(ComponentMap::new());
    };
    let object = Fields::of(components).map_err(|err| err.within("components"))?;
    object
        .object()
        .iter()
        .map(|(id, meta)| {
            ComponentMeta::from_value(meta)
                .map(|meta| (id.clone(), meta))
                .map_err(|err| err.within(id).within("components"))
        })
        .collect()
}
