//! Purpose: Decode a JSON node tree into a `Tree<Node>`.
//! Exports: `decode_tree`, `decode_document`, `Tree<Node>::find_by_id`.
//! Role: Tree decoder; reads the `type` discriminator, decodes node fields, then walks `children`.
//! Invariants: Child order matches the JSON array order.
//! Invariants: Leaf variants never read `children`; container variants follow `ChildPolicy`.
//! Invariants: Any failure anywhere aborts the whole decode; there is no partial tree.
//! Notes: Descent uses `Tree::try_unfold`, so nesting depth never grows the call stack.
use crate::core::error::Error;
use crate::core::fields::{DecodeResult, Fields};
use crate::core::node::{ChildPolicy, Node, NodeType, decode_node};
use crate::core::tree::Tree;
use serde_json::Value;

struct Pending<'a> {
    value: &'a Value,
    parent: Option<(&'a str, usize)>,
}

/// Decode `value` (any node type) and everything beneath it.
pub fn decode_tree(value: &Value) -> DecodeResult<Tree<Node>> {
    let root = Pending {
        value,
        parent: None,
    };
    let tree = Tree::try_unfold(root, expand)?;
    tracing::debug!(
        root = tree.node().id(),
        nodes = tree.len(),
        "decoded node tree"
    );
    Ok(tree)
}

/// Decode a tree whose root must be a DOCUMENT node.
pub fn decode_document(value: &Value) -> DecodeResult<Tree<Node>> {
    let tree = decode_tree(value)?;
    if tree.node().node_type() != NodeType::Document {
        return Err(Error::malformed(format!(
            "expected a DOCUMENT root, found {}",
            tree.node().node_type()
        ))
        .with_node(tree.node().id()));
    }
    Ok(tree)
}

impl Tree<Node> {
    /// First subtree (pre-order) rooted at the node with `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Tree<Node>> {
        self.find(|node| node.id() == id)
    }
}

fn expand<'a>(pending: Pending<'a>) -> DecodeResult<(Node, Vec<Pending<'a>>)> {
    let Pending { value, parent } = pending;
    let decoded = decode_node(value).and_then(|node| {
        let children = child_values(&node, value)?;
        Ok((node, children))
    });
    let (node, children) = decoded.map_err(|err| match parent {
        Some((parent_id, index)) if err.node_id().is_none() => err
            .at_index(index)
            .within("children")
            .in_node(parent_id),
        _ => err,
    })?;

    // Child seeds borrow the parent id from the JSON, not from `node`, so they outlive it.
    let parent_id = Fields::of(value)?.str("id")?;
    let pending = children
        .iter()
        .enumerate()
        .map(|(index, value)| Pending {
            value,
            parent: Some((parent_id, index)),
        })
        .collect();
    Ok((node, pending))
}

fn child_values<'a>(node: &Node, value: &'a Value) -> DecodeResult<&'a [Value]> {
    let fields = Fields::of(value)?;
    let children = match node.node_type().child_policy() {
        ChildPolicy::Required => fields.array("children"),
        ChildPolicy::Optional => fields.array_or_empty("children"),
        ChildPolicy::Leaf => Ok(&[][..]),
    };
    children.map_err(|err| err.in_node(node.id()))
}

#[cfg(test)]
mod tests {
    use super::{decode_document, decode_tree};
    use crate::core::error::ErrorKind;
    use serde_json::{Value, json};

    fn canvas(id: &str, children: Vec<Value>) -> Value {
        json!({
            "id": id,
            "name": id,
            "type": "CANVAS",
            "backgroundColor": { "r": 1, "g": 1, "b": 1, "a": 1 },
            "children": children
        })
    }

    fn slice(id: &str) -> Value {
        json!({
            "id": id,
            "name": id,
            "type": "SLICE",
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 1, "height": 1 }
        })
    }

    #[test]
    fn leaf_children_are_ignored() {
        let mut leaf = slice("1:1");
        leaf["children"] = json!("not even an array");
        let tree = decode_tree(&leaf).expect("slice");
        assert!(tree.children().is_empty());
    }

    #[test]
    fn container_requires_children() {
        let mut page = canvas("0:1", vec![]);
        page.as_object_mut().expect("object").remove("children");
        let err = decode_tree(&page).expect_err("children");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.field(), Some("children"));
        assert_eq!(err.node_id(), Some("0:1"));
    }

    #[test]
    fn child_header_failure_points_at_parent_slot() {
        let page = canvas("0:1", vec![slice("1:1"), json!({ "type": "SLICE", "name": "x" })]);
        let err = decode_tree(&page).expect_err("missing id");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.field(), Some("children[1].id"));
        assert_eq!(err.node_id(), Some("0:1"));
    }

    #[test]
    fn document_root_is_enforced() {
        let err = decode_document(&canvas("0:1", vec![])).expect_err("canvas root");
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let doc = json!({
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [canvas("0:1", vec![slice("1:1")])]
        });
        let tree = decode_document(&doc).expect("document");
        assert_eq!(tree.len(), 3);
        let page = tree.find_by_id("0:1").expect("page");
        assert_eq!(page.children()[0].node().id(), "1:1");
        assert!(tree.find_by_id("9:9").is_none());
    }

    #[test]
    fn deep_nesting_decodes_iteratively() {
        // serde_json drops `Value` recursively, so the input stays modest.
        let mut value = slice("leaf");
        for level in 0..1_000 {
            value = canvas(&format!("c{level}"), vec![value]);
        }
        let tree = decode_tree(&value).expect("deep");
        assert_eq!(tree.len(), 1_001);
        assert_eq!(tree.depth(), 1_001);
    }
}
