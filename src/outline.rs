//! Purpose: Flatten a decoded node tree into outline rows for `figtree outline`.
//! Exports: `OutlineOptions`, `outline_rows`.
//! Role: Pure renderer; the command layer prints each row as one JSON line.
//! Invariants: Rows appear in pre-order, so a node always precedes its descendants.
//! Invariants: A pruned node (hidden or too deep) never has descendants in the output.
use figtree::{Node, Tree};
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct OutlineOptions {
    pub(super) max_depth: Option<usize>,
    pub(super) visible_only: bool,
}

pub(super) fn outline_rows(tree: &Tree<Node>, options: OutlineOptions) -> Vec<Value> {
    let mut rows = Vec::new();
    // depth of the shallowest hidden ancestor currently being skipped
    let mut pruned_at: Option<usize> = None;
    for (depth, node) in tree.iter_with_depth() {
        if let Some(pruned) = pruned_at {
            if depth > pruned {
                continue;
            }
            pruned_at = None;
        }
        if options.visible_only && !node.is_visible() {
            pruned_at = Some(depth);
            continue;
        }
        if options.max_depth.is_some_and(|max| depth > max) {
            continue;
        }
        rows.push(json!({
            "depth": depth,
            "id": node.id(),
            "type": node.node_type().to_string(),
            "name": node.name(),
            "visible": node.is_visible(),
        }));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{OutlineOptions, outline_rows};
    use figtree::decode_tree;
    use serde_json::{Value, json};

    fn slice(id: &str, visible: bool) -> Value {
        json!({
            "id": id,
            "name": format!("slice {id}"),
            "type": "SLICE",
            "visible": visible,
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 1, "height": 1 }
        })
    }

    fn group(id: &str, visible: bool, children: Vec<Value>) -> Value {
        json!({
            "id": id,
            "name": format!("group {id}"),
            "type": "GROUP",
            "visible": visible,
            "backgroundColor": { "r": 0, "g": 0, "b": 0, "a": 0 },
            "blendMode": "PASS_THROUGH",
            "constraints": { "vertical": "TOP", "horizontal": "LEFT" },
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 10, "height": 10 },
            "clipsContent": false,
            "children": children
        })
    }

    fn sample() -> Value {
        group(
            "1:1",
            true,
            vec![
                group("2:1", false, vec![slice("3:1", true)]),
                slice("2:2", true),
            ],
        )
    }

    #[test]
    fn rows_follow_pre_order_with_depths() {
        let tree = decode_tree(&sample()).expect("tree");
        let rows = outline_rows(&tree, OutlineOptions::default());
        let ids: Vec<_> = rows.iter().map(|row| row["id"].as_str().expect("id")).collect();
        assert_eq!(ids, vec!["1:1", "2:1", "3:1", "2:2"]);
        assert_eq!(rows[2]["depth"], 2);
        assert_eq!(rows[1]["type"], "GROUP");
        assert_eq!(rows[1]["visible"], false);
    }

    #[test]
    fn visible_only_prunes_hidden_subtrees() {
        let tree = decode_tree(&sample()).expect("tree");
        let options = OutlineOptions {
            visible_only: true,
            ..OutlineOptions::default()
        };
        let ids: Vec<_> = outline_rows(&tree, options)
            .iter()
            .map(|row| row["id"].as_str().expect("id").to_string())
            .collect();
        assert_eq!(ids, vec!["1:1", "2:2"]);
    }

    #[test]
    fn max_depth_limits_rows() {
        let tree = decode_tree(&sample()).expect("tree");
        let options = OutlineOptions {
            max_depth: Some(1),
            ..OutlineOptions::default()
        };
        assert_eq!(outline_rows(&tree, options).len(), 3);
    }
}
