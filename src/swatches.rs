//! Purpose: Tally the solid colors a document uses, for `figtree swatches`.
//! Exports: `Swatch`, `collect_swatches`, `swatch_json`.
//! Role: One `Tree::fold` over the document; the command layer prints the sorted result.
//! Invariants: Only visible solid paints on visible nodes count; gradients and images are ignored.
//! Invariants: Output order is count descending, then hex ascending.
use figtree::core::value::Color;
use figtree::{Node, Tree};
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Swatch {
    pub(super) color: Color,
    pub(super) count: usize,
}

pub(super) fn collect_swatches(tree: &Tree<Node>) -> Vec<Swatch> {
    let tally = tree.fold(BTreeMap::<String, Swatch>::new(), |mut tally, node| {
        if !node.is_visible() {
            return tally;
        }
        let solids = node
            .fills()
            .iter()
            .chain(node.strokes())
            .filter(|paint| paint.is_visible())
            .filter_map(|paint| paint.as_solid());
        for solid in solids {
            tally
                .entry(solid.color.to_hex())
                .and_modify(|swatch| swatch.count += 1)
                .or_insert(Swatch {
                    color: solid.color,
                    count: 1,
                });
        }
        tally
    });

    // BTreeMap iteration is already hex-ascending; the stable sort keeps that within a count.
    let mut swatches: Vec<Swatch> = tally.into_values().collect();
    swatches.sort_by(|a, b| b.count.cmp(&a.count));
    swatches
}

pub(super) fn swatch_json(swatch: &Swatch) -> Value {
    json!({
        "hex": swatch.color.to_hex(),
        "r": swatch.color.r,
        "g": swatch.color.g,
        "b": swatch.color.b,
        "a": swatch.color.a,
        "count": swatch.count,
    })
}

#[cfg(test)]
mod tests {
    use super::{collect_swatches, swatch_json};
    use figtree::decode_tree;
    use serde_json::{Value, json};

    fn solid(r: f64, g: f64, b: f64, visible: bool) -> Value {
        json!({ "type": "SOLID", "visible": visible, "color": { "r": r, "g": g, "b": b, "a": 1 } })
    }

    fn rectangle(id: &str, visible: bool, fills: Vec<Value>, strokes: Vec<Value>) -> Value {
        json!({
            "id": id,
            "name": id,
            "type": "RECTANGLE",
            "visible": visible,
            "blendMode": "NORMAL",
            "constraints": { "vertical": "TOP", "horizontal": "LEFT" },
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 4, "height": 4 },
            "fills": fills,
            "strokes": strokes,
            "strokeWeight": 1,
            "strokeAlign": "INSIDE"
        })
    }

    fn frame(children: Vec<Value>) -> Value {
        json!({
            "id": "1:1",
            "name": "Frame",
            "type": "FRAME",
            "background": [solid(1.0, 1.0, 1.0, true)],
            "backgroundColor": { "r": 1, "g": 1, "b": 1, "a": 1 },
            "blendMode": "PASS_THROUGH",
            "constraints": { "vertical": "TOP", "horizontal": "LEFT" },
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 100, "height": 100 },
            "clipsContent": true,
            "children": children
        })
    }

    #[test]
    fn counts_visible_solids_by_frequency() {
        let red = solid(1.0, 0.0, 0.0, true);
        let blue = solid(0.0, 0.0, 1.0, true);
        let value = frame(vec![
            rectangle("2:1", true, vec![red.clone()], vec![blue.clone()]),
            rectangle("2:2", true, vec![red.clone()], vec![solid(0.0, 1.0, 0.0, false)]),
            rectangle("2:3", false, vec![blue.clone()], vec![]),
            rectangle("2:4", true, vec![blue], vec![red]),
        ]);
        let tree = decode_tree(&value).expect("tree");
        let rows: Vec<_> = collect_swatches(&tree).iter().map(swatch_json).collect();
        let hexes: Vec<_> = rows.iter().map(|row| row["hex"].as_str().expect("hex")).collect();
        assert_eq!(hexes, vec!["#ff0000", "#0000ff", "#ffffff"]);
        assert_eq!(rows[0]["count"], 3);
        assert_eq!(rows[1]["count"], 2);
        assert_eq!(rows[2]["count"], 1);
        assert_eq!(rows[0]["r"], 255);
    }

    #[test]
    fn ties_break_by_hex() {
        let value = frame(vec![rectangle(
            "2:1",
            true,
            vec![solid(0.0, 0.0, 0.0, true)],
            vec![],
        )]);
        let tree = decode_tree(&value).expect("tree");
        let hexes: Vec<_> = collect_swatches(&tree)
            .iter()
            .map(|swatch| swatch.color.to_hex())
            .collect();
        assert_eq!(hexes, vec!["#000000", "#ffffff"]);
    }
}
