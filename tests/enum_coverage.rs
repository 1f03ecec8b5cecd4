// Every recognized literal decodes to its variant; wire names are pinned by hand-written tables;
// one bogus literal per enum is rejected by name.
use figtree::ErrorKind;
use figtree::core::fields::{Fields, Literal};
use figtree::core::node::NodeType;
use figtree::core::paint::{Effect, EffectType, Paint, PaintType};
use figtree::core::value::{
    BlendMode, BooleanOperationType, Color, ExportConstraint, ExportConstraintType, ExportFormat,
    ExportSetting, GridAlignment, GridPattern, HorizontalConstraint, LayoutGrid, ScaleMode,
    StrokeAlign, TextAlignHorizontal, TextAlignVertical, VerticalConstraint,
};
use serde_json::json;

fn assert_closed_set<T>(bogus: &str)
where
    T: Literal + PartialEq + std::fmt::Debug,
{
    assert!(!T::ALL.is_empty(), "{} has no variants", T::NAME);
    for &variant in T::ALL {
        let literal = variant.as_literal();
        assert_eq!(T::from_literal(literal), Some(variant), "{} {literal}", T::NAME);

        let value = json!({ "field": literal });
        let fields = Fields::of(&value).expect("object");
        let decoded: T = fields.literal("field").expect("literal");
        assert_eq!(decoded, variant);
    }

    let value = json!({ "field": bogus });
    let fields = Fields::of(&value).expect("object");
    let err = fields.literal::<T>("field").expect_err("bogus literal");
    assert_eq!(err.kind(), ErrorKind::UnrecognizedValue);
    let text = err.to_string();
    assert!(text.contains(bogus), "{text}");
    assert!(text.contains(T::NAME), "{text}");
    assert_eq!(err.field(), Some("field"));
}

#[test]
fn literal_enums_are_closed_sets() {
    assert_closed_set::<NodeType>("STICKY");
    assert_closed_set::<BlendMode>("PLUS_LIGHTER");
    assert_closed_set::<StrokeAlign>("MIDDLE");
    assert_closed_set::<ScaleMode>("CROP");
    assert_closed_set::<HorizontalConstraint>("TOP");
    assert_closed_set::<VerticalConstraint>("LEFT");
    assert_closed_set::<TextAlignHorizontal>("START");
    assert_closed_set::<TextAlignVertical>("BASELINE");
    assert_closed_set::<ExportFormat>("GIF");
    assert_closed_set::<ExportConstraintType>("DPI");
    assert_closed_set::<GridAlignment>("SPREAD");
    assert_closed_set::<GridPattern>("DOTS");
    assert_closed_set::<BooleanOperationType>("XOR");
    assert_closed_set::<PaintType>("EMOJI");
    assert_closed_set::<EffectType>("NOISE");
}

/// Check a hand-written wire table against the decoder in both directions.
fn assert_wire_table<T>(table: &[(&str, T)])
where
    T: Literal + PartialEq + std::fmt::Debug,
{
    for (literal, variant) in table {
        assert_eq!(T::from_literal(literal).as_ref(), Some(variant), "{} {literal}", T::NAME);
        assert_eq!(variant.as_literal(), *literal);
    }
    assert_eq!(T::ALL.len(), table.len(), "{} variant count", T::NAME);
    for variant in T::ALL {
        assert!(
            table.iter().any(|(_, expected)| expected == variant),
            "{} {variant:?} missing from the wire table",
            T::NAME
        );
    }
}

#[test]
fn blend_modes_match_the_wire_names() {
    assert_wire_table(&[
        ("PASS_THROUGH", BlendMode::PassThrough),
        ("NORMAL", BlendMode::Normal),
        ("DARKEN", BlendMode::Darken),
        ("MULTIPLY", BlendMode::Multiply),
        ("LINEAR_BURN", BlendMode::LinearBurn),
        ("COLOR_BURN", BlendMode::ColorBurn),
        ("LIGHTEN", BlendMode::Lighten),
        ("SCREEN", BlendMode::Screen),
        ("LINEAR_DODGE", BlendMode::LinearDodge),
        ("COLOR_DODGE", BlendMode::ColorDodge),
        ("OVERLAY", BlendMode::Overlay),
        ("SOFT_LIGHT", BlendMode::SoftLight),
        ("HARD_LIGHT", BlendMode::HardLight),
        ("DIFFERENCE", BlendMode::Difference),
        ("EXCLUSION", BlendMode::Exclusion),
        ("HUE", BlendMode::Hue),
        ("SATURATION", BlendMode::Saturation),
        ("COLOR", BlendMode::Color),
        ("LUMINOSITY", BlendMode::Luminosity),
    ]);
}

#[test]
fn node_types_match_the_wire_names() {
    assert_wire_table(&[
        ("DOCUMENT", NodeType::Document),
        ("CANVAS", NodeType::Canvas),
        ("FRAME", NodeType::Frame),
        ("GROUP", NodeType::Group),
        ("VECTOR", NodeType::Vector),
        ("BOOLEAN_OPERATION", NodeType::BooleanOperation),
        ("STAR", NodeType::Star),
        ("LINE", NodeType::Line),
        ("ELLIPSE", NodeType::Ellipse),
        ("REGULAR_POLYGON", NodeType::RegularPolygon),
        ("RECTANGLE", NodeType::Rectangle),
        ("TEXT", NodeType::Text),
        ("SLICE", NodeType::Slice),
        ("COMPONENT", NodeType::Component),
        ("INSTANCE", NodeType::Instance),
    ]);
}

#[test]
fn paint_and_effect_types_match_the_wire_names() {
    assert_wire_table(&[
        ("SOLID", PaintType::Solid),
        ("GRADIENT_LINEAR", PaintType::GradientLinear),
        ("GRADIENT_RADIAL", PaintType::GradientRadial),
        ("GRADIENT_ANGULAR", PaintType::GradientAngular),
        ("GRADIENT_DIAMOND", PaintType::GradientDiamond),
        ("IMAGE", PaintType::Image),
    ]);
    assert_wire_table(&[
        ("INNER_SHADOW", EffectType::InnerShadow),
        ("DROP_SHADOW", EffectType::DropShadow),
        ("LAYER_BLUR", EffectType::LayerBlur),
        ("BACKGROUND_BLUR", EffectType::BackgroundBlur),
    ]);
}

#[test]
fn constraints_and_alignments_match_the_wire_names() {
    assert_wire_table(&[
        ("LEFT", HorizontalConstraint::Left),
        ("RIGHT", HorizontalConstraint::Right),
        ("CENTER", HorizontalConstraint::Center),
        ("LEFT_RIGHT", HorizontalConstraint::LeftRight),
        ("SCALE", HorizontalConstraint::Scale),
    ]);
    assert_wire_table(&[
        ("TOP", VerticalConstraint::Top),
        ("BOTTOM", VerticalConstraint::Bottom),
        ("CENTER", VerticalConstraint::Center),
        ("TOP_BOTTOM", VerticalConstraint::TopBottom),
        ("SCALE", VerticalConstraint::Scale),
    ]);
    assert_wire_table(&[
        ("LEFT", TextAlignHorizontal::Left),
        ("RIGHT", TextAlignHorizontal::Right),
        ("CENTER", TextAlignHorizontal::Center),
        ("JUSTIFIED", TextAlignHorizontal::Justified),
    ]);
    assert_wire_table(&[
        ("TOP", TextAlignVertical::Top),
        ("CENTER", TextAlignVertical::Center),
        ("BOTTOM", TextAlignVertical::Bottom),
    ]);
}

#[test]
fn literals_are_case_sensitive() {
    assert_eq!(BlendMode::from_literal("normal"), None);
    assert_eq!(NodeType::from_literal("Frame"), None);
    assert_eq!(ExportFormat::Svg.to_string(), "SVG");
}

#[test]
fn every_paint_type_decodes_to_its_variant() {
    let color = json!({ "r": 0.2, "g": 0.4, "b": 0.6, "a": 1 });
    for &kind in PaintType::ALL {
        let value = match kind {
            PaintType::Solid => json!({ "type": "SOLID", "color": color }),
            PaintType::Image => json!({
                "type": "IMAGE",
                "scaleMode": "FILL",
                "blendMode": "NORMAL",
                "imageRef": "abc"
            }),
            gradient => json!({
                "type": gradient.as_literal(),
                "gradientHandlePositions": [
                    { "x": 0, "y": 0 }, { "x": 1, "y": 1 }, { "x": 0, "y": 1 }
                ],
                "gradientStops": [{ "position": 0.5, "color": color }]
            }),
        };
        let paint = Paint::from_value(&value).expect("paint");
        assert_eq!(paint.paint_type(), kind);
        assert!(paint.is_visible());
        assert_eq!(paint.opacity(), 1.0);
    }
}

#[test]
fn every_effect_type_decodes_to_its_variant() {
    for &kind in EffectType::ALL {
        let value = match kind {
            EffectType::InnerShadow | EffectType::DropShadow => json!({
                "type": kind.as_literal(),
                "radius": 4,
                "color": { "r": 0, "g": 0, "b": 0, "a": 0.25 },
                "blendMode": "NORMAL",
                "offset": { "x": 0, "y": 2 }
            }),
            EffectType::LayerBlur | EffectType::BackgroundBlur => json!({
                "type": kind.as_literal(),
                "radius": 8,
                "visible": false
            }),
        };
        let effect = Effect::from_value(&value).expect("effect");
        assert_eq!(effect.effect_type(), kind);
    }

    let err = Effect::from_value(&json!({ "type": "NOISE", "radius": 1 })).expect_err("noise");
    assert_eq!(err.kind(), ErrorKind::UnrecognizedValue);
    assert_eq!(err.field(), Some("type"));
}

#[test]
fn every_grid_pattern_decodes_to_its_variant() {
    let color = json!({ "r": 1, "g": 0, "b": 0, "a": 0.1 });
    for &pattern in GridPattern::ALL {
        let value = match pattern {
            GridPattern::Grid => json!({ "pattern": "GRID", "color": color, "sectionSize": 8 }),
            track => json!({
                "pattern": track.as_literal(),
                "color": color,
                "alignment": "STRETCH",
                "gutterSize": 16,
                "offset": 0,
                "count": 12
            }),
        };
        let grid = LayoutGrid::from_value(&value).expect("grid");
        assert_eq!(grid.pattern(), pattern);
    }

    let err = LayoutGrid::from_value(&json!({ "pattern": "DOTS" })).expect_err("dots");
    assert_eq!(err.kind(), ErrorKind::UnrecognizedValue);
}

#[test]
fn every_export_constraint_carries_its_value() {
    for &kind in ExportConstraintType::ALL {
        let value = json!({
            "suffix": "@2x",
            "format": "PNG",
            "constraint": { "type": kind.as_literal(), "value": 2 }
        });
        let setting = ExportSetting::from_value(&value).expect("setting");
        assert_eq!(setting.format, ExportFormat::Png);
        let amount = match (kind, setting.constraint) {
            (ExportConstraintType::Scale, ExportConstraint::Scale(amount))
            | (ExportConstraintType::Width, ExportConstraint::Width(amount))
            | (ExportConstraintType::Height, ExportConstraint::Height(amount)) => amount,
            (kind, constraint) => panic!("{kind} decoded as {constraint:?}"),
        };
        assert_eq!(amount, 2.0);
    }
}

#[test]
fn color_channels_round_trip_within_one_step() {
    let samples = [0.0, 0.001, 0.002, 0.1, 0.25, 1.0 / 3.0, 0.5, 0.501_960_78, 0.75, 0.999, 1.0];
    for &r in &samples {
        for &g in &samples {
            for &a in &[0.0, 0.3, 1.0] {
                let b = 1.0 - r;
                let color = Color::from_value(&json!({ "r": r, "g": g, "b": b, "a": a }))
                    .expect("color");
                let encoded = color.to_value();
                for (channel, original) in [("r", r), ("g", g), ("b", b)] {
                    let back = encoded[channel].as_f64().expect("channel");
                    assert!((back - original).abs() <= 1.0 / 255.0, "{channel}: {original} -> {back}");
                }
                assert_eq!(encoded["a"].as_f64(), Some(a));
            }
        }
    }
}

#[test]
fn color_rounding_is_half_away_from_zero() {
    let color = Color::from_value(&json!({ "r": 0.5, "g": 0.002, "b": 0.0, "a": 0.5 }))
        .expect("color");
    // 127.5 rounds up, 0.51 rounds up.
    assert_eq!(color.r, 128);
    assert_eq!(color.g, 1);
    assert_eq!(color.b, 0);
    assert_eq!(color.a, 0.5);
    assert_eq!(color.to_hex(), "#80010080");
}
