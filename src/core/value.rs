//! Purpose: Decode primitive design values (color, geometry, enums, export and layout settings).
//! Exports: `Color`, `Vector2`, `Rect`, the literal enums, `LayoutConstraint`, `ExportSetting`, `LayoutGrid`.
//! Role: Leaf decoders used by the appearance and node field decoders.
//! Invariants: Required fields never default; unknown literals fail with the literal and enum name.
//! Invariants: Color channels round half away from zero and clamp to 0..=255; alpha passes through.
use crate::core::error::Error;
use crate::core::fields::{DecodeResult, Fields};
use crate::literal_enum;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            r: channel_to_byte(fields.f64("r")?),
            g: channel_to_byte(fields.f64("g")?),
            b: channel_to_byte(fields.f64("b")?),
            a: fields.f64("a")?,
        })
    }

    /// Re-encode with channels back on the 0..1 scale.
    pub fn to_value(&self) -> Value {
        json!({
            "r": f64::from(self.r) / 255.0,
            "g": f64::from(self.g) / 255.0,
            "b": f64::from(self.b) / 255.0,
            "a": self.a,
        })
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = channel_to_byte(self.a);
            format!("#{:02x}{:02x}{:02x}{alpha:02x}", self.r, self.g, self.b)
        }
    }
}

fn channel_to_byte(channel: f64) -> u8 {
    let scaled = (channel * 255.0).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 255.0) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            x: fields.f64("x")?,
            y: fields.f64("y")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            x: fields.f64("x")?,
            y: fields.f64("y")?,
            width: fields.f64("width")?,
            height: fields.f64("height")?,
        })
    }
}

literal_enum! {
    pub enum BlendMode as "blend mode" {
        PassThrough => "PASS_THROUGH",
        Normal => "NORMAL",
        Darken => "DARKEN",
        Multiply => "MULTIPLY",
        LinearBurn => "LINEAR_BURN",
        ColorBurn => "COLOR_BURN",
        Lighten => "LIGHTEN",
        Screen => "SCREEN",
        LinearDodge => "LINEAR_DODGE",
        ColorDodge => "COLOR_DODGE",
        Overlay => "OVERLAY",
        SoftLight => "SOFT_LIGHT",
        HardLight => "HARD_LIGHT",
        Difference => "DIFFERENCE",
        Exclusion => "EXCLUSION",
        Hue => "HUE",
        Saturation => "SATURATION",
        Color => "COLOR",
        Luminosity => "LUMINOSITY",
    }
}

literal_enum! {
    pub enum StrokeAlign as "stroke align" {
        Inside => "INSIDE",
        Outside => "OUTSIDE",
        Center => "CENTER",
    }
}

literal_enum! {
    pub enum ScaleMode as "scale mode" {
        Fill => "FILL",
        Fit => "FIT",
        Tile => "TILE",
        Stretch => "STRETCH",
    }
}

literal_enum! {
    pub enum HorizontalConstraint as "horizontal constraint" {
        Left => "LEFT",
        Right => "RIGHT",
        Center => "CENTER",
        LeftRight => "LEFT_RIGHT",
        Scale => "SCALE",
    }
}

literal_enum! {
    pub enum VerticalConstraint as "vertical constraint" {
        Top => "TOP",
        Bottom => "BOTTOM",
        Center => "CENTER",
        TopBottom => "TOP_BOTTOM",
        Scale => "SCALE",
    }
}

literal_enum! {
    pub enum TextAlignHorizontal as "horizontal text alignment" {
        Left => "LEFT",
        Right => "RIGHT",
        Center => "CENTER",
        Justified => "JUSTIFIED",
    }
}

literal_enum! {
    pub enum TextAlignVertical as "vertical text alignment" {
        Top => "TOP",
        Center => "CENTER",
        Bottom => "BOTTOM",
    }
}

literal_enum! {
    pub enum ExportFormat as "export format" {
        Jpg => "JPG",
        Png => "PNG",
        Svg => "SVG",
        Pdf => "PDF",
    }
}

literal_enum! {
    pub enum GridAlignment as "grid alignment" {
        Min => "MIN",
        Max => "MAX",
        Stretch => "STRETCH",
        Center => "CENTER",
    }
}

literal_enum! {
    pub enum ExportConstraintType as "export constraint type" {
        Scale => "SCALE",
        Width => "WIDTH",
        Height => "HEIGHT",
    }
}

literal_enum! {
    pub enum GridPattern as "layout grid pattern" {
        Columns => "COLUMNS",
        Rows => "ROWS",
        Grid => "GRID",
    }
}

literal_enum! {
    pub enum BooleanOperationType as "boolean operation" {
        Union => "UNION",
        Intersect => "INTERSECT",
        Subtract => "SUBTRACT",
        Exclude => "EXCLUDE",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConstraint {
    pub vertical: VerticalConstraint,
    pub horizontal: HorizontalConstraint,
}

impl LayoutConstraint {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        if !fields.has("horizontal") || !fields.has("vertical") {
            return Err(Error::malformed(
                "constraints must carry both `horizontal` and `vertical`",
            ));
        }
        Ok(Self {
            vertical: fields.literal("vertical")?,
            horizontal: fields.literal("horizontal")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExportConstraint {
    Scale(f64),
    Width(f64),
    Height(f64),
}

impl ExportConstraint {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let kind: ExportConstraintType = fields.literal("type")?;
        let amount = fields.f64("value")?;
        Ok(match kind {
            ExportConstraintType::Scale => ExportConstraint::Scale(amount),
            ExportConstraintType::Width => ExportConstraint::Width(amount),
            ExportConstraintType::Height => ExportConstraint::Height(amount),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportSetting {
    pub suffix: String,
    pub format: ExportFormat,
    pub constraint: ExportConstraint,
}

impl ExportSetting {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            suffix: fields.string("suffix")?,
            format: fields.literal("format")?,
            constraint: fields.nested("constraint", ExportConstraint::from_value)?,
        })
    }
}

/// Columns and rows share one shape; only the axis differs.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackGrid {
    pub visible: bool,
    pub color: Color,
    pub alignment: GridAlignment,
    pub gutter_size: f64,
    pub offset: f64,
    pub count: u64,
    pub section_size: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutGrid {
    Columns(TrackGrid),
    Rows(TrackGrid),
    Grid {
        visible: bool,
        color: Color,
        section_size: f64,
    },
}

impl LayoutGrid {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let pattern: GridPattern = fields.literal("pattern")?;
        match pattern {
            GridPattern::Columns => Ok(LayoutGrid::Columns(track_grid(fields)?)),
            GridPattern::Rows => Ok(LayoutGrid::Rows(track_grid(fields)?)),
            GridPattern::Grid => Ok(LayoutGrid::Grid {
                visible: fields.bool_or("visible", true)?,
                color: fields.nested("color", Color::from_value)?,
                section_size: fields.f64("sectionSize")?,
            }),
        }
    }

    pub fn pattern(&self) -> GridPattern {
        match self {
            LayoutGrid::Columns(_) => GridPattern::Columns,
            LayoutGrid::Rows(_) => GridPattern::Rows,
            LayoutGrid::Grid { .. } => GridPattern::Grid,
        }
    }
}

fn track_grid(fields: Fields<'_>) -> DecodeResult<TrackGrid> {
    Ok(TrackGrid {
        visible: fields.bool_or("visible", true)?,
        color: fields.nested("color", Color::from_value)?,
        alignment: fields.literal("alignment")?,
        gutter_size: fields.f64("gutterSize")?,
        offset: fields.f64("offset")?,
        count: fields.u64("count")?,
        section_size: fields.opt_f64("sectionSize")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn color_rounds_half_away_from_zero() {
        let color = Color::from_value(&json!({ "r": 0.5, "g": 1.0, "b": 0.0, "a": 0.25 }))
            .expect("color");
        // 0.5 * 255 = 127.5
        assert_eq!(color.r, 128);
        assert_eq!(color.g, 255);
        assert_eq!(color.b, 0);
        assert_eq!(color.a, 0.25);
    }

    #[test]
    fn color_clamps_out_of_range_channels() {
        let color = Color::from_value(&json!({ "r": 1.2, "g": -0.1, "b": 0.2, "a": 1.5 }))
            .expect("color");
        assert_eq!(color.r, 255);
        assert_eq!(color.g, 0);
        assert_eq!(color.b, 51);
        assert_eq!(color.a, 1.5);
    }

    #[test]
    fn color_reencodes_within_one_step() {
        let samples = [0.0, 0.003, 0.1, 0.333, 0.5, 0.77, 0.999, 1.0];
        for &r in &samples {
            for &a in &[0.0, 0.42, 1.0] {
                let source = json!({ "r": r, "g": 1.0 - r, "b": r / 2.0, "a": a });
                let color = Color::from_value(&source).expect("color");
                let again = color.to_value();
                let back = |key: &str| again[key].as_f64().expect("channel");
                assert!((back("r") - r).abs() <= 1.0 / 255.0);
                assert!((back("g") - (1.0 - r)).abs() <= 1.0 / 255.0);
                assert!((back("b") - r / 2.0).abs() <= 1.0 / 255.0);
                assert_eq!(back("a"), a);
            }
        }
    }

    #[test]
    fn color_hex_includes_alpha_when_translucent() {
        let opaque = Color { r: 255, g: 0, b: 16, a: 1.0 };
        assert_eq!(opaque.to_hex(), "#ff0010");
        let translucent = Color { r: 0, g: 0, b: 0, a: 0.5 };
        assert_eq!(translucent.to_hex(), "#00000080");
    }

    #[test]
    fn rect_requires_every_field() {
        let err = Rect::from_value(&json!({ "x": 0, "y": 0, "width": 10 })).expect_err("height");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.field(), Some("height"));
    }

    #[test]
    fn constraints_require_both_axes() {
        let err = LayoutConstraint::from_value(&json!({ "vertical": "TOP" })).expect_err("axis");
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let ok = LayoutConstraint::from_value(&json!({ "vertical": "TOP_BOTTOM", "horizontal": "SCALE" }))
            .expect("constraint");
        assert_eq!(ok.vertical, VerticalConstraint::TopBottom);
        assert_eq!(ok.horizontal, HorizontalConstraint::Scale);
    }

    #[test]
    fn export_setting_reads_constraint_union() {
        let setting = ExportSetting::from_value(&json!({
            "suffix": "@2x",
            "format": "PNG",
            "constraint": { "type": "SCALE", "value": 2.0 }
        }))
        .expect("setting");
        assert_eq!(setting.format, ExportFormat::Png);
        assert_eq!(setting.constraint, ExportConstraint::Scale(2.0));

        let err = ExportSetting::from_value(&json!({
            "suffix": "",
            "format": "PNG",
            "constraint": { "type": "DEPTH", "value": 2.0 }
        }))
        .expect_err("constraint type");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedValue);
        assert_eq!(err.field(), Some("constraint.type"));
        assert!(err.message().unwrap_or_default().contains("DEPTH"));
    }

    #[test]
    fn layout_grid_dispatches_on_pattern() {
        let columns = LayoutGrid::from_value(&json!({
            "pattern": "COLUMNS",
            "color": { "r": 1, "g": 0, "b": 0, "a": 0.1 },
            "alignment": "STRETCH",
            "gutterSize": 20,
            "offset": 0,
            "count": 12
        }))
        .expect("columns");
        match columns {
            LayoutGrid::Columns(track) => {
                assert!(track.visible);
                assert_eq!(track.count, 12);
                assert_eq!(track.alignment, GridAlignment::Stretch);
                assert_eq!(track.section_size, None);
            }
            other => panic!("unexpected grid {other:?}"),
        }

        let square = LayoutGrid::from_value(&json!({
            "pattern": "GRID",
            "visible": false,
            "color": { "r": 0, "g": 0, "b": 1, "a": 0.2 },
            "sectionSize": 8
        }))
        .expect("grid");
        assert_eq!(square.pattern(), GridPattern::Grid);

        let err = LayoutGrid::from_value(&json!({ "pattern": "HEX" })).expect_err("pattern");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedValue);
        assert_eq!(err.field(), Some("pattern"));
    }

    #[test]
    fn grid_color_failure_is_labelled() {
        let err = LayoutGrid::from_value(&json!({
            "pattern": "GRID",
            "color": { "r": 0, "g": 0, "b": 1 },
            "sectionSize": 8
        }))
        .expect_err("alpha");
        assert_eq!(err.field(), Some("color.a"));
    }
}
