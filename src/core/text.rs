//! Purpose: Decode text master styles and the sparse per-range override table.
//! Exports: `TypeStyle`, `TypeStyleOverride`, `StyleOverrideTable`.
//! Role: Appearance decoders used by TEXT nodes.
//! Invariants: Override fields stay `None` when absent; they never inherit master values here.
//! Invariants: Override table keys must be non-negative integers; anything else fails the decode.
use crate::core::error::Error;
use crate::core::fields::{DecodeResult, Fields};
use crate::core::paint::Paint;
use crate::core::value::{TextAlignHorizontal, TextAlignVertical};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct TypeStyle {
    pub font_family: String,
    pub font_post_script_name: String,
    pub italic: bool,
    pub font_weight: u16,
    pub font_size: f64,
    pub text_align_horizontal: TextAlignHorizontal,
    pub text_align_vertical: TextAlignVertical,
    pub letter_spacing: f64,
    pub fills: Vec<Paint>,
    pub line_height_px: f64,
    pub line_height_percent: f64,
}

impl TypeStyle {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            font_family: fields.string("fontFamily")?,
            font_post_script_name: fields.string("fontPostScriptName")?,
            italic: fields.bool_or("italic", false)?,
            font_weight: font_weight(fields.u64("fontWeight")?)?,
            font_size: fields.f64("fontSize")?,
            text_align_horizontal: fields.literal("textAlignHorizontal")?,
            text_align_vertical: fields.literal("textAlignVertical")?,
            letter_spacing: fields.f64("letterSpacing")?,
            fills: fields.list_or_empty("fills", Paint::from_value)?,
            line_height_px: fields.f64("lineHeightPx")?,
            line_height_percent: fields.f64("lineHeightPercent")?,
        })
    }

    /// Resolve an override against this style: set fields win, unset fields inherit.
    pub fn apply(&self, patch: &TypeStyleOverride) -> TypeStyle {
        TypeStyle {
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_post_script_name: patch
                .font_post_script_name
                .clone()
                .unwrap_or_else(|| self.font_post_script_name.clone()),
            italic: patch.italic.unwrap_or(self.italic),
            font_weight: patch.font_weight.unwrap_or(self.font_weight),
            font_size: patch.font_size.unwrap_or(self.font_size),
            text_align_horizontal: patch
                .text_align_horizontal
                .unwrap_or(self.text_align_horizontal),
            text_align_vertical: patch.text_align_vertical.unwrap_or(self.text_align_vertical),
            letter_spacing: patch.letter_spacing.unwrap_or(self.letter_spacing),
            fills: patch.fills.clone().unwrap_or_else(|| self.fills.clone()),
            line_height_px: patch.line_height_px.unwrap_or(self.line_height_px),
            line_height_percent: patch
                .line_height_percent
                .unwrap_or(self.line_height_percent),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeStyleOverride {
    pub font_family: Option<String>,
    pub font_post_script_name: Option<String>,
    pub italic: Option<bool>,
    pub font_weight: Option<u16>,
    pub font_size: Option<f64>,
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    pub text_align_vertical: Option<TextAlignVertical>,
    pub letter_spacing: Option<f64>,
    pub fills: Option<Vec<Paint>>,
    pub line_height_px: Option<f64>,
    pub line_height_percent: Option<f64>,
}

impl TypeStyleOverride {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let fills = if fields.has("fills") {
            Some(fields.list("fills", Paint::from_value)?)
        } else {
            None
        };
        Ok(Self {
            font_family: fields.opt_string("fontFamily")?,
            font_post_script_name: fields.opt_string("fontPostScriptName")?,
            italic: fields.opt_bool("italic")?,
            font_weight: fields.opt_u64("fontWeight")?.map(font_weight).transpose()?,
            font_size: fields.opt_f64("fontSize")?,
            text_align_horizontal: fields.opt_literal("textAlignHorizontal")?,
            text_align_vertical: fields.opt_literal("textAlignVertical")?,
            letter_spacing: fields.opt_f64("letterSpacing")?,
            fills,
            line_height_px: fields.opt_f64("lineHeightPx")?,
            line_height_percent: fields.opt_f64("lineHeightPercent")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &TypeStyleOverride::default()
    }
}

/// Override records keyed by the style index referenced from `characterStyleOverrides`.
pub type StyleOverrideTable = BTreeMap<usize, TypeStyleOverride>;

pub fn style_override_table(value: &Value) -> DecodeResult<StyleOverrideTable> {
    let fields = Fields::of(value)?;
    let mut table = StyleOverrideTable::new();
    for (key, entry) in fields.object() {
        let index = key.parse::<usize>().map_err(|err| {
            Error::malformed(format!("style override key `{key}` is not a non-negative integer"))
                .with_field(key.as_str())
                .with_source(err)
        })?;
        let record = TypeStyleOverride::from_value(entry).map_err(|err| err.within(key))?;
        table.insert(index, record);
    }
    Ok(table)
}

fn font_weight(weight: u64) -> DecodeResult<u16> {
    u16::try_from(weight)
        .map_err(|_| Error::malformed(format!("font weight {weight} is out of range")).with_field("fontWeight"))
}
