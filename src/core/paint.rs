//! Purpose: Decode paints (solid, gradients, image) and layer effects (shadows, blurs).
//! Exports: `Paint`, `PaintType`, `SolidPaint`, `GradientPaint`, `GradientHandles`, `ColorStop`,
//! `ImagePaint`, `Effect`, `EffectType`, `Shadow`, `Blur`.
//! Role: Appearance decoders composed by the node field decoders.
//! Invariants: Paint and effect lists keep server order; stacking order is meaningful.
//! Invariants: EMOJI paints are not supported and fail like any unknown paint type.
//! Invariants: Gradient handles are always exactly three positions (start, end, width).
use crate::core::error::Error;
use crate::core::fields::{DecodeResult, Fields};
use crate::core::value::{BlendMode, Color, ScaleMode, Vector2};
use crate::literal_enum;
use serde_json::Value;

literal_enum! {
    pub enum PaintType as "paint type" {
        Solid => "SOLID",
        GradientLinear => "GRADIENT_LINEAR",
        GradientRadial => "GRADIENT_RADIAL",
        GradientAngular => "GRADIENT_ANGULAR",
        GradientDiamond => "GRADIENT_DIAMOND",
        Image => "IMAGE",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolidPaint {
    pub visible: bool,
    pub opacity: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientHandles {
    pub start: Vector2,
    pub end: Vector2,
    pub width: Vector2,
}

impl GradientHandles {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::malformed("gradient handle positions must be an array"))?;
        let [start, end, width] = items.as_slice() else {
            return Err(Error::malformed(format!(
                "expected 3 gradient handle positions, found {}",
                items.len()
            )));
        };
        let position = |index: usize, value: &Value| {
            Vector2::from_value(value).map_err(|err| err.at_index(index))
        };
        Ok(Self {
            start: position(0, start)?,
            end: position(1, end)?,
            width: position(2, width)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            position: fields.f64("position")?,
            color: fields.nested("color", Color::from_value)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientPaint {
    pub visible: bool,
    pub opacity: f64,
    pub handles: GradientHandles,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImagePaint {
    pub visible: bool,
    pub opacity: f64,
    pub scale_mode: ScaleMode,
    pub blend_mode: BlendMode,
    pub image_ref: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(SolidPaint),
    GradientLinear(GradientPaint),
    GradientRadial(GradientPaint),
    GradientAngular(GradientPaint),
    GradientDiamond(GradientPaint),
    Image(ImagePaint),
}

impl Paint {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let kind: PaintType = fields.literal("type")?;
        let visible = fields.bool_or("visible", true)?;
        let opacity = fields.f64_or("opacity", 1.0)?;
        Ok(match kind {
            PaintType::Solid => Paint::Solid(SolidPaint {
                visible,
                opacity,
                color: fields.nested("color", Color::from_value)?,
            }),
            PaintType::GradientLinear => Paint::GradientLinear(gradient(fields, visible, opacity)?),
            PaintType::GradientRadial => Paint::GradientRadial(gradient(fields, visible, opacity)?),
            PaintType::GradientAngular => {
                Paint::GradientAngular(gradient(fields, visible, opacity)?)
            }
            PaintType::GradientDiamond => {
                Paint::GradientDiamond(gradient(fields, visible, opacity)?)
            }
            PaintType::Image => Paint::Image(ImagePaint {
                visible,
                opacity,
                scale_mode: fields.literal("scaleMode")?,
                blend_mode: fields.literal("blendMode")?,
                image_ref: fields.opt_string("imageRef")?,
            }),
        })
    }

    pub fn paint_type(&self) -> PaintType {
        match self {
            Paint::Solid(_) => PaintType::Solid,
            Paint::GradientLinear(_) => PaintType::GradientLinear,
            Paint::GradientRadial(_) => PaintType::GradientRadial,
            Paint::GradientAngular(_) => PaintType::GradientAngular,
            Paint::GradientDiamond(_) => PaintType::GradientDiamond,
            Paint::Image(_) => PaintType::Image,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Paint::Solid(paint) => paint.visible,
            Paint::GradientLinear(paint)
            | Paint::GradientRadial(paint)
            | Paint::GradientAngular(paint)
            | Paint::GradientDiamond(paint) => paint.visible,
            Paint::Image(paint) => paint.visible,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Paint::Solid(paint) => paint.opacity,
            Paint::GradientLinear(paint)
            | Paint::GradientRadial(paint)
            | Paint::GradientAngular(paint)
            | Paint::GradientDiamond(paint) => paint.opacity,
            Paint::Image(paint) => paint.opacity,
        }
    }

    pub fn as_solid(&self) -> Option<&SolidPaint> {
        match self {
            Paint::Solid(paint) => Some(paint),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<&GradientPaint> {
        match self {
            Paint::GradientLinear(paint)
            | Paint::GradientRadial(paint)
            | Paint::GradientAngular(paint)
            | Paint::GradientDiamond(paint) => Some(paint),
            _ => None,
        }
    }
}

fn gradient(fields: Fields<'_>, visible: bool, opacity: f64) -> DecodeResult<GradientPaint> {
    Ok(GradientPaint {
        visible,
        opacity,
        handles: fields.nested("gradientHandlePositions", GradientHandles::from_value)?,
        stops: fields.list("gradientStops", ColorStop::from_value)?,
    })
}

literal_enum! {
    pub enum EffectType as "effect type" {
        InnerShadow => "INNER_SHADOW",
        DropShadow => "DROP_SHADOW",
        LayerBlur => "LAYER_BLUR",
        BackgroundBlur => "BACKGROUND_BLUR",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    pub visible: bool,
    pub radius: f64,
    pub color: Color,
    pub blend_mode: BlendMode,
    pub offset: Vector2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Blur {
    pub visible: bool,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    InnerShadow(Shadow),
    DropShadow(Shadow),
    LayerBlur(Blur),
    BackgroundBlur(Blur),
}

impl Effect {
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let fields = Fields::of(value)?;
        let kind: EffectType = fields.literal("type")?;
        Ok(match kind {
            EffectType::InnerShadow => Effect::InnerShadow(shadow(fields)?),
            EffectType::DropShadow => Effect::DropShadow(shadow(fields)?),
            EffectType::LayerBlur => Effect::LayerBlur(blur(fields)?),
            EffectType::BackgroundBlur => Effect::BackgroundBlur(blur(fields)?),
        })
    }

    pub fn effect_type(&self) -> EffectType {
        match self {
            Effect::InnerShadow(_) => EffectType::InnerShadow,
            Effect::DropShadow(_) => EffectType::DropShadow,
            Effect::LayerBlur(_) => EffectType::LayerBlur,
            Effect::BackgroundBlur(_) => EffectType::BackgroundBlur,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Effect::InnerShadow(shadow) | Effect::DropShadow(shadow) => shadow.visible,
            Effect::LayerBlur(blur) | Effect::BackgroundBlur(blur) => blur.visible,
        }
    }
}

fn shadow(fields: Fields<'_>) -> DecodeResult<Shadow> {
    Ok(Shadow {
        visible: fields.bool_or("visible", true)?,
        radius: fields.f64("radius")?,
        color: fields.nested("color", Color::from_value)?,
        blend_mode: fields.literal("blendMode")?,
        offset: fields.nested("offset", Vector2::from_value)?,
    })
}

fn blur(fields: Fields<'_>) -> DecodeResult<Blur> {
    Ok(Blur {
        visible: fields.bool_or("visible", true)?,
        radius: fields.f64("radius")?,
    })
}
