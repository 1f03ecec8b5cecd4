//! Purpose: Define the document node variants and decode each variant's own fields.
//! Exports: `Node`, `NodeType`, `NodeHeader`, `FrameProps`, `ShapeProps`, the per-variant records,
//! `ChildPolicy`, `decode_node`.
//! Role: Node field decoders; the tree decoder dispatches here and handles `children` itself.
//! Invariants: Every node has an `id` and `name`; `visible` defaults to true.
//! Invariants: A node decodes completely or not at all; no partially-filled records.
//! Invariants: `transitionNodeID` is carried verbatim; references are not resolved here.
use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{DecodeResult, Fields, Literal};
use crate::core::paint::{Effect, Paint};
use crate::core::text::{StyleOverrideTable, TypeStyle, style_override_table};
use crate::core::value::{
    BlendMode, BooleanOperationType, Color, ExportSetting, LayoutConstraint, LayoutGrid, Rect,
    StrokeAlign,
};
use crate::literal_enum;
use serde_json::Value;

literal_enum! {
    pub enum NodeType as "node type" {
        Document => "DOCUMENT",
        Canvas => "CANVAS",
        Frame => "FRAME",
        Group => "GROUP",
        Vector => "VECTOR",
        BooleanOperation => "BOOLEAN_OPERATION",
        Star => "STAR",
        Line => "LINE",
        Ellipse => "ELLIPSE",
        RegularPolygon => "REGULAR_POLYGON",
        Rectangle => "RECTANGLE",
        Text => "TEXT",
        Slice => "SLICE",
        Component => "COMPONENT",
        Instance => "INSTANCE",
    }
}

/// How a variant treats the `children` key of its JSON object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildPolicy {
    /// `children` must be present and be an array.
    Required,
    /// `children` is decoded when present; absent means no children.
    Optional,
    /// `children` is never read.
    Leaf,
}

impl NodeType {
    pub fn child_policy(self) -> ChildPolicy {
        match self {
            NodeType::Document
            | NodeType::Canvas
            | NodeType::Frame
            | NodeType::Group
            | NodeType::Component => ChildPolicy::Required,
            NodeType::Instance | NodeType::BooleanOperation => ChildPolicy::Optional,
            NodeType::Vector
            | NodeType::Star
            | NodeType::Line
            | NodeType::Ellipse
            | NodeType::RegularPolygon
            | NodeType::Rectangle
            | NodeType::Text
            | NodeType::Slice => ChildPolicy::Leaf,
        }
    }

    pub fn is_container(self) -> bool {
        self.child_policy() != ChildPolicy::Leaf
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeHeader {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

impl NodeHeader {
    fn decode(fields: Fields<'_>) -> DecodeResult<Self> {
        Ok(Self {
            id: fields.string("id")?,
            name: fields.string("name")?,
            visible: fields.bool_or("visible", true)?,
        })
    }
}

/// Fields shared by frames, groups, components, and instances.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameProps {
    pub background: Vec<Paint>,
    pub background_color: Color,
    pub export_settings: Vec<ExportSetting>,
    pub blend_mode: BlendMode,
    pub preserve_ratio: bool,
    pub constraints: LayoutConstraint,
    pub transition_node_id: Option<String>,
    pub opacity: f64,
    pub absolute_bounding_box: Rect,
    pub clips_content: bool,
    pub layout_grids: Vec<LayoutGrid>,
    pub effects: Vec<Effect>,
    pub is_mask: bool,
}

impl FrameProps {
    fn decode(fields: Fields<'_>) -> DecodeResult<Self> {
        Ok(Self {
            background: fields.list_or_empty("background", Paint::from_value)?,
            background_color: fields.nested("backgroundColor", Color::from_value)?,
            export_settings: fields.list_or_empty("exportSettings", ExportSetting::from_value)?,
            blend_mode: fields.literal("blendMode")?,
            preserve_ratio: fields.bool_or("preserveRatio", false)?,
            constraints: fields.nested("constraints", LayoutConstraint::from_value)?,
            transition_node_id: fields.opt_string("transitionNodeID")?,
            opacity: fields.f64_or("opacity", 1.0)?,
            absolute_bounding_box: fields.nested("absoluteBoundingBox", Rect::from_value)?,
            clips_content: fields.bool("clipsContent")?,
            layout_grids: fields.list_or_empty("layoutGrids", LayoutGrid::from_value)?,
            effects: fields.list_or_empty("effects", Effect::from_value)?,
            is_mask: fields.bool_or("isMask", false)?,
        })
    }
}

/// Fields shared by vector shapes, rectangles, and text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeProps {
    pub export_settings: Vec<ExportSetting>,
    pub blend_mode: BlendMode,
    pub preserve_ratio: bool,
    pub constraints: LayoutConstraint,
    pub transition_node_id: Option<String>,
    pub opacity: f64,
    pub absolute_bounding_box: Rect,
    pub effects: Vec<Effect>,
    pub is_mask: bool,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
    pub stroke_align: StrokeAlign,
}

impl ShapeProps {
    fn decode(fields: Fields<'_>) -> DecodeResult<Self> {
        Ok(Self {
            export_settings: fields.list_or_empty("exportSettings", ExportSetting::from_value)?,
            blend_mode: fields.literal("blendMode")?,
            preserve_ratio: fields.bool_or("preserveRatio", false)?,
            constraints: fields.nested("constraints", LayoutConstraint::from_value)?,
            transition_node_id: fields.opt_string("transitionNodeID")?,
            opacity: fields.f64_or("opacity", 1.0)?,
            absolute_bounding_box: fields.nested("absoluteBoundingBox", Rect::from_value)?,
            effects: fields.list_or_empty("effects", Effect::from_value)?,
            is_mask: fields.bool_or("isMask", false)?,
            fills: fields.list_or_empty("fills", Paint::from_value)?,
            strokes: fields.list("strokes", Paint::from_value)?,
            stroke_weight: fields.f64("strokeWeight")?,
            stroke_align: fields.literal("strokeAlign")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentNode {
    pub header: NodeHeader,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
    pub header: NodeHeader,
    pub background_color: Color,
    pub export_settings: Vec<ExportSetting>,
    pub prototype_start_node_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
    pub header: NodeHeader,
    pub frame: FrameProps,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstanceNode {
    pub header: NodeHeader,
    pub frame: FrameProps,
    pub component_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeNode {
    pub header: NodeHeader,
    pub shape: ShapeProps,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BooleanOperationNode {
    pub header: NodeHeader,
    pub shape: ShapeProps,
    pub operation: BooleanOperationType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectangleNode {
    pub header: NodeHeader,
    pub shape: ShapeProps,
    pub corner_radius: f64,
    pub corner_radii: Option<[f64; 4]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub header: NodeHeader,
    pub shape: ShapeProps,
    pub characters: String,
    pub style: TypeStyle,
    pub character_style_overrides: Vec<usize>,
    pub style_override_table: StyleOverrideTable,
}

impl TextNode {
    /// The effective style of the character at `index`.
    pub fn style_at(&self, index: usize) -> TypeStyle {
        let patch = self
            .character_style_overrides
            .get(index)
            .filter(|&&key| key != 0)
            .and_then(|key| self.style_override_table.get(key));
        match patch {
            Some(patch) => self.style.apply(patch),
            None => self.style.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliceNode {
    pub header: NodeHeader,
    pub export_settings: Vec<ExportSetting>,
    pub absolute_bounding_box: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Document(DocumentNode),
    Canvas(CanvasNode),
    Frame(FrameNode),
    Group(FrameNode),
    Vector(ShapeNode),
    BooleanOperation(BooleanOperationNode),
    Star(ShapeNode),
    Line(ShapeNode),
    Ellipse(ShapeNode),
    RegularPolygon(ShapeNode),
    Rectangle(RectangleNode),
    Text(TextNode),
    Slice(SliceNode),
    Component(FrameNode),
    Instance(InstanceNode),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Document(_) => NodeType::Document,
            Node::Canvas(_) => NodeType::Canvas,
            Node::Frame(_) => NodeType::Frame,
            Node::Group(_) => NodeType::Group,
            Node::Vector(_) => NodeType::Vector,
            Node::BooleanOperation(_) => NodeType::BooleanOperation,
            Node::Star(_) => NodeType::Star,
            Node::Line(_) => NodeType::Line,
            Node::Ellipse(_) => NodeType::Ellipse,
            Node::RegularPolygon(_) => NodeType::RegularPolygon,
            Node::Rectangle(_) => NodeType::Rectangle,
            Node::Text(_) => NodeType::Text,
            Node::Slice(_) => NodeType::Slice,
            Node::Component(_) => NodeType::Component,
            Node::Instance(_) => NodeType::Instance,
        }
    }

    pub fn header(&self) -> &NodeHeader {
        match self {
            Node::Document(node) => &node.header,
            Node::Canvas(node) => &node.header,
            Node::Frame(node) | Node::Group(node) | Node::Component(node) => &node.header,
            Node::Vector(node)
            | Node::Star(node)
            | Node::Line(node)
            | Node::Ellipse(node)
            | Node::RegularPolygon(node) => &node.header,
            Node::BooleanOperation(node) => &node.header,
            Node::Rectangle(node) => &node.header,
            Node::Text(node) => &node.header,
            Node::Slice(node) => &node.header,
            Node::Instance(node) => &node.header,
        }
    }

    pub fn id(&self) -> &str {
        &self.header().id
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    pub fn is_visible(&self) -> bool {
        self.header().visible
    }

    pub fn frame_props(&self) -> Option<&FrameProps> {
        match self {
            Node::Frame(node) | Node::Group(node) | Node::Component(node) => Some(&node.frame),
            Node::Instance(node) => Some(&node.frame),
            _ => None,
        }
    }

    pub fn shape_props(&self) -> Option<&ShapeProps> {
        match self {
            Node::Vector(node)
            | Node::Star(node)
            | Node::Line(node)
            | Node::Ellipse(node)
            | Node::RegularPolygon(node) => Some(&node.shape),
            Node::BooleanOperation(node) => Some(&node.shape),
            Node::Rectangle(node) => Some(&node.shape),
            Node::Text(node) => Some(&node.shape),
            _ => None,
        }
    }

    pub fn absolute_bounding_box(&self) -> Option<&Rect> {
        if let Some(frame) = self.frame_props() {
            return Some(&frame.absolute_bounding_box);
        }
        if let Some(shape) = self.shape_props() {
            return Some(&shape.absolute_bounding_box);
        }
        match self {
            Node::Slice(node) => Some(&node.absolute_bounding_box),
            _ => None,
        }
    }

    /// Fill paints in stacking order: shape fills, or frame background paints.
    pub fn fills(&self) -> &[Paint] {
        if let Some(shape) = self.shape_props() {
            return &shape.fills;
        }
        if let Some(frame) = self.frame_props() {
            return &frame.background;
        }
        &[]
    }

    pub fn strokes(&self) -> &[Paint] {
        self.shape_props()
            .map(|shape| shape.strokes.as_slice())
            .unwrap_or(&[])
    }

    pub fn export_settings(&self) -> &[ExportSetting] {
        if let Some(frame) = self.frame_props() {
            return &frame.export_settings;
        }
        if let Some(shape) = self.shape_props() {
            return &shape.export_settings;
        }
        match self {
            Node::Canvas(node) => &node.export_settings,
            Node::Slice(node) => &node.export_settings,
            _ => &[],
        }
    }
}

/// Read the discriminator and decode the node's own fields (never its children).
pub fn decode_node(value: &Value) -> DecodeResult<Node> {
    let fields = Fields::of(value)?;
    let node_type = read_node_type(fields)?;
    let header = NodeHeader::decode(fields)?;
    let id = header.id.clone();
    decode_variant(node_type, header, fields).map_err(|err| err.in_node(&id))
}

pub(crate) fn read_node_type(fields: Fields<'_>) -> DecodeResult<NodeType> {
    let literal = fields.str("type")?;
    NodeType::from_literal(literal).ok_or_else(|| {
        Error::new(ErrorKind::UnsupportedNodeType)
            .with_message(format!("unsupported node type: {literal}"))
            .with_field("type")
    })
}

fn decode_variant(node_type: NodeType, header: NodeHeader, fields: Fields<'_>) -> DecodeResult<Node> {
    let node = match node_type {
        NodeType::Document => Node::Document(DocumentNode { header }),
        NodeType::Canvas => Node::Canvas(CanvasNode {
            header,
            background_color: fields.nested("backgroundColor", Color::from_value)?,
            export_settings: fields.list_or_empty("exportSettings", ExportSetting::from_value)?,
            prototype_start_node_id: fields.opt_string("prototypeStartNodeID")?,
        }),
        NodeType::Frame => Node::Frame(frame_node(header, fields)?),
        NodeType::Group => Node::Group(frame_node(header, fields)?),
        NodeType::Component => Node::Component(frame_node(header, fields)?),
        NodeType::Instance => Node::Instance(InstanceNode {
            header,
            frame: FrameProps::decode(fields)?,
            component_id: fields.string("componentId")?,
        }),
        NodeType::Vector => Node::Vector(shape_node(header, fields)?),
        NodeType::Star => Node::Star(shape_node(header, fields)?),
        NodeType::Line => Node::Line(shape_node(header, fields)?),
        NodeType::Ellipse => Node::Ellipse(shape_node(header, fields)?),
        NodeType::RegularPolygon => Node::RegularPolygon(shape_node(header, fields)?),
        NodeType::BooleanOperation => Node::BooleanOperation(BooleanOperationNode {
            header,
            shape: ShapeProps::decode(fields)?,
            operation: fields.literal("booleanOperation")?,
        }),
        NodeType::Rectangle => Node::Rectangle(RectangleNode {
            header,
            shape: ShapeProps::decode(fields)?,
            corner_radius: fields.f64_or("cornerRadius", 0.0)?,
            corner_radii: fields.opt_nested("rectangleCornerRadii", corner_radii)?,
        }),
        NodeType::Text => Node::Text(TextNode {
            header,
            shape: ShapeProps::decode(fields)?,
            characters: fields.string("characters")?,
            style: fields.nested("style", TypeStyle::from_value)?,
            character_style_overrides: fields.list("characterStyleOverrides", style_index)?,
            style_override_table: fields.nested("styleOverrideTable", style_override_table)?,
        }),
        NodeType::Slice => Node::Slice(SliceNode {
            header,
            export_settings: fields.list_or_empty("exportSettings", ExportSetting::from_value)?,
            absolute_bounding_box: fields.nested("absoluteBoundingBox", Rect::from_value)?,
        }),
    };
    Ok(node)
}

fn frame_node(header: NodeHeader, fields: Fields<'_>) -> DecodeResult<FrameNode> {
    Ok(FrameNode {
        header,
        frame: FrameProps::decode(fields)?,
    })
}

fn shape_node(header: NodeHeader, fields: Fields<'_>) -> DecodeResult<ShapeNode> {
    Ok(ShapeNode {
        header,
        shape: ShapeProps::decode(fields)?,
    })
}

fn style_index(value: &Value) -> DecodeResult<usize> {
    value
        .as_u64()
        .and_then(|index| usize::try_from(index).ok())
        .ok_or_else(|| Error::malformed("style override index must be a non-negative integer"))
}

fn corner_radii(value: &Value) -> DecodeResult<[f64; 4]> {
    let radii = value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
        .ok_or_else(|| Error::malformed("corner radii must be an array of numbers"))?;
    <[f64; 4]>::try_from(radii.as_slice())
        .map_err(|_| Error::malformed(format!("expected 4 corner radii, found {}", radii.len())))
}
