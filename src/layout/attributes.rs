//! Semantic layout vocabulary and its mapping onto engine attributes
//!
//! Callers describe layout with [`Edge`], [`Margin`], [`Axis`] and [`Dimension`].
//! The engine only understands [`Attribute`]. The functions in this module are
//! the single mapping table between the two.

use std::fmt;

use serde::Deserialize;

/// A geometric property recognized by the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Top,
    Bottom,
    Leading,
    Trailing,
    Left,
    Right,
    Width,
    Height,
    CenterX,
    CenterY,
    TopMargin,
    BottomMargin,
    LeadingMargin,
    TrailingMargin,
    LeftMargin,
    RightMargin,
    CenterXWithinMargins,
    CenterYWithinMargins,
}

impl Attribute {
    /// Returns true if this attribute is measured inside the item's layout margins
    pub fn is_margin_relative(&self) -> bool {
        matches!(
            self,
            Self::TopMargin
                | Self::BottomMargin
                | Self::LeadingMargin
                | Self::TrailingMargin
                | Self::LeftMargin
                | Self::RightMargin
                | Self::CenterXWithinMargins
                | Self::CenterYWithinMargins
        )
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Leading => "leading",
            Self::Trailing => "trailing",
            Self::Left => "left",
            Self::Right => "right",
            Self::Width => "width",
            Self::Height => "height",
            Self::CenterX => "centerX",
            Self::CenterY => "centerY",
            Self::TopMargin => "topMargin",
            Self::BottomMargin => "bottomMargin",
            Self::LeadingMargin => "leadingMargin",
            Self::TrailingMargin => "trailingMargin",
            Self::LeftMargin => "leftMargin",
            Self::RightMargin => "rightMargin",
            Self::CenterXWithinMargins => "centerXWithinMargins",
            Self::CenterYWithinMargins => "centerYWithinMargins",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A side of an item's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
    Left,
    Right,
}

impl Edge {
    /// Edges pinned when the caller does not name any
    pub const DEFAULT_PIN: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Leading, Edge::Trailing];

    /// Edges pinned to a safe area when the caller does not name any
    pub const DEFAULT_SAFE_AREA: [Edge; 4] =
        [Edge::Leading, Edge::Bottom, Edge::Trailing, Edge::Top];

    pub fn to_attribute(self) -> Attribute {
        edge_to_attribute(self)
    }
}

/// A side of the container's content area, inset by its layout margins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Margin {
    Top,
    Bottom,
    Leading,
    Trailing,
    Left,
    Right,
}

impl Margin {
    /// Margins pinned when the caller does not name any
    pub const DEFAULT_PIN: [Margin; 4] =
        [Margin::Top, Margin::Bottom, Margin::Leading, Margin::Trailing];

    pub fn to_attribute(self) -> Attribute {
        margin_to_attribute(self)
    }

    /// The plain edge on the pinned item that corresponds to this margin
    pub fn to_edge(self) -> Edge {
        margin_to_edge(self)
    }
}

impl From<Margin> for Edge {
    fn from(margin: Margin) -> Self {
        margin_to_edge(margin)
    }
}

/// A centering direction
///
/// `Vertical` is the vertical line through the middle of an item, so it maps
/// to center-x; `Horizontal` maps to center-y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn to_attribute(self) -> Attribute {
        axis_to_attribute(self, false)
    }

    pub fn to_attribute_within_margins(self) -> Attribute {
        axis_to_attribute(self, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn to_attribute(self) -> Attribute {
        dimension_to_attribute(self)
    }
}

/// The axis a content priority applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

/// How the two sides of a constraint are related
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    #[default]
    Equal,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Relation {
    /// Swap the direction of an inequality; equality is unchanged
    pub fn inverted(self) -> Relation {
        match self {
            Relation::Equal => Relation::Equal,
            Relation::LessThanOrEqual => Relation::GreaterThanOrEqual,
            Relation::GreaterThanOrEqual => Relation::LessThanOrEqual,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Relation::Equal => "==",
            Relation::LessThanOrEqual => "<=",
            Relation::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

pub fn edge_to_attribute(edge: Edge) -> Attribute {
    match edge {
        Edge::Top => Attribute::Top,
        Edge::Bottom => Attribute::Bottom,
        Edge::Leading => Attribute::Leading,
        Edge::Trailing => Attribute::Trailing,
        Edge::Left => Attribute::Left,
        Edge::Right => Attribute::Right,
    }
}

pub fn margin_to_attribute(margin: Margin) -> Attribute {
    match margin {
        Margin::Top => Attribute::TopMargin,
        Margin::Bottom => Attribute::BottomMargin,
        Margin::Leading => Attribute::LeadingMargin,
        Margin::Trailing => Attribute::TrailingMargin,
        Margin::Left => Attribute::LeftMargin,
        Margin::Right => Attribute::RightMargin,
    }
}

pub fn margin_to_edge(margin: Margin) -> Edge {
    match margin {
        Margin::Top => Edge::Top,
        Margin::Bottom => Edge::Bottom,
        Margin::Leading => Edge::Leading,
        Margin::Trailing => Edge::Trailing,
        Margin::Left => Edge::Left,
        Margin::Right => Edge::Right,
    }
}

pub fn axis_to_attribute(axis: Axis, within_margins: bool) -> Attribute {
    match (axis, within_margins) {
        (Axis::Vertical, false) => Attribute::CenterX,
        (Axis::Horizontal, false) => Attribute::CenterY,
        (Axis::Vertical, true) => Attribute::CenterXWithinMargins,
        (Axis::Horizontal, true) => Attribute::CenterYWithinMargins,
    }
}

pub fn dimension_to_attribute(dimension: Dimension) -> Attribute {
    match dimension {
        Dimension::Width => Attribute::Width,
        Dimension::Height => Attribute::Height,
    }
}
