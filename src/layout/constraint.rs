//! Constraint records produced by the factory

use std::fmt;

use serde::Deserialize;

use super::attributes::{Attribute, Relation};
use super::tree::ViewId;

/// Something a constraint can refer to
///
/// Guides belong to a container view and are resolved against its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutItem {
    View(ViewId),
    /// The container's safe-area guide
    SafeArea(ViewId),
    /// Legacy guide covering the obstructed strip at the top of the container
    TopGuide(ViewId),
    /// Legacy guide covering the obstructed strip at the bottom of the container
    BottomGuide(ViewId),
}

impl LayoutItem {
    /// The view whose geometry this item is derived from
    pub fn owner(&self) -> ViewId {
        match *self {
            LayoutItem::View(id)
            | LayoutItem::SafeArea(id)
            | LayoutItem::TopGuide(id)
            | LayoutItem::BottomGuide(id) => id,
        }
    }

    pub fn as_view(&self) -> Option<ViewId> {
        match *self {
            LayoutItem::View(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ViewId> for LayoutItem {
    fn from(id: ViewId) -> Self {
        LayoutItem::View(id)
    }
}

impl fmt::Display for LayoutItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutItem::View(id) => write!(f, "{}", id),
            LayoutItem::SafeArea(id) => write!(f, "{}.safeArea", id),
            LayoutItem::TopGuide(id) => write!(f, "{}.topGuide", id),
            LayoutItem::BottomGuide(id) => write!(f, "{}.bottomGuide", id),
        }
    }
}

/// Constraint priority on a 1..=1000 scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(from = "f32")]
pub struct Priority(f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const NEAR_REQUIRED: Priority = Priority(999.0);
    pub const DEFAULT_HIGH: Priority = Priority(750.0);
    pub const DEFAULT_LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE: Priority = Priority(50.0);
    pub const MINIMAL: Priority = Priority(1.0);

    /// Create a priority, clamping into 1..=1000
    pub fn new(value: f32) -> Self {
        Priority(value.clamp(1.0, 1000.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_required(&self) -> bool {
        *self == Self::REQUIRED
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Priority::new(value)
    }
}

/// Session-unique constraint identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) u64);

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// One side of a constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub item: LayoutItem,
    pub attribute: Attribute,
}

impl Anchor {
    pub fn new(item: impl Into<LayoutItem>, attribute: Attribute) -> Self {
        Self {
            item: item.into(),
            attribute,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.item, self.attribute)
    }
}

/// `first relation second * multiplier + constant`, or `first relation constant`
/// when there is no second anchor
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) id: ConstraintId,
    pub first: Anchor,
    pub second: Option<Anchor>,
    pub relation: Relation,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Priority,
    pub identifier: Option<String>,
}

impl Constraint {
    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// Returns true if either side refers to `item`
    pub fn involves(&self, item: LayoutItem) -> bool {
        self.first.item == item || self.second.is_some_and(|a| a.item == item)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(identifier) = &self.identifier {
            write!(f, "[{}] ", identifier)?;
        }
        write!(f, "{} {} ", self.first, self.relation)?;
        match &self.second {
            Some(second) => {
                write!(f, "{}", second)?;
                if self.multiplier != 1.0 {
                    write!(f, " * {}", self.multiplier)?;
                }
                if self.constant > 0.0 {
                    write!(f, " + {}", self.constant)?;
                } else if self.constant < 0.0 {
                    write!(f, " - {}", -self.constant)?;
                }
            }
            None => write!(f, "{}", self.constant)?,
        }
        if !self.priority.is_required() {
            write!(f, " @{}", self.priority.value())?;
        }
        Ok(())
    }
}

/// Arguments for [`LayoutSession::make_constraint`](super::LayoutSession::make_constraint)
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec {
    pub first: Anchor,
    pub second: Option<Anchor>,
    pub relation: Relation,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Option<Priority>,
    pub identifier: Option<String>,
}

impl ConstraintSpec {
    pub fn new(item: impl Into<LayoutItem>, attribute: Attribute) -> Self {
        Self {
            first: Anchor::new(item, attribute),
            second: None,
            relation: Relation::Equal,
            multiplier: 1.0,
            constant: 0.0,
            priority: None,
            identifier: None,
        }
    }

    /// Relate to a second item's attribute
    pub fn to(mut self, item: impl Into<LayoutItem>, attribute: Attribute) -> Self {
        self.second = Some(Anchor::new(item, attribute));
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub(crate) fn build(self, id: ConstraintId) -> Constraint {
        Constraint {
            id,
            first: self.first,
            second: self.second,
            relation: self.relation,
            multiplier: self.multiplier,
            constant: self.constant,
            priority: self.priority.unwrap_or_default(),
            identifier: self.identifier,
        }
    }
}
