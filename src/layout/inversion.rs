//! Sign and relation inversion for insets
//!
//! Insets are always given as a positive distance inward from an edge. For
//! edges measured from the far side of the container (trailing, right, bottom)
//! that distance is a negative offset in raw coordinates, and an inequality has
//! to flip to keep its meaning.

use super::attributes::{Edge, Relation};

/// Sides whose insets point against the coordinate axis
const INVERTED_SIDES: [Edge; 3] = [Edge::Trailing, Edge::Right, Edge::Bottom];

/// Returns true if an inset from `side` must be negated
///
/// Accepts both [`Edge`] and [`Margin`](super::Margin) values.
pub fn should_invert(side: impl Into<Edge>) -> bool {
    INVERTED_SIDES.contains(&side.into())
}

/// Swap an inequality; equality is unchanged
pub fn invert(relation: Relation) -> Relation {
    relation.inverted()
}

/// Inversion decision for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inversion {
    inverted: bool,
}

impl Inversion {
    pub fn for_side(side: impl Into<Edge>) -> Self {
        Self {
            inverted: should_invert(side),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Relation to hand to the factory
    pub fn relation(&self, relation: Relation) -> Relation {
        if self.inverted {
            invert(relation)
        } else {
            relation
        }
    }

    /// Constant to hand to the factory for an inward inset
    pub fn offset(&self, inset: f64) -> f64 {
        if self.inverted {
            -inset
        } else {
            inset
        }
    }
}
