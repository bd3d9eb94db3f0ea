//! Relation builders
//!
//! [`ViewLayout`] turns semantic relations (pin this edge, center on that axis,
//! match a dimension) into calls to the constraint factory. Every attribute
//! goes through the mapping functions in [`attributes`](super::attributes) and
//! every inset-to-offset decision goes through [`Inversion`].
//!
//! ```
//! use constraint_kit::{Edge, EdgeInsets, LayoutSession, Rect, Relation};
//!
//! let mut session = LayoutSession::default();
//! let root = session.tree_mut().add_root(Rect::new(0.0, 0.0, 320.0, 480.0));
//! let card = session.tree_mut().add_named("card");
//! session.tree_mut().add_subview(root, card);
//!
//! let constraints = session.run_batched(|s| {
//!     let mut card = s.view(card);
//!     card.pin_edges_to_superview(
//!         &[Edge::Top, Edge::Leading, Edge::Trailing],
//!         EdgeInsets::all(16.0),
//!     );
//!     card.set_height(120.0, Relation::Equal);
//! });
//! assert_eq!(constraints.len(), 4);
//! ```

use super::attributes::{
    axis_to_attribute, dimension_to_attribute, edge_to_attribute, margin_to_attribute,
    margin_to_edge, Attribute, Axis, Dimension, Edge, LayoutAxis, Margin, Relation,
};
use super::constraint::{Constraint, ConstraintSpec, Priority};
use super::engine::LayoutEngine;
use super::inversion::Inversion;
use super::session::LayoutSession;
use super::tree::{SafeAreaGuides, ViewId};
use super::types::{EdgeInsets, Size};

impl<E: LayoutEngine> LayoutSession<E> {
    /// Relation builders for `view`
    pub fn view(&mut self, view: ViewId) -> ViewLayout<'_, E> {
        ViewLayout {
            session: self,
            view,
        }
    }
}

/// Builds constraints with one view as the first item
pub struct ViewLayout<'s, E> {
    session: &'s mut LayoutSession<E>,
    view: ViewId,
}

impl<E: LayoutEngine> ViewLayout<'_, E> {
    pub fn id(&self) -> ViewId {
        self.view
    }

    /// # Panics
    ///
    /// Panics if the view has no superview.
    fn superview(&self) -> ViewId {
        let tree = self.session.tree();
        match tree.superview(self.view) {
            Some(superview) => superview,
            None => panic!("{} has no superview", tree.describe(self.view)),
        }
    }

    fn make(&mut self, spec: ConstraintSpec) -> Constraint {
        self.session.make_constraint(spec)
    }

    // ------------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------------

    /// Pin top, bottom, leading and trailing to the superview
    pub fn pin_to_superview_edges(&mut self, insets: EdgeInsets) -> Vec<Constraint> {
        self.pin_edges_to_superview(&Edge::DEFAULT_PIN, insets)
    }

    /// Pin each of `edges` to the same edge of the superview, inset by the
    /// matching side of `insets`
    pub fn pin_edges_to_superview(
        &mut self,
        edges: &[Edge],
        insets: EdgeInsets,
    ) -> Vec<Constraint> {
        edges
            .iter()
            .map(|&edge| self.pin_to_superview_edge(edge, insets.inset_for(edge), Relation::Equal))
            .collect()
    }

    /// Pin `edge` to the superview's `edge`, `inset` points inward
    ///
    /// For trailing, right and bottom the inset is negated and an inequality is
    /// flipped, so `>= 8` always means "at least 8 inside".
    pub fn pin_to_superview_edge(
        &mut self,
        edge: Edge,
        inset: f64,
        relation: Relation,
    ) -> Constraint {
        let superview = self.superview();
        let inversion = Inversion::for_side(edge);
        let attribute = edge_to_attribute(edge);
        self.make(
            ConstraintSpec::new(self.view, attribute)
                .to(superview, attribute)
                .relation(inversion.relation(relation))
                .constant(inversion.offset(inset)),
        )
    }

    // ------------------------------------------------------------------------
    // Margins
    // ------------------------------------------------------------------------

    pub fn pin_to_superview_margins(&mut self, relation: Relation) -> Vec<Constraint> {
        self.pin_margins_to_superview(&Margin::DEFAULT_PIN, relation)
    }

    pub fn pin_margins_to_superview(
        &mut self,
        margins: &[Margin],
        relation: Relation,
    ) -> Vec<Constraint> {
        margins
            .iter()
            .map(|&margin| self.pin_to_superview_margin(margin, relation))
            .collect()
    }

    /// Pin the default margins except `excluded`
    pub fn pin_to_superview_margins_excluding(
        &mut self,
        excluded: Margin,
        relation: Relation,
    ) -> Vec<Constraint> {
        let margins: Vec<Margin> = Margin::DEFAULT_PIN
            .into_iter()
            .filter(|&m| m != excluded)
            .collect();
        self.pin_margins_to_superview(&margins, relation)
    }

    /// Pin the view's edge to the superview's corresponding margin
    pub fn pin_to_superview_margin(&mut self, margin: Margin, relation: Relation) -> Constraint {
        let superview = self.superview();
        let inversion = Inversion::for_side(margin);
        self.make(
            ConstraintSpec::new(self.view, edge_to_attribute(margin_to_edge(margin)))
                .to(superview, margin_to_attribute(margin))
                .relation(inversion.relation(relation)),
        )
    }

    // ------------------------------------------------------------------------
    // Peers
    // ------------------------------------------------------------------------

    /// Relate `edge` to another view's `to_edge`; no inversion is applied
    pub fn pin_edge(
        &mut self,
        edge: Edge,
        to_edge: Edge,
        of: ViewId,
        offset: f64,
        relation: Relation,
    ) -> Constraint {
        self.make(
            ConstraintSpec::new(self.view, edge_to_attribute(edge))
                .to(of, edge_to_attribute(to_edge))
                .relation(relation)
                .constant(offset),
        )
    }

    /// Line up `edge` with the same edge of every view in `peers`
    ///
    /// # Panics
    ///
    /// Panics if `peers` is empty.
    pub fn pin_edge_to_all(&mut self, edge: Edge, peers: &[ViewId]) -> Vec<Constraint> {
        assert!(
            !peers.is_empty(),
            "pinning the {} edge of {} needs at least one peer view",
            edge_to_attribute(edge),
            self.session.tree().describe(self.view)
        );
        peers
            .iter()
            .map(|&peer| self.pin_edge(edge, edge, peer, 0.0, Relation::Equal))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Safe area
    // ------------------------------------------------------------------------

    /// Pin `edges` to the safe area of `container`; an empty slice pins
    /// [`Edge::DEFAULT_SAFE_AREA`]
    pub fn pin_to_safe_area(&mut self, edges: &[Edge], container: ViewId) -> Vec<Constraint> {
        let defaults = Edge::DEFAULT_SAFE_AREA;
        let edges = if edges.is_empty() { &defaults[..] } else { edges };
        let guides = self.session.tree().safe_area_guides(container);
        edges
            .iter()
            .map(|&edge| self.pin_to_guide(guides, edge, edge, 0.0, Relation::Equal))
            .collect()
    }

    pub fn pin_edge_to_safe_area(
        &mut self,
        edge: Edge,
        to_edge: Edge,
        container: ViewId,
        inset: f64,
        relation: Relation,
    ) -> Constraint {
        let guides = self.session.tree().safe_area_guides(container);
        self.pin_to_guide(guides, edge, to_edge, inset, relation)
    }

    pub fn pin_to_top_layout_guide(&mut self, container: ViewId) -> Constraint {
        self.pin_edge_to_safe_area(Edge::Top, Edge::Top, container, 0.0, Relation::Equal)
    }

    fn pin_to_guide(
        &mut self,
        guides: SafeAreaGuides,
        edge: Edge,
        to_edge: Edge,
        inset: f64,
        relation: Relation,
    ) -> Constraint {
        let target = guides.item_for(to_edge);
        let inversion = Inversion::for_side(to_edge);
        self.make(
            ConstraintSpec::new(self.view, edge_to_attribute(edge))
                .to(target, edge_to_attribute(to_edge))
                .relation(inversion.relation(relation))
                .constant(inversion.offset(inset)),
        )
    }

    // ------------------------------------------------------------------------
    // Axes
    // ------------------------------------------------------------------------

    pub fn center_in_superview(&mut self) -> Vec<Constraint> {
        vec![
            self.align_to_superview_axis(Axis::Vertical, 0.0),
            self.align_to_superview_axis(Axis::Horizontal, 0.0),
        ]
    }

    pub fn center_in_superview_margins(&mut self) -> Vec<Constraint> {
        vec![
            self.align_to_superview_margin_axis(Axis::Vertical, 0.0),
            self.align_to_superview_margin_axis(Axis::Horizontal, 0.0),
        ]
    }

    pub fn align_to_superview_axis(&mut self, axis: Axis, offset: f64) -> Constraint {
        self.align_superview_attribute(axis_to_attribute(axis, false), offset)
    }

    pub fn align_to_superview_margin_axis(&mut self, axis: Axis, offset: f64) -> Constraint {
        self.align_superview_attribute(axis_to_attribute(axis, true), offset)
    }

    fn align_superview_attribute(&mut self, attribute: Attribute, offset: f64) -> Constraint {
        let superview = self.superview();
        self.make(
            ConstraintSpec::new(self.view, attribute)
                .to(superview, attribute)
                .constant(offset),
        )
    }

    /// Align `axis` with the same axis of a peer view
    pub fn align_axis(&mut self, axis: Axis, with: ViewId, offset: f64) -> Constraint {
        let attribute = axis_to_attribute(axis, false);
        self.make(
            ConstraintSpec::new(self.view, attribute)
                .to(with, attribute)
                .constant(offset),
        )
    }

    /// Align both axes with a peer view
    pub fn align_with(&mut self, other: ViewId) -> Vec<Constraint> {
        vec![
            self.align_axis(Axis::Horizontal, other, 0.0),
            self.align_axis(Axis::Vertical, other, 0.0),
        ]
    }

    // ------------------------------------------------------------------------
    // Dimensions
    // ------------------------------------------------------------------------

    pub fn set_width(&mut self, width: f64, relation: Relation) -> Constraint {
        self.make(
            ConstraintSpec::new(self.view, dimension_to_attribute(Dimension::Width))
                .relation(relation)
                .constant(width),
        )
    }

    pub fn set_height(&mut self, height: f64, relation: Relation) -> Constraint {
        self.make(
            ConstraintSpec::new(self.view, dimension_to_attribute(Dimension::Height))
                .relation(relation)
                .constant(height),
        )
    }

    pub fn set_size(&mut self, size: Size) -> Vec<Constraint> {
        vec![
            self.set_width(size.width, Relation::Equal),
            self.set_height(size.height, Relation::Equal),
        ]
    }

    /// `self.dimension relation of.to_dimension * multiplier + offset`
    pub fn match_dimension(
        &mut self,
        dimension: Dimension,
        to_dimension: Dimension,
        of: ViewId,
        offset: f64,
        multiplier: f64,
        relation: Relation,
    ) -> Constraint {
        self.make(
            ConstraintSpec::new(self.view, dimension_to_attribute(dimension))
                .to(of, dimension_to_attribute(to_dimension))
                .relation(relation)
                .multiplier(multiplier)
                .constant(offset),
        )
    }

    pub fn match_size(&mut self, of: ViewId) -> Vec<Constraint> {
        vec![
            self.match_dimension(Dimension::Width, Dimension::Width, of, 0.0, 1.0, Relation::Equal),
            self.match_dimension(
                Dimension::Height,
                Dimension::Height,
                of,
                0.0,
                1.0,
                Relation::Equal,
            ),
        ]
    }

    /// width = ratio * height
    pub fn set_aspect_ratio(&mut self, ratio: f64) -> Constraint {
        self.make(
            ConstraintSpec::new(self.view, dimension_to_attribute(Dimension::Width))
                .to(self.view, dimension_to_attribute(Dimension::Height))
                .multiplier(ratio),
        )
    }

    // ------------------------------------------------------------------------
    // Content priorities
    // ------------------------------------------------------------------------

    pub fn set_content_hugging_priority(&mut self, priority: Priority, axis: LayoutAxis) {
        self.session
            .tree_mut()
            .set_content_hugging_priority(self.view, axis, priority);
    }

    pub fn set_compression_resistance_priority(&mut self, priority: Priority, axis: LayoutAxis) {
        self.session
            .tree_mut()
            .set_compression_resistance_priority(self.view, axis, priority);
    }
}
