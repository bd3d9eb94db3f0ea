//! Constraint engine backed by the kasuari Cassowary solver
//!
//! Every view gets four solver variables (x, y, width, height). Attributes are
//! expressed as linear expressions over those variables, so margins, safe-area
//! guides and the legacy top/bottom guides need no variables of their own.

use std::collections::HashMap;

use kasuari::{
    Constraint as SolverConstraint, Expression, Solver, Strength, Variable, WeightedRelation::*,
};
use tracing::{debug, trace, warn};

use super::attributes::{Attribute, LayoutAxis, Relation};
use super::config::LayoutDirection;
use super::constraint::{Anchor, Constraint, ConstraintId, LayoutItem, Priority};
use super::engine::LayoutEngine;
use super::error::EngineError;
use super::tree::{ViewId, ViewTree};
use super::types::{EdgeInsets, Rect};

/// Strength band a priority falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthBand {
    Weak,
    Medium,
    Strong,
    Required,
}

impl StrengthBand {
    /// Band for `priority`; only the order of priorities survives the mapping
    pub fn for_priority(priority: Priority) -> Self {
        let value = priority.value();
        if priority.is_required() {
            Self::Required
        } else if value >= 500.0 {
            Self::Strong
        } else if value >= 100.0 {
            Self::Medium
        } else {
            Self::Weak
        }
    }

    pub fn strength(self) -> Strength {
        match self {
            Self::Required => Strength::REQUIRED,
            Self::Strong => Strength::STRONG,
            Self::Medium => Strength::MEDIUM,
            Self::Weak => Strength::WEAK,
        }
    }
}

fn strength_for(priority: Priority) -> Strength {
    StrengthBand::for_priority(priority).strength()
}

#[derive(Debug, Clone, Copy)]
struct ViewVariables {
    x: Variable,
    y: Variable,
    width: Variable,
    height: Variable,
}

struct ViewState {
    vars: ViewVariables,
    /// Required constraints holding a translated frame in place
    frame_pins: Vec<SolverConstraint>,
    content_size_added: bool,
}

/// The four sides of a box as solver expressions
#[derive(Clone)]
struct BoxEdges {
    left: Expression,
    right: Expression,
    top: Expression,
    bottom: Expression,
}

impl BoxEdges {
    fn of(vars: ViewVariables) -> Self {
        Self {
            left: vars.x.into(),
            right: Expression::from(vars.x) + Expression::from(vars.width),
            top: vars.y.into(),
            bottom: Expression::from(vars.y) + Expression::from(vars.height),
        }
    }

    fn inset(self, insets: EdgeInsets) -> Self {
        Self {
            left: self.left + insets.left,
            right: self.right - insets.right,
            top: self.top + insets.top,
            bottom: self.bottom - insets.bottom,
        }
    }

    /// Margin attributes resolve like their plain counterparts; the caller
    /// has already inset the box by the margins
    ///
    /// Leading and trailing are positions along the reading direction. In
    /// right-to-left layouts that axis runs from right to left, so they are the
    /// negated right and left edges and a positive offset still moves toward
    /// the trailing side.
    fn resolve(self, attribute: Attribute, direction: LayoutDirection) -> Expression {
        let rtl = direction == LayoutDirection::RightToLeft;
        match attribute {
            Attribute::Top | Attribute::TopMargin => self.top,
            Attribute::Bottom | Attribute::BottomMargin => self.bottom,
            Attribute::Left | Attribute::LeftMargin => self.left,
            Attribute::Right | Attribute::RightMargin => self.right,
            Attribute::Leading | Attribute::LeadingMargin if rtl => self.right * -1.0,
            Attribute::Leading | Attribute::LeadingMargin => self.left,
            Attribute::Trailing | Attribute::TrailingMargin if rtl => self.left * -1.0,
            Attribute::Trailing | Attribute::TrailingMargin => self.right,
            Attribute::Width => self.right - self.left,
            Attribute::Height => self.bottom - self.top,
            Attribute::CenterX | Attribute::CenterXWithinMargins => (self.left + self.right) * 0.5,
            Attribute::CenterY | Attribute::CenterYWithinMargins => (self.top + self.bottom) * 0.5,
        }
    }
}

/// Layout engine that solves constraints into frames
pub struct KasuariEngine {
    solver: Solver,
    views: HashMap<ViewId, ViewState>,
    installed: HashMap<ConstraintId, SolverConstraint>,
    /// Latest solved value per variable; kasuari only reports changes
    values: HashMap<Variable, f64>,
    conflicts: Vec<EngineError>,
}

impl KasuariEngine {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            views: HashMap::new(),
            installed: HashMap::new(),
            values: HashMap::new(),
            conflicts: Vec::new(),
        }
    }

    /// Constraints the solver refused, in the order they were attempted
    pub fn conflicts(&self) -> &[EngineError] {
        &self.conflicts
    }

    pub fn is_installed(&self, id: ConstraintId) -> bool {
        self.installed.contains_key(&id)
    }

    /// The solved frame of `view`, or `None` if no active constraint touched it
    pub fn frame(&mut self, view: ViewId) -> Option<Rect> {
        let vars = self.views.get(&view)?.vars;
        self.refresh();
        Some(Rect::new(
            self.value(vars.x),
            self.value(vars.y),
            self.value(vars.width),
            self.value(vars.height),
        ))
    }

    fn refresh(&mut self) {
        for &(var, value) in self.solver.fetch_changes() {
            self.values.insert(var, value);
        }
    }

    fn value(&self, var: Variable) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }

    /// Get or create the variables for `view` and bring its implicit
    /// constraints in line with the tree
    fn sync_view(&mut self, tree: &ViewTree, view: ViewId) -> ViewVariables {
        let first_sight = !self.views.contains_key(&view);
        if first_sight {
            let vars = ViewVariables {
                x: Variable::new(),
                y: Variable::new(),
                width: Variable::new(),
                height: Variable::new(),
            };
            self.views.insert(
                view,
                ViewState {
                    vars,
                    frame_pins: Vec::new(),
                    content_size_added: false,
                },
            );
        }

        let translates = tree.translates_frame(view);
        if translates && first_sight {
            self.pin_frame(tree, view);
        } else if !translates {
            self.unpin_frame(view);
            self.add_content_size(tree, view);
        }

        self.views[&view].vars
    }

    fn pin_frame(&mut self, tree: &ViewTree, view: ViewId) {
        let frame = tree.frame(view);
        let Some(state) = self.views.get_mut(&view) else {
            return;
        };
        let vars = state.vars;
        let pins = [
            (vars.x, frame.x),
            (vars.y, frame.y),
            (vars.width, frame.width),
            (vars.height, frame.height),
        ];
        for (var, value) in pins {
            let pin = var | EQ(Strength::REQUIRED) | value;
            match self.solver.add_constraint(pin.clone()) {
                Ok(()) => state.frame_pins.push(pin),
                Err(e) => warn!("failed to pin frame of {}: {:?}", tree.describe(view), e),
            }
        }
        trace!("pinned translated frame of {}", tree.describe(view));
    }

    fn unpin_frame(&mut self, view: ViewId) {
        let Some(state) = self.views.get_mut(&view) else {
            return;
        };
        for pin in state.frame_pins.drain(..) {
            if let Err(e) = self.solver.remove_constraint(&pin) {
                warn!("failed to release frame pin of {}: {:?}", view, e);
            }
        }
    }

    /// Intrinsic size becomes a hugging upper bound and a compression lower
    /// bound on each axis
    fn add_content_size(&mut self, tree: &ViewTree, view: ViewId) {
        let Some(state) = self.views.get_mut(&view) else {
            return;
        };
        if state.content_size_added {
            return;
        }
        state.content_size_added = true;
        let Some(size) = tree.intrinsic_size(view) else {
            return;
        };
        let vars = state.vars;
        for (axis, var, intrinsic) in [
            (LayoutAxis::Horizontal, vars.width, size.width),
            (LayoutAxis::Vertical, vars.height, size.height),
        ] {
            let hugging = strength_for(tree.content_hugging_priority(view, axis));
            let compression = strength_for(tree.compression_resistance_priority(view, axis));
            for constraint in [
                var | LE(hugging) | intrinsic,
                var | GE(compression) | intrinsic,
            ] {
                if let Err(e) = self.solver.add_constraint(constraint) {
                    warn!(
                        "failed to add content size of {}: {:?}",
                        tree.describe(view),
                        e
                    );
                }
            }
        }
    }

    /// The edges of a layout item, derived from its owning view
    fn item_edges(&mut self, tree: &ViewTree, item: LayoutItem) -> BoxEdges {
        let vars = self.sync_view(tree, item.owner());
        let frame = BoxEdges::of(vars);
        match item {
            LayoutItem::View(_) => frame,
            LayoutItem::SafeArea(owner) => frame.inset(tree.safe_area_insets(owner)),
            LayoutItem::TopGuide(owner) => {
                let height = tree.safe_area_insets(owner).top;
                BoxEdges {
                    bottom: frame.top.clone() + height,
                    ..frame
                }
            }
            LayoutItem::BottomGuide(owner) => {
                let height = tree.safe_area_insets(owner).bottom;
                BoxEdges {
                    top: frame.bottom.clone() - height,
                    ..frame
                }
            }
        }
    }

    fn expression(&mut self, tree: &ViewTree, anchor: &Anchor) -> Expression {
        let mut edges = self.item_edges(tree, anchor.item);
        if anchor.attribute.is_margin_relative() {
            // Guides carry no margins of their own
            if let LayoutItem::View(view) = anchor.item {
                edges = edges.inset(tree.layout_margins(view));
            }
        }
        edges.resolve(anchor.attribute, tree.config().direction)
    }

    fn solver_constraint(&mut self, tree: &ViewTree, constraint: &Constraint) -> SolverConstraint {
        let strength = strength_for(constraint.priority);
        let relation = match constraint.relation {
            Relation::Equal => EQ(strength),
            Relation::LessThanOrEqual => LE(strength),
            Relation::GreaterThanOrEqual => GE(strength),
        };
        let lhs = self.expression(tree, &constraint.first);
        match &constraint.second {
            Some(second) => {
                let rhs = self.expression(tree, second) * constraint.multiplier
                    + constraint.constant;
                lhs | relation | rhs
            }
            None => lhs | relation | constraint.constant,
        }
    }

    /// Convert a kasuari error to an EngineError with context
    fn convert_kasuari_error(
        e: kasuari::AddConstraintError,
        constraint: &Constraint,
    ) -> EngineError {
        let description = constraint.to_string();
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => {
                EngineError::unsatisfiable(constraint.id(), description)
            }
            kasuari::AddConstraintError::DuplicateConstraint => {
                EngineError::duplicate(constraint.id(), description)
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                EngineError::internal(constraint.id(), description, msg.to_string())
            }
        }
    }
}

impl Default for KasuariEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine for KasuariEngine {
    fn activate(&mut self, tree: &ViewTree, constraints: &[Constraint]) {
        debug!(count = constraints.len(), "activating constraints");
        for constraint in constraints {
            if self.installed.contains_key(&constraint.id()) {
                continue;
            }
            let solver_constraint = self.solver_constraint(tree, constraint);
            match self.solver.add_constraint(solver_constraint.clone()) {
                Ok(()) => {
                    trace!("installed {}", constraint);
                    self.installed.insert(constraint.id(), solver_constraint);
                }
                Err(e) => {
                    let err = Self::convert_kasuari_error(e, constraint);
                    warn!("{}", err);
                    self.conflicts.push(err);
                }
            }
        }
    }

    fn deactivate(&mut self, _tree: &ViewTree, constraints: &[Constraint]) {
        debug!(count = constraints.len(), "deactivating constraints");
        for constraint in constraints {
            let Some(solver_constraint) = self.installed.remove(&constraint.id()) else {
                continue;
            };
            if let Err(e) = self.solver.remove_constraint(&solver_constraint) {
                warn!("failed to remove {}: {:?}", constraint, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::LayoutConfig;
    use crate::layout::constraint::ConstraintSpec;

    fn constraint(id: u64, spec: ConstraintSpec) -> Constraint {
        spec.build(ConstraintId(id))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.001,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_strength_bands_keep_order() {
        let band = StrengthBand::for_priority;
        assert_eq!(band(Priority::REQUIRED), StrengthBand::Required);
        assert_eq!(band(Priority::NEAR_REQUIRED), StrengthBand::Strong);
        assert_eq!(band(Priority::DEFAULT_HIGH), StrengthBand::Strong);
        assert_eq!(band(Priority::DEFAULT_LOW), StrengthBand::Medium);
        assert_eq!(band(Priority::FITTING_SIZE), StrengthBand::Weak);
        assert_eq!(band(Priority::MINIMAL), StrengthBand::Weak);
        assert!(band(Priority::NEAR_REQUIRED) > band(Priority::MINIMAL));
    }

    #[test]
    fn test_translated_frame_is_pinned() {
        let mut tree = ViewTree::default();
        let root = tree.add_root(Rect::new(10.0, 20.0, 300.0, 400.0));
        let child = tree.add_view();
        tree.add_subview(root, child);
        tree.set_translates_frame(child, false);

        let mut engine = KasuariEngine::new();
        let c = constraint(
            0,
            ConstraintSpec::new(child, Attribute::Width).to(root, Attribute::Width),
        );
        engine.activate(&tree, &[c]);

        let root_frame = engine.frame(root).unwrap();
        assert!(root_frame.approx_eq(&Rect::new(10.0, 20.0, 300.0, 400.0), 0.001));
        assert_close(engine.frame(child).unwrap().width, 300.0);
        assert!(engine.conflicts().is_empty());
    }

    #[test]
    fn test_margin_attribute_uses_layout_margins() {
        let mut tree = ViewTree::default();
        let root = tree.add_root(Rect::new(0.0, 0.0, 200.0, 100.0));
        tree.set_layout_margins(root, EdgeInsets::new(5.0, 10.0, 15.0, 20.0));
        let child = tree.add_view();
        tree.add_subview(root, child);
        tree.set_translates_frame(child, false);

        let mut engine = KasuariEngine::new();
        engine.activate(
            &tree,
            &[
                constraint(
                    0,
                    ConstraintSpec::new(child, Attribute::Left).to(root, Attribute::LeftMargin),
                ),
                constraint(
                    1,
                    ConstraintSpec::new(child, Attribute::Right)
                        .to(root, Attribute::RightMargin),
                ),
                constraint(
                    2,
                    ConstraintSpec::new(child, Attribute::Top).to(root, Attribute::TopMargin),
                ),
                constraint(
                    3,
                    ConstraintSpec::new(child, Attribute::Bottom)
                        .to(root, Attribute::BottomMargin),
                ),
            ],
        );

        let frame = engine.frame(child).unwrap();
        assert!(frame.approx_eq(&Rect::new(10.0, 5.0, 170.0, 80.0), 0.001));
    }

    #[test]
    fn test_right_to_left_leading() {
        let mut tree =
            ViewTree::new(LayoutConfig::default().with_direction(LayoutDirection::RightToLeft));
        let root = tree.add_root(Rect::new(0.0, 0.0, 200.0, 100.0));
        let child = tree.add_view();
        tree.add_subview(root, child);
        tree.set_translates_frame(child, false);

        let mut engine = KasuariEngine::new();
        engine.activate(
            &tree,
            &[
                constraint(
                    0,
                    ConstraintSpec::new(child, Attribute::Leading).to(root, Attribute::Leading),
                ),
                constraint(1, ConstraintSpec::new(child, Attribute::Width).constant(50.0)),
            ],
        );

        let frame = engine.frame(child).unwrap();
        assert_close(frame.x, 150.0);
        assert_close(frame.width, 50.0);
    }

    #[test]
    fn test_right_to_left_offsets_point_inward() {
        let mut tree =
            ViewTree::new(LayoutConfig::default().with_direction(LayoutDirection::RightToLeft));
        let root = tree.add_root(Rect::new(0.0, 0.0, 200.0, 100.0));
        let child = tree.add_view();
        tree.add_subview(root, child);
        tree.set_translates_frame(child, false);

        let mut engine = KasuariEngine::new();
        engine.activate(
            &tree,
            &[
                constraint(
                    0,
                    ConstraintSpec::new(child, Attribute::Leading)
                        .to(root, Attribute::Leading)
                        .constant(10.0),
                ),
                constraint(
                    1,
                    ConstraintSpec::new(child, Attribute::Trailing)
                        .to(root, Attribute::Trailing)
                        .constant(-30.0),
                ),
            ],
        );

        let frame = engine.frame(child).unwrap();
        assert_close(frame.right(), 190.0);
        assert_close(frame.x, 30.0);
    }

    #[test]
    fn test_conflict_is_recorded_not_fatal() {
        let mut tree = ViewTree::default();
        let view = tree.add_view();
        tree.set_translates_frame(view, false);

        let mut engine = KasuariEngine::new();
        let first = constraint(0, ConstraintSpec::new(view, Attribute::Width).constant(100.0));
        let second = constraint(1, ConstraintSpec::new(view, Attribute::Width).constant(200.0));
        engine.activate(&tree, &[first, second]);

        assert_eq!(engine.conflicts().len(), 1);
        assert!(matches!(
            engine.conflicts()[0],
            EngineError::Unsatisfiable { .. }
        ));
        assert!(engine.is_installed(ConstraintId(0)));
        assert!(!engine.is_installed(ConstraintId(1)));
        assert_close(engine.frame(view).unwrap().width, 100.0);
    }

    #[test]
    fn test_deactivate_releases_constraint() {
        let mut tree = ViewTree::default();
        let view = tree.add_view();
        tree.set_translates_frame(view, false);

        let mut engine = KasuariEngine::new();
        let wide = constraint(0, ConstraintSpec::new(view, Attribute::Width).constant(100.0));
        engine.activate(&tree, std::slice::from_ref(&wide));
        engine.deactivate(&tree, std::slice::from_ref(&wide));
        assert!(!engine.is_installed(wide.id()));

        let narrow = constraint(1, ConstraintSpec::new(view, Attribute::Width).constant(40.0));
        engine.activate(&tree, &[narrow]);
        assert!(engine.conflicts().is_empty());
        assert_close(engine.frame(view).unwrap().width, 40.0);
    }

    #[test]
    fn test_intrinsic_size_respects_priorities() {
        let mut tree = ViewTree::default();
        let root = tree.add_root(Rect::new(0.0, 0.0, 300.0, 100.0));
        let label = tree.add_view();
        tree.add_subview(root, label);
        tree.set_translates_frame(label, false);
        tree.set_intrinsic_size(label, Some(crate::layout::types::Size::new(80.0, 20.0)));

        let mut engine = KasuariEngine::new();
        engine.activate(
            &tree,
            &[
                constraint(
                    0,
                    ConstraintSpec::new(label, Attribute::Leading).to(root, Attribute::Leading),
                ),
                constraint(
                    1,
                    ConstraintSpec::new(label, Attribute::Top).to(root, Attribute::Top),
                ),
            ],
        );

        let frame = engine.frame(label).unwrap();
        assert_close(frame.width, 80.0);
        assert_close(frame.height, 20.0);
    }
}
