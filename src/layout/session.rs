//! Layout session: constraint factory and batch transactions
//!
//! A [`LayoutSession`] owns the view tree, the engine and the batch state for
//! one layout pass. In the default direct mode every constraint the factory
//! creates is activated right away. Inside [`LayoutSession::run_batched`] or
//! [`LayoutSession::create_without_installing`] constraints are buffered into a
//! single open transaction instead.
//!
//! All methods must be called from the thread that created the session.

use std::thread::{self, ThreadId};

use tracing::{debug, trace, warn};

use super::attributes::{Attribute, Margin, Relation};
use super::config::LayoutConfig;
use super::constraint::{Constraint, ConstraintId, ConstraintSpec, Priority};
use super::engine::LayoutEngine;
use super::solver::KasuariEngine;
use super::tree::{ViewId, ViewTree};
use super::types::{EdgeInsets, Rect};

/// Whether created constraints are installed or buffered
#[derive(Debug, Clone, PartialEq, Default)]
enum BatchState {
    #[default]
    Direct,
    Collecting(Vec<Constraint>),
}

/// An invisible view that only contributes size constraints
#[derive(Debug, Clone)]
pub struct Spacer {
    pub view: ViewId,
    pub constraints: Vec<Constraint>,
}

/// A container created around an existing view
#[derive(Debug, Clone)]
pub struct Wrapper {
    pub view: ViewId,
    pub constraints: Vec<Constraint>,
}

/// Owner of a view tree, an engine and the batch state for one layout pass
pub struct LayoutSession<E = KasuariEngine> {
    tree: ViewTree,
    engine: E,
    batch: BatchState,
    active: std::collections::HashSet<ConstraintId>,
    next_id: u64,
    thread: ThreadId,
}

impl<E: LayoutEngine> LayoutSession<E> {
    pub fn new(engine: E, config: LayoutConfig) -> Self {
        Self::with_tree(engine, ViewTree::new(config))
    }

    /// Start a session over an existing tree
    pub fn with_tree(engine: E, tree: ViewTree) -> Self {
        Self {
            tree,
            engine,
            batch: BatchState::Direct,
            active: Default::default(),
            next_id: 0,
            thread: thread::current().id(),
        }
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_parts(self) -> (ViewTree, E) {
        (self.tree, self.engine)
    }

    fn assert_layout_thread(&self) {
        assert!(
            thread::current().id() == self.thread,
            "layout APIs can only be used from the thread that created the session"
        );
    }

    // ========================================================================
    // Constraint factory
    // ========================================================================

    /// Build one constraint and register it with the batch state
    ///
    /// If the first item is a view, its frame stops being translated into
    /// constraints. The constraint is returned as built; no inversion is applied.
    ///
    /// # Panics
    ///
    /// Panics when called from a thread other than the one that created the session.
    pub fn make_constraint(&mut self, spec: ConstraintSpec) -> Constraint {
        self.assert_layout_thread();

        let id = ConstraintId(self.next_id);
        self.next_id += 1;
        let constraint = spec.build(id);

        if let Some(view) = constraint.first.item.as_view() {
            self.tree.set_translates_frame(view, false);
        }
        trace!("created {}", constraint);

        self.register(&constraint);
        constraint
    }

    fn register(&mut self, constraint: &Constraint) {
        if let BatchState::Collecting(buffer) = &mut self.batch {
            buffer.push(constraint.clone());
            return;
        }
        self.activate(std::slice::from_ref(constraint));
    }

    // ========================================================================
    // Batch transactions
    // ========================================================================

    pub fn is_collecting(&self) -> bool {
        matches!(self.batch, BatchState::Collecting(_))
    }

    /// Open a transaction; constraints created until [`end_collecting`](Self::end_collecting)
    /// are buffered rather than installed
    ///
    /// # Panics
    ///
    /// Panics if a transaction is already open. Nesting is not supported.
    pub fn begin_collecting(&mut self) {
        self.assert_layout_thread();
        assert!(
            !self.is_collecting(),
            "batch constraint creation cannot be nested"
        );
        debug!("begin collecting constraints");
        self.batch = BatchState::Collecting(Vec::new());
    }

    /// Close the open transaction and return what it buffered
    ///
    /// # Panics
    ///
    /// Panics if no transaction is open.
    pub fn end_collecting(&mut self) -> Vec<Constraint> {
        match std::mem::take(&mut self.batch) {
            BatchState::Collecting(constraints) => {
                debug!(count = constraints.len(), "end collecting constraints");
                constraints
            }
            BatchState::Direct => panic!("end_collecting called without an open transaction"),
        }
    }

    fn collect(&mut self, body: impl FnOnce(&mut Self)) -> Vec<Constraint> {
        self.begin_collecting();
        let guard = CollectGuard { session: self };
        body(&mut *guard.session);
        guard.finish()
    }

    /// Create every constraint in `body` and activate them together in one
    /// engine call
    pub fn run_batched(&mut self, body: impl FnOnce(&mut Self)) -> Vec<Constraint> {
        let constraints = self.collect(body);
        self.activate(&constraints);
        constraints
    }

    /// Like [`run_batched`](Self::run_batched), for bodies that can fail
    ///
    /// On error nothing is activated, the transaction is discarded and the
    /// session is back in direct mode.
    pub fn try_run_batched<Err>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<(), Err>,
    ) -> Result<Vec<Constraint>, Err> {
        let mut outcome = Ok(());
        let constraints = self.collect(|session| outcome = body(session));
        match outcome {
            Ok(()) => {
                self.activate(&constraints);
                Ok(constraints)
            }
            Err(e) => {
                debug!(
                    count = constraints.len(),
                    "discarding batch after failed body"
                );
                Err(e)
            }
        }
    }

    /// Create every constraint in `body` without installing any of them
    pub fn create_without_installing(&mut self, body: impl FnOnce(&mut Self)) -> Vec<Constraint> {
        self.collect(body)
    }

    // ========================================================================
    // Installation
    // ========================================================================

    pub fn activate(&mut self, constraints: &[Constraint]) {
        self.assert_layout_thread();
        if constraints.is_empty() {
            return;
        }
        self.engine.activate(&self.tree, constraints);
        self.active.extend(constraints.iter().map(|c| c.id()));
    }

    pub fn deactivate(&mut self, constraints: &[Constraint]) {
        self.assert_layout_thread();
        let active: Vec<Constraint> = constraints
            .iter()
            .filter(|c| self.active.contains(&c.id()))
            .cloned()
            .collect();
        if active.is_empty() {
            return;
        }
        self.engine.deactivate(&self.tree, &active);
        for c in &active {
            self.active.remove(&c.id());
        }
    }

    pub fn is_active(&self, constraint: &Constraint) -> bool {
        self.active.contains(&constraint.id())
    }

    /// Change a constraint's priority
    ///
    /// Active constraints are updated in the engine. Inside an open
    /// transaction the buffered copy is updated too, so the batch activates
    /// the new value.
    pub fn set_priority(&mut self, constraint: &mut Constraint, priority: Priority) {
        let previous = constraint.clone();
        constraint.priority = priority;
        self.sync_changed(&previous, constraint);
    }

    /// Change a constraint's constant; see [`set_priority`](Self::set_priority)
    pub fn set_constant(&mut self, constraint: &mut Constraint, constant: f64) {
        let previous = constraint.clone();
        constraint.constant = constant;
        self.sync_changed(&previous, constraint);
    }

    /// Label a constraint for diagnostics
    pub fn set_identifier(&mut self, constraint: &mut Constraint, identifier: impl Into<String>) {
        let previous = constraint.clone();
        constraint.identifier = Some(identifier.into());
        self.sync_changed(&previous, constraint);
    }

    fn sync_changed(&mut self, previous: &Constraint, updated: &Constraint) {
        self.assert_layout_thread();
        if let BatchState::Collecting(buffer) = &mut self.batch {
            if let Some(buffered) = buffer.iter_mut().find(|c| c.id() == updated.id()) {
                *buffered = updated.clone();
            }
        }
        if self.is_active(previous) {
            self.engine.update(&self.tree, previous, updated);
        }
    }

    // ========================================================================
    // Spacers and wrappers
    // ========================================================================

    /// A spacer with a fixed height and a negligible width
    pub fn spacer_height(&mut self, height: f64) -> Spacer {
        let view = self.tree.add_view();
        let constraints = vec![
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Height)
                    .constant(height)
                    .priority(Priority::NEAR_REQUIRED),
            ),
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Width)
                    .constant(1.0)
                    .priority(Priority::MINIMAL),
            ),
        ];
        Spacer { view, constraints }
    }

    /// A spacer with a fixed width and a negligible height
    pub fn spacer_width(&mut self, width: f64) -> Spacer {
        let view = self.tree.add_view();
        let constraints = vec![
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Width)
                    .constant(width)
                    .priority(Priority::NEAR_REQUIRED),
            ),
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Height)
                    .constant(1.0)
                    .priority(Priority::MINIMAL),
            ),
        ];
        Spacer { view, constraints }
    }

    /// A spacer at least `width` wide that only weakly prefers that exact width
    pub fn spacer_min_width(&mut self, width: f64) -> Spacer {
        let view = self.tree.add_view();
        let constraints = vec![
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Width)
                    .relation(Relation::GreaterThanOrEqual)
                    .constant(width),
            ),
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Width)
                    .constant(width)
                    .priority(Priority::MINIMAL),
            ),
            self.make_constraint(
                ConstraintSpec::new(view, Attribute::Height)
                    .constant(1.0)
                    .priority(Priority::MINIMAL),
            ),
        ];
        Spacer { view, constraints }
    }

    /// Wrap `view` in a new container whose layout margins are `insets`
    ///
    /// The wrapper is detached; `view` leaves its previous superview.
    pub fn wrapped(&mut self, view: ViewId, insets: EdgeInsets) -> Wrapper {
        let wrapper = self.tree.add_view();
        self.tree.set_layout_margins(wrapper, insets);
        self.tree.add_subview(wrapper, view);
        let constraints = self
            .view(view)
            .pin_margins_to_superview(&Margin::DEFAULT_PIN, Relation::Equal);
        Wrapper {
            view: wrapper,
            constraints,
        }
    }
}

impl LayoutSession<KasuariEngine> {
    /// Solved frame of `view`; views the engine never saw keep their tree frame
    pub fn frame(&mut self, view: ViewId) -> Rect {
        self.engine
            .frame(view)
            .unwrap_or_else(|| self.tree.frame(view))
    }

    /// Write solved frames back into the tree for every view that no longer
    /// translates its frame
    pub fn layout_if_needed(&mut self) {
        let ids: Vec<ViewId> = self.tree.ids().collect();
        for id in ids {
            if self.tree.translates_frame(id) {
                continue;
            }
            if let Some(frame) = self.engine.frame(id) {
                self.tree.set_frame(id, frame);
            }
        }
    }
}

impl Default for LayoutSession<KasuariEngine> {
    fn default() -> Self {
        Self::new(KasuariEngine::new(), LayoutConfig::default())
    }
}

/// Returns the session to direct mode if a collecting body unwinds
struct CollectGuard<'a, E> {
    session: &'a mut LayoutSession<E>,
}

impl<E> CollectGuard<'_, E> {
    fn finish(self) -> Vec<Constraint> {
        match std::mem::take(&mut self.session.batch) {
            BatchState::Collecting(constraints) => {
                debug!(count = constraints.len(), "end collecting constraints");
                constraints
            }
            BatchState::Direct => Vec::new(),
        }
    }
}

impl<E> Drop for CollectGuard<'_, E> {
    fn drop(&mut self) {
        if let BatchState::Collecting(constraints) = std::mem::take(&mut self.session.batch) {
            warn!(
                count = constraints.len(),
                "batch body did not complete; discarding collected constraints"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::{EngineCall, RecordingEngine};

    fn session() -> LayoutSession<RecordingEngine> {
        LayoutSession::new(RecordingEngine::new(), LayoutConfig::default())
    }

    #[test]
    fn test_direct_mode_activates_each_constraint() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let a = session.make_constraint(ConstraintSpec::new(view, Attribute::Width).constant(10.0));
        let b = session.make_constraint(ConstraintSpec::new(view, Attribute::Height).constant(5.0));

        assert_eq!(
            session.engine().calls(),
            &[
                EngineCall::Activate(vec![a.id()]),
                EngineCall::Activate(vec![b.id()]),
            ]
        );
        assert!(session.is_active(&a));
        assert!(session.is_active(&b));
    }

    #[test]
    fn test_factory_clears_translation_flag_on_first_item_only() {
        let mut session = session();
        let root = session.tree_mut().add_root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = session.tree_mut().add_view();
        session.tree_mut().add_subview(root, child);

        session.make_constraint(
            ConstraintSpec::new(child, Attribute::Top).to(root, Attribute::Top),
        );

        assert!(!session.tree().translates_frame(child));
        assert!(session.tree().translates_frame(root));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let a = session.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        let b = session.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_begin_and_end_collecting() {
        let mut session = session();
        let view = session.tree_mut().add_view();

        session.begin_collecting();
        assert!(session.is_collecting());
        let c = session.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        let collected = session.end_collecting();

        assert!(!session.is_collecting());
        assert_eq!(collected, vec![c.clone()]);
        assert!(!session.is_active(&c));
        assert!(session.engine().calls().is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot be nested")]
    fn test_nested_begin_panics() {
        let mut session = session();
        session.begin_collecting();
        session.begin_collecting();
    }

    #[test]
    #[should_panic(expected = "without an open transaction")]
    fn test_end_without_begin_panics() {
        let mut session = session();
        session.end_collecting();
    }

    #[test]
    fn test_create_without_installing_activates_nothing() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let constraints = session.create_without_installing(|s| {
            s.make_constraint(ConstraintSpec::new(view, Attribute::Width).constant(1.0));
            s.make_constraint(ConstraintSpec::new(view, Attribute::Height).constant(2.0));
        });

        assert_eq!(constraints.len(), 2);
        assert!(session.engine().calls().is_empty());
        assert!(!session.is_collecting());

        session.activate(&constraints);
        assert_eq!(session.engine().activation_count(), 1);
        assert!(constraints.iter().all(|c| session.is_active(c)));
    }

    #[test]
    fn test_try_run_batched_error_discards_batch() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let result: Result<Vec<Constraint>, String> = session.try_run_batched(|s| {
            s.make_constraint(ConstraintSpec::new(view, Attribute::Width));
            Err("bad input".to_string())
        });

        assert_eq!(result.unwrap_err(), "bad input");
        assert!(!session.is_collecting());
        assert!(session.engine().calls().is_empty());

        // Direct mode works again afterwards
        session.make_constraint(ConstraintSpec::new(view, Attribute::Height));
        assert_eq!(session.engine().activation_count(), 1);
    }

    #[test]
    fn test_deactivate_only_touches_active_constraints() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let inert = session.create_without_installing(|s| {
            s.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        });
        session.deactivate(&inert);
        assert!(session.engine().calls().is_empty());

        let live = session.make_constraint(ConstraintSpec::new(view, Attribute::Height));
        session.deactivate(std::slice::from_ref(&live));
        assert!(!session.is_active(&live));
        assert_eq!(
            session.engine().calls().last(),
            Some(&EngineCall::Deactivate(vec![live.id()]))
        );
    }

    #[test]
    fn test_set_priority_updates_active_constraint() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let mut c = session.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        session.engine_mut().clear();

        session.set_priority(&mut c, Priority::DEFAULT_LOW);

        assert_eq!(c.priority, Priority::DEFAULT_LOW);
        assert_eq!(
            session.engine().calls(),
            &[
                EngineCall::Deactivate(vec![c.id()]),
                EngineCall::Activate(vec![c.id()]),
            ]
        );
    }

    #[test]
    fn test_set_constant_on_inert_constraint_skips_engine() {
        let mut session = session();
        let view = session.tree_mut().add_view();
        let mut constraints = session.create_without_installing(|s| {
            s.make_constraint(ConstraintSpec::new(view, Attribute::Width));
        });
        session.set_constant(&mut constraints[0], 42.0);
        assert_eq!(constraints[0].constant, 42.0);
        assert!(session.engine().calls().is_empty());
    }

    #[test]
    fn test_spacer_height() {
        let mut session = session();
        let spacer = session.spacer_height(20.0);

        assert_eq!(spacer.constraints.len(), 2);
        let height = &spacer.constraints[0];
        assert_eq!(height.first.attribute, Attribute::Height);
        assert_eq!(height.constant, 20.0);
        assert_eq!(height.priority, Priority::NEAR_REQUIRED);
        let width = &spacer.constraints[1];
        assert_eq!(width.first.attribute, Attribute::Width);
        assert_eq!(width.constant, 1.0);
        assert_eq!(width.priority, Priority::MINIMAL);
        assert!(height.priority > width.priority);
        assert!(!session.tree().translates_frame(spacer.view));
    }

    #[test]
    fn test_spacer_min_width() {
        let mut session = session();
        let spacer = session.spacer_min_width(12.0);

        assert_eq!(spacer.constraints.len(), 3);
        let minimum = &spacer.constraints[0];
        assert_eq!(minimum.relation, Relation::GreaterThanOrEqual);
        assert!(minimum.priority.is_required());
        let hint = &spacer.constraints[1];
        assert_eq!(hint.relation, Relation::Equal);
        assert_eq!(hint.constant, 12.0);
        assert_eq!(hint.priority, Priority::MINIMAL);
    }

    #[test]
    fn test_wrapped_pins_view_to_wrapper_margins() {
        let mut session = session();
        let content = session.tree_mut().add_view();
        let wrapper = session.wrapped(content, EdgeInsets::all(6.0));

        assert_eq!(session.tree().superview(content), Some(wrapper.view));
        assert_eq!(
            session.tree().layout_margins(wrapper.view),
            EdgeInsets::all(6.0)
        );
        assert_eq!(wrapper.constraints.len(), 4);
        assert_eq!(session.engine().activation_count(), 4);
    }
}
