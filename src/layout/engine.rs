//! Boundary to the constraint engine
//!
//! The authoring layer never solves anything itself. It hands finished
//! constraints to a [`LayoutEngine`] for activation and deactivation.

use super::constraint::{Constraint, ConstraintId};
use super::tree::ViewTree;

/// A constraint engine driven through activation and deactivation
pub trait LayoutEngine {
    /// Install `constraints` in one pass
    fn activate(&mut self, tree: &ViewTree, constraints: &[Constraint]);

    /// Remove previously activated `constraints`
    fn deactivate(&mut self, tree: &ViewTree, constraints: &[Constraint]);

    /// Replace an active constraint with a changed copy of itself
    fn update(&mut self, tree: &ViewTree, previous: &Constraint, updated: &Constraint) {
        self.deactivate(tree, std::slice::from_ref(previous));
        self.activate(tree, std::slice::from_ref(updated));
    }
}

/// A call made against a [`RecordingEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Activate(Vec<ConstraintId>),
    Deactivate(Vec<ConstraintId>),
}

/// Engine that solves nothing and records every call it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Number of activation calls, regardless of how many constraints each carried
    pub fn activation_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Activate(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl LayoutEngine for RecordingEngine {
    fn activate(&mut self, _tree: &ViewTree, constraints: &[Constraint]) {
        self.calls
            .push(EngineCall::Activate(constraints.iter().map(|c| c.id()).collect()));
    }

    fn deactivate(&mut self, _tree: &ViewTree, constraints: &[Constraint]) {
        self.calls
            .push(EngineCall::Deactivate(constraints.iter().map(|c| c.id()).collect()));
    }
}
