//! Constraint Kit - semantic constraint authoring for view layouts
//!
//! This library lets callers describe view arrangement with edges, margins,
//! centering axes, dimensions and aspect ratios instead of raw constraints.
//! Constraints are created directly or collected into a single batched
//! activation, and can be solved into frames with the bundled
//! [`KasuariEngine`].
//!
//! # Example
//!
//! ```rust
//! use constraint_kit::{EdgeInsets, LayoutSession, Rect};
//!
//! let mut session = LayoutSession::default();
//! let root = session.tree_mut().add_root(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let child = session.tree_mut().add_view();
//! session.tree_mut().add_subview(root, child);
//!
//! session.view(child).pin_to_superview_edges(EdgeInsets::all(10.0));
//!
//! let frame = session.frame(child);
//! assert!(frame.approx_eq(&Rect::new(10.0, 10.0, 180.0, 80.0), 1e-6));
//! ```

pub mod error;
pub mod layout;
pub mod scene;

pub use error::SceneError;
pub use layout::{
    Attribute, Axis, Constraint, ConstraintSpec, Dimension, Edge, EdgeInsets, EngineError,
    KasuariEngine, LayoutAxis, LayoutConfig, LayoutDirection, LayoutEngine, LayoutItem,
    LayoutSession, Margin, Priority, Rect, RecordingEngine, Relation, Size, ViewConfig, ViewId,
    ViewLayout, ViewTree,
};
pub use scene::{Scene, SolvedScene};
