//! Constraint authoring on top of a layout engine
//!
//! Callers build a [`ViewTree`], open a [`LayoutSession`] over it and describe
//! the arrangement through [`ViewLayout`] relation builders. The session turns
//! each relation into a [`Constraint`] and hands it to a [`LayoutEngine`],
//! either immediately or as part of one batched activation.

pub mod attributes;
pub mod builders;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod inversion;
pub mod session;
pub mod solver;
pub mod tree;
pub mod types;

pub use attributes::{
    axis_to_attribute, dimension_to_attribute, edge_to_attribute, margin_to_attribute,
    margin_to_edge, Attribute, Axis, Dimension, Edge, LayoutAxis, Margin, Relation,
};
pub use builders::ViewLayout;
pub use config::{LayoutConfig, LayoutDirection};
pub use constraint::{Anchor, Constraint, ConstraintId, ConstraintSpec, LayoutItem, Priority};
pub use engine::{EngineCall, LayoutEngine, RecordingEngine};
pub use error::EngineError;
pub use inversion::{invert, should_invert, Inversion};
pub use session::{LayoutSession, Spacer, Wrapper};
pub use solver::{KasuariEngine, StrengthBand};
pub use tree::{SafeAreaGuides, ViewConfig, ViewId, ViewTree};
pub use types::{EdgeInsets, Rect, Size};
