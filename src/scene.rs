//! Scene files: a view tree and its relations described in TOML
//!
//! ```toml
//! batch = true
//!
//! [layout]
//! direction = "ltr"
//!
//! [[view]]
//! name = "root"
//! frame = [0, 0, 320, 480]
//! safe_area_insets = { top = 20, bottom = 34 }
//!
//! [[view]]
//! name = "card"
//! parent = "root"
//!
//! [[constraint]]
//! op = "pin-to-safe-area"
//! view = "card"
//! container = "root"
//! ```
//!
//! Every `[[constraint]]` entry names one relation builder through its `op`
//! field. Views are referenced by name.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SceneError;
use crate::layout::{
    Axis, Constraint, Dimension, Edge, EdgeInsets, EngineError, KasuariEngine, LayoutConfig,
    LayoutEngine, LayoutSession, Margin, Priority, Rect, Relation, Size, ViewConfig, ViewId,
};

/// A parsed scene file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub layout: LayoutConfig,
    /// Author every constraint in one transaction and activate them together
    pub batch: bool,
    #[serde(rename = "view")]
    pub views: Vec<SceneView>,
    #[serde(rename = "constraint")]
    pub constraints: Vec<SceneConstraint>,
}

/// A `[[view]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct SceneView {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Frame in absolute coordinates
    #[serde(default)]
    pub frame: Option<Rect>,
    #[serde(flatten)]
    pub config: ViewConfig,
}

/// A `[[constraint]]` entry: one relation plus optional overrides applied to
/// every constraint it creates
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConstraint {
    #[serde(flatten)]
    pub op: SceneOp,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// One relation builder call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum SceneOp {
    PinToSuperviewEdges {
        view: String,
        #[serde(default)]
        edges: Option<Vec<Edge>>,
        #[serde(default)]
        insets: EdgeInsets,
    },
    PinToSuperviewEdge {
        view: String,
        edge: Edge,
        #[serde(default)]
        inset: f64,
        #[serde(default)]
        relation: Relation,
    },
    PinToSuperviewMargins {
        view: String,
        #[serde(default)]
        margins: Option<Vec<Margin>>,
        #[serde(default)]
        excluding: Option<Margin>,
        #[serde(default)]
        relation: Relation,
    },
    PinToSuperviewMargin {
        view: String,
        margin: Margin,
        #[serde(default)]
        relation: Relation,
    },
    PinEdge {
        view: String,
        edge: Edge,
        #[serde(default)]
        to_edge: Option<Edge>,
        of: String,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        relation: Relation,
    },
    PinEdgeToAll {
        view: String,
        edge: Edge,
        peers: Vec<String>,
    },
    PinToSafeArea {
        view: String,
        container: String,
        #[serde(default)]
        edges: Vec<Edge>,
    },
    PinEdgeToSafeArea {
        view: String,
        edge: Edge,
        #[serde(default)]
        to_edge: Option<Edge>,
        container: String,
        #[serde(default)]
        inset: f64,
        #[serde(default)]
        relation: Relation,
    },
    PinToTopLayoutGuide {
        view: String,
        container: String,
    },
    CenterInSuperview {
        view: String,
        #[serde(default)]
        within_margins: bool,
    },
    AlignToSuperviewAxis {
        view: String,
        axis: Axis,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        within_margins: bool,
    },
    AlignAxis {
        view: String,
        axis: Axis,
        with: String,
        #[serde(default)]
        offset: f64,
    },
    AlignWith {
        view: String,
        other: String,
    },
    SetWidth {
        view: String,
        value: f64,
        #[serde(default)]
        relation: Relation,
    },
    SetHeight {
        view: String,
        value: f64,
        #[serde(default)]
        relation: Relation,
    },
    SetSize {
        view: String,
        size: Size,
    },
    MatchDimension {
        view: String,
        dimension: Dimension,
        #[serde(default)]
        to_dimension: Option<Dimension>,
        of: String,
        #[serde(default)]
        offset: f64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
        #[serde(default)]
        relation: Relation,
    },
    MatchSize {
        view: String,
        of: String,
    },
    SetAspectRatio {
        view: String,
        ratio: f64,
    },
    SpacerHeight {
        name: String,
        value: f64,
        #[serde(default)]
        parent: Option<String>,
    },
    SpacerWidth {
        name: String,
        value: f64,
        #[serde(default)]
        parent: Option<String>,
    },
    SpacerMinWidth {
        name: String,
        value: f64,
        #[serde(default)]
        parent: Option<String>,
    },
    /// Wrap `view` in a new container named `name` that takes its place
    Wrap {
        view: String,
        name: String,
        #[serde(default)]
        insets: EdgeInsets,
    },
}

fn default_multiplier() -> f64 {
    1.0
}

impl SceneOp {
    /// The `op` tag as written in scene files
    pub fn name(&self) -> &'static str {
        match self {
            SceneOp::PinToSuperviewEdges { .. } => "pin-to-superview-edges",
            SceneOp::PinToSuperviewEdge { .. } => "pin-to-superview-edge",
            SceneOp::PinToSuperviewMargins { .. } => "pin-to-superview-margins",
            SceneOp::PinToSuperviewMargin { .. } => "pin-to-superview-margin",
            SceneOp::PinEdge { .. } => "pin-edge",
            SceneOp::PinEdgeToAll { .. } => "pin-edge-to-all",
            SceneOp::PinToSafeArea { .. } => "pin-to-safe-area",
            SceneOp::PinEdgeToSafeArea { .. } => "pin-edge-to-safe-area",
            SceneOp::PinToTopLayoutGuide { .. } => "pin-to-top-layout-guide",
            SceneOp::CenterInSuperview { .. } => "center-in-superview",
            SceneOp::AlignToSuperviewAxis { .. } => "align-to-superview-axis",
            SceneOp::AlignAxis { .. } => "align-axis",
            SceneOp::AlignWith { .. } => "align-with",
            SceneOp::SetWidth { .. } => "set-width",
            SceneOp::SetHeight { .. } => "set-height",
            SceneOp::SetSize { .. } => "set-size",
            SceneOp::MatchDimension { .. } => "match-dimension",
            SceneOp::MatchSize { .. } => "match-size",
            SceneOp::SetAspectRatio { .. } => "set-aspect-ratio",
            SceneOp::SpacerHeight { .. } => "spacer-height",
            SceneOp::SpacerWidth { .. } => "spacer-width",
            SceneOp::SpacerMinWidth { .. } => "spacer-min-width",
            SceneOp::Wrap { .. } => "wrap",
        }
    }
}

/// Frames and diagnostics of a solved scene
#[derive(Debug, Clone)]
pub struct SolvedScene {
    /// Named views in creation order
    pub frames: Vec<(String, Rect)>,
    pub constraints: Vec<Constraint>,
    /// Constraints the solver could not satisfy
    pub conflicts: Vec<EngineError>,
}

impl SolvedScene {
    pub fn frame(&self, name: &str) -> Option<Rect> {
        self.frames
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, frame)| *frame)
    }
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the scene into a fresh session and solve it
    pub fn solve(&self) -> Result<SolvedScene, SceneError> {
        let mut session = LayoutSession::new(KasuariEngine::new(), self.layout.clone());
        let constraints = self.author(&mut session)?;
        session.layout_if_needed();

        let tree = session.tree();
        let frames = tree
            .ids()
            .filter_map(|id| Some((tree.name(id)?.to_string(), tree.frame(id))))
            .collect();
        let conflicts = session.engine().conflicts().to_vec();
        info!(
            views = tree.len(),
            constraints = constraints.len(),
            conflicts = conflicts.len(),
            "solved scene"
        );

        Ok(SolvedScene {
            frames,
            constraints,
            conflicts,
        })
    }

    /// Create the scene's views in `session` and author its constraints
    ///
    /// The session's own layout config applies; `self.layout` is only used by
    /// [`solve`](Self::solve).
    pub fn author<E: LayoutEngine>(
        &self,
        session: &mut LayoutSession<E>,
    ) -> Result<Vec<Constraint>, SceneError> {
        let mut names = Names::default();
        self.create_views(session, &mut names)?;

        if !self.batch {
            return self.author_constraints(session, &mut names);
        }

        session.try_run_batched(|s| self.author_constraints(s, &mut names).map(drop))
    }

    fn create_views<E: LayoutEngine>(
        &self,
        session: &mut LayoutSession<E>,
        names: &mut Names,
    ) -> Result<(), SceneError> {
        for view in &self.views {
            let tree = session.tree_mut();
            let id = tree.add_named(&view.name);
            names.define(&view.name, id)?;
            if let Some(frame) = view.frame {
                tree.set_frame(id, frame);
            }
            tree.configure(id, &view.config);
        }

        for view in &self.views {
            let Some(parent) = &view.parent else {
                continue;
            };
            let child = names.resolve(&view.name)?;
            let parent_id = names.resolve(parent)?;
            attach(session, child, parent_id, &view.name, parent)?;
        }
        debug!(count = self.views.len(), "created scene views");
        Ok(())
    }

    fn author_constraints<E: LayoutEngine>(
        &self,
        session: &mut LayoutSession<E>,
        names: &mut Names,
    ) -> Result<Vec<Constraint>, SceneError> {
        let mut authored = Vec::new();
        for entry in &self.constraints {
            let mut created = apply_op(session, names, &entry.op)?;
            for constraint in &mut created {
                if let Some(priority) = entry.priority {
                    session.set_priority(constraint, priority);
                }
                if let Some(identifier) = &entry.identifier {
                    session.set_identifier(constraint, identifier.clone());
                }
            }
            authored.extend(created);
        }
        Ok(authored)
    }
}

fn attach<E: LayoutEngine>(
    session: &mut LayoutSession<E>,
    child: ViewId,
    parent: ViewId,
    child_name: &str,
    parent_name: &str,
) -> Result<(), SceneError> {
    if session.tree().is_descendant(parent, child) {
        return Err(SceneError::ParentCycle {
            view: child_name.to_string(),
            parent: parent_name.to_string(),
        });
    }
    session.tree_mut().add_subview(parent, child);
    Ok(())
}

fn apply_op<E: LayoutEngine>(
    session: &mut LayoutSession<E>,
    names: &mut Names,
    op: &SceneOp,
) -> Result<Vec<Constraint>, SceneError> {
    let constraints = match op {
        SceneOp::PinToSuperviewEdges {
            view,
            edges,
            insets,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            let edges = edges.as_deref().unwrap_or(&Edge::DEFAULT_PIN);
            session.view(id).pin_edges_to_superview(edges, *insets)
        }
        SceneOp::PinToSuperviewEdge {
            view,
            edge,
            inset,
            relation,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            vec![session
                .view(id)
                .pin_to_superview_edge(*edge, *inset, *relation)]
        }
        SceneOp::PinToSuperviewMargins {
            view,
            margins,
            excluding,
            relation,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            let mut layout = session.view(id);
            match (margins, excluding) {
                (Some(margins), _) => layout.pin_margins_to_superview(margins, *relation),
                (None, Some(excluded)) => {
                    layout.pin_to_superview_margins_excluding(*excluded, *relation)
                }
                (None, None) => layout.pin_to_superview_margins(*relation),
            }
        }
        SceneOp::PinToSuperviewMargin {
            view,
            margin,
            relation,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            vec![session.view(id).pin_to_superview_margin(*margin, *relation)]
        }
        SceneOp::PinEdge {
            view,
            edge,
            to_edge,
            of,
            offset,
            relation,
        } => {
            let id = names.resolve(view)?;
            let of = names.resolve(of)?;
            vec![session.view(id).pin_edge(
                *edge,
                to_edge.unwrap_or(*edge),
                of,
                *offset,
                *relation,
            )]
        }
        SceneOp::PinEdgeToAll { view, edge, peers } => {
            let id = names.resolve(view)?;
            if peers.is_empty() {
                return Err(SceneError::EmptyPeers {
                    view: view.clone(),
                    op: op.name().to_string(),
                });
            }
            let peers = peers
                .iter()
                .map(|p| names.resolve(p))
                .collect::<Result<Vec<_>, _>>()?;
            session.view(id).pin_edge_to_all(*edge, &peers)
        }
        SceneOp::PinToSafeArea {
            view,
            container,
            edges,
        } => {
            let id = names.resolve(view)?;
            let container = names.resolve(container)?;
            session.view(id).pin_to_safe_area(edges, container)
        }
        SceneOp::PinEdgeToSafeArea {
            view,
            edge,
            to_edge,
            container,
            inset,
            relation,
        } => {
            let id = names.resolve(view)?;
            let container = names.resolve(container)?;
            vec![session.view(id).pin_edge_to_safe_area(
                *edge,
                to_edge.unwrap_or(*edge),
                container,
                *inset,
                *relation,
            )]
        }
        SceneOp::PinToTopLayoutGuide { view, container } => {
            let id = names.resolve(view)?;
            let container = names.resolve(container)?;
            vec![session.view(id).pin_to_top_layout_guide(container)]
        }
        SceneOp::CenterInSuperview {
            view,
            within_margins,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            if *within_margins {
                session.view(id).center_in_superview_margins()
            } else {
                session.view(id).center_in_superview()
            }
        }
        SceneOp::AlignToSuperviewAxis {
            view,
            axis,
            offset,
            within_margins,
        } => {
            let id = names.resolve_contained(session, view, op)?;
            let mut layout = session.view(id);
            if *within_margins {
                vec![layout.align_to_superview_margin_axis(*axis, *offset)]
            } else {
                vec![layout.align_to_superview_axis(*axis, *offset)]
            }
        }
        SceneOp::AlignAxis {
            view,
            axis,
            with,
            offset,
        } => {
            let id = names.resolve(view)?;
            let with = names.resolve(with)?;
            vec![session.view(id).align_axis(*axis, with, *offset)]
        }
        SceneOp::AlignWith { view, other } => {
            let id = names.resolve(view)?;
            let other = names.resolve(other)?;
            session.view(id).align_with(other)
        }
        SceneOp::SetWidth {
            view,
            value,
            relation,
        } => {
            let id = names.resolve(view)?;
            vec![session.view(id).set_width(*value, *relation)]
        }
        SceneOp::SetHeight {
            view,
            value,
            relation,
        } => {
            let id = names.resolve(view)?;
            vec![session.view(id).set_height(*value, *relation)]
        }
        SceneOp::SetSize { view, size } => {
            let id = names.resolve(view)?;
            session.view(id).set_size(*size)
        }
        SceneOp::MatchDimension {
            view,
            dimension,
            to_dimension,
            of,
            offset,
            multiplier,
            relation,
        } => {
            let id = names.resolve(view)?;
            let of = names.resolve(of)?;
            vec![session.view(id).match_dimension(
                *dimension,
                to_dimension.unwrap_or(*dimension),
                of,
                *offset,
                *multiplier,
                *relation,
            )]
        }
        SceneOp::MatchSize { view, of } => {
            let id = names.resolve(view)?;
            let of = names.resolve(of)?;
            session.view(id).match_size(of)
        }
        SceneOp::SetAspectRatio { view, ratio } => {
            let id = names.resolve(view)?;
            vec![session.view(id).set_aspect_ratio(*ratio)]
        }
        SceneOp::SpacerHeight {
            name,
            value,
            parent,
        } => {
            let spacer = session.spacer_height(*value);
            place_helper(session, names, spacer.view, name, parent.as_deref())?;
            spacer.constraints
        }
        SceneOp::SpacerWidth {
            name,
            value,
            parent,
        } => {
            let spacer = session.spacer_width(*value);
            place_helper(session, names, spacer.view, name, parent.as_deref())?;
            spacer.constraints
        }
        SceneOp::SpacerMinWidth {
            name,
            value,
            parent,
        } => {
            let spacer = session.spacer_min_width(*value);
            place_helper(session, names, spacer.view, name, parent.as_deref())?;
            spacer.constraints
        }
        SceneOp::Wrap { view, name, insets } => {
            let id = names.resolve(view)?;
            let previous_parent = session.tree().superview(id);
            let wrapper = session.wrapped(id, *insets);
            session.tree_mut().set_name(wrapper.view, name);
            names.define(name, wrapper.view)?;
            if let Some(parent) = previous_parent {
                session.tree_mut().add_subview(parent, wrapper.view);
            }
            wrapper.constraints
        }
    };
    Ok(constraints)
}

/// Name a view created by a session helper and attach it to `parent`
fn place_helper<E: LayoutEngine>(
    session: &mut LayoutSession<E>,
    names: &mut Names,
    view: ViewId,
    name: &str,
    parent: Option<&str>,
) -> Result<(), SceneError> {
    session.tree_mut().set_name(view, name);
    names.define(name, view)?;
    if let Some(parent) = parent {
        let parent_id = names.resolve(parent)?;
        attach(session, view, parent_id, name, parent)?;
    }
    Ok(())
}

/// View names defined so far
#[derive(Debug, Default)]
struct Names {
    ids: HashMap<String, ViewId>,
}

impl Names {
    fn define(&mut self, name: &str, id: ViewId) -> Result<(), SceneError> {
        if self.ids.contains_key(name) {
            return Err(SceneError::DuplicateView {
                name: name.to_string(),
            });
        }
        self.ids.insert(name.to_string(), id);
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<ViewId, SceneError> {
        self.ids.get(name).copied().ok_or_else(|| {
            let suggestions = find_similar(self.ids.keys().map(String::as_str), name, 2);
            SceneError::unknown(name, suggestions)
        })
    }

    /// Resolve a view that a superview-relative operation is applied to
    fn resolve_contained<E: LayoutEngine>(
        &self,
        session: &LayoutSession<E>,
        name: &str,
        op: &SceneOp,
    ) -> Result<ViewId, SceneError> {
        let id = self.resolve(name)?;
        if session.tree().superview(id).is_none() {
            return Err(SceneError::missing_superview(name, op.name()));
        }
        Ok(id)
    }
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Up to three defined names within `max_distance` edits of `target`, closest first
fn find_similar<'a>(
    defined: impl Iterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist > 0 && dist <= max_distance).then_some((name, dist))
        })
        .collect();

    candidates.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Attribute, EngineCall, LayoutDirection, RecordingEngine};
    use pretty_assertions::assert_eq;

    const CARD_SCENE: &str = r#"
        [layout]
        direction = "rtl"

        [[view]]
        name = "root"
        frame = [0, 0, 320, 480]

        [[view]]
        name = "card"
        parent = "root"
        intrinsic_size = [100, 40]
        hugging_vertical = 750

        [[constraint]]
        op = "pin-to-superview-edges"
        view = "card"
        edges = ["top", "leading"]
        insets = { top = 10, left = 12 }

        [[constraint]]
        op = "set-width"
        view = "card"
        value = 200
        relation = "greater-than-or-equal"
        priority = 999
        identifier = "card-min-width"
    "#;

    fn recording_session() -> LayoutSession<RecordingEngine> {
        LayoutSession::new(RecordingEngine::new(), LayoutConfig::default())
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("card", "card"), 0);
        assert_eq!(levenshtein_distance("card", "crad"), 2);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_orders_by_distance() {
        let names = ["card", "cart", "header"];
        let similar = find_similar(names.into_iter(), "carx", 2);
        assert_eq!(similar, vec!["card".to_string(), "cart".to_string()]);
    }

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_str(CARD_SCENE).unwrap();
        assert_eq!(scene.layout.direction, LayoutDirection::RightToLeft);
        assert!(!scene.batch);
        assert_eq!(scene.views.len(), 2);
        assert_eq!(scene.views[0].frame, Some(Rect::new(0.0, 0.0, 320.0, 480.0)));
        assert_eq!(scene.views[1].parent.as_deref(), Some("root"));
        assert_eq!(
            scene.views[1].config.intrinsic_size,
            Some(Size::new(100.0, 40.0))
        );
        assert_eq!(
            scene.views[1].config.hugging_vertical,
            Some(Priority::DEFAULT_HIGH)
        );

        assert_eq!(
            scene.constraints[0].op,
            SceneOp::PinToSuperviewEdges {
                view: "card".to_string(),
                edges: Some(vec![Edge::Top, Edge::Leading]),
                insets: EdgeInsets::new(10.0, 12.0, 0.0, 0.0),
            }
        );
        assert_eq!(scene.constraints[1].priority, Some(Priority::NEAR_REQUIRED));
        assert_eq!(
            scene.constraints[1].identifier.as_deref(),
            Some("card-min-width")
        );
    }

    #[test]
    fn test_author_direct_applies_overrides() {
        let scene = Scene::from_str(CARD_SCENE).unwrap();
        let mut session = recording_session();
        let constraints = scene.author(&mut session).unwrap();

        assert_eq!(constraints.len(), 3);
        let width = &constraints[2];
        assert_eq!(width.first.attribute, Attribute::Width);
        assert_eq!(width.priority, Priority::NEAR_REQUIRED);
        assert_eq!(width.identifier.as_deref(), Some("card-min-width"));
        assert!(session.is_active(width));
    }

    #[test]
    fn test_author_batch_activates_once() {
        let source = format!("batch = true\n{}", CARD_SCENE);
        let scene = Scene::from_str(&source).unwrap();
        let mut session = recording_session();
        let constraints = scene.author(&mut session).unwrap();

        let ids: Vec<_> = constraints.iter().map(|c| c.id()).collect();
        assert_eq!(session.engine().calls(), &[EngineCall::Activate(ids)]);
        assert_eq!(constraints[2].priority, Priority::NEAR_REQUIRED);
        assert_eq!(constraints[2].identifier.as_deref(), Some("card-min-width"));
        assert!(!session.is_collecting());
    }

    #[test]
    fn test_unknown_view_suggests_close_names() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "card"

            [[constraint]]
            op = "set-height"
            view = "crad"
            value = 10
            "#,
        )
        .unwrap();
        let err = scene.author(&mut recording_session()).unwrap_err();
        match err {
            SceneError::UnknownView { name, suggestions } => {
                assert_eq!(name, "crad");
                assert_eq!(suggestions, vec!["card".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_batch_leaves_session_direct() {
        let scene = Scene::from_str(
            r#"
            batch = true

            [[view]]
            name = "card"

            [[constraint]]
            op = "set-height"
            view = "card"
            value = 10

            [[constraint]]
            op = "set-width"
            view = "missing"
            value = 10
            "#,
        )
        .unwrap();
        let mut session = recording_session();
        assert!(scene.author(&mut session).is_err());
        assert!(!session.is_collecting());
        assert!(session.engine().calls().is_empty());
    }

    #[test]
    fn test_duplicate_view() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "a"

            [[view]]
            name = "a"
            "#,
        )
        .unwrap();
        let err = scene.author(&mut recording_session()).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateView { name } if name == "a"));
    }

    #[test]
    fn test_missing_superview_is_an_error() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "root"

            [[constraint]]
            op = "center-in-superview"
            view = "root"
            "#,
        )
        .unwrap();
        let err = scene.author(&mut recording_session()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::MissingSuperview { view, op }
                if view == "root" && op == "center-in-superview"
        ));
    }

    #[test]
    fn test_empty_peers_is_an_error() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "a"

            [[constraint]]
            op = "pin-edge-to-all"
            view = "a"
            edge = "top"
            peers = []
            "#,
        )
        .unwrap();
        let err = scene.author(&mut recording_session()).unwrap_err();
        assert!(matches!(err, SceneError::EmptyPeers { .. }));
    }

    #[test]
    fn test_parent_cycle_is_an_error() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "a"
            parent = "b"

            [[view]]
            name = "b"
            parent = "a"
            "#,
        )
        .unwrap();
        let err = scene.author(&mut recording_session()).unwrap_err();
        assert!(matches!(err, SceneError::ParentCycle { .. }));
    }

    #[test]
    fn test_spacer_and_wrap_define_names() {
        let scene = Scene::from_str(
            r#"
            [[view]]
            name = "root"
            frame = [0, 0, 100, 100]

            [[view]]
            name = "label"
            parent = "root"

            [[constraint]]
            op = "spacer-height"
            name = "gap"
            value = 20
            parent = "root"

            [[constraint]]
            op = "wrap"
            view = "label"
            name = "label-box"
            insets = { top = 4, left = 4, bottom = 4, right = 4 }

            [[constraint]]
            op = "pin-edge"
            view = "gap"
            edge = "top"
            to_edge = "bottom"
            of = "label-box"
            "#,
        )
        .unwrap();
        let mut session = recording_session();
        let constraints = scene.author(&mut session).unwrap();

        assert_eq!(constraints.len(), 2 + 4 + 1);
        let tree = session.tree();
        let root = tree.find("root").unwrap();
        let wrapper = tree.find("label-box").unwrap();
        assert_eq!(tree.superview(wrapper), Some(root));
        assert_eq!(tree.superview(tree.find("label").unwrap()), Some(wrapper));
        assert_eq!(tree.superview(tree.find("gap").unwrap()), Some(root));
    }

    #[test]
    fn test_unknown_op_fails_to_parse() {
        let result = Scene::from_str(
            r#"
            [[constraint]]
            op = "teleport"
            view = "a"
            "#,
        );
        assert!(matches!(result, Err(SceneError::Toml(_))));
    }
}
