//! The view hierarchy the layout layer authors constraints against
//!
//! Views live in an arena owned by [`ViewTree`] and are addressed by copyable
//! [`ViewId`] handles. The tree records only what constraint authoring and
//! solving need: containment, the frame-translation flag, margins, safe-area
//! insets and intrinsic content size.

use std::fmt;

use serde::Deserialize;

use super::attributes::{Edge, LayoutAxis};
use super::config::LayoutConfig;
use super::constraint::{LayoutItem, Priority};
use super::types::{EdgeInsets, Rect, Size};

/// Handle to a view in a [`ViewTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) usize);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Per-axis content priorities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPriorities {
    pub horizontal: Priority,
    pub vertical: Priority,
}

impl AxisPriorities {
    pub fn new(horizontal: Priority, vertical: Priority) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn get(&self, axis: LayoutAxis) -> Priority {
        match axis {
            LayoutAxis::Horizontal => self.horizontal,
            LayoutAxis::Vertical => self.vertical,
        }
    }

    fn set(&mut self, axis: LayoutAxis, priority: Priority) {
        match axis {
            LayoutAxis::Horizontal => self.horizontal = priority,
            LayoutAxis::Vertical => self.vertical = priority,
        }
    }
}

#[derive(Debug, Clone)]
struct ViewNode {
    name: Option<String>,
    superview: Option<ViewId>,
    subviews: Vec<ViewId>,
    frame: Rect,
    translates_frame: bool,
    layout_margins: EdgeInsets,
    safe_area_insets: EdgeInsets,
    intrinsic_size: Option<Size>,
    hugging: AxisPriorities,
    compression_resistance: AxisPriorities,
}

/// Options applied to a view after it is created
///
/// Every field is optional; only the fields that are set change the view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub layout_margins: Option<EdgeInsets>,
    pub safe_area_insets: Option<EdgeInsets>,
    pub intrinsic_size: Option<Size>,
    pub translates_frame: Option<bool>,
    pub hugging_horizontal: Option<Priority>,
    pub hugging_vertical: Option<Priority>,
    pub compression_horizontal: Option<Priority>,
    pub compression_vertical: Option<Priority>,
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout_margins(mut self, margins: EdgeInsets) -> Self {
        self.layout_margins = Some(margins);
        self
    }

    pub fn with_safe_area_insets(mut self, insets: EdgeInsets) -> Self {
        self.safe_area_insets = Some(insets);
        self
    }

    pub fn with_intrinsic_size(mut self, size: Size) -> Self {
        self.intrinsic_size = Some(size);
        self
    }

    pub fn with_translates_frame(mut self, translates: bool) -> Self {
        self.translates_frame = Some(translates);
        self
    }

    pub fn with_hugging(mut self, axis: LayoutAxis, priority: Priority) -> Self {
        match axis {
            LayoutAxis::Horizontal => self.hugging_horizontal = Some(priority),
            LayoutAxis::Vertical => self.hugging_vertical = Some(priority),
        }
        self
    }

    pub fn with_compression_resistance(mut self, axis: LayoutAxis, priority: Priority) -> Self {
        match axis {
            LayoutAxis::Horizontal => self.compression_horizontal = Some(priority),
            LayoutAxis::Vertical => self.compression_vertical = Some(priority),
        }
        self
    }
}

/// How a container exposes its unobstructed region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeAreaGuides {
    /// A single guide carrying all four edges
    SafeArea(LayoutItem),
    /// Hosts without safe areas: separate top and bottom guides, with the
    /// container itself standing in for the horizontal edges
    Legacy {
        top: LayoutItem,
        bottom: LayoutItem,
        container: LayoutItem,
    },
}

impl SafeAreaGuides {
    /// The item whose `edge` a safe-area pin should target
    pub fn item_for(&self, edge: Edge) -> LayoutItem {
        match *self {
            SafeAreaGuides::SafeArea(guide) => guide,
            SafeAreaGuides::Legacy {
                top,
                bottom,
                container,
            } => match edge {
                Edge::Top => top,
                Edge::Bottom => bottom,
                Edge::Leading | Edge::Trailing | Edge::Left | Edge::Right => container,
            },
        }
    }
}

/// Arena of views
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    config: LayoutConfig,
}

impl ViewTree {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        (0..self.nodes.len()).map(ViewId)
    }

    /// Create a detached view with a zero frame that still translates its frame
    pub fn add_view(&mut self) -> ViewId {
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode {
            name: None,
            superview: None,
            subviews: Vec::new(),
            frame: Rect::zero(),
            translates_frame: true,
            layout_margins: self.config.default_layout_margins,
            safe_area_insets: EdgeInsets::zero(),
            intrinsic_size: None,
            hugging: AxisPriorities::new(Priority::DEFAULT_LOW, Priority::DEFAULT_LOW),
            compression_resistance: AxisPriorities::new(
                Priority::DEFAULT_HIGH,
                Priority::DEFAULT_HIGH,
            ),
        });
        id
    }

    /// Create a named view
    pub fn add_named(&mut self, name: impl Into<String>) -> ViewId {
        let id = self.add_view();
        self.nodes[id.0].name = Some(name.into());
        id
    }

    /// Create a top-level view whose frame stays fixed
    pub fn add_root(&mut self, frame: Rect) -> ViewId {
        let id = self.add_view();
        self.nodes[id.0].frame = frame;
        id
    }

    /// Move `child` under `parent`, detaching it from any previous superview
    ///
    /// # Panics
    ///
    /// Panics if `parent` is `child` or one of its descendants.
    pub fn add_subview(&mut self, parent: ViewId, child: ViewId) {
        assert!(
            !self.is_descendant(parent, child),
            "cannot add {} as a subview of its own descendant {}",
            self.describe(child),
            self.describe(parent)
        );
        self.remove_from_superview(child);
        self.nodes[child.0].superview = Some(parent);
        self.nodes[parent.0].subviews.push(child);
    }

    /// Detach `view` from its superview
    pub fn remove_from_superview(&mut self, view: ViewId) {
        if let Some(parent) = self.nodes[view.0].superview.take() {
            self.nodes[parent.0].subviews.retain(|&id| id != view);
        }
    }

    /// Returns true if `view` is `ancestor` or lies below it
    pub fn is_descendant(&self, view: ViewId, ancestor: ViewId) -> bool {
        let mut current = Some(view);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].superview;
        }
        false
    }

    pub fn superview(&self, view: ViewId) -> Option<ViewId> {
        self.nodes[view.0].superview
    }

    pub fn subviews(&self, view: ViewId) -> &[ViewId] {
        &self.nodes[view.0].subviews
    }

    pub fn name(&self, view: ViewId) -> Option<&str> {
        self.nodes[view.0].name.as_deref()
    }

    pub fn set_name(&mut self, view: ViewId, name: impl Into<String>) {
        self.nodes[view.0].name = Some(name.into());
    }

    /// Find a view by name
    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
            .map(ViewId)
    }

    /// Human-readable label for messages, e.g. `v3 'card'`
    pub fn describe(&self, view: ViewId) -> String {
        match self.name(view) {
            Some(name) => format!("{} '{}'", view, name),
            None => view.to_string(),
        }
    }

    pub fn frame(&self, view: ViewId) -> Rect {
        self.nodes[view.0].frame
    }

    pub fn set_frame(&mut self, view: ViewId, frame: Rect) {
        self.nodes[view.0].frame = frame;
    }

    /// Whether the view's frame is turned into fixed constraints
    pub fn translates_frame(&self, view: ViewId) -> bool {
        self.nodes[view.0].translates_frame
    }

    pub fn set_translates_frame(&mut self, view: ViewId, translates: bool) {
        self.nodes[view.0].translates_frame = translates;
    }

    pub fn layout_margins(&self, view: ViewId) -> EdgeInsets {
        self.nodes[view.0].layout_margins
    }

    pub fn set_layout_margins(&mut self, view: ViewId, margins: EdgeInsets) {
        self.nodes[view.0].layout_margins = margins;
    }

    pub fn safe_area_insets(&self, view: ViewId) -> EdgeInsets {
        self.nodes[view.0].safe_area_insets
    }

    pub fn set_safe_area_insets(&mut self, view: ViewId, insets: EdgeInsets) {
        self.nodes[view.0].safe_area_insets = insets;
    }

    pub fn intrinsic_size(&self, view: ViewId) -> Option<Size> {
        self.nodes[view.0].intrinsic_size
    }

    pub fn set_intrinsic_size(&mut self, view: ViewId, size: Option<Size>) {
        self.nodes[view.0].intrinsic_size = size;
    }

    pub fn content_hugging_priority(&self, view: ViewId, axis: LayoutAxis) -> Priority {
        self.nodes[view.0].hugging.get(axis)
    }

    pub fn set_content_hugging_priority(
        &mut self,
        view: ViewId,
        axis: LayoutAxis,
        priority: Priority,
    ) {
        self.nodes[view.0].hugging.set(axis, priority);
    }

    pub fn compression_resistance_priority(&self, view: ViewId, axis: LayoutAxis) -> Priority {
        self.nodes[view.0].compression_resistance.get(axis)
    }

    pub fn set_compression_resistance_priority(
        &mut self,
        view: ViewId,
        axis: LayoutAxis,
        priority: Priority,
    ) {
        self.nodes[view.0].compression_resistance.set(axis, priority);
    }

    /// Apply every option set in `config` to `view`
    pub fn configure(&mut self, view: ViewId, config: &ViewConfig) {
        let node = &mut self.nodes[view.0];
        if let Some(margins) = config.layout_margins {
            node.layout_margins = margins;
        }
        if let Some(insets) = config.safe_area_insets {
            node.safe_area_insets = insets;
        }
        if let Some(size) = config.intrinsic_size {
            node.intrinsic_size = Some(size);
        }
        if let Some(translates) = config.translates_frame {
            node.translates_frame = translates;
        }
        if let Some(p) = config.hugging_horizontal {
            node.hugging.horizontal = p;
        }
        if let Some(p) = config.hugging_vertical {
            node.hugging.vertical = p;
        }
        if let Some(p) = config.compression_horizontal {
            node.compression_resistance.horizontal = p;
        }
        if let Some(p) = config.compression_vertical {
            node.compression_resistance.vertical = p;
        }
    }

    /// Resolve how `container` exposes its safe area on this host
    pub fn safe_area_guides(&self, container: ViewId) -> SafeAreaGuides {
        if self.config.safe_area_available {
            SafeAreaGuides::SafeArea(LayoutItem::SafeArea(container))
        } else {
            SafeAreaGuides::Legacy {
                top: LayoutItem::TopGuide(container),
                bottom: LayoutItem::BottomGuide(container),
                container: LayoutItem::View(container),
            }
        }
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
