//! Interaction controller: view-only state layered on the immutable tree
//!
//! A [`Viewer`] owns a normalized [`ConceptTree`] plus the transient state
//! the rendered diagram needs: collapsed nodes, pan offset, zoom scale and
//! hover highlight. Every state transition synchronously re-derives the
//! layout from the current `(tree, collapsed, transform)` triple, so there
//! is never a stale intermediate between mutation and render.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{ConceptTree, DomainError, NodeId};
use crate::layout::{self, Canvas, Layout};

pub const DEFAULT_MIN_ZOOM: f32 = 0.25;
pub const DEFAULT_MAX_ZOOM: f32 = 4.0;

/// Allowed zoom range; scale is clamped so the diagram can neither become
/// unreadably small nor invert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Current pan/zoom applied on top of the computed layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan: (f32, f32),
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub layout: Layout,
    pub transform: ViewTransform,
    pub hovered: Option<NodeId>,
}

/// Owns the tree and all interaction state.
#[derive(Debug)]
pub struct Viewer {
    tree: ConceptTree,
    canvas: Canvas,
    bounds: ZoomBounds,
    collapsed: HashSet<NodeId>,
    transform: ViewTransform,
    hovered: Option<NodeId>,
    scene: Scene,
}

impl Viewer {
    pub fn new(tree: ConceptTree, canvas: Canvas, bounds: ZoomBounds) -> Self {
        let collapsed = HashSet::new();
        let transform = ViewTransform::default();
        let scene = Scene {
            layout: layout::compute(&tree, &collapsed, canvas),
            transform,
            hovered: None,
        };
        Self {
            tree,
            canvas,
            bounds,
            collapsed,
            transform,
            hovered: None,
            scene,
        }
    }

    pub fn tree(&self) -> &ConceptTree {
        &self.tree
    }

    /// The scene derived from the current state. Always consistent with the
    /// last completed transition.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Flips the collapsed flag of a node, returning the new state.
    /// The subtree stays in the tree; it is only omitted from the scene.
    pub fn toggle_collapse(&mut self, id: NodeId) -> bool {
        let now_collapsed = if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
            true
        } else {
            false
        };
        debug!(?id, now_collapsed, "collapse toggled");
        self.refresh();
        now_collapsed
    }

    /// Collapse toggle addressed by node label (first pre-order match).
    pub fn toggle_collapse_by_name(&mut self, name: &str) -> Result<bool, DomainError> {
        let id = self
            .tree
            .find_by_name(name)
            .ok_or_else(|| DomainError::UnknownNode(name.to_string()))?;
        Ok(self.toggle_collapse(id))
    }

    /// Continuous drag update of the translation.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform.pan.0 += dx;
        self.transform.pan.1 += dy;
        self.refresh();
    }

    /// Multiplicative zoom step, clamped to the configured bounds.
    pub fn zoom_by(&mut self, factor: f32) {
        self.transform.zoom =
            (self.transform.zoom * factor).clamp(self.bounds.min, self.bounds.max);
        self.refresh();
    }

    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    pub fn set_hover(&mut self, id: Option<NodeId>) {
        self.hovered = id;
        self.refresh();
    }

    /// Restores the initial centered translation and scale 1. Collapsed
    /// state is interaction history, not transform state, and is kept.
    pub fn reset(&mut self) {
        self.transform = ViewTransform::default();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.scene = Scene {
            layout: layout::compute(&self.tree, &self.collapsed, self.canvas),
            transform: self.transform,
            hovered: self.hovered,
        };
    }
}
