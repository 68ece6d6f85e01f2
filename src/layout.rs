//! Tidy-tree layout engine
//!
//! Assigns a 2-D position to every visible node of a concept tree. Layout is
//! a pure function of `(tree, hidden-set, canvas)`: identical input always
//! yields identical coordinates, which image export and the tests rely on.
//!
//! Geometry follows the link-diagram conventions of the rendered view: depth
//! maps linearly to vertical offset, siblings keep a minimum horizontal gap,
//! parents are centered over their children, and box width grows with label
//! length (clamped) so text is never clipped.

use std::collections::HashSet;

use crate::domain::{ConceptTree, NodeId};

pub const NODE_HEIGHT: f32 = 40.0;
pub const BASE_WIDTH: f32 = 30.0;
pub const WIDTH_PER_CHAR: f32 = 10.0;
pub const MIN_NODE_WIDTH: f32 = 60.0;
pub const MAX_NODE_WIDTH: f32 = 320.0;
pub const SIBLING_GAP: f32 = 24.0;
pub const CANVAS_MARGIN: f32 = 100.0;

/// Per-depth node fill colors, cycled.
pub const PALETTE: [Rgb; 3] = [
    Rgb { r: 0x3b, g: 0x82, b: 0xf6 },
    Rgb { r: 0x60, g: 0xa5, b: 0xfa },
    Rgb { r: 0x93, g: 0xc5, b: 0xfd },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Target drawing surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 800.0,
        }
    }
}

/// One positioned node box, coordinates are the box center.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: NodeId,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub fill: Rgb,
    /// Whether this node's subtree is currently hidden below it
    pub collapsed: bool,
}

/// Curved link between a parent and child box (center to center).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: Vec<NodeBox>,
    pub links: Vec<Link>,
    pub canvas: Canvas,
}

/// Box width sized proportionally to the label, clamped against runaway
/// widths for pathological labels.
pub fn node_width(label: &str) -> f32 {
    (BASE_WIDTH + WIDTH_PER_CHAR * label.chars().count() as f32)
        .clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH)
}

/// Computes the layout for all nodes not hidden under a collapsed ancestor.
///
/// `collapsed` nodes themselves remain visible; only their descendants are
/// omitted. The resulting bounding box is centered horizontally on the
/// canvas and levels are spread evenly across the vertical margin band.
pub fn compute(tree: &ConceptTree, collapsed: &HashSet<NodeId>, canvas: Canvas) -> Layout {
    let mut layout = Layout {
        nodes: Vec::new(),
        links: Vec::new(),
        canvas,
    };
    let Some(root) = tree.root() else {
        return layout;
    };

    let mut cursor = 0.0_f32;
    let mut max_depth = 0usize;
    place_subtree(
        tree,
        collapsed,
        root,
        0,
        &mut cursor,
        &mut max_depth,
        &mut layout.nodes,
    );

    // Spread levels across the canvas height, then center the bounding box.
    let levels = max_depth + 1;
    let level_step = if levels > 1 {
        (canvas.height - 2.0 * CANVAS_MARGIN) / (levels - 1) as f32
    } else {
        0.0
    };
    let span = (cursor - SIBLING_GAP).max(0.0);
    let x_offset = (canvas.width - span) / 2.0;

    for node in &mut layout.nodes {
        node.x += x_offset;
        node.y = CANVAS_MARGIN + node.depth as f32 * level_step;
    }

    // Link every visible parent/child pair, in node order.
    let positions: std::collections::HashMap<NodeId, (f32, f32)> = layout
        .nodes
        .iter()
        .map(|n| (n.id, (n.x, n.y)))
        .collect();
    for node_box in &layout.nodes {
        if node_box.collapsed {
            continue;
        }
        if let Some(node) = tree.get_node(node_box.id) {
            for &child in &node.children {
                if let Some(&(cx, cy)) = positions.get(&child) {
                    layout.links.push(Link {
                        from: node_box.id,
                        to: child,
                        x1: node_box.x,
                        y1: node_box.y,
                        x2: cx,
                        y2: cy,
                    });
                }
            }
        }
    }

    layout
}

/// Post-order placement: children first, parent centered above them. The
/// cursor tracks the right edge of everything placed so far, which keeps the
/// minimum sibling gap without a full contour scan.
fn place_subtree(
    tree: &ConceptTree,
    collapsed: &HashSet<NodeId>,
    idx: NodeId,
    depth: usize,
    cursor: &mut f32,
    max_depth: &mut usize,
    out: &mut Vec<NodeBox>,
) -> f32 {
    let Some(node) = tree.get_node(idx) else {
        return *cursor;
    };
    *max_depth = (*max_depth).max(depth);

    let label = node.data.name.clone();
    let width = node_width(&label);
    let is_collapsed = collapsed.contains(&idx);

    let x = if is_collapsed || node.children.is_empty() {
        let x = *cursor + width / 2.0;
        *cursor += width + SIBLING_GAP;
        x
    } else {
        let first = out.len();
        let start = *cursor;
        for &child in &node.children {
            place_subtree(tree, collapsed, child, depth + 1, cursor, max_depth, out);
        }
        // Center over direct children only (they were appended depth-first,
        // so pick them back out by id).
        let child_xs: Vec<f32> = out[first..]
            .iter()
            .filter(|b| node.children.contains(&b.id))
            .map(|b| b.x)
            .collect();
        let mut x = (child_xs.first().unwrap_or(&0.0) + child_xs.last().unwrap_or(&0.0)) / 2.0;
        // A parent wider than its children's span would otherwise stick out
        // left into the previous subtree; shift the whole subtree right.
        let overhang = (start + width / 2.0) - x;
        if overhang > 0.0 {
            for node_box in &mut out[first..] {
                node_box.x += overhang;
            }
            *cursor += overhang;
            x += overhang;
        }
        // It must also clear the next sibling on the right.
        *cursor = cursor.max(x + width / 2.0 + SIBLING_GAP);
        x
    };

    out.push(NodeBox {
        id: idx,
        label,
        x,
        y: 0.0, // assigned once the level count is known
        width,
        height: NODE_HEIGHT,
        depth,
        fill: PALETTE[depth % PALETTE.len()],
        collapsed: is_collapsed,
    });
    x
}
