//! Integration tests for the tidy-tree layout engine.
//!
//! Layout is a pure function of `(tree, hidden-set, canvas)`; these tests
//! pin down determinism, spacing and the collapse-filtering contract.

use std::collections::HashSet;

use serde_json::json;

use conceptmap::domain::{self, ConceptTree};
use conceptmap::layout::{self, Canvas, CANVAS_MARGIN, SIBLING_GAP};
use conceptmap::util::testing::init_test_setup;

fn water_cycle() -> ConceptTree {
    domain::normalize(&json!({
        "central": "Water Cycle",
        "branches": [
            { "name": "Evaporation", "children": [{ "name": "Heat" }, { "name": "Sun" }] },
            { "name": "Condensation", "children": [{ "name": "Clouds" }] },
            { "name": "Precipitation", "children": [] }
        ]
    }))
}

#[test]
fn given_same_inputs_when_compute_twice_then_identical_layout() {
    init_test_setup();
    let tree = water_cycle();
    let collapsed = HashSet::new();

    let first = layout::compute(&tree, &collapsed, Canvas::default());
    let second = layout::compute(&tree, &collapsed, Canvas::default());

    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.links, second.links);
}

#[test]
fn given_siblings_when_compute_then_minimum_gap_is_kept() {
    init_test_setup();
    let tree = water_cycle();
    let layout = layout::compute(&tree, &HashSet::new(), Canvas::default());

    // Within every depth level, neighbouring boxes must not come closer
    // than the sibling gap.
    let max_depth = layout.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    for depth in 0..=max_depth {
        let mut row: Vec<_> = layout.nodes.iter().filter(|n| n.depth == depth).collect();
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
        for pair in row.windows(2) {
            let right_edge = pair[0].x + pair[0].width / 2.0;
            let left_edge = pair[1].x - pair[1].width / 2.0;
            assert!(
                left_edge - right_edge >= SIBLING_GAP - 0.01,
                "gap violated at depth {depth}: {right_edge} vs {left_edge}"
            );
        }
    }
}

#[test]
fn given_multi_level_tree_when_compute_then_depth_maps_to_vertical_band() {
    init_test_setup();
    let tree = water_cycle();
    let canvas = Canvas::default();
    let layout = layout::compute(&tree, &HashSet::new(), canvas);

    let root = layout.nodes.iter().find(|n| n.depth == 0).expect("root box");
    assert_eq!(root.y, CANVAS_MARGIN);

    let deepest = layout
        .nodes
        .iter()
        .max_by_key(|n| n.depth)
        .expect("deepest box");
    assert!((deepest.y - (canvas.height - CANVAS_MARGIN)).abs() < 0.01);

    // y strictly increases with depth
    for a in &layout.nodes {
        for b in &layout.nodes {
            if a.depth < b.depth {
                assert!(a.y < b.y);
            }
        }
    }
}

#[test]
fn given_parent_with_children_when_compute_then_parent_is_centered() {
    init_test_setup();
    let tree = water_cycle();
    let layout = layout::compute(&tree, &HashSet::new(), Canvas::default());

    let parent = layout
        .nodes
        .iter()
        .find(|n| n.label == "Evaporation")
        .expect("parent box");
    let children: Vec<_> = layout
        .nodes
        .iter()
        .filter(|n| n.label == "Heat" || n.label == "Sun")
        .collect();
    assert_eq!(children.len(), 2);
    let mid = (children[0].x + children[1].x) / 2.0;
    assert!((parent.x - mid).abs() < 0.01);
}

#[test]
fn given_any_tree_when_compute_then_bounding_box_is_centered_on_canvas() {
    init_test_setup();
    let tree = water_cycle();
    let canvas = Canvas::default();
    let layout = layout::compute(&tree, &HashSet::new(), canvas);

    let left = layout
        .nodes
        .iter()
        .map(|n| n.x - n.width / 2.0)
        .fold(f32::INFINITY, f32::min);
    let right = layout
        .nodes
        .iter()
        .map(|n| n.x + n.width / 2.0)
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(((left + right) / 2.0 - canvas.width / 2.0).abs() < 0.5);
}

#[test]
fn given_collapsed_node_when_compute_then_descendants_are_omitted() {
    init_test_setup();
    let tree = water_cycle();
    let target = tree.find_by_name("Evaporation").expect("node id");
    let collapsed: HashSet<_> = [target].into_iter().collect();

    let layout = layout::compute(&tree, &collapsed, Canvas::default());

    let labels: Vec<_> = layout.nodes.iter().map(|n| n.label.as_str()).collect();
    assert!(labels.contains(&"Evaporation"));
    assert!(!labels.contains(&"Heat"));
    assert!(!labels.contains(&"Sun"));
    assert!(labels.contains(&"Clouds"));

    let evap = layout
        .nodes
        .iter()
        .find(|n| n.label == "Evaporation")
        .expect("collapsed box");
    assert!(evap.collapsed);
    // No links may leave the collapsed node.
    assert!(layout.links.iter().all(|l| l.from != target));
}

#[test]
fn given_single_node_tree_when_compute_then_centered_with_no_links() {
    init_test_setup();
    let tree = domain::normalize(&json!({ "name": "Solo", "children": [] }));
    let canvas = Canvas::default();

    let layout = layout::compute(&tree, &HashSet::new(), canvas);

    assert_eq!(layout.nodes.len(), 1);
    assert!(layout.links.is_empty());
    assert!((layout.nodes[0].x - canvas.width / 2.0).abs() < 0.01);
    assert_eq!(layout.nodes[0].y, CANVAS_MARGIN);
}

#[test]
fn given_tree_when_compute_then_links_connect_visible_parent_child_pairs() {
    init_test_setup();
    let tree = water_cycle();
    let layout = layout::compute(&tree, &HashSet::new(), Canvas::default());

    // 7 nodes, all reachable from the root: one link per non-root node.
    assert_eq!(layout.links.len(), layout.nodes.len() - 1);
    for link in &layout.links {
        let from = layout.nodes.iter().find(|n| n.id == link.from).expect("from box");
        let to = layout.nodes.iter().find(|n| n.id == link.to).expect("to box");
        assert_eq!(link.x1, from.x);
        assert_eq!(link.y1, from.y);
        assert_eq!(link.x2, to.x);
        assert_eq!(link.y2, to.y);
        assert_eq!(to.depth, from.depth + 1);
    }
}
