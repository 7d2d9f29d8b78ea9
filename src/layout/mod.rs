mod radial;
mod subtree;
pub mod text;
pub(crate) mod types;
pub mod viewport;

pub use types::*;
pub use viewport::{FitViewRequest, NoViewport, ViewTransform, ViewportHost, fit_view};

use crate::config::LayoutConfig;
use crate::ir::{Mindmap, NodeKind};
use radial::ring_slots;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use subtree::{collect_subtree, layer_subtree};
use tracing::{debug, warn};

/// Upper bound on the fallback scatter, keeping the sampled range finite.
const MAX_FALLBACK_JITTER: f32 = 10_000.0;

/// Positions every node of `mindmap`. The root sits at the origin, categories
/// on a ring around it, and each category's subtree is layered left to right
/// and attached to its category. The input is never modified.
pub fn compute_layout(mindmap: &Mindmap, config: &LayoutConfig) -> Layout {
    let mut layout = Layout::default();
    let Some(root) = mindmap.root() else {
        warn!("mindmap has no root node; nothing to lay out");
        layout.issues.push(LayoutIssue::MissingRoot);
        return layout;
    };

    let ids: HashSet<&str> = mindmap.nodes.iter().map(|node| node.id.as_str()).collect();
    let children = mindmap.children();
    let mut positions: HashMap<&str, (f32, f32)> = HashMap::new();
    let mut category_sides: HashMap<&str, (EdgeSide, EdgeSide)> = HashMap::new();

    positions.insert(root.id.as_str(), (0.0, 0.0));

    let categories: Vec<&str> = children
        .get(root.id.as_str())
        .map(|kids| {
            kids.iter()
                .copied()
                .filter(|id| *id != root.id.as_str())
                .filter(|id| mindmap.node(id).is_some_and(|node| node.kind != NodeKind::Root))
                .collect()
        })
        .unwrap_or_default();
    let slots = ring_slots(categories.len(), config.category_radius);

    for (category, slot) in categories.iter().copied().zip(&slots) {
        positions.insert(category, (slot.x, slot.y));
        category_sides.insert(category, (slot.source_side(), slot.target_side));
    }

    for (category, slot) in categories.iter().copied().zip(&slots) {
        let subtree = collect_subtree(category, &children, &mindmap.edges);
        if subtree.descendants.is_empty() {
            continue;
        }
        let layered = layer_subtree(&subtree, mindmap, config);
        let Some(&(anchor_x, anchor_y)) = layered.get(category) else {
            warn!(category, "layered layout returned no position for category");
            continue;
        };
        let dx = slot.x - anchor_x;
        let dy = slot.y - anchor_y;
        for &id in &subtree.descendants {
            if positions.contains_key(id) {
                continue;
            }
            if let Some(&(x, y)) = layered.get(id) {
                positions.insert(id, (x + dx, y + dy));
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(config.fallback_seed);
    let jitter = if config.fallback_jitter.is_finite() {
        config.fallback_jitter.abs().min(MAX_FALLBACK_JITTER)
    } else {
        warn!(jitter = config.fallback_jitter, "ignoring non-finite fallback jitter");
        0.0
    };
    for node in &mindmap.nodes {
        if node.kind == NodeKind::Root && !std::ptr::eq(node, root) {
            warn!(node = %node.id, "ignoring additional root node");
            layout.issues.push(LayoutIssue::DuplicateRoot {
                node: node.id.clone(),
            });
            continue;
        }
        if !std::ptr::eq(node, root) {
            match node.parent_id.as_deref() {
                Some(parent) if ids.contains(parent) => {}
                Some(parent) => {
                    warn!(node = %node.id, parent, "parent not found; skipping node");
                    layout.issues.push(LayoutIssue::DanglingParent {
                        node: node.id.clone(),
                        parent: parent.to_string(),
                    });
                    continue;
                }
                None => {
                    warn!(node = %node.id, "node has no parent; skipping node");
                    layout.issues.push(LayoutIssue::DanglingParent {
                        node: node.id.clone(),
                        parent: String::new(),
                    });
                    continue;
                }
            }
        }

        let footprint = config.footprints.for_kind(node.kind);
        let (x, y, fallback) = match positions.get(node.id.as_str()) {
            Some(&(x, y)) => (x, y, false),
            None => {
                warn!(node = %node.id, "no layered position; placing near origin");
                layout.issues.push(LayoutIssue::LayoutMiss {
                    node: node.id.clone(),
                });
                let (x, y) = if jitter > 0.0 {
                    (rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
                } else {
                    (0.0, 0.0)
                };
                (x, y, true)
            }
        };
        let target_side = if std::ptr::eq(node, root) {
            None
        } else {
            Some(
                category_sides
                    .get(node.id.as_str())
                    .map(|(_, target)| *target)
                    .unwrap_or(EdgeSide::Left),
            )
        };
        layout.nodes.push(NodeLayout {
            id: node.id.clone(),
            kind: node.kind,
            x,
            y,
            width: footprint.width,
            height: footprint.height,
            target_side,
            fallback,
        });
    }

    let index: HashMap<&str, usize> = layout
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let mut edges = Vec::with_capacity(mindmap.edges.len());
    for edge in &mindmap.edges {
        let (Some(&source_idx), Some(&target_idx)) =
            (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        else {
            continue;
        };
        let (source_side, target_side) = if edge.source == root.id {
            category_sides
                .get(edge.target.as_str())
                .copied()
                .unwrap_or((EdgeSide::Right, EdgeSide::Left))
        } else {
            (EdgeSide::Right, EdgeSide::Left)
        };
        let source = &layout.nodes[source_idx];
        let target = &layout.nodes[target_idx];
        edges.push(EdgeLayout {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_side,
            target_side,
            points: vec![source.anchor(source_side), target.anchor(target_side)],
        });
    }
    layout.edges = edges;

    debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        issues = layout.issues.len(),
        "mindmap layout complete"
    );
    layout
}
