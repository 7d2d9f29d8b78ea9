use crate::config::LayoutConfig;
use crate::ir::{Mindmap, MindmapEdge};
use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::{HashMap, HashSet, VecDeque};

/// A category together with everything below it.
#[derive(Debug, Clone)]
pub(crate) struct Subtree<'a> {
    pub category: &'a str,
    /// Descendants in breadth-first order, the category excluded.
    pub descendants: Vec<&'a str>,
    pub edges: Vec<&'a MindmapEdge>,
}

pub(crate) fn collect_subtree<'a>(
    category: &'a str,
    children: &HashMap<&'a str, Vec<&'a str>>,
    edges: &'a [MindmapEdge],
) -> Subtree<'a> {
    let mut descendants = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(category);
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(category);
    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(current) else {
            continue;
        };
        for &kid in kids {
            if visited.insert(kid) {
                descendants.push(kid);
                queue.push_back(kid);
            }
        }
    }

    let inside: HashSet<&str> = descendants.iter().copied().collect();
    let edges = edges
        .iter()
        .filter(|edge| {
            inside.contains(edge.target.as_str())
                && (edge.source == category || inside.contains(edge.source.as_str()))
        })
        .collect();

    Subtree {
        category,
        descendants,
        edges,
    }
}

/// Runs a left-to-right layered layout over the subtree and returns node
/// centers keyed by id. Nodes dagre does not return are absent.
pub(crate) fn layer_subtree(
    subtree: &Subtree<'_>,
    mindmap: &Mindmap,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some("lr".to_string());
    graph_config.nodesep = Some(config.node_spacing);
    graph_config.ranksep = Some(config.rank_spacing);
    graph_config.marginx = Some(config.margin);
    graph_config.marginy = Some(config.margin);
    dagre_graph.set_graph(graph_config);

    let mut node_ids: Vec<String> = Vec::with_capacity(subtree.descendants.len() + 1);
    node_ids.push(subtree.category.to_string());
    node_ids.extend(subtree.descendants.iter().map(|id| id.to_string()));

    for node_id in &node_ids {
        let Some(source) = mindmap.node(node_id) else {
            continue;
        };
        let footprint = config.footprints.for_kind(source.kind);
        let mut node = DagreNode::default();
        node.width = footprint.width;
        node.height = footprint.height;
        dagre_graph.set_node(node_id.clone(), Some(node));
    }

    let mut edge_set: HashSet<(&str, &str)> = HashSet::new();
    for edge in &subtree.edges {
        if !edge_set.insert((edge.source.as_str(), edge.target.as_str())) {
            continue;
        }
        let edge_label = DagreEdge::default();
        let _ = dagre_graph.set_edge(&edge.source, &edge.target, Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut positions = HashMap::with_capacity(node_ids.len());
    for node_id in &node_ids {
        let Some(dagre_node) = dagre_graph.node(node_id) else {
            continue;
        };
        if !dagre_node.x.is_finite() || !dagre_node.y.is_finite() {
            continue;
        }
        positions.insert(node_id.clone(), (dagre_node.x, dagre_node.y));
    }
    positions
}
