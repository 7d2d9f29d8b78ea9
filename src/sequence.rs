use crate::ir::{MindmapNode, NodeKind, StepStatus};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const UNRANKED_CATEGORY: u32 = 99;

/// Fixed precedence of the well-known categories when linearizing steps.
pub fn category_rank(category_id: &str) -> u32 {
    match category_id {
        "research" => 1,
        "marketing" => 2,
        "development" => 3,
        "finance" => 4,
        "promotion" => 5,
        _ => UNRANKED_CATEGORY,
    }
}

/// Closest ancestor of kind `Category`, following parent links.
pub fn ancestor_category<'a>(
    node_id: &str,
    by_id: &HashMap<&'a str, &'a MindmapNode>,
) -> Option<&'a str> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = *by_id.get(node_id)?;
    while let Some(parent_id) = current.parent_id.as_deref() {
        if !visited.insert(parent_id) {
            return None;
        }
        let parent = *by_id.get(parent_id)?;
        if parent.kind == NodeKind::Category {
            return Some(parent.id.as_str());
        }
        current = parent;
    }
    None
}

/// Renumbers every step across the whole tree: ordered by category precedence,
/// then by the generator's per-branch step index. Assigns `progress_index`
/// 1..=N and resets status to todo.
pub fn assign_progress_order(nodes: &mut [MindmapNode]) {
    let order: Vec<(usize, u32, u32)> = {
        let by_id: HashMap<&str, &MindmapNode> =
            nodes.iter().map(|node| (node.id.as_str(), node)).collect();
        let mut order: Vec<(usize, u32, u32)> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind == NodeKind::Step)
            .map(|(idx, node)| {
                let rank = ancestor_category(&node.id, &by_id)
                    .map(category_rank)
                    .unwrap_or(UNRANKED_CATEGORY);
                (idx, rank, node.step_index.unwrap_or(0))
            })
            .collect();
        order.sort_by_key(|(_, rank, step_index)| (*rank, *step_index));
        order
    };

    for (position, (idx, _, _)) in order.iter().enumerate() {
        let node = &mut nodes[*idx];
        node.progress_index = Some(position as u32 + 1);
        node.status = Some(StepStatus::Todo);
    }
    debug!(steps = order.len(), "assigned progress order");
}
