use crate::ir::{Mindmap, StepStatus};
use crate::layout::{EdgeSide, Layout, LayoutIssue};
use crate::progress::{Checkpoint, ProgressTracker};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub issues: Vec<String>,
    pub progress: Option<ProgressDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// Top-left corner, as a canvas library would place the node.
    pub position: [f32; 2],
    pub width: f32,
    pub height: f32,
    pub target_position: Option<EdgeSide>,
    pub fallback: bool,
    pub progress_index: Option<u32>,
    pub status: Option<StepStatus>,
    pub is_next_step: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: EdgeSide,
    pub target_handle: EdgeSide,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDump {
    pub highest_completed_index: u32,
    pub total_steps: u32,
    pub percent: u32,
    pub checkpoints: Vec<Checkpoint>,
}

impl LayoutDump {
    pub fn from_layout(
        layout: &Layout,
        mindmap: &Mindmap,
        progress: Option<&ProgressTracker>,
    ) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                let source = mindmap.node(&node.id);
                NodeDump {
                    id: node.id.clone(),
                    kind: node.kind.tag().to_string(),
                    title: source.map(|n| n.title.clone()).unwrap_or_default(),
                    position: [node.x - node.width / 2.0, node.y - node.height / 2.0],
                    width: node.width,
                    height: node.height,
                    target_position: node.target_side,
                    fallback: node.fallback,
                    progress_index: source.and_then(|n| n.sequence_index()),
                    status: progress
                        .and_then(|tracker| tracker.status(&node.id))
                        .or_else(|| source.and_then(|n| n.status)),
                    is_next_step: progress.is_some_and(|tracker| tracker.is_next_step(&node.id)),
                }
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                source_handle: edge.source_side,
                target_handle: edge.target_side,
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        let issues = layout.issues.iter().map(describe_issue).collect();

        let progress = progress.map(|tracker| ProgressDump {
            highest_completed_index: tracker.highest_completed_index(),
            total_steps: tracker.total_steps(),
            percent: tracker.completion_percent(),
            checkpoints: tracker.checkpoints(),
        });

        LayoutDump {
            nodes,
            edges,
            issues,
            progress,
        }
    }
}

fn describe_issue(issue: &LayoutIssue) -> String {
    match issue {
        LayoutIssue::MissingRoot => "no root node".to_string(),
        LayoutIssue::DuplicateRoot { node } => format!("extra root {node} ignored"),
        LayoutIssue::DanglingParent { node, parent } => {
            format!("{node} references missing parent {parent:?}")
        }
        LayoutIssue::LayoutMiss { node } => format!("{node} placed at a fallback position"),
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &Layout,
    mindmap: &Mindmap,
    progress: Option<&ProgressTracker>,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, mindmap, progress);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{MindmapNode, NodeKind};
    use crate::layout::compute_layout;

    #[test]
    fn dump_uses_canvas_field_names() {
        let map = Mindmap::new(vec![
            MindmapNode::new("core-1", NodeKind::Root, None, "Idea"),
            MindmapNode::new("finance", NodeKind::Category, Some("core-1"), "Finance"),
            MindmapNode::step("fin-1", "finance", "Budget", 1),
        ]);
        let layout = compute_layout(&map, &LayoutConfig::default());
        let tracker = ProgressTracker::from_nodes(&map.nodes);
        let dump = LayoutDump::from_layout(&layout, &map, Some(&tracker));
        let value = serde_json::to_value(&dump).unwrap();

        let root = &value["nodes"][0];
        assert_eq!(root["type"], "core");
        assert_eq!(root["position"][0], -120.0);
        assert_eq!(root["position"][1], -45.0);
        assert!(root["targetPosition"].is_null());

        assert_eq!(value["nodes"][1]["targetPosition"], "bottom");
        assert_eq!(value["nodes"][2]["isNextStep"], true);
        assert_eq!(value["nodes"][2]["status"], "todo");
        assert_eq!(value["edges"][0]["sourceHandle"], "top");
        assert_eq!(value["progress"]["totalSteps"], 1);
        assert_eq!(value["progress"]["checkpoints"][0]["state"], "next");
        assert!(value["issues"].as_array().unwrap().is_empty());
    }
}
