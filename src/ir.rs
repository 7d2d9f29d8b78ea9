use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Position of a node in the mindmap hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    #[serde(rename = "core")]
    Root,
    Category,
    SubCategory,
    SubSubCategory,
    Step,
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "core" => Some(Self::Root),
            "category" => Some(Self::Category),
            "sub-category" => Some(Self::SubCategory),
            "sub-sub-category" => Some(Self::SubSubCategory),
            "step" => Some(Self::Step),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Root => "core",
            Self::Category => "category",
            Self::SubCategory => "sub-category",
            Self::SubSubCategory => "sub-sub-category",
            Self::Step => "step",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Todo,
    InProgress,
    Done,
}

impl StepStatus {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "todo" => Some(Self::Todo),
            "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// Forward-only status cycle: todo, in progress, done, then back to todo.
    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,
}

impl MindmapNode {
    pub fn new(id: &str, kind: NodeKind, parent_id: Option<&str>, title: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            parent_id: parent_id.map(str::to_string),
            title: title.to_string(),
            details: None,
            step_index: None,
            guidance: None,
            cursor_prompt: None,
            progress_index: None,
            status: None,
        }
    }

    pub fn step(id: &str, parent_id: &str, title: &str, progress_index: u32) -> Self {
        let mut node = Self::new(id, NodeKind::Step, Some(parent_id), title);
        node.step_index = Some(progress_index.saturating_sub(1));
        node.progress_index = Some(progress_index);
        node
    }

    /// Positive sequence index, if the node takes part in progress tracking.
    pub fn sequence_index(&self) -> Option<u32> {
        self.progress_index.filter(|index| *index > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl MindmapEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    MissingRoot,
    MultipleRoots { ids: Vec<String> },
    DanglingParent { node: String, parent: String },
    OrphanNode { node: String },
    EdgeMismatch { source: String, target: String },
    DuplicateSequenceIndex { index: u32, nodes: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mindmap {
    pub nodes: Vec<MindmapNode>,
    pub edges: Vec<MindmapEdge>,
}

impl Mindmap {
    /// Builds a mindmap whose edges are exactly the parent links of `nodes`.
    pub fn new(nodes: Vec<MindmapNode>) -> Self {
        let edges = derive_edges(&nodes);
        Self { nodes, edges }
    }

    pub fn root(&self) -> Option<&MindmapNode> {
        self.nodes.iter().find(|node| node.kind == NodeKind::Root)
    }

    pub fn node(&self, id: &str) -> Option<&MindmapNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Child ids per parent id, in input order.
    pub fn children(&self) -> HashMap<&str, Vec<&str>> {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent) = node.parent_id.as_deref() {
                children.entry(parent).or_default().push(node.id.as_str());
            }
        }
        children
    }

    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let ids: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();

        let roots: Vec<String> = self
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Root)
            .map(|node| node.id.clone())
            .collect();
        match roots.len() {
            0 => issues.push(IntegrityIssue::MissingRoot),
            1 => {}
            _ => issues.push(IntegrityIssue::MultipleRoots { ids: roots }),
        }

        for node in &self.nodes {
            match node.parent_id.as_deref() {
                Some(parent) if !ids.contains(parent) => {
                    issues.push(IntegrityIssue::DanglingParent {
                        node: node.id.clone(),
                        parent: parent.to_string(),
                    });
                }
                None if node.kind != NodeKind::Root => {
                    issues.push(IntegrityIssue::OrphanNode {
                        node: node.id.clone(),
                    });
                }
                _ => {}
            }
        }

        let expected: HashSet<(String, String)> = derive_edges(&self.nodes)
            .into_iter()
            .map(|edge| (edge.source, edge.target))
            .collect();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for edge in &self.edges {
            let pair = (edge.source.clone(), edge.target.clone());
            if !expected.contains(&pair) || !seen.insert(pair) {
                issues.push(IntegrityIssue::EdgeMismatch {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }
        for (source, target) in expected.difference(&seen) {
            issues.push(IntegrityIssue::EdgeMismatch {
                source: source.clone(),
                target: target.clone(),
            });
        }

        let mut by_index: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for node in &self.nodes {
            if let Some(index) = node.sequence_index() {
                by_index.entry(index).or_default().push(node.id.clone());
            }
        }
        for (index, nodes) in by_index {
            if nodes.len() > 1 {
                issues.push(IntegrityIssue::DuplicateSequenceIndex { index, nodes });
            }
        }

        issues
    }
}

/// One edge per node whose parent is present, in node order.
pub fn derive_edges(nodes: &[MindmapNode]) -> Vec<MindmapEdge> {
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();
    for node in nodes {
        let Some(parent) = node.parent_id.as_deref() else {
            continue;
        };
        if !ids.contains(parent) || !seen.insert((parent, node.id.as_str())) {
            continue;
        }
        edges.push(MindmapEdge::new(parent, &node.id));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mindmap {
        Mindmap::new(vec![
            MindmapNode::new("core-1", NodeKind::Root, None, "Idea"),
            MindmapNode::new("marketing", NodeKind::Category, Some("core-1"), "Marketing"),
            MindmapNode::new("development", NodeKind::Category, Some("core-1"), "Development"),
            MindmapNode::step("dev-step-1", "development", "Set up repo", 1),
        ])
    }

    #[test]
    fn node_kind_tags_round_trip() {
        for kind in [
            NodeKind::Root,
            NodeKind::Category,
            NodeKind::SubCategory,
            NodeKind::SubSubCategory,
            NodeKind::Step,
        ] {
            assert_eq!(NodeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(NodeKind::from_tag("marketing"), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        let node: MindmapNode = serde_json::from_str(
            r#"{"id":"s","type":"sub-sub-category","parentId":"p","title":"T"}"#,
        )
        .unwrap();
        assert_eq!(node.kind, NodeKind::SubSubCategory);
        let status: StepStatus = serde_json::from_str("\"inprogress\"").unwrap();
        assert_eq!(status, StepStatus::InProgress);
        let root = serde_json::to_string(&NodeKind::Root).unwrap();
        assert_eq!(root, "\"core\"");
    }

    #[test]
    fn status_cycle_closes_after_three_steps() {
        let start = StepStatus::Todo;
        assert_eq!(start.next(), StepStatus::InProgress);
        assert_eq!(start.next().next(), StepStatus::Done);
        assert_eq!(start.next().next().next(), StepStatus::Todo);
    }

    #[test]
    fn edges_follow_parent_links() {
        let map = sample();
        let pairs: Vec<(&str, &str)> = map
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("core-1", "marketing"),
                ("core-1", "development"),
                ("development", "dev-step-1"),
            ]
        );
        assert_eq!(map.edges[0].id, "e-core-1-marketing");
        assert!(map.check_integrity().is_empty());
    }

    #[test]
    fn integrity_reports_dangling_parent_and_extra_edge() {
        let mut map = sample();
        map.nodes
            .push(MindmapNode::new("lost", NodeKind::SubCategory, Some("ghost"), "Lost"));
        map.edges.push(MindmapEdge::new("marketing", "development"));
        let issues = map.check_integrity();
        assert!(issues.contains(&IntegrityIssue::DanglingParent {
            node: "lost".to_string(),
            parent: "ghost".to_string(),
        }));
        assert!(issues.contains(&IntegrityIssue::EdgeMismatch {
            source: "marketing".to_string(),
            target: "development".to_string(),
        }));
    }

    #[test]
    fn integrity_reports_missing_root_and_duplicate_indices() {
        let map = Mindmap::new(vec![
            MindmapNode::new("a", NodeKind::Category, None, "A"),
            MindmapNode::step("s1", "a", "One", 1),
            MindmapNode::step("s2", "a", "Two", 1),
        ]);
        let issues = map.check_integrity();
        assert!(issues.contains(&IntegrityIssue::MissingRoot));
        assert!(issues.contains(&IntegrityIssue::OrphanNode {
            node: "a".to_string()
        }));
        assert!(issues.contains(&IntegrityIssue::DuplicateSequenceIndex {
            index: 1,
            nodes: vec!["s1".to_string(), "s2".to_string()],
        }));
    }

    #[test]
    fn children_preserve_input_order() {
        let map = sample();
        let children = map.children();
        assert_eq!(children["core-1"], vec!["marketing", "development"]);
        assert!(!children.contains_key("marketing"));
    }
}
