use crate::ir::NodeKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// A positioned node. `x`/`y` is the center of the node box.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Side of this node the incoming edge attaches to.
    pub target_side: Option<EdgeSide>,
    pub fallback: bool,
}

impl NodeLayout {
    /// Attachment point on the given side of the box.
    pub fn anchor(&self, side: EdgeSide) -> (f32, f32) {
        match side {
            EdgeSide::Left => (self.x - self.width / 2.0, self.y),
            EdgeSide::Right => (self.x + self.width / 2.0, self.y),
            EdgeSide::Top => (self.x, self.y - self.height / 2.0),
            EdgeSide::Bottom => (self.x, self.y + self.height / 2.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_side: EdgeSide,
    pub target_side: EdgeSide,
    pub points: Vec<(f32, f32)>,
}

/// Non-fatal problems met while laying out a mindmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutIssue {
    MissingRoot,
    DuplicateRoot { node: String },
    DanglingParent { node: String, parent: String },
    LayoutMiss { node: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub issues: Vec<LayoutIssue>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn position(&self, id: &str) -> Option<(f32, f32)> {
        self.node(id).map(|node| (node.x, node.y))
    }

    /// Bounding box over every node box, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?;
        let mut bounds = Bounds {
            min_x: first.x - first.width / 2.0,
            min_y: first.y - first.height / 2.0,
            max_x: first.x + first.width / 2.0,
            max_y: first.y + first.height / 2.0,
        };
        for node in &self.nodes[1..] {
            bounds.min_x = bounds.min_x.min(node.x - node.width / 2.0);
            bounds.min_y = bounds.min_y.min(node.y - node.height / 2.0);
            bounds.max_x = bounds.max_x.max(node.x + node.width / 2.0);
            bounds.max_y = bounds.max_y.max(node.y + node.height / 2.0);
        }
        Some(bounds)
    }
}
