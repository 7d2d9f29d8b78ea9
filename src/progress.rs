use crate::ir::{MindmapNode, StepStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableStep {
    pub progress_index: u32,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointState {
    Completed,
    Next,
    Pending,
}

/// One slot of the linear progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub index: u32,
    pub node_id: Option<String>,
    pub title: String,
    pub state: CheckpointState,
}

/// Status bookkeeping for the actionable steps of one mindmap.
///
/// All mutation goes through [`ProgressTracker::initialize`] and
/// [`ProgressTracker::set_status`]; derived values are recomputed on every
/// change.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    steps: BTreeMap<String, ActionableStep>,
    statuses: BTreeMap<String, StepStatus>,
    highest_completed_index: u32,
    total_steps: u32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: &[MindmapNode]) -> Self {
        let mut tracker = Self::new();
        tracker.initialize(nodes);
        tracker
    }

    /// Replaces all state with the actionable nodes found in `nodes`.
    pub fn initialize(&mut self, nodes: &[MindmapNode]) {
        let mut steps = BTreeMap::new();
        let mut statuses = BTreeMap::new();
        let mut total = 0;

        for node in nodes {
            let Some(index) = node.sequence_index() else {
                continue;
            };
            let title = if node.title.is_empty() {
                format!("Step {index}")
            } else {
                node.title.clone()
            };
            steps.insert(
                node.id.clone(),
                ActionableStep {
                    progress_index: index,
                    title,
                },
            );
            let status = match node.status {
                Some(StepStatus::InProgress) => StepStatus::InProgress,
                Some(StepStatus::Done) => StepStatus::Done,
                Some(StepStatus::Todo) | None => StepStatus::Todo,
            };
            statuses.insert(node.id.clone(), status);
            total = total.max(index);
        }

        self.steps = steps;
        self.statuses = statuses;
        self.total_steps = total;
        self.recompute();
        debug!(
            steps = self.steps.len(),
            total = self.total_steps,
            highest_completed = self.highest_completed_index,
            "progress initialized"
        );
    }

    /// Ignored for nodes that are not actionable.
    pub fn set_status(&mut self, node_id: &str, status: StepStatus) {
        if !self.steps.contains_key(node_id) {
            return;
        }
        self.statuses.insert(node_id.to_string(), status);
        self.recompute();
    }

    /// Advances a step along the status cycle and returns its new status.
    pub fn cycle_status(&mut self, node_id: &str) -> Option<StepStatus> {
        let next = self.status(node_id)?.next();
        self.set_status(node_id, next);
        Some(next)
    }

    pub fn status(&self, node_id: &str) -> Option<StepStatus> {
        self.statuses.get(node_id).copied()
    }

    pub fn step(&self, node_id: &str) -> Option<&ActionableStep> {
        self.steps.get(node_id)
    }

    pub fn is_actionable(&self, node_id: &str) -> bool {
        self.steps.contains_key(node_id)
    }

    pub fn is_next_step(&self, node_id: &str) -> bool {
        self.steps
            .get(node_id)
            .is_some_and(|step| step.progress_index == self.highest_completed_index + 1)
    }

    pub fn highest_completed_index(&self) -> u32 {
        self.highest_completed_index
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Share of the sequence up to the highest completed step, rounded.
    pub fn completion_percent(&self) -> u32 {
        if self.total_steps == 0 {
            return 0;
        }
        let ratio = self.highest_completed_index as f64 / self.total_steps as f64;
        (ratio * 100.0).round() as u32
    }

    /// Node carrying the given sequence index.
    pub fn step_at(&self, index: u32) -> Option<&str> {
        self.steps
            .iter()
            .find(|(_, step)| step.progress_index == index)
            .map(|(id, _)| id.as_str())
    }

    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        (1..=self.total_steps)
            .map(|index| {
                let node_id = self.step_at(index);
                let title = node_id
                    .and_then(|id| self.steps.get(id))
                    .map(|step| step.title.clone())
                    .unwrap_or_else(|| format!("Step {index}"));
                let state = if index <= self.highest_completed_index {
                    CheckpointState::Completed
                } else if index == self.highest_completed_index + 1 {
                    CheckpointState::Next
                } else {
                    CheckpointState::Pending
                };
                Checkpoint {
                    index,
                    node_id: node_id.map(str::to_string),
                    title,
                    state,
                }
            })
            .collect()
    }

    /// Writes the tracked statuses into `nodes`.
    pub fn apply_to(&self, nodes: &mut [MindmapNode]) {
        for node in nodes {
            if let Some(status) = self.statuses.get(&node.id) {
                node.status = Some(*status);
            }
        }
    }

    // Maximum index among done steps; deliberately not a contiguous prefix.
    fn recompute(&mut self) {
        self.highest_completed_index = self
            .statuses
            .iter()
            .filter(|(_, status)| **status == StepStatus::Done)
            .filter_map(|(id, _)| self.steps.get(id))
            .map(|step| step.progress_index)
            .max()
            .unwrap_or(0);
    }
}
