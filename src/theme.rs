use crate::ir::{NodeKind, StepStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub line_color: String,
    pub text_color: String,
    pub border_color: String,
    pub root_fill: String,
    pub root_text: String,
    pub category_fill: String,
    pub sub_category_fill: String,
    pub step_fill: String,
    pub todo_color: String,
    pub in_progress_color: String,
    pub done_color: String,
    pub next_color: String,
    pub progress_track: String,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            line_color: "#94A3B8".to_string(),
            text_color: "#1E293B".to_string(),
            border_color: "#CBD5E1".to_string(),
            root_fill: "#4F46E5".to_string(),
            root_text: "#FFFFFF".to_string(),
            category_fill: "#E0E7FF".to_string(),
            sub_category_fill: "#F1F5F9".to_string(),
            step_fill: "#FFFFFF".to_string(),
            todo_color: "#D1D5DB".to_string(),
            in_progress_color: "#F59E0B".to_string(),
            done_color: "#3B82F6".to_string(),
            next_color: "#FACC15".to_string(),
            progress_track: "#E5E7EB".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#0F172A".to_string(),
            line_color: "#475569".to_string(),
            text_color: "#E2E8F0".to_string(),
            border_color: "#334155".to_string(),
            root_fill: "#6366F1".to_string(),
            root_text: "#FFFFFF".to_string(),
            category_fill: "#1E293B".to_string(),
            sub_category_fill: "#172033".to_string(),
            step_fill: "#111827".to_string(),
            todo_color: "#4B5563".to_string(),
            in_progress_color: "#F59E0B".to_string(),
            done_color: "#3B82F6".to_string(),
            next_color: "#FACC15".to_string(),
            progress_track: "#374151".to_string(),
        }
    }

    pub fn fill_for(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Root => &self.root_fill,
            NodeKind::Category => &self.category_fill,
            NodeKind::SubCategory | NodeKind::SubSubCategory => &self.sub_category_fill,
            NodeKind::Step => &self.step_fill,
        }
    }

    pub fn text_for(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Root => &self.root_text,
            NodeKind::Category
            | NodeKind::SubCategory
            | NodeKind::SubSubCategory
            | NodeKind::Step => &self.text_color,
        }
    }

    pub fn status_color(&self, status: StepStatus) -> &str {
        match status {
            StepStatus::Todo => &self.todo_color,
            StepStatus::InProgress => &self.in_progress_color,
            StepStatus::Done => &self.done_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
