use crate::ir::{Mindmap, MindmapNode, NodeKind, StepStatus};
use crate::sequence::assign_progress_order;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

static FENCED_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?([\s\S]*?)```").unwrap());

const ROOT_TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("content does not look like a JSON object")]
    NotAnObject,
    #[error("mindmap JSON is missing the `nodes` array")]
    MissingNodes,
    #[error("invalid mindmap JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct MindmapDocument {
    nodes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    parent_id: Option<String>,
    title: Option<String>,
    details: Option<String>,
    step_index: Option<f64>,
    guidance: Option<String>,
    cursor_prompt: Option<String>,
    progress_index: Option<f64>,
    status: Option<String>,
    data: Option<RawNodeData>,
}

/// Payload of an already processed node, where everything but the id, type
/// and parent sits under `data`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeData {
    title: Option<String>,
    details: Option<String>,
    step_index: Option<f64>,
    guidance: Option<String>,
    cursor_prompt: Option<String>,
    progress_index: Option<f64>,
    status: Option<String>,
}

impl RawNode {
    /// Folds the `data` payload over the top-level fields; `data` wins.
    fn flatten(mut self) -> Self {
        let Some(data) = self.data.take() else {
            return self;
        };
        self.title = data.title.or(self.title);
        self.details = data.details.or(self.details);
        self.step_index = data.step_index.or(self.step_index);
        self.guidance = data.guidance.or(self.guidance);
        self.cursor_prompt = data.cursor_prompt.or(self.cursor_prompt);
        self.progress_index = data.progress_index.or(self.progress_index);
        self.status = data.status.or(self.status);
        self
    }
}

/// Pulls the JSON object out of a model reply, dropping markdown fences.
pub fn extract_json(content: &str) -> Result<&str, ParseError> {
    let trimmed = content.trim();
    let cleaned = match FENCED_JSON_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    };
    if !cleaned.starts_with('{') || !cleaned.ends_with('}') {
        return Err(ParseError::NotAnObject);
    }
    Ok(cleaned)
}

/// Parses a generated mindmap: either a raw model reply or an already
/// processed `{ "nodes": [...] }` document whose node fields may be nested
/// under `data`. Malformed nodes are skipped with a
/// warning. Steps are renumbered unless the input already carries a global
/// progress order.
pub fn parse_mindmap(content: &str, app_idea: &str) -> Result<Mindmap, ParseError> {
    let json = extract_json(content)?;
    let document: MindmapDocument = serde_json::from_str(json)?;
    let raw_nodes = document.nodes.ok_or(ParseError::MissingNodes)?;
    debug!(count = raw_nodes.len(), "parsing mindmap nodes");

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut seen: HashSet<String> = HashSet::new();
    for value in raw_nodes {
        let raw: RawNode = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "skipping malformed node");
                continue;
            }
        };
        let Some(node) = normalize_node(raw.flatten(), app_idea) else {
            continue;
        };
        if !seen.insert(node.id.clone()) {
            warn!(node = %node.id, "skipping duplicate node id");
            continue;
        }
        nodes.push(node);
    }

    for node in &nodes {
        if let Some(parent) = node.parent_id.as_deref()
            && !seen.contains(parent)
        {
            warn!(node = %node.id, parent, "parent not found; no edge created");
        }
    }

    let has_order = nodes.iter().any(|node| node.sequence_index().is_some());
    if !has_order {
        assign_progress_order(&mut nodes);
    }

    Ok(Mindmap::new(nodes))
}

fn normalize_node(raw: RawNode, app_idea: &str) -> Option<MindmapNode> {
    let (Some(id), Some(tag)) = (raw.id.filter(|id| !id.is_empty()), raw.kind) else {
        warn!("skipping node without id or type");
        return None;
    };
    let Some(kind) = NodeKind::from_tag(&tag) else {
        warn!(node = %id, kind = %tag, "skipping node of unknown type");
        return None;
    };

    let mut node = MindmapNode::new(&id, kind, None, "");
    node.parent_id = raw.parent_id.filter(|parent| !parent.is_empty());

    match kind {
        NodeKind::Step => {
            let (Some(step_index), Some(guidance)) =
                (raw.step_index.and_then(whole_index), raw.guidance)
            else {
                warn!(node = %id, "step is missing stepIndex or guidance; skipping");
                return None;
            };
            node.title = non_empty(raw.title).unwrap_or_else(|| "Untitled Step".to_string());
            node.step_index = Some(step_index);
            node.guidance = Some(guidance);
            node.cursor_prompt = raw.cursor_prompt;
            node.progress_index = raw.progress_index.and_then(whole_index);
            node.status = raw.status.as_deref().and_then(StepStatus::from_tag);
        }
        NodeKind::Root => {
            node.title = non_empty(raw.title).unwrap_or_else(|| root_title(app_idea));
            node.details = Some(
                non_empty(raw.details).unwrap_or_else(|| format!("Core idea: {app_idea}")),
            );
        }
        NodeKind::Category | NodeKind::SubCategory | NodeKind::SubSubCategory => {
            node.title = non_empty(raw.title).unwrap_or_else(|| format!("Untitled {tag}"));
            node.details =
                Some(non_empty(raw.details).unwrap_or_else(|| "No details provided.".to_string()));
        }
    }
    Some(node)
}

/// JSON numbers arrive as floats; negatives clamp to zero and fractions
/// truncate. Non-finite values are rejected.
fn whole_index(value: f64) -> Option<u32> {
    value.is_finite().then(|| value.max(0.0).min(u32::MAX as f64) as u32)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub(crate) fn root_title(app_idea: &str) -> String {
    if app_idea.chars().count() > ROOT_TITLE_MAX_CHARS {
        let head: String = app_idea.chars().take(ROOT_TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        app_idea.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Here you go:
```json
{
  "nodes": [
    {"id": "core-1", "type": "core", "parentId": null, "title": "", "details": ""},
    {"id": "development", "type": "category", "parentId": "core-1", "title": "Development Roadmap", "details": "Build it"},
    {"id": "research", "type": "category", "parentId": "core-1", "title": "Market Research", "details": "Study it"},
    {"id": "dev-be", "type": "sub-category", "parentId": "development", "title": "Backend"},
    {"id": "dev-be-auth", "type": "sub-sub-category", "parentId": "dev-be", "title": "Auth"},
    {"id": "dev-s1", "type": "step", "parentId": "dev-be-auth", "title": "Pick provider", "stepIndex": 0, "guidance": "Compare", "cursorPrompt": "Use {{TECH_SPEC_AUTH}}"},
    {"id": "dev-s2", "type": "step", "parentId": "dev-be-auth", "title": "Wire login", "stepIndex": 1, "guidance": "Implement"},
    {"id": "res-s1", "type": "step", "parentId": "research", "title": "Survey", "stepIndex": 0, "guidance": "Ask", "cursorPrompt": null},
    {"id": "bad-step", "type": "step", "parentId": "research", "title": "No guidance", "stepIndex": 1},
    {"id": "weird", "type": "marketing", "parentId": "core-1", "title": "Unknown"},
    {"type": "category", "title": "No id"},
    {"id": "lost", "type": "sub-category", "parentId": "ghost", "title": "Lost"}
  ]
}
```
Enjoy!"#;

    #[test]
    fn extracts_fenced_json() {
        assert_eq!(extract_json("```json\n{\"a\":1}\n```").unwrap(), "{\"a\":1}");
        assert_eq!(extract_json("  {\"a\":1} ").unwrap(), "{\"a\":1}");
        assert!(matches!(extract_json("[1, 2]"), Err(ParseError::NotAnObject)));
        assert!(matches!(extract_json("sorry"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn parses_model_reply() {
        let idea = "A marketplace for renting camping gear between neighbours";
        let map = parse_mindmap(REPLY, idea).unwrap();
        let ids: Vec<&str> = map.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "core-1",
                "development",
                "research",
                "dev-be",
                "dev-be-auth",
                "dev-s1",
                "dev-s2",
                "res-s1",
                "lost",
            ]
        );

        let root = map.root().unwrap();
        assert_eq!(root.title, "A marketplace for renting camp...");
        assert_eq!(root.details.as_deref(), Some(&*format!("Core idea: {idea}")));
        assert_eq!(
            map.node("dev-be").unwrap().details.as_deref(),
            Some("No details provided.")
        );
        assert_eq!(
            map.node("dev-s1").unwrap().cursor_prompt.as_deref(),
            Some("Use {{TECH_SPEC_AUTH}}")
        );

        // research precedes development
        assert_eq!(map.node("res-s1").unwrap().progress_index, Some(1));
        assert_eq!(map.node("dev-s1").unwrap().progress_index, Some(2));
        assert_eq!(map.node("dev-s2").unwrap().progress_index, Some(3));
        assert_eq!(map.node("dev-s2").unwrap().status, Some(StepStatus::Todo));

        // no edge towards the missing parent
        assert!(map.edges.iter().all(|edge| edge.target != "lost"));
        assert_eq!(map.edges.len(), 7);
    }

    #[test]
    fn keeps_existing_progress_order() {
        let doc = r#"{"nodes": [
            {"id": "core-1", "type": "core", "title": "Idea"},
            {"id": "research", "type": "category", "parentId": "core-1", "title": "R"},
            {"id": "s1", "type": "step", "parentId": "research", "title": "A", "stepIndex": 0, "guidance": "g", "progressIndex": 2, "status": "done"},
            {"id": "s2", "type": "step", "parentId": "research", "title": "B", "stepIndex": 1, "guidance": "g", "progressIndex": 1, "status": "inprogress"}
        ], "edges": []}"#;
        let map = parse_mindmap(doc, "Idea").unwrap();
        assert_eq!(map.node("s1").unwrap().progress_index, Some(2));
        assert_eq!(map.node("s1").unwrap().status, Some(StepStatus::Done));
        assert_eq!(map.node("s2").unwrap().status, Some(StepStatus::InProgress));
        assert_eq!(map.edges.len(), 3);
    }

    #[test]
    fn missing_nodes_array_is_an_error() {
        assert!(matches!(
            parse_mindmap("{\"items\": []}", "x"),
            Err(ParseError::MissingNodes)
        ));
        assert!(matches!(
            parse_mindmap("{\"nodes\": [}", "x"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn accepts_float_step_indices() {
        let doc = r#"{"nodes": [
            {"id": "core-1", "type": "core", "title": "Idea"},
            {"id": "research", "type": "category", "parentId": "core-1", "title": "R"},
            {"id": "s1", "type": "step", "parentId": "research", "title": "A", "stepIndex": 1.0, "guidance": "g"},
            {"id": "s2", "type": "step", "parentId": "research", "title": "B", "stepIndex": -2, "guidance": "g"}
        ]}"#;
        let map = parse_mindmap(doc, "Idea").unwrap();
        assert_eq!(map.nodes.len(), 4);
        assert_eq!(map.node("s1").unwrap().step_index, Some(1));
        assert_eq!(map.node("s2").unwrap().step_index, Some(0));
        // s2 sorts first within the category
        assert_eq!(map.node("s2").unwrap().progress_index, Some(1));
        assert_eq!(map.node("s1").unwrap().progress_index, Some(2));
    }

    #[test]
    fn reads_fields_nested_under_data() {
        let doc = r#"{"nodes": [
            {"id": "core-1", "type": "core", "parentId": null, "data": {"title": "Idea", "details": "Core"}},
            {"id": "development", "type": "category", "parentId": "core-1", "data": {"title": "Development Roadmap", "details": "Build"}},
            {"id": "d1", "type": "step", "parentId": "development", "data": {"title": "Scaffold", "guidance": "g", "stepIndex": 0, "progressIndex": 1, "status": "done"}},
            {"id": "d2", "type": "step", "parentId": "development", "title": "Stale", "data": {"title": "Deploy", "guidance": "g", "stepIndex": 1, "progressIndex": 2, "status": "todo"}}
        ]}"#;
        let map = parse_mindmap(doc, "Ignored").unwrap();
        assert_eq!(map.node("development").unwrap().title, "Development Roadmap");
        assert_eq!(map.node("d2").unwrap().title, "Deploy");
        assert_eq!(map.node("d1").unwrap().progress_index, Some(1));
        assert_eq!(map.node("d1").unwrap().status, Some(StepStatus::Done));
        assert_eq!(map.node("d2").unwrap().status, Some(StepStatus::Todo));
    }

    #[test]
    fn short_idea_is_used_verbatim_as_root_title() {
        let map = parse_mindmap(r#"{"nodes":[{"id":"c","type":"core"}]}"#, "Todo app").unwrap();
        assert_eq!(map.root().unwrap().title, "Todo app");
    }
}
