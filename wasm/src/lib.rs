use ideamap::config::Config;
use ideamap::layout::NoViewport;
use ideamap::layout_dump::LayoutDump;
use ideamap::render::render_svg;
use ideamap::{MindmapSession, StepStatus, Theme, parse_mindmap};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindmapOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    app_idea: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    #[serde(default)]
    statuses: Vec<StatusOverride>,
}

#[derive(Debug, Deserialize)]
struct StatusOverride {
    id: String,
    status: String,
}

fn parse_options(options_json: Option<String>) -> Result<MindmapOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(MindmapOptions::default()),
    }
}

fn build_config(options: &MindmapOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("dark") {
        config.theme = Theme::dark();
        config.render.background = config.theme.background.clone();
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    config
}

fn load_session(content: &str, options: &MindmapOptions, config: &Config) -> Result<MindmapSession, JsValue> {
    let mindmap = parse_mindmap(content, options.app_idea.as_deref().unwrap_or_default())
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let mut session = MindmapSession::new(config.layout.clone());
    session.load(mindmap, &mut NoViewport);
    for entry in &options.statuses {
        if let Some(status) = StepStatus::from_tag(&entry.status) {
            session.set_step_status(&entry.id, status);
        }
    }
    Ok(session)
}

/// Lays out a mindmap and returns the positioned nodes, edges and progress as JSON.
#[wasm_bindgen]
pub fn layout_mindmap_json(content: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let session = load_session(content, &options, &config)?;
    let mindmap = session
        .mindmap()
        .ok_or_else(|| JsValue::from_str("no mindmap loaded"))?;
    let dump = LayoutDump::from_layout(session.layout(), mindmap, Some(session.progress()));
    serde_json::to_string(&dump).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_mindmap_svg(content: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let session = load_session(content, &options, &config)?;
    let mindmap = session
        .mindmap()
        .ok_or_else(|| JsValue::from_str("no mindmap loaded"))?;
    Ok(render_svg(session.layout(), mindmap, Some(session.progress()), &config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{"nodes": [
        {"id": "core-1", "type": "core"},
        {"id": "development", "type": "category", "parentId": "core-1", "title": "Development"},
        {"id": "d1", "type": "step", "parentId": "development", "title": "Scaffold", "stepIndex": 0, "guidance": "g"}
    ]}"#;

    #[test]
    fn builds_session_with_status_overrides() {
        let options: MindmapOptions = serde_json::from_str(
            r#"{"theme": "dark", "appIdea": "Plant swap", "statuses": [{"id": "d1", "status": "done"}]}"#,
        )
        .unwrap();
        let config = build_config(&options);
        assert_eq!(config.theme.background, Theme::dark().background);

        let session = load_session(MAP, &options, &config).unwrap();
        assert_eq!(session.mindmap().unwrap().root().unwrap().title, "Plant swap");
        assert_eq!(session.progress().highest_completed_index(), 1);

        let svg = render_svg(
            session.layout(),
            session.mindmap().unwrap(),
            Some(session.progress()),
            &config,
        );
        assert!(svg.contains("Scaffold"));
        assert!(svg.contains("100%"));
    }
}
