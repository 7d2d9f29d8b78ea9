use crate::ir::NodeKind;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Estimated box sizes per node kind, larger for higher levels of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindFootprints {
    pub root: Footprint,
    pub category: Footprint,
    pub sub_category: Footprint,
    pub sub_sub_category: Footprint,
    pub step: Footprint,
}

impl KindFootprints {
    pub fn for_kind(&self, kind: NodeKind) -> Footprint {
        match kind {
            NodeKind::Root => self.root,
            NodeKind::Category => self.category,
            NodeKind::SubCategory => self.sub_category,
            NodeKind::SubSubCategory => self.sub_sub_category,
            NodeKind::Step => self.step,
        }
    }
}

impl Default for KindFootprints {
    fn default() -> Self {
        Self {
            root: Footprint::new(240.0, 90.0),
            category: Footprint::new(210.0, 72.0),
            sub_category: Footprint::new(190.0, 64.0),
            sub_sub_category: Footprint::new(180.0, 58.0),
            step: Footprint::new(160.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub category_radius: f32,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin: f32,
    pub fallback_jitter: f32,
    pub fallback_seed: u64,
    pub fit_padding: f32,
    pub fit_min_zoom: f32,
    pub fit_max_zoom: f32,
    pub fit_delay_ms: u64,
    pub footprints: KindFootprints,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            category_radius: 420.0,
            node_spacing: 30.0,
            rank_spacing: 70.0,
            margin: 8.0,
            fallback_jitter: 50.0,
            fallback_seed: 0x1dea_3a90,
            fit_padding: 0.2,
            fit_min_zoom: 0.2,
            fit_max_zoom: 1.5,
            fit_delay_ms: 100,
            footprints: KindFootprints::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub max_label_width_chars: usize,
    pub label_line_height: f32,
    pub show_progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1200.0,
            background: "#FFFFFF".to_string(),
            max_label_width_chars: 22,
            label_line_height: 1.3,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::light();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FootprintFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FootprintsFile {
    root: Option<FootprintFile>,
    category: Option<FootprintFile>,
    sub_category: Option<FootprintFile>,
    sub_sub_category: Option<FootprintFile>,
    step: Option<FootprintFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    category_radius: Option<f32>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    margin: Option<f32>,
    fallback_jitter: Option<f32>,
    fallback_seed: Option<u64>,
    fit_padding: Option<f32>,
    fit_min_zoom: Option<f32>,
    fit_max_zoom: Option<f32>,
    fit_delay_ms: Option<u64>,
    footprints: Option<FootprintsFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    max_label_width_chars: Option<usize>,
    label_line_height: Option<f32>,
    show_progress: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    line_color: Option<String>,
    text_color: Option<String>,
    root_fill: Option<String>,
    category_fill: Option<String>,
    sub_category_fill: Option<String>,
    step_fill: Option<String>,
    border_color: Option<String>,
    todo_color: Option<String>,
    in_progress_color: Option<String>,
    done_color: Option<String>,
    next_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

/// Loads a JSON5 config file of partial overrides on top of the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "dark" {
            config.theme = Theme::dark();
        } else if theme_name == "light" || theme_name == "default" {
            config.theme = Theme::light();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.root_fill {
            config.theme.root_fill = v;
        }
        if let Some(v) = vars.category_fill {
            config.theme.category_fill = v;
        }
        if let Some(v) = vars.sub_category_fill {
            config.theme.sub_category_fill = v;
        }
        if let Some(v) = vars.step_fill {
            config.theme.step_fill = v;
        }
        if let Some(v) = vars.border_color {
            config.theme.border_color = v;
        }
        if let Some(v) = vars.todo_color {
            config.theme.todo_color = v;
        }
        if let Some(v) = vars.in_progress_color {
            config.theme.in_progress_color = v;
        }
        if let Some(v) = vars.done_color {
            config.theme.done_color = v;
        }
        if let Some(v) = vars.next_color {
            config.theme.next_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout);
    }

    if let Some(render) = parsed.render {
        if let Some(v) = finite("width", render.width) {
            config.render.width = v;
        }
        if let Some(v) = finite("height", render.height) {
            config.render.height = v;
        }
        if let Some(v) = render.max_label_width_chars {
            config.render.max_label_width_chars = v;
        }
        if let Some(v) = finite("label_line_height", render.label_line_height) {
            config.render.label_line_height = v;
        }
        if let Some(v) = render.show_progress {
            config.render.show_progress = v;
        }
    }

    Ok(config)
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    if let Some(v) = finite("category_radius", file.category_radius) {
        layout.category_radius = v;
    }
    if let Some(v) = finite("node_spacing", file.node_spacing) {
        layout.node_spacing = v;
    }
    if let Some(v) = finite("rank_spacing", file.rank_spacing) {
        layout.rank_spacing = v;
    }
    if let Some(v) = finite("margin", file.margin) {
        layout.margin = v;
    }
    if let Some(v) = finite("fallback_jitter", file.fallback_jitter) {
        layout.fallback_jitter = v.max(0.0);
    }
    if let Some(v) = file.fallback_seed {
        layout.fallback_seed = v;
    }
    if let Some(v) = finite("fit_padding", file.fit_padding) {
        layout.fit_padding = v.max(0.0);
    }
    if let Some(v) = finite("fit_min_zoom", file.fit_min_zoom) {
        layout.fit_min_zoom = v;
    }
    if let Some(v) = finite("fit_max_zoom", file.fit_max_zoom) {
        layout.fit_max_zoom = v;
    }
    if let Some(v) = file.fit_delay_ms {
        layout.fit_delay_ms = v;
    }
    if let Some(footprints) = file.footprints {
        let targets = [
            (&mut layout.footprints.root, footprints.root),
            (&mut layout.footprints.category, footprints.category),
            (&mut layout.footprints.sub_category, footprints.sub_category),
            (&mut layout.footprints.sub_sub_category, footprints.sub_sub_category),
            (&mut layout.footprints.step, footprints.step),
        ];
        for (target, value) in targets {
            let Some(value) = value else {
                continue;
            };
            if let Some(width) = finite("footprint width", value.width) {
                target.width = width.max(1.0);
            }
            if let Some(height) = finite("footprint height", value.height) {
                target.height = height.max(1.0);
            }
        }
    }
}

/// JSON5 accepts `Infinity` and `NaN`; such overrides are dropped.
fn finite(key: &str, value: Option<f32>) -> Option<f32> {
    let value = value?;
    if value.is_finite() {
        Some(value)
    } else {
        warn!(key, value, "ignoring non-finite config value");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scale_footprints_by_kind() {
        let footprints = KindFootprints::default();
        let root = footprints.for_kind(NodeKind::Root);
        let category = footprints.for_kind(NodeKind::Category);
        let step = footprints.for_kind(NodeKind::Step);
        assert!(root.width > category.width);
        assert!(category.width > step.width);
        assert!(category.height > step.height);
    }

    #[test]
    fn parses_json5_overrides() {
        let config = parse_config(
            r##"{
                // comments are allowed
                theme: "dark",
                layout: {
                    categoryRadius: 300,
                    footprints: { step: { width: 120 } },
                },
                render: { width: 800, showProgress: false },
                themeVariables: { nextColor: "#FF0000" },
            }"##,
        )
        .unwrap();
        assert_eq!(config.layout.category_radius, 300.0);
        assert_eq!(config.layout.footprints.step.width, 120.0);
        assert_eq!(config.layout.footprints.step.height, 50.0);
        assert_eq!(config.render.width, 800.0);
        assert!(!config.render.show_progress);
        assert_eq!(config.theme.next_color, "#FF0000");
        assert_eq!(config.render.background, Theme::dark().background);
    }

    #[test]
    fn non_finite_overrides_are_ignored() {
        let config = parse_config(
            r#"{
                layout: {
                    fallbackJitter: Infinity,
                    fitMinZoom: NaN,
                    fitMaxZoom: -Infinity,
                    fitPadding: 0.5,
                    footprints: { step: { width: Infinity } },
                },
                render: { width: NaN },
            }"#,
        )
        .unwrap();
        let defaults = LayoutConfig::default();
        assert_eq!(config.layout.fallback_jitter, defaults.fallback_jitter);
        assert_eq!(config.layout.fit_min_zoom, defaults.fit_min_zoom);
        assert_eq!(config.layout.fit_max_zoom, defaults.fit_max_zoom);
        assert_eq!(config.layout.fit_padding, 0.5);
        assert_eq!(config.layout.footprints.step.width, 160.0);
        assert_eq!(config.render.width, 1600.0);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.category_radius, 420.0);
        assert_eq!(config.layout.fit_delay_ms, 100);
    }
}
