use crate::config::{Config, RenderConfig};
use crate::ir::{Mindmap, NodeKind};
use crate::layout::text::{TextBlock, measure_title};
use crate::layout::{EdgeLayout, FitViewRequest, Layout, NodeLayout};
use crate::progress::{CheckpointState, ProgressTracker};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const HEADER_HEIGHT: f32 = 56.0;
const NODE_PADDING: f32 = 12.0;

/// Renders a laid-out mindmap as a standalone SVG document sized to the
/// render config. The drawing is fitted with the layout's fit-view settings,
/// the same way the interactive view is.
pub fn render_svg(
    layout: &Layout,
    mindmap: &Mindmap,
    progress: Option<&ProgressTracker>,
    config: &Config,
) -> String {
    let theme = &config.theme;
    let fit = &config.layout;
    let config = &config.render;
    let width = config.width.max(200.0);
    let height = config.height.max(200.0);
    let header = progress.filter(|tracker| config.show_progress && tracker.total_steps() > 0);
    let top = if header.is_some() { HEADER_HEIGHT } else { 0.0 };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    if let Some(tracker) = header {
        svg.push_str(&progress_header_svg(tracker, theme, width));
    }

    if let Some(bounds) = layout.bounds() {
        let view = FitViewRequest::new(bounds, fit).transform_for(width, height - top);
        svg.push_str(&format!(
            "<g transform=\"translate({:.2} {:.2}) scale({:.4})\">",
            view.x,
            view.y + top,
            view.zoom
        ));
        for edge in &layout.edges {
            svg.push_str(&edge_svg(edge, theme));
        }
        for node in &layout.nodes {
            svg.push_str(&node_svg(node, mindmap, progress, theme, config));
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn edge_svg(edge: &EdgeLayout, theme: &Theme) -> String {
    if edge.points.len() < 2 {
        return String::new();
    }
    format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\"/>",
        points_to_path(&edge.points),
        theme.line_color
    )
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for (idx, point) in points.iter().enumerate() {
        let op = if idx == 0 { "M" } else { " L" };
        d.push_str(&format!("{op} {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn node_svg(
    node: &NodeLayout,
    mindmap: &Mindmap,
    progress: Option<&ProgressTracker>,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let title = mindmap
        .node(&node.id)
        .map(|source| source.title.as_str())
        .unwrap_or(node.id.as_str());
    let x = node.x - node.width / 2.0;
    let y = node.y - node.height / 2.0;
    let radius = if node.kind == NodeKind::Root { 18.0 } else { 10.0 };

    let is_next = progress.is_some_and(|tracker| tracker.is_next_step(&node.id));
    let (stroke, stroke_width) = if is_next {
        (theme.next_color.as_str(), 3.0)
    } else {
        (theme.border_color.as_str(), 1.2)
    };

    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"node {}\" data-id=\"{}\">",
        node.kind.tag(),
        escape_xml(&node.id)
    ));
    out.push_str(&format!(
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
        node.width,
        node.height,
        theme.fill_for(node.kind)
    ));

    let font_size = match node.kind {
        NodeKind::Root => theme.font_size * 1.2,
        NodeKind::Category => theme.font_size * 1.05,
        NodeKind::SubCategory | NodeKind::SubSubCategory | NodeKind::Step => theme.font_size,
    };
    let label = measure_title(title, font_size, node.width - NODE_PADDING * 2.0, config);
    out.push_str(&text_block_svg(
        node.x,
        node.y,
        &label,
        font_size,
        theme.text_for(node.kind),
        theme,
        config,
    ));

    if let Some(status) = progress.and_then(|tracker| tracker.status(&node.id)) {
        let cx = x + node.width - 10.0;
        let cy = y + 10.0;
        out.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"5\" fill=\"{}\"><title>{}</title></circle>",
            theme.status_color(status),
            status.tag()
        ));
    }

    out.push_str("</g>");
    out
}

fn text_block_svg(
    x: f32,
    y: f32,
    label: &TextBlock,
    font_size: f32,
    fill: &str,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let line_height = font_size * config.label_line_height;
    let total_height = label.lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + font_size;
    let mut text = String::new();

    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size:.1}\" fill=\"{fill}\">",
        theme.font_family
    ));
    for (idx, line) in label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

/// Linear strip of checkpoints with the completion percentage.
fn progress_header_svg(tracker: &ProgressTracker, theme: &Theme, width: f32) -> String {
    let checkpoints = tracker.checkpoints();
    let left = 80.0;
    let right = width - 80.0;
    let line_y = HEADER_HEIGHT / 2.0;
    let step = if checkpoints.len() > 1 {
        (right - left) / (checkpoints.len() - 1) as f32
    } else {
        0.0
    };

    let mut out = String::from("<g class=\"progress\">");
    out.push_str(&format!(
        "<line x1=\"{left:.2}\" y1=\"{line_y:.2}\" x2=\"{right:.2}\" y2=\"{line_y:.2}\" stroke=\"{}\" stroke-width=\"4\" stroke-linecap=\"round\"/>",
        theme.progress_track
    ));
    for (idx, checkpoint) in checkpoints.iter().enumerate() {
        let cx = left + step * idx as f32;
        let fill = match checkpoint.state {
            CheckpointState::Completed => theme.done_color.as_str(),
            CheckpointState::Next => theme.next_color.as_str(),
            CheckpointState::Pending => theme.todo_color.as_str(),
        };
        out.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{line_y:.2}\" r=\"7\" fill=\"{fill}\"><title>{}</title></circle>",
            escape_xml(&checkpoint.title)
        ));
    }
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}%</text>",
        width - 16.0,
        line_y + theme.font_size / 3.0,
        theme.font_family,
        theme.font_size,
        theme.text_color,
        tracker.completion_percent()
    ));
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
