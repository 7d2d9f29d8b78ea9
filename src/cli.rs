use crate::config::{Config, load_config};
use crate::ir::StepStatus;
use crate::layout::NoViewport;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_mindmap;
use crate::render::{render_svg, write_output_svg};
use crate::sample::sample_mindmap;
use crate::session::MindmapSession;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "ideamap",
    version,
    about = "Lay out a generated app-idea mindmap and track its steps"
)]
pub struct Args {
    /// Mindmap JSON or raw model reply, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// App idea used for default root title and details
    #[arg(long = "idea", default_value = "")]
    pub idea: String,

    /// Mark a step as done (repeatable)
    #[arg(long = "done", value_name = "ID")]
    pub done: Vec<String>,

    /// Advance a step one status along todo, inprogress, done (repeatable)
    #[arg(long = "cycle", value_name = "ID")]
    pub cycle: Vec<String>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let session = build_session(&input, &args, &config);
    let Some(mindmap) = session.mindmap() else {
        return Err(anyhow::anyhow!("No mindmap loaded"));
    };
    if session.layout().is_empty() {
        return Err(anyhow::anyhow!("Mindmap has no root node"));
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(session.layout(), mindmap, Some(session.progress()), &config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(session.layout(), mindmap, Some(session.progress()), &config);
            write_png(&svg, &output, &config)?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => {
                write_layout_dump(path, session.layout(), mindmap, Some(session.progress()))?
            }
            None => {
                let dump =
                    LayoutDump::from_layout(session.layout(), mindmap, Some(session.progress()));
                println!("{}", serde_json::to_string_pretty(&dump)?);
            }
        },
    }

    Ok(())
}

/// Parses, lays out and applies the requested status changes in order:
/// every `--done` first, then every `--cycle`. Unparseable input falls back
/// to the built-in sample mindmap for the idea.
fn build_session(input: &str, args: &Args, config: &Config) -> MindmapSession {
    let mindmap = match parse_mindmap(input, &args.idea) {
        Ok(mindmap) => mindmap,
        Err(err) => {
            warn!(error = %err, "could not parse mindmap; using the sample mindmap");
            sample_mindmap(&args.idea)
        }
    };
    let mut session = MindmapSession::new(config.layout.clone());
    let ticket = session.begin_request();
    session.accept(ticket, mindmap, &mut NoViewport);

    for id in &args.done {
        if !session.progress().is_actionable(id) {
            warn!(node = %id, "--done ignored; not an actionable step");
        }
        session.set_step_status(id, StepStatus::Done);
    }
    for id in &args.cycle {
        if session.cycle_step(id).is_none() {
            warn!(node = %id, "--cycle ignored; not an actionable step");
        }
    }
    session
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
