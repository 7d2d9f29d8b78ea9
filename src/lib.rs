#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod progress;
pub mod render;
pub mod sample;
pub mod sequence;
pub mod session;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{Mindmap, MindmapEdge, MindmapNode, NodeKind, StepStatus};
pub use layout::{Layout, compute_layout};
pub use parser::parse_mindmap;
pub use progress::ProgressTracker;
pub use sample::sample_mindmap;
pub use session::MindmapSession;
pub use theme::Theme;
