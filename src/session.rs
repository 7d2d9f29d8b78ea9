use crate::config::LayoutConfig;
use crate::ir::{Mindmap, StepStatus};
use crate::layout::{FitViewRequest, Layout, ViewportHost, compute_layout};
use crate::progress::ProgressTracker;
use tracing::{debug, warn};

/// Identifies one generation request; only the latest ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// The single owner of a displayed mindmap: its tree, positions and progress.
#[derive(Debug, Clone, Default)]
pub struct MindmapSession {
    config: LayoutConfig,
    mindmap: Option<Mindmap>,
    layout: Layout,
    progress: ProgressTracker,
    latest_request: u64,
}

impl MindmapSession {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn begin_request(&mut self) -> RequestTicket {
        self.latest_request += 1;
        RequestTicket(self.latest_request)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest_request
    }

    /// Installs the tree produced for `ticket`. Stale responses are dropped
    /// and `false` is returned. The tree is owned by the session from here on.
    pub fn accept(
        &mut self,
        ticket: RequestTicket,
        mindmap: Mindmap,
        host: &mut dyn ViewportHost,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.latest_request, "dropping stale mindmap");
            return false;
        }
        self.load(mindmap, host);
        true
    }

    /// Lays out `mindmap`, resets progress and asks the host to fit the view.
    pub fn load(&mut self, mindmap: Mindmap, host: &mut dyn ViewportHost) {
        let layout = compute_layout(&mindmap, &self.config);
        if layout.is_empty() {
            warn!("mindmap could not be laid out");
        }
        self.progress.initialize(&mindmap.nodes);
        if let Some(bounds) = layout.bounds() {
            host.request_fit_view(FitViewRequest::new(bounds, &self.config));
        }
        self.layout = layout;
        self.mindmap = Some(mindmap);
    }

    pub fn clear(&mut self) {
        self.mindmap = None;
        self.layout = Layout::default();
        self.progress = ProgressTracker::default();
    }

    pub fn mindmap(&self) -> Option<&Mindmap> {
        self.mindmap.as_ref()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_step_status(&mut self, node_id: &str, status: StepStatus) {
        self.progress.set_status(node_id, status);
    }

    pub fn cycle_step(&mut self, node_id: &str) -> Option<StepStatus> {
        self.progress.cycle_status(node_id)
    }

    /// Copy of the current tree with the tracked statuses written in.
    pub fn snapshot(&self) -> Option<Mindmap> {
        let mut mindmap = self.mindmap.clone()?;
        self.progress.apply_to(&mut mindmap.nodes);
        Some(mindmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{MindmapNode, NodeKind};
    use crate::layout::NoViewport;

    #[derive(Default)]
    struct RecordingHost {
        requests: Vec<FitViewRequest>,
    }

    impl ViewportHost for RecordingHost {
        fn request_fit_view(&mut self, request: FitViewRequest) {
            self.requests.push(request);
        }
    }

    fn tree(title: &str) -> Mindmap {
        Mindmap::new(vec![
            MindmapNode::new("core-1", NodeKind::Root, None, title),
            MindmapNode::new("development", NodeKind::Category, Some("core-1"), "Development"),
            MindmapNode::step("dev-step-1", "development", "Set up repo", 1),
        ])
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut session = MindmapSession::default();
        let mut host = RecordingHost::default();
        let first = session.begin_request();
        let second = session.begin_request();
        assert!(session.accept(second, tree("fresh"), &mut host));
        assert!(!session.accept(first, tree("stale"), &mut host));
        assert_eq!(session.mindmap().unwrap().root().unwrap().title, "fresh");
        assert_eq!(host.requests.len(), 1);
        assert_eq!(host.requests[0].delay_ms, 100);
    }

    #[test]
    fn load_initializes_progress() {
        let mut session = MindmapSession::default();
        session.load(tree("idea"), &mut NoViewport);
        assert_eq!(session.progress().total_steps(), 1);
        assert!(session.progress().is_next_step("dev-step-1"));
        assert_eq!(session.layout().position("core-1"), Some((0.0, 0.0)));

        assert_eq!(session.cycle_step("dev-step-1"), Some(StepStatus::InProgress));
        session.set_step_status("dev-step-1", StepStatus::Done);
        assert!(!session.progress().is_next_step("dev-step-1"));

        let snapshot = session.snapshot().unwrap();
        assert_eq!(
            snapshot.node("dev-step-1").unwrap().status,
            Some(StepStatus::Done)
        );
        assert_eq!(session.mindmap().unwrap().node("dev-step-1").unwrap().status, None);
    }

    #[test]
    fn missing_root_skips_fit_request() {
        let mut session = MindmapSession::default();
        let mut host = RecordingHost::default();
        let map = Mindmap::new(vec![MindmapNode::new("a", NodeKind::Category, None, "A")]);
        session.load(map, &mut host);
        assert!(session.layout().is_empty());
        assert!(host.requests.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut session = MindmapSession::default();
        session.load(tree("idea"), &mut NoViewport);
        session.clear();
        assert!(session.mindmap().is_none());
        assert!(session.layout().is_empty());
        assert_eq!(session.progress().total_steps(), 0);
    }
}
