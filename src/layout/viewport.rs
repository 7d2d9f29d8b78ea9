use super::Bounds;
use crate::config::LayoutConfig;

/// Pan and zoom that maps layout coordinates onto a viewport:
/// `screen = layout * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl ViewTransform {
    pub fn apply(&self, point: (f32, f32)) -> (f32, f32) {
        (point.0 * self.zoom + self.x, point.1 * self.zoom + self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitViewRequest {
    pub bounds: Bounds,
    pub padding: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// How long the host should wait for a render pass before fitting.
    pub delay_ms: u64,
}

impl FitViewRequest {
    pub fn new(bounds: Bounds, config: &LayoutConfig) -> Self {
        Self {
            bounds,
            padding: config.fit_padding,
            min_zoom: config.fit_min_zoom,
            max_zoom: config.fit_max_zoom,
            delay_ms: config.fit_delay_ms,
        }
    }

    pub fn transform_for(&self, width: f32, height: f32) -> ViewTransform {
        fit_view(
            &self.bounds,
            width,
            height,
            self.padding,
            self.min_zoom,
            self.max_zoom,
        )
    }
}

/// The rendering surface that owns the viewport.
pub trait ViewportHost {
    /// Asks the host to center its viewport on the laid-out nodes. Hosts may
    /// defer the fit by `request.delay_ms`; the call must not block.
    fn request_fit_view(&mut self, request: FitViewRequest);
}

/// Host that ignores fit requests, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoViewport;

impl ViewportHost for NoViewport {
    fn request_fit_view(&mut self, _request: FitViewRequest) {}
}

/// Zoom to fit `bounds` inside a `width` x `height` viewport, keeping a
/// `padding` fraction of the viewport free, and center it.
pub fn fit_view(
    bounds: &Bounds,
    width: f32,
    height: f32,
    padding: f32,
    min_zoom: f32,
    max_zoom: f32,
) -> ViewTransform {
    let defaults = LayoutConfig::default();
    let padding = finite_or(padding, defaults.fit_padding).max(0.0);
    let min_zoom = finite_or(min_zoom, defaults.fit_min_zoom).max(0.0);
    let max_zoom = finite_or(max_zoom, defaults.fit_max_zoom).max(min_zoom);
    let content_w = bounds.width().max(1.0);
    let content_h = bounds.height().max(1.0);
    let zoom_x = width / (content_w * (1.0 + padding));
    let zoom_y = height / (content_h * (1.0 + padding));
    let zoom = zoom_x.min(zoom_y).clamp(min_zoom, max_zoom);
    let (cx, cy) = bounds.center();
    ViewTransform {
        x: width / 2.0 - cx * zoom,
        y: height / 2.0 - cy * zoom,
        zoom,
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Bounds {
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[test]
    fn fit_centers_content() {
        let b = bounds(-100.0, -50.0, 300.0, 150.0);
        let t = fit_view(&b, 800.0, 600.0, 0.2, 0.2, 1.5);
        let (cx, cy) = t.apply(b.center());
        assert!((cx - 400.0).abs() < 1e-3);
        assert!((cy - 300.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_respects_padding_and_limits() {
        let wide = bounds(0.0, 0.0, 4000.0, 100.0);
        let t = fit_view(&wide, 800.0, 600.0, 0.2, 0.2, 1.5);
        assert!((t.zoom - 0.2).abs() < 1e-6);

        let small = bounds(0.0, 0.0, 10.0, 10.0);
        let t = fit_view(&small, 800.0, 600.0, 0.2, 0.2, 1.5);
        assert!((t.zoom - 1.5).abs() < 1e-6);

        let mid = bounds(0.0, 0.0, 1000.0, 500.0);
        let t = fit_view(&mid, 1200.0, 1200.0, 0.2, 0.1, 2.0);
        assert!((t.zoom - 1.0).abs() < 1e-4);
    }

    #[test]
    fn non_finite_limits_fall_back_to_defaults() {
        let small = bounds(0.0, 0.0, 10.0, 10.0);
        let t = fit_view(&small, 800.0, 600.0, f32::NAN, f32::NAN, f32::INFINITY);
        assert!((t.zoom - 1.5).abs() < 1e-6);

        let wide = bounds(0.0, 0.0, 4000.0, 100.0);
        let t = fit_view(&wide, 800.0, 600.0, 0.2, f32::NEG_INFINITY, f32::NAN);
        assert!((t.zoom - 0.2).abs() < 1e-6);
        assert!(t.x.is_finite() && t.y.is_finite());
    }

    #[test]
    fn request_carries_config() {
        let config = LayoutConfig::default();
        let request = FitViewRequest::new(bounds(0.0, 0.0, 10.0, 10.0), &config);
        assert_eq!(request.delay_ms, 100);
        assert!((request.padding - 0.2).abs() < 1e-6);
    }
}
