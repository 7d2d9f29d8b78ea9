use super::EdgeSide;

/// Placement of one category on the ring around the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RingSlot {
    pub angle_deg: f32,
    pub x: f32,
    pub y: f32,
    /// Side of the category box the root edge enters.
    pub target_side: EdgeSide,
}

impl RingSlot {
    pub fn source_side(&self) -> EdgeSide {
        self.target_side.opposite()
    }
}

/// Evenly spaced slots, the first due north and the rest clockwise (y grows downward).
pub(crate) fn ring_slots(count: usize, radius: f32) -> Vec<RingSlot> {
    if count == 0 {
        return Vec::new();
    }
    let step = 360.0 / count as f64;
    (0..count)
        .map(|idx| {
            let angle_deg = idx as f64 * step - 90.0;
            let rad = angle_deg.to_radians();
            let (sin, cos) = rad.sin_cos();
            RingSlot {
                angle_deg: angle_deg as f32,
                x: (radius as f64 * cos) as f32,
                y: (radius as f64 * sin) as f32,
                target_side: facing_side(cos, sin),
            }
        })
        .collect()
}

fn facing_side(cos: f64, sin: f64) -> EdgeSide {
    if cos.abs() > 0.5 {
        if cos > 0.0 { EdgeSide::Left } else { EdgeSide::Right }
    } else if sin > 0.0 {
        EdgeSide::Top
    } else {
        EdgeSide::Bottom
    }
}
