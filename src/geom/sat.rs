//! Separating axis test between two oriented vehicle boxes
//!
//! Two rectangles need at most four candidate axes: the two edge directions
//! of each box. A cheap bounding prefilter rejects far-apart pairs first, and
//! B's axes are skipped when both boxes share their edge directions.

use glam::DVec2;

use super::oriented_box::{Corner, OrientedBox};
use crate::agent::AgentSnapshot;
use crate::settings::AxisAlignment;
use crate::consts::AXIS_ALIGNMENT_EPSILON_DEG;

/// Verdict of the overlap test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    Separated,
    Overlapping,
}

impl Overlap {
    #[inline]
    pub fn is_overlapping(self) -> bool {
        self == Overlap::Overlapping
    }
}

/// Projection of a box onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn project(corners: &[DVec2; 4], axis: DVec2) -> Self {
        let p = corners.map(|c| c.dot(axis));
        let (min, max) = min_max4(p);
        Self { min, max }
    }

    /// Touching intervals count as overlapping
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.max < other.min || other.max < self.min)
    }
}

#[inline]
fn min_max2(a: f64, b: f64) -> (f64, f64) {
    if a < b { (a, b) } else { (b, a) }
}

#[inline]
fn min_max4(p: [f64; 4]) -> (f64, f64) {
    let (min_a, max_a) = min_max2(p[0], p[1]);
    let (min_b, max_b) = min_max2(p[2], p[3]);
    (min_a.min(min_b), max_a.max(max_b))
}

/// Bounding prefilter on the reference corners of both boxes
///
/// Returns true when the boxes are certainly apart. The budget per agent is
/// `length + max(track_width, width)`, never less than the box diagonal.
pub fn quick_reject(a: &AgentSnapshot, a_box: &OrientedBox, b: &AgentSnapshot, b_box: &OrientedBox) -> bool {
    let reach = |agent: &AgentSnapshot| {
        let props = &agent.properties;
        props.length + props.effective_track_width().max(props.width)
    };
    let budget = reach(a) + reach(b);
    let delta = (a_box.corner(Corner::UpperLeft) - b_box.corner(Corner::UpperLeft)).abs();
    delta.x > budget || delta.y > budget
}

/// Whether both headings share edge directions (parallel or perpendicular)
pub fn is_approximately_axis_aligned(yaw_a: f64, yaw_b: f64, mode: AxisAlignment, epsilon_deg: f64) -> bool {
    match mode {
        AxisAlignment::Legacy => {
            // Only reliable for exact alignment of non-negative headings
            let a = yaw_a.abs().to_degrees() % 90.0;
            let b = yaw_b.abs().to_degrees() % 90.0;
            (a - b).abs() <= epsilon_deg
        }
        AxisAlignment::Robust => {
            let delta = (yaw_a - yaw_b).to_degrees().rem_euclid(90.0);
            delta <= epsilon_deg || 90.0 - delta <= epsilon_deg
        }
    }
}

fn separated_on(axes: &[DVec2; 2], a_box: &OrientedBox, b_box: &OrientedBox) -> bool {
    axes.iter().any(|&axis| {
        let pa = Interval::project(&a_box.corners, axis);
        let pb = Interval::project(&b_box.corners, axis);
        !pa.overlaps(&pb)
    })
}

/// Overlap test with the default (robust) alignment shortcut
pub fn test_overlap(a: &AgentSnapshot, b: &AgentSnapshot) -> Overlap {
    test_overlap_with(a, b, AxisAlignment::default(), AXIS_ALIGNMENT_EPSILON_DEG)
}

pub fn test_overlap_with(
    a: &AgentSnapshot,
    b: &AgentSnapshot,
    alignment: AxisAlignment,
    epsilon_deg: f64,
) -> Overlap {
    let a_box = OrientedBox::of(a);
    let b_box = OrientedBox::of(b);

    if quick_reject(a, &a_box, b, &b_box) {
        return Overlap::Separated;
    }

    if separated_on(&a_box.normals, &a_box, &b_box) {
        return Overlap::Separated;
    }

    if is_approximately_axis_aligned(a.yaw, b.yaw, alignment, epsilon_deg) {
        return Overlap::Overlapping;
    }

    if separated_on(&b_box.normals, &a_box, &b_box) {
        Overlap::Separated
    } else {
        Overlap::Overlapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, AgentProperties};
    use std::f64::consts::FRAC_PI_4;

    fn car(id: u32, x: f64, y: f64, yaw: f64) -> AgentSnapshot {
        let props = AgentProperties::new(AgentId(id), 4.0, 2.0, 2.0);
        AgentSnapshot::new(props, DVec2::new(x, y), DVec2::ZERO, yaw)
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = car(0, 0.0, 0.0, 0.0);
        let b = car(1, 3.0, 0.0, 0.0);
        assert_eq!(test_overlap(&a, &b), Overlap::Overlapping);
    }

    #[test]
    fn test_separated_boxes() {
        let a = car(0, 0.0, 0.0, 0.0);
        let b = car(1, 5.0, 0.0, 0.0);
        assert_eq!(test_overlap(&a, &b), Overlap::Separated);
    }

    #[test]
    fn test_touching_counts_as_overlap() {
        let a = car(0, 0.0, 0.0, 0.0);
        let b = car(1, 4.0, 0.0, 0.0);
        assert_eq!(test_overlap(&a, &b), Overlap::Overlapping);
    }

    #[test]
    fn test_rotated_box_separated_by_own_axis() {
        // Diamond next to an axis-aligned box: A's axes see overlap, only
        // B's axes separate them
        let a = car(0, 0.0, 0.0, 0.0);
        let b = car(1, 3.9, 2.9, FRAC_PI_4);
        let a_box = OrientedBox::of(&a);
        let b_box = OrientedBox::of(&b);
        assert!(!separated_on(&a_box.normals, &a_box, &b_box));
        assert_eq!(test_overlap(&a, &b), Overlap::Separated);
    }

    #[test]
    fn test_quick_reject_far_apart() {
        let a = car(0, 0.0, 0.0, 0.0);
        let b = car(1, 100.0, 0.0, 0.3);
        let a_box = OrientedBox::of(&a);
        let b_box = OrientedBox::of(&b);
        assert!(quick_reject(&a, &a_box, &b, &b_box));
        assert_eq!(test_overlap(&a, &b), Overlap::Separated);
    }

    #[test]
    fn test_narrow_track_does_not_reject_overlap() {
        // Short wide boxes with a tiny track width, B turned around and
        // shifted half a unit sideways
        let mut props = AgentProperties::centered(AgentId(0), 1.0, 3.0);
        props.track_width = Some(0.1);
        assert!(props.validate().is_ok());

        let a = AgentSnapshot::new(props, DVec2::ZERO, DVec2::ZERO, 0.0);
        let b = AgentSnapshot::new(
            AgentProperties { id: AgentId(1), ..props },
            DVec2::new(0.0, 0.5),
            DVec2::ZERO,
            std::f64::consts::PI,
        );
        let a_box = OrientedBox::of(&a);
        let b_box = OrientedBox::of(&b);
        assert!(!quick_reject(&a, &a_box, &b, &b_box));
        assert_eq!(test_overlap(&a, &b), Overlap::Overlapping);
    }

    #[test]
    fn test_interval_ties_overlap() {
        let a = Interval { min: 0.0, max: 1.0 };
        let b = Interval { min: 1.0, max: 2.0 };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        let c = Interval { min: 1.0 + 1e-9, max: 2.0 };
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_axis_alignment_modes() {
        let eps = AXIS_ALIGNMENT_EPSILON_DEG;
        let deg = |d: f64| d.to_radians();

        // Perpendicular headings share axes
        assert!(is_approximately_axis_aligned(deg(10.0), deg(100.0), AxisAlignment::Robust, eps));
        assert!(is_approximately_axis_aligned(deg(10.0), deg(100.0), AxisAlignment::Legacy, eps));

        // Mirrored headings are not aligned, but the legacy check says they are
        assert!(!is_approximately_axis_aligned(deg(10.0), deg(-10.0), AxisAlignment::Robust, eps));
        assert!(is_approximately_axis_aligned(deg(10.0), deg(-10.0), AxisAlignment::Legacy, eps));

        // Negative heading perpendicular to a positive one
        assert!(is_approximately_axis_aligned(deg(-10.0), deg(80.0), AxisAlignment::Robust, eps));
        assert!(!is_approximately_axis_aligned(deg(-10.0), deg(80.0), AxisAlignment::Legacy, eps));
    }

    #[test]
    fn test_legacy_alignment_false_positive() {
        // Mirrored headings make the legacy shortcut skip B's axes
        let a = car(0, 0.0, 0.0, 10.0_f64.to_radians());
        let b = car(1, 3.0, 2.5, -10.0_f64.to_radians());
        let robust = test_overlap_with(&a, &b, AxisAlignment::Robust, AXIS_ALIGNMENT_EPSILON_DEG);
        let legacy = test_overlap_with(&a, &b, AxisAlignment::Legacy, AXIS_ALIGNMENT_EPSILON_DEG);
        assert_eq!(robust, Overlap::Separated);
        assert_eq!(legacy, Overlap::Overlapping);
    }
}
