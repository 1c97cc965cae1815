//! Oriented rectangular footprint of an agent
//!
//! In the agent's own frame x points along the heading and y to the left.
//! The box is not symmetric about the reference point: it spans
//! `[d - length, d]` longitudinally (d = distance to leading edge) and
//! `[-width/2, width/2]` laterally.
//!
//! Corners run clockwise starting at rear-left:
//!
//! ```text
//!   UpperLeft (rear-left) ---- UpperRight (front-left)
//!        |                            |   -> heading
//!   LowerLeft (rear-right) --- LowerRight (front-right)
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vector::Vector2DExt;
use crate::agent::AgentSnapshot;

/// Corner of an oriented box, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Corner {
    UpperLeft = 0,
    UpperRight = 1,
    LowerRight = 2,
    LowerLeft = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerRight,
        Corner::LowerLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next corner going clockwise (wraps)
    #[inline]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }
}

/// World-space corners and edge normals of an agent footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Indexed by `Corner`
    pub corners: [DVec2; 4],
    /// `[Right, Up]`, un-normalized; only used for relative projections
    pub normals: [DVec2; 2],
}

impl OrientedBox {
    /// Footprint of `agent` with its reference point placed at `world_position`
    pub fn compute(agent: &AgentSnapshot, world_position: DVec2) -> Self {
        let props = &agent.properties;
        let front = props.distance_center_to_leading_edge;
        let rear = front - props.length;
        let half_width = props.width / 2.0;

        let local = [
            DVec2::new(rear, half_width),
            DVec2::new(front, half_width),
            DVec2::new(front, -half_width),
            DVec2::new(rear, -half_width),
        ];
        let corners = local.map(|c| c.rotated(agent.yaw) + world_position);

        let right = corners[Corner::LowerRight.index()] - corners[Corner::LowerLeft.index()];
        let up = corners[Corner::UpperLeft.index()] - corners[Corner::LowerLeft.index()];

        Self {
            corners,
            normals: [right, up],
        }
    }

    /// Footprint at the agent's own position
    pub fn of(agent: &AgentSnapshot) -> Self {
        Self::compute(agent, agent.position)
    }

    #[inline]
    pub fn corner(&self, corner: Corner) -> DVec2 {
        self.corners[corner.index()]
    }

    /// Edge starting at `corner` and ending at the next corner clockwise
    #[inline]
    pub fn edge(&self, corner: Corner) -> (DVec2, DVec2) {
        (self.corner(corner), self.corner(corner.next()))
    }

    /// Point at `fraction` (0..=1) along the edge starting at `corner`
    pub fn point_on_edge(&self, corner: Corner, fraction: f64) -> DVec2 {
        let (start, end) = self.edge(corner);
        start + (end - start) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, AgentProperties};
    use std::f64::consts::FRAC_PI_2;
    const EPSILON: f64 = 1e-10;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < EPSILON
    }

    fn agent(d: f64, yaw: f64) -> AgentSnapshot {
        let props = AgentProperties::new(AgentId(1), 4.0, 2.0, d);
        AgentSnapshot::new(props, DVec2::ZERO, DVec2::ZERO, yaw)
    }

    #[test]
    fn test_corner_order_unrotated() {
        let b = OrientedBox::compute(&agent(3.0, 0.0), DVec2::new(10.0, 5.0));
        assert!(close(b.corner(Corner::UpperLeft), DVec2::new(9.0, 6.0)));
        assert!(close(b.corner(Corner::UpperRight), DVec2::new(13.0, 6.0)));
        assert!(close(b.corner(Corner::LowerRight), DVec2::new(13.0, 4.0)));
        assert!(close(b.corner(Corner::LowerLeft), DVec2::new(9.0, 4.0)));
    }

    #[test]
    fn test_normals_span_the_box() {
        let b = OrientedBox::compute(&agent(2.0, 0.0), DVec2::ZERO);
        assert!(close(b.normals[0], DVec2::new(4.0, 0.0)));
        assert!(close(b.normals[1], DVec2::new(0.0, 2.0)));
    }

    #[test]
    fn test_rotation_about_reference_point() {
        let b = OrientedBox::compute(&agent(2.0, FRAC_PI_2), DVec2::new(1.0, 1.0));
        // Heading +y: front-left is at (-1, +2) relative to the reference point
        assert!(close(b.corner(Corner::UpperRight), DVec2::new(0.0, 3.0)));
        assert!(close(b.corner(Corner::LowerLeft), DVec2::new(2.0, -1.0)));
    }

    #[test]
    fn test_edges_wrap_clockwise() {
        assert_eq!(Corner::LowerLeft.next(), Corner::UpperLeft);
        assert_eq!(Corner::from_index(2), Some(Corner::LowerRight));
        assert_eq!(Corner::from_index(4), None);

        let b = OrientedBox::compute(&agent(2.0, 0.0), DVec2::ZERO);
        let (start, end) = b.edge(Corner::LowerLeft);
        assert!(close(start, DVec2::new(-2.0, -1.0)));
        assert!(close(end, DVec2::new(-2.0, 1.0)));
        assert!(close(b.point_on_edge(Corner::UpperLeft, 0.25), DVec2::new(-1.0, 1.0)));
    }
}
