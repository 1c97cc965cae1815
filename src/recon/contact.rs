//! Point-of-contact reconstruction from two directional sweeps
//!
//! Sweeping A into B only finds A's corners crossing B's edges, and the other
//! way round for B into A. Running both and keeping the earlier hit covers
//! every corner/edge combination.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::perimeter::perimeter_distance;
use super::swept::{SweepHit, SweepOutcome, compute_intersection};
use crate::agent::{AgentId, AgentSnapshot};
use crate::error::CollisionError;
use crate::geom::{Corner, OrientedBox};

/// Reconstructed state of one agent at first contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentContact {
    pub agent: AgentId,
    /// Reference position at contact (world)
    pub position: DVec2,
    /// Touching point on the box boundary (world)
    pub contact_point: DVec2,
    /// Heading in radians
    pub yaw: f64,
    /// (longitudinal, lateral) velocity in the heading frame
    pub velocity: DVec2,
    /// Clockwise distance from the rear-left corner to the contact point
    pub perimeter_distance: f64,
    /// Edge (by start corner) holding the contact point
    pub edge: Corner,
    pub edge_fraction: f64,
}

/// First contact between two agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionContact {
    /// First agent passed to `reconstruct_contact`
    pub agent: AgentContact,
    /// Second agent passed to `reconstruct_contact`
    pub other: AgentContact,
    /// Agent whose corner penetrated the other's edge first
    pub penetrating: AgentId,
}

impl CollisionContact {
    pub fn for_agent(&self, id: AgentId) -> Option<&AgentContact> {
        [&self.agent, &self.other].into_iter().find(|c| c.agent == id)
    }

    pub fn agents(&self) -> [&AgentContact; 2] {
        [&self.agent, &self.other]
    }
}

/// Contacts of the moving (corner) and stationary (edge) agent of a sweep
fn contacts_from_hit(
    hit: &SweepHit,
    moving: &AgentSnapshot,
    stationary: &AgentSnapshot,
) -> Result<(AgentContact, AgentContact), CollisionError> {
    let moving_box = OrientedBox::compute(moving, hit.moving_position);
    let stationary_box = OrientedBox::compute(stationary, hit.stationary_position);

    let corner_contact = AgentContact {
        agent: moving.id(),
        position: hit.moving_position,
        contact_point: moving_box.corner(hit.corner),
        yaw: moving.yaw,
        velocity: moving.velocity,
        perimeter_distance: perimeter_distance(&moving.properties, hit.corner, 0.0)?,
        edge: hit.corner,
        edge_fraction: 0.0,
    };
    let edge_contact = AgentContact {
        agent: stationary.id(),
        position: hit.stationary_position,
        contact_point: stationary_box.point_on_edge(hit.edge, hit.edge_fraction),
        yaw: stationary.yaw,
        velocity: stationary.velocity,
        perimeter_distance: perimeter_distance(&stationary.properties, hit.edge, hit.edge_fraction)?,
        edge: hit.edge,
        edge_fraction: hit.edge_fraction,
    };
    Ok((corner_contact, edge_contact))
}

/// Reconstruct where and how two overlapping agents first touched
pub fn reconstruct_contact(a: &AgentSnapshot, b: &AgentSnapshot) -> Result<CollisionContact, CollisionError> {
    let a_into_b = compute_intersection(a, b);
    let b_into_a = compute_intersection(b, a);

    let (a_first, hit) = match (a_into_b, b_into_a) {
        (SweepOutcome::Indeterminate, _) | (_, SweepOutcome::Indeterminate) => {
            log::warn!("Agents {} and {} have no relative motion", a.id(), b.id());
            return Err(CollisionError::ZeroRelativeVelocity {
                agent: a.id(),
                other: b.id(),
            });
        }
        (SweepOutcome::NoIntersection, SweepOutcome::NoIntersection) => {
            log::warn!("No swept intersection between agents {} and {}", a.id(), b.id());
            return Err(CollisionError::NoIntersection {
                agent: a.id(),
                other: b.id(),
            });
        }
        (SweepOutcome::Intersected(ha), SweepOutcome::NoIntersection) => (true, ha),
        (SweepOutcome::NoIntersection, SweepOutcome::Intersected(hb)) => (false, hb),
        // Exact ties go to B
        (SweepOutcome::Intersected(ha), SweepOutcome::Intersected(hb)) => {
            if ha.distance_from_initial < hb.distance_from_initial {
                (true, ha)
            } else {
                (false, hb)
            }
        }
    };

    let contact = if a_first {
        let (agent, other) = contacts_from_hit(&hit, a, b)?;
        CollisionContact {
            agent,
            other,
            penetrating: a.id(),
        }
    } else {
        let (other, agent) = contacts_from_hit(&hit, b, a)?;
        CollisionContact {
            agent,
            other,
            penetrating: b.id(),
        }
    };

    log::debug!(
        "Agent {} penetrated first (perimeter {:.3} / {:.3})",
        contact.penetrating,
        contact.agent.perimeter_distance,
        contact.other.perimeter_distance
    );
    Ok(contact)
}
