//! Comparison of a reconstructed contact against reference crash data
//!
//! Reference reconstructions come with the scenario files. The comparison
//! record is plain data for the reporting layer downstream.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::error::CollisionError;
use crate::normalize_angle;
use crate::recon::{AgentContact, CollisionContact};

/// Kinematic state of one agent at first contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentKinematics {
    pub agent: AgentId,
    pub position: DVec2,
    /// (longitudinal, lateral) in the heading frame
    pub velocity: DVec2,
    pub yaw: f64,
    pub perimeter_distance: f64,
}

impl From<&AgentContact> for AgentKinematics {
    fn from(contact: &AgentContact) -> Self {
        Self {
            agent: contact.agent,
            position: contact.position,
            velocity: contact.velocity,
            yaw: contact.yaw,
            perimeter_distance: contact.perimeter_distance,
        }
    }
}

/// Contact state of both agents according to the reference data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCollision {
    /// Reference collision time (ms), if recorded
    #[serde(default)]
    pub time_ms: Option<i64>,
    pub agents: [AgentKinematics; 2],
}

impl ReferenceCollision {
    pub fn for_agent(&self, agent: AgentId) -> Option<&AgentKinematics> {
        self.agents.iter().find(|k| k.agent == agent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentComparison {
    pub agent: AgentId,
    pub reconstructed: AgentKinematics,
    pub reference: AgentKinematics,
    /// Distance between reconstructed and reference positions
    pub position_error: f64,
    /// Magnitude of the velocity difference
    pub velocity_error: f64,
    /// `velocity_error` relative to the reference speed; None when the
    /// reference agent stands still
    pub relative_velocity_error: Option<f64>,
    /// Heading difference in [-π, π)
    pub yaw_error: f64,
    /// Signed perimeter distance difference (reconstructed - reference)
    pub perimeter_error: f64,
}

impl AgentComparison {
    pub fn new(reconstructed: AgentKinematics, reference: AgentKinematics) -> Self {
        let velocity_error = (reconstructed.velocity - reference.velocity).length();
        let reference_speed = reference.velocity.length();
        let relative_velocity_error = (reference_speed > 0.0).then(|| velocity_error / reference_speed);

        Self {
            agent: reconstructed.agent,
            reconstructed,
            reference,
            position_error: reconstructed.position.distance(reference.position),
            velocity_error,
            relative_velocity_error,
            yaw_error: normalize_angle(reconstructed.yaw - reference.yaw),
            perimeter_error: reconstructed.perimeter_distance - reference.perimeter_distance,
        }
    }
}

/// Reconstructed vs reference contact for both agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionComparison {
    pub penetrating: AgentId,
    pub agents: [AgentComparison; 2],
}

impl CollisionComparison {
    pub fn new(contact: &CollisionContact, reference: &ReferenceCollision) -> Result<Self, CollisionError> {
        let compare = |agent: &AgentContact| -> Result<AgentComparison, CollisionError> {
            let expected = reference
                .for_agent(agent.agent)
                .ok_or_else(|| CollisionError::InvalidAgent {
                    agent: agent.agent,
                    message: "missing from the reference collision".to_string(),
                })?;
            Ok(AgentComparison::new(AgentKinematics::from(agent), *expected))
        };

        Ok(Self {
            penetrating: contact.penetrating,
            agents: [compare(&contact.agent)?, compare(&contact.other)?],
        })
    }

    /// Largest position error over both agents
    pub fn max_position_error(&self) -> f64 {
        self.agents
            .iter()
            .map(|a| a.position_error)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentProperties, AgentSnapshot};
    use crate::recon::reconstruct_contact;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-9;

    fn kinematics(id: u32, x: f64, speed: f64, yaw: f64, perimeter: f64) -> AgentKinematics {
        AgentKinematics {
            agent: AgentId(id),
            position: DVec2::new(x, 0.0),
            velocity: DVec2::new(speed, 0.0),
            yaw,
            perimeter_distance: perimeter,
        }
    }

    #[test]
    fn test_agent_errors() {
        let reconstructed = kinematics(0, 1.0, 9.0, PI - 0.1, 4.5);
        let reference = kinematics(0, 4.0, 10.0, -PI + 0.1, 5.0);
        let cmp = AgentComparison::new(reconstructed, reference);

        assert!((cmp.position_error - 3.0).abs() < EPSILON);
        assert!((cmp.velocity_error - 1.0).abs() < EPSILON);
        assert!((cmp.relative_velocity_error.unwrap() - 0.1).abs() < EPSILON);
        // Wraps through ±π instead of reporting almost a full turn
        assert!((cmp.yaw_error - (-0.2)).abs() < 1e-9);
        assert!((cmp.perimeter_error - (-0.5)).abs() < EPSILON);
    }

    #[test]
    fn test_standing_reference_has_no_relative_error() {
        let cmp = AgentComparison::new(kinematics(1, 0.0, 0.5, 0.0, 0.0), kinematics(1, 0.0, 0.0, 0.0, 0.0));
        assert!((cmp.velocity_error - 0.5).abs() < EPSILON);
        assert_eq!(cmp.relative_velocity_error, None);
    }

    #[test]
    fn test_compare_contact_with_reference() {
        let a = AgentSnapshot::new(
            AgentProperties::new(AgentId(0), 4.0, 2.0, 2.0),
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            0.0,
        );
        let b = AgentSnapshot::new(
            AgentProperties::new(AgentId(1), 4.0, 2.0, 2.0),
            DVec2::new(3.5, 0.5),
            DVec2::ZERO,
            0.0,
        );
        let contact = reconstruct_contact(&a, &b).unwrap();

        // Reference listed in the opposite order
        let reference = ReferenceCollision {
            time_ms: Some(120),
            agents: [
                AgentKinematics::from(&contact.other),
                kinematics(0, -1.0, 10.0, 0.0, contact.agent.perimeter_distance),
            ],
        };
        let cmp = CollisionComparison::new(&contact, &reference).unwrap();
        assert_eq!(cmp.penetrating, contact.penetrating);
        assert_eq!(cmp.agents[0].agent, AgentId(0));
        assert!((cmp.agents[0].position_error - 0.5).abs() < EPSILON);
        assert_eq!(cmp.agents[1].position_error, 0.0);
        assert!((cmp.max_position_error() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_missing_reference_agent() {
        let a = AgentSnapshot::new(
            AgentProperties::new(AgentId(0), 4.0, 2.0, 2.0),
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            0.0,
        );
        let b = AgentSnapshot::new(
            AgentProperties::new(AgentId(1), 4.0, 2.0, 2.0),
            DVec2::new(3.5, 0.0),
            DVec2::ZERO,
            0.0,
        );
        let contact = reconstruct_contact(&a, &b).unwrap();
        let reference = ReferenceCollision {
            time_ms: None,
            agents: [kinematics(0, 0.0, 0.0, 0.0, 0.0), kinematics(5, 0.0, 0.0, 0.0, 0.0)],
        };
        let err = CollisionComparison::new(&contact, &reference).unwrap_err();
        assert!(matches!(err, CollisionError::InvalidAgent { agent: AgentId(1), .. }));
    }
}
