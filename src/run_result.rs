//! Per-run collision result
//!
//! Filled once per simulation run after the contact has been reconstructed.
//! Each agent may be recorded only once.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::Serialize;

use crate::agent::AgentId;
use crate::error::CollisionError;
use crate::recon::CollisionContact;

/// Contact state of one agent as stored in the run result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionAgentRecord {
    pub position: DVec2,
    /// (longitudinal, lateral) in the heading frame
    pub velocity: DVec2,
    pub yaw: f64,
    /// Perimeter distance of the contact point
    pub distance_on_border: f64,
}

/// Receiver for reconstructed collisions
pub trait ResultSink {
    fn set_collision_flag(&mut self);

    fn add_collision_agent(
        &mut self,
        agent: AgentId,
        position: DVec2,
        yaw: f64,
        velocity: DVec2,
        distance_on_border: f64,
    ) -> Result<(), CollisionError>;

    /// Flag the collision and record both agents of a contact
    fn record_contact(&mut self, contact: &CollisionContact) -> Result<(), CollisionError> {
        self.set_collision_flag();
        for agent in contact.agents() {
            self.add_collision_agent(
                agent.agent,
                agent.position,
                agent.yaw,
                agent.velocity,
                agent.perimeter_distance,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunResult {
    collision_agents: BTreeMap<AgentId, CollisionAgentRecord>,
    collision_occurred: bool,
    time_expired: bool,
    end_condition_reached: bool,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collision(&self) -> bool {
        self.collision_occurred
    }

    pub fn is_time_expired(&self) -> bool {
        self.time_expired
    }

    pub fn set_time_expired(&mut self) {
        self.time_expired = true;
    }

    pub fn is_end_condition_reached(&self) -> bool {
        self.end_condition_reached
    }

    pub fn set_end_condition_reached(&mut self) {
        self.end_condition_reached = true;
    }

    pub fn collision_agent(&self, agent: AgentId) -> Option<&CollisionAgentRecord> {
        self.collision_agents.get(&agent)
    }

    /// Recorded agents in id order
    pub fn collision_agents(&self) -> impl Iterator<Item = (AgentId, &CollisionAgentRecord)> {
        self.collision_agents.iter().map(|(id, record)| (*id, record))
    }
}

impl ResultSink for RunResult {
    fn set_collision_flag(&mut self) {
        self.collision_occurred = true;
    }

    fn add_collision_agent(
        &mut self,
        agent: AgentId,
        position: DVec2,
        yaw: f64,
        velocity: DVec2,
        distance_on_border: f64,
    ) -> Result<(), CollisionError> {
        if self.collision_agents.contains_key(&agent) {
            return Err(CollisionError::DuplicateAgent { agent });
        }
        self.collision_agents.insert(
            agent,
            CollisionAgentRecord {
                position,
                velocity,
                yaw,
                distance_on_border,
            },
        );
        Ok(())
    }
}
