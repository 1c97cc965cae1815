//! Recorded trajectories and collision scenarios
//!
//! - Series are parallel arrays sampled at a fixed step (ms)
//! - Positions in world units, velocities in world units per second
//! - Velocity is stored in the heading frame (u longitudinal, v lateral)

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, AgentProperties, AgentSnapshot};
use crate::error::CollisionError;
use crate::geom::Vector2DExt;
use crate::report::ReferenceCollision;

/// Time series of one agent's state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySeries {
    /// Sample times (ms)
    pub time: Vec<i64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Longitudinal velocity
    pub u: Vec<f64>,
    /// Lateral velocity
    pub v: Vec<f64>,
    /// Heading in radians
    pub yaw: Vec<f64>,
}

impl TrajectorySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight-line motion sampled every `step_size_ms`
    pub fn constant_velocity(start: DVec2, velocity: DVec2, yaw: f64, steps: usize, step_size_ms: i64) -> Self {
        let world_velocity = velocity.rotated(yaw);
        let mut series = Self::new();
        for step in 0..steps {
            let time_ms = step as i64 * step_size_ms;
            let position = start + world_velocity * (time_ms as f64 / 1000.0);
            series.push(time_ms, position, velocity, yaw);
        }
        series
    }

    pub fn push(&mut self, time_ms: i64, position: DVec2, velocity: DVec2, yaw: f64) {
        self.time.push(time_ms);
        self.x.push(position.x);
        self.y.push(position.y);
        self.u.push(velocity.x);
        self.v.push(velocity.y);
        self.yaw.push(yaw);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Position, velocity and yaw at `step`
    pub fn sample(&self, step: usize) -> Option<(DVec2, DVec2, f64)> {
        Some((
            DVec2::new(*self.x.get(step)?, *self.y.get(step)?),
            DVec2::new(*self.u.get(step)?, *self.v.get(step)?),
            *self.yaw.get(step)?,
        ))
    }

    /// Check the parallel arrays belong together
    pub fn validate(&self, agent: AgentId) -> Result<(), CollisionError> {
        let malformed = |message: String| CollisionError::MismatchedSeries { agent, message };

        if self.is_empty() {
            return Err(malformed("series is empty".to_string()));
        }
        let columns = [
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("u", self.u.len()),
            ("v", self.v.len()),
            ("yaw", self.yaw.len()),
        ];
        for (name, len) in columns {
            if len != self.len() {
                return Err(malformed(format!(
                    "column {} has {} samples, time has {}",
                    name,
                    len,
                    self.len()
                )));
            }
        }
        if let Some(pair) = self.time.windows(2).find(|w| w[1] <= w[0]) {
            return Err(malformed(format!("time not increasing at {} ms", pair[1])));
        }
        Ok(())
    }
}

/// Static properties plus recorded motion of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrajectory {
    pub properties: AgentProperties,
    pub series: TrajectorySeries,
}

impl AgentTrajectory {
    pub fn new(properties: AgentProperties, series: TrajectorySeries) -> Self {
        Self { properties, series }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.properties.id
    }

    /// Immutable snapshot of the agent at `step`
    pub fn snapshot(&self, step: usize) -> Result<AgentSnapshot, CollisionError> {
        let (position, velocity, yaw) = self
            .series
            .sample(step)
            .ok_or_else(|| CollisionError::MismatchedSeries {
                agent: self.id(),
                message: format!("no sample at step {} ({} recorded)", step, self.series.len()),
            })?;

        let snapshot = AgentSnapshot::new(self.properties, position, velocity, yaw);
        if !snapshot.is_finite() {
            return Err(CollisionError::NonFiniteSample {
                agent: self.id(),
                step,
            });
        }
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), CollisionError> {
        self.properties.validate()?;
        self.series.validate(self.id())
    }
}

/// Two recorded agents and the time the reference data says they collided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionScenario {
    pub agents: [AgentTrajectory; 2],
    /// Nominal collision time (ms)
    pub collision_time_ms: i64,
    /// Reconstruction from the reference data, if available
    #[serde(default)]
    pub reference: Option<ReferenceCollision>,
}

impl CollisionScenario {
    pub fn new(a: AgentTrajectory, b: AgentTrajectory, collision_time_ms: i64) -> Self {
        Self {
            agents: [a, b],
            collision_time_ms,
            reference: None,
        }
    }

    /// Steps recorded for both agents
    pub fn len(&self) -> usize {
        self.agents[0].series.len().min(self.agents[1].series.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshots(&self, step: usize) -> Result<(AgentSnapshot, AgentSnapshot), CollisionError> {
        Ok((self.agents[0].snapshot(step)?, self.agents[1].snapshot(step)?))
    }

    pub fn validate(&self) -> Result<(), CollisionError> {
        for agent in &self.agents {
            agent.validate()?;
        }
        if self.agents[0].id() == self.agents[1].id() {
            return Err(CollisionError::InvalidAgent {
                agent: self.agents[0].id(),
                message: "both agents share the same id".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, CollisionError> {
        let scenario: Self = serde_json::from_str(json).map_err(|e| CollisionError::parse("scenario", e))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario from a JSON file
    pub fn load(path: &Path) -> Result<Self, CollisionError> {
        let json = std::fs::read_to_string(path).map_err(|e| CollisionError::io(path, e))?;
        let scenario = Self::from_json_str(&json)?;
        log::info!(
            "Loaded scenario {} (agents {} and {}, {} steps, nominal collision at {} ms)",
            path.display(),
            scenario.agents[0].id(),
            scenario.agents[1].id(),
            scenario.len(),
            scenario.collision_time_ms
        );
        Ok(scenario)
    }
}
