//! Agent capability and per-step snapshots
//!
//! The surrounding simulation framework exposes far more than collision
//! reconstruction needs. `CollisionAgent` is the narrow read-only view the core
//! consumes; `AgentSnapshot` is the immutable value built from it (or from a
//! recorded trajectory) for every evaluated time step.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::CollisionError;
use crate::geom::Vector2DExt;

/// Agent identity as assigned by the simulation framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle classes known to the framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleType {
    #[default]
    Undefined,
    Car,
    Pedestrian,
    Motorbike,
    Bicycle,
    Truck,
}

/// Read-only getters the collision core needs from a framework agent
pub trait CollisionAgent {
    fn position_x(&self) -> f64;
    fn position_y(&self) -> f64;
    /// Longitudinal velocity in the agent's heading frame
    fn velocity_x(&self) -> f64;
    /// Lateral velocity in the agent's heading frame
    fn velocity_y(&self) -> f64;
    /// Heading in radians
    fn yaw_angle(&self) -> f64;
    fn length(&self) -> f64;
    fn width(&self) -> f64;
    /// Vehicle-dynamics track width (None if the model has none)
    fn track_width(&self) -> Option<f64>;
    fn distance_center_to_leading_edge(&self) -> f64;
    fn agent_id(&self) -> AgentId;
    fn vehicle_type(&self) -> VehicleType;
}

/// Static geometry of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentProperties {
    pub id: AgentId,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    /// Bounding box length along the heading
    pub length: f64,
    /// Bounding box width across the heading
    pub width: f64,
    /// Track width used by the quick-reject prefilter (defaults to width)
    #[serde(default)]
    pub track_width: Option<f64>,
    /// Offset from the reference point to the front of the box
    pub distance_center_to_leading_edge: f64,
}

impl AgentProperties {
    pub fn new(id: AgentId, length: f64, width: f64, distance_center_to_leading_edge: f64) -> Self {
        Self {
            id,
            vehicle_type: VehicleType::Car,
            length,
            width,
            track_width: None,
            distance_center_to_leading_edge,
        }
    }

    /// Box centered on the reference point
    pub fn centered(id: AgentId, length: f64, width: f64) -> Self {
        Self::new(id, length, width, length / 2.0)
    }

    #[inline]
    pub fn effective_track_width(&self) -> f64 {
        self.track_width.unwrap_or(self.width)
    }

    /// Total boundary length of the box
    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.length + self.width)
    }

    pub fn validate(&self) -> Result<(), CollisionError> {
        let invalid = |message: &str| CollisionError::InvalidAgent {
            agent: self.id,
            message: message.to_string(),
        };

        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(invalid("length must be positive and finite"));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(invalid("width must be positive and finite"));
        }
        if !self.distance_center_to_leading_edge.is_finite() {
            return Err(invalid("distance to leading edge must be finite"));
        }
        if let Some(track) = self.track_width {
            if !(track.is_finite() && track >= 0.0) {
                return Err(invalid("track width must be non-negative and finite"));
            }
        }
        Ok(())
    }
}

/// State of one agent at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub properties: AgentProperties,
    /// Reference (center of gravity) position in world coordinates
    pub position: DVec2,
    /// (longitudinal, lateral) velocity in the heading frame
    pub velocity: DVec2,
    /// Heading in radians
    pub yaw: f64,
}

impl AgentSnapshot {
    pub fn new(properties: AgentProperties, position: DVec2, velocity: DVec2, yaw: f64) -> Self {
        Self {
            properties,
            position,
            velocity,
            yaw,
        }
    }

    /// Capture the current state of a framework agent
    pub fn capture<A: CollisionAgent + ?Sized>(agent: &A) -> Self {
        let properties = AgentProperties {
            id: agent.agent_id(),
            vehicle_type: agent.vehicle_type(),
            length: agent.length(),
            width: agent.width(),
            track_width: agent.track_width(),
            distance_center_to_leading_edge: agent.distance_center_to_leading_edge(),
        };
        Self::new(
            properties,
            DVec2::new(agent.position_x(), agent.position_y()),
            DVec2::new(agent.velocity_x(), agent.velocity_y()),
            agent.yaw_angle(),
        )
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.properties.id
    }

    /// Velocity rotated from the heading frame into world coordinates
    #[inline]
    pub fn world_velocity(&self) -> DVec2 {
        self.velocity.rotated(self.yaw)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.yaw.is_finite()
    }
}

impl CollisionAgent for AgentSnapshot {
    fn position_x(&self) -> f64 {
        self.position.x
    }
    fn position_y(&self) -> f64 {
        self.position.y
    }
    fn velocity_x(&self) -> f64 {
        self.velocity.x
    }
    fn velocity_y(&self) -> f64 {
        self.velocity.y
    }
    fn yaw_angle(&self) -> f64 {
        self.yaw
    }
    fn length(&self) -> f64 {
        self.properties.length
    }
    fn width(&self) -> f64 {
        self.properties.width
    }
    fn track_width(&self) -> Option<f64> {
        self.properties.track_width
    }
    fn distance_center_to_leading_edge(&self) -> f64 {
        self.properties.distance_center_to_leading_edge
    }
    fn agent_id(&self) -> AgentId {
        self.properties.id
    }
    fn vehicle_type(&self) -> VehicleType {
        self.properties.vehicle_type
    }
}
