//! Error taxonomy for collision search and reconstruction

use thiserror::Error;

use crate::agent::AgentId;

#[derive(Debug, Error)]
pub enum CollisionError {
    // === Input errors (abort the search) ===
    #[error("kind=input: nominal collision time {time_ms} ms does not match a recorded step")]
    MisalignedTime { time_ms: i64 },
    #[error("kind=input: time {time_ms} ms lies outside the recorded trajectory ({steps} steps)")]
    TimeOutOfRange { time_ms: i64, steps: usize },
    #[error("kind=input: no collision found in recorded trajectory after step {last_step}")]
    NoCollisionFound { last_step: usize },
    #[error("kind=input: trajectory of agent {agent} is malformed: {message}")]
    MismatchedSeries { agent: AgentId, message: String },
    #[error("kind=input: invalid agent {agent}: {message}")]
    InvalidAgent { agent: AgentId, message: String },
    #[error("kind=input: agent {agent} has a non-finite sample at step {step}")]
    NonFiniteSample { agent: AgentId, step: usize },

    // === Geometry that cannot be reconstructed ===
    #[error("kind=indeterminate: agents {agent} and {other} have zero relative velocity")]
    ZeroRelativeVelocity { agent: AgentId, other: AgentId },

    // === Solver disagrees with the overlap test ===
    #[error("kind=inconsistent: no swept intersection between agents {agent} and {other}")]
    NoIntersection { agent: AgentId, other: AgentId },
    #[error("kind=inconsistent: perimeter walk passed the last edge (corner {corner}, fraction {fraction})")]
    PerimeterOverrun { corner: usize, fraction: f64 },

    // === Result sink ===
    #[error("kind=duplicate_agent: agent {agent} already recorded in run result")]
    DuplicateAgent { agent: AgentId },

    // === Loading ===
    #[error("kind=config: {message}")]
    InvalidSettings { message: String },
    #[error("kind=io: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("kind=parse: {message}")]
    Parse {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CollisionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CollisionError::MisalignedTime { .. }
            | CollisionError::TimeOutOfRange { .. }
            | CollisionError::NoCollisionFound { .. }
            | CollisionError::MismatchedSeries { .. }
            | CollisionError::InvalidAgent { .. }
            | CollisionError::NonFiniteSample { .. } => "input",
            CollisionError::ZeroRelativeVelocity { .. } => "indeterminate",
            CollisionError::NoIntersection { .. } | CollisionError::PerimeterOverrun { .. } => {
                "inconsistent"
            }
            CollisionError::DuplicateAgent { .. } => "duplicate_agent",
            CollisionError::InvalidSettings { .. } => "config",
            CollisionError::Io { .. } => "io",
            CollisionError::Parse { .. } => "parse",
        }
    }

    /// Fatal for the whole reconstruction attempt of a run
    pub fn is_input_error(&self) -> bool {
        self.kind() == "input"
    }

    /// Expected edge case the caller may skip without fabricating a contact
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, CollisionError::ZeroRelativeVelocity { .. })
    }

    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CollisionError::Io {
            message: format!("{}: {}", path.display(), source),
            source,
        }
    }

    pub fn parse(what: &str, source: serde_json::Error) -> Self {
        CollisionError::Parse {
            message: format!("{}: {}", what, source),
            source,
        }
    }
}
