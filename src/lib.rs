//! crash-recon - collision detection and first-contact reconstruction
//!
//! Core modules:
//! - `geom`: 2D vectors, oriented vehicle boxes, separating-axis test
//! - `recon`: swept intersection, contact reconstruction, time-series search
//! - `agent`: read-only agent capability and per-step snapshots
//! - `trajectory`: recorded trajectories and collision scenarios
//! - `run_result`: per-run collision result sink
//! - `report`: reconstructed vs reference comparison records
//! - `settings`: data-driven reconstruction settings

pub mod agent;
pub mod error;
pub mod geom;
pub mod recon;
pub mod report;
pub mod run_result;
pub mod settings;
pub mod trajectory;

pub use agent::{AgentId, AgentProperties, AgentSnapshot, CollisionAgent, VehicleType};
pub use error::CollisionError;
pub use geom::{Corner, OrientedBox, Overlap, test_overlap};
pub use recon::{CollisionContact, CollisionInstant, find_first_collision_instant, reconstruct_contact};
pub use report::CollisionComparison;
pub use run_result::{ResultSink, RunResult};
pub use settings::{AxisAlignment, ReconstructionSettings};
pub use trajectory::{AgentTrajectory, CollisionScenario, TrajectorySeries};

/// Reconstruction constants
pub mod consts {
    /// Fixed step size of the recorded reference trajectories (ms)
    pub const FIXED_STEP_SIZE_MS: i64 = 10;

    /// Heading tolerance for the axis-alignment shortcut (degrees)
    pub const AXIS_ALIGNMENT_EPSILON_DEG: f64 = 0.0001;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}
