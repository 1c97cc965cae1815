//! Search for the first colliding step of a recorded scenario
//!
//! The reference data gives a nominal collision time that may be late (the
//! boxes already overlapped earlier) or early (not yet touching). The search
//! walks the recorded steps from the nominal one to the first overlapping
//! step, then reconstructs the contact there.

use serde::{Deserialize, Serialize};

use super::contact::{CollisionContact, reconstruct_contact};
use crate::error::CollisionError;
use crate::geom::test_overlap_with;
use crate::settings::ReconstructionSettings;
use crate::trajectory::CollisionScenario;

/// Which way the search walked from the nominal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDirection {
    /// Overlapping at the nominal step; walked back to the first overlap
    Backward,
    /// Separated at the nominal step; walked forward until overlapping
    Forward,
}

impl SearchDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDirection::Backward => "backward",
            SearchDirection::Forward => "forward",
        }
    }
}

/// First colliding step and the contact reconstructed there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionInstant {
    pub step: usize,
    pub time_ms: i64,
    pub direction: SearchDirection,
    pub contact: CollisionContact,
}

/// Step index of a nominal time, checked against both recorded series
fn nominal_step(scenario: &CollisionScenario, time_ms: i64, step_size_ms: i64) -> Result<usize, CollisionError> {
    let steps = scenario.len();
    let out_of_range = || CollisionError::TimeOutOfRange { time_ms, steps };

    if time_ms < 0 {
        return Err(out_of_range());
    }
    let index = usize::try_from(time_ms / step_size_ms).map_err(|_| out_of_range())?;
    if index >= steps {
        return Err(out_of_range());
    }

    for agent in &scenario.agents {
        if agent.series.time[index] != time_ms {
            log::warn!(
                "Agent {} recorded {} ms at step {}, expected {} ms",
                agent.id(),
                agent.series.time[index],
                index,
                time_ms
            );
            return Err(CollisionError::MisalignedTime { time_ms });
        }
    }
    Ok(index)
}

/// Find the first overlapping step starting from `nominal_time_ms`
pub fn locate_collision_step(
    scenario: &CollisionScenario,
    nominal_time_ms: i64,
    settings: &ReconstructionSettings,
) -> Result<(usize, SearchDirection), CollisionError> {
    settings.validate()?;
    let nominal = nominal_step(scenario, nominal_time_ms, settings.step_size_ms)?;

    let overlaps = |step: usize| -> Result<bool, CollisionError> {
        let (a, b) = scenario.snapshots(step)?;
        let verdict = test_overlap_with(&a, &b, settings.axis_alignment, settings.alignment_epsilon_deg);
        Ok(verdict.is_overlapping())
    };

    let mut step = nominal;
    let direction = if overlaps(step)? {
        while step > 0 && overlaps(step - 1)? {
            step -= 1;
        }
        SearchDirection::Backward
    } else {
        loop {
            step += 1;
            if step >= scenario.len() {
                return Err(CollisionError::NoCollisionFound {
                    last_step: scenario.len() - 1,
                });
            }
            if overlaps(step)? {
                break;
            }
        }
        SearchDirection::Forward
    };

    log::debug!(
        "Nominal step {} -> first overlap at step {} ({})",
        nominal,
        step,
        direction.as_str()
    );
    Ok((step, direction))
}

/// Locate the first overlapping step and reconstruct the contact there
pub fn find_first_collision_instant(
    scenario: &CollisionScenario,
    nominal_time_ms: i64,
    settings: &ReconstructionSettings,
) -> Result<CollisionInstant, CollisionError> {
    let (step, direction) = locate_collision_step(scenario, nominal_time_ms, settings)?;
    let (a, b) = scenario.snapshots(step)?;
    let contact = reconstruct_contact(&a, &b)?;
    let time_ms = scenario.agents[0].series.time[step];

    log::info!(
        "First collision of agents {} and {} at {} ms (step {}, searched {})",
        a.id(),
        b.id(),
        time_ms,
        step,
        direction.as_str()
    );
    Ok(CollisionInstant {
        step,
        time_ms,
        direction,
        contact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, AgentProperties};
    use crate::trajectory::{AgentTrajectory, TrajectorySeries};
    use glam::DVec2;

    fn trajectory(id: u32, start: DVec2, speed: f64, steps: usize) -> AgentTrajectory {
        let props = AgentProperties::new(AgentId(id), 4.0, 2.0, 2.0);
        let series = TrajectorySeries::constant_velocity(start, DVec2::new(speed, 0.0), 0.0, steps, 10);
        AgentTrajectory::new(props, series)
    }

    /// A closes in on a parked B by one unit per step: separated for steps
    /// 0-4, overlapping from step 5 on
    fn rear_end() -> CollisionScenario {
        CollisionScenario::new(
            trajectory(0, DVec2::new(1.5, 0.0), 100.0, 10),
            trajectory(1, DVec2::new(10.0, 0.0), 0.0, 10),
            70,
        )
    }

    #[test]
    fn test_late_nominal_walks_backward() {
        let settings = ReconstructionSettings::default();
        let (step, direction) = locate_collision_step(&rear_end(), 70, &settings).unwrap();
        assert_eq!(step, 5);
        assert_eq!(direction, SearchDirection::Backward);
    }

    #[test]
    fn test_early_nominal_walks_forward() {
        let settings = ReconstructionSettings::default();
        let (step, direction) = locate_collision_step(&rear_end(), 20, &settings).unwrap();
        assert_eq!(step, 5);
        assert_eq!(direction, SearchDirection::Forward);
    }

    #[test]
    fn test_first_step_already_overlapping() {
        let scenario = CollisionScenario::new(
            trajectory(0, DVec2::new(7.0, 0.0), 100.0, 5),
            trajectory(1, DVec2::new(10.0, 0.0), 0.0, 5),
            30,
        );
        let settings = ReconstructionSettings::default();
        assert_eq!(
            locate_collision_step(&scenario, 30, &settings).unwrap(),
            (0, SearchDirection::Backward)
        );
    }

    #[test]
    fn test_instant_reconstructs_contact() {
        let scenario = rear_end();
        let instant = find_first_collision_instant(&scenario, 70, &ReconstructionSettings::default()).unwrap();
        assert_eq!(instant.step, 5);
        assert_eq!(instant.time_ms, 50);

        // Flush rear-end: 0.5 overlap at step 5, undone by moving A back
        let a = instant.contact.for_agent(AgentId(0)).unwrap();
        let b = instant.contact.for_agent(AgentId(1)).unwrap();
        assert!((a.position - DVec2::new(6.0, 0.0)).length() < 1e-9);
        assert!((b.position - DVec2::new(10.0, 0.0)).length() < 1e-9);
        assert!((a.contact_point.x - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_nominal_times() {
        let scenario = rear_end();
        let settings = ReconstructionSettings::default();

        let err = locate_collision_step(&scenario, 15, &settings).unwrap_err();
        assert!(matches!(err, CollisionError::MisalignedTime { time_ms: 15 }));

        let err = locate_collision_step(&scenario, 100, &settings).unwrap_err();
        assert!(matches!(err, CollisionError::TimeOutOfRange { steps: 10, .. }));

        let err = locate_collision_step(&scenario, -10, &settings).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_no_collision_in_series() {
        let scenario = CollisionScenario::new(
            trajectory(0, DVec2::ZERO, 10.0, 10),
            trajectory(1, DVec2::new(100.0, 0.0), 0.0, 10),
            0,
        );
        let err = locate_collision_step(&scenario, 0, &ReconstructionSettings::default()).unwrap_err();
        assert!(matches!(err, CollisionError::NoCollisionFound { last_step: 9 }));
    }

    #[test]
    fn test_parked_overlap_is_indeterminate() {
        let scenario = CollisionScenario::new(
            trajectory(0, DVec2::ZERO, 0.0, 3),
            trajectory(1, DVec2::new(3.0, 0.0), 0.0, 3),
            10,
        );
        let err = find_first_collision_instant(&scenario, 10, &ReconstructionSettings::default()).unwrap_err();
        assert!(err.is_indeterminate());
    }
}
