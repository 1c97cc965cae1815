//! Swept intersection under relative motion
//!
//! The stationary agent is held fixed and the moving agent travels with the
//! relative velocity. The moving agent is first pushed back far enough that
//! the boxes cannot overlap, then each of its corners is swept forward to the
//! current position and tested against the stationary agent's edges. The hit
//! closest to the start of the sweep is the first contact.

use glam::DVec2;

use crate::agent::AgentSnapshot;
use crate::geom::{Corner, OrientedBox};

/// Earliest corner-into-edge crossing of one sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Corner of the moving agent that crosses the edge
    pub corner: Corner,
    /// Start corner of the stationary agent's edge that is crossed
    pub edge: Corner,
    /// Position along the hit edge (0 at `edge`, 1 at the next corner)
    pub edge_fraction: f64,
    /// Distance travelled from the initial configuration to the contact
    pub distance_from_initial: f64,
    /// Total sweep length (initial to current position)
    pub direction_length: f64,
    /// Moving agent's reference position at contact (world)
    pub moving_position: DVec2,
    /// Stationary agent's reference position at contact (world)
    pub stationary_position: DVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepOutcome {
    Intersected(SweepHit),
    /// No corner of the moving agent crosses an edge of the other
    NoIntersection,
    /// Zero relative motion; no sweep direction exists
    Indeterminate,
}

/// Solve `origin + t * direction = start + u * (end - start)` by Cramer's rule.
///
/// Returns `(t, u)` when both parameters lie in `[0, 1]`. Parallel lines never
/// intersect.
fn intersect_sweep_with_edge(origin: DVec2, direction: DVec2, start: DVec2, end: DVec2) -> Option<(f64, f64)> {
    let edge = end - start;
    let det = edge.perp_dot(direction);
    if det == 0.0 {
        return None;
    }

    let r = start - origin;
    let t = edge.perp_dot(r) / det;
    let u = direction.perp_dot(r) / det;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Sweep `moving` into `stationary` and find the first corner/edge contact
pub fn compute_intersection(moving: &AgentSnapshot, stationary: &AgentSnapshot) -> SweepOutcome {
    let moving_velocity = moving.world_velocity();
    let stationary_velocity = stationary.world_velocity();
    let relative_velocity = moving_velocity - stationary_velocity;
    let relative_speed = relative_velocity.length();

    if relative_speed == 0.0 || !relative_speed.is_finite() {
        return SweepOutcome::Indeterminate;
    }

    // Sum of both boxes' extents always clears any overlap
    let travel_distance = moving.properties.length
        + moving.properties.width
        + stationary.properties.length
        + stationary.properties.width;
    let travel_time = travel_distance / relative_speed;
    if !travel_time.is_finite() {
        return SweepOutcome::Indeterminate;
    }

    let initial_position = moving.position - relative_velocity * travel_time;
    let direction = moving.position - initial_position;
    let direction_length = direction.length();
    if direction_length == 0.0 {
        return SweepOutcome::Indeterminate;
    }

    let moving_box = OrientedBox::compute(moving, initial_position);
    let stationary_box = OrientedBox::of(stationary);

    let mut best: Option<(Corner, Corner, f64, f64)> = None;
    for corner in Corner::ALL {
        let origin = moving_box.corner(corner);
        for edge in Corner::ALL {
            let (start, end) = stationary_box.edge(edge);
            let Some((t, u)) = intersect_sweep_with_edge(origin, direction, start, end) else {
                continue;
            };
            let distance = t * direction_length;
            if best.is_none_or(|(_, _, _, d)| distance < d) {
                best = Some((corner, edge, u, distance));
            }
        }
    }

    let Some((corner, edge, edge_fraction, distance_from_initial)) = best else {
        return SweepOutcome::NoIntersection;
    };

    // Step back from the current state so the final recorded positions stay exact
    let fraction = (direction_length - distance_from_initial) / direction_length;
    let time_before_current = fraction * travel_time;

    SweepOutcome::Intersected(SweepHit {
        corner,
        edge,
        edge_fraction,
        distance_from_initial,
        direction_length,
        moving_position: moving.position - moving_velocity * time_before_current,
        stationary_position: stationary.position - stationary_velocity * time_before_current,
    })
}
