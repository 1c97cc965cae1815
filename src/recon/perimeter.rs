//! Perimeter parameterization of a vehicle box
//!
//! A contact point is reported as a single distance along the box boundary,
//! measured clockwise from the rear-left corner. Edges are walked in corner
//! order: length, width, length, width.

use crate::agent::AgentProperties;
use crate::error::CollisionError;
use crate::geom::Corner;

/// Edge lengths indexed by their start corner
#[inline]
pub fn edge_lengths(length: f64, width: f64) -> [f64; 4] {
    [length, width, length, width]
}

/// Distance along the perimeter for a point `fraction` of the way along the
/// edge starting at corner `index`
pub fn perimeter_distance_at_index(
    props: &AgentProperties,
    index: usize,
    fraction: f64,
) -> Result<f64, CollisionError> {
    let overrun = || CollisionError::PerimeterOverrun {
        corner: index,
        fraction,
    };

    let edges = edge_lengths(props.length, props.width);
    if index >= edges.len() || !(0.0..=1.0).contains(&fraction) {
        return Err(overrun());
    }

    let passed: f64 = edges[..index].iter().sum();
    Ok(passed + fraction * edges[index])
}

pub fn perimeter_distance(props: &AgentProperties, corner: Corner, fraction: f64) -> Result<f64, CollisionError> {
    perimeter_distance_at_index(props, corner.index(), fraction)
}

/// Inverse of `perimeter_distance`: the edge (by start corner) and fraction
/// along it for a perimeter distance. Distances wrap around the box.
pub fn locate_on_perimeter(props: &AgentProperties, distance: f64) -> (Corner, f64) {
    let mut remaining = distance.rem_euclid(props.perimeter());
    for (corner, edge) in Corner::ALL.into_iter().zip(edge_lengths(props.length, props.width)) {
        if remaining < edge {
            return (corner, remaining / edge);
        }
        remaining -= edge;
    }
    // Rounding pushed the distance onto the closing corner
    (Corner::UpperLeft, 0.0)
}
