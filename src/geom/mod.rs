//! Planar geometry for vehicle footprints
//!
//! Everything in here is pure and allocation free:
//! - Angles in radians, positions in world units
//! - Fixed clockwise corner order (see `Corner`)
//! - No knowledge of trajectories or time

pub mod oriented_box;
pub mod sat;
pub mod vector;

pub use oriented_box::{Corner, OrientedBox};
pub use sat::{Interval, Overlap, is_approximately_axis_aligned, quick_reject, test_overlap, test_overlap_with};
pub use vector::{Vector2D, Vector2DExt};
