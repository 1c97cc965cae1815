//! First-contact reconstruction
//!
//! Data flows one way:
//! trajectory step -> snapshots -> overlap test -> swept solver -> contact
//!
//! Nothing here keeps state between calls; every run gets fresh snapshots.

pub mod contact;
pub mod perimeter;
pub mod search;
pub mod swept;

pub use contact::{AgentContact, CollisionContact, reconstruct_contact};
pub use perimeter::{edge_lengths, locate_on_perimeter, perimeter_distance, perimeter_distance_at_index};
pub use search::{CollisionInstant, SearchDirection, find_first_collision_instant, locate_collision_step};
pub use swept::{SweepHit, SweepOutcome, compute_intersection};
