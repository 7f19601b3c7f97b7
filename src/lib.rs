//! Convex narrow-phase collision detection: GJK for overlap, EPA for
//! penetration depth, producing a single contact point per pair.
//!
//! Broad-phase pruning, rigid-body representation, and constraint solving
//! all live outside this crate; [`CollisionBody`] is the entire boundary
//! this crate needs from them.

pub mod config;
pub mod contact;
pub mod math;
pub mod pool;
pub mod polyhedron;
pub mod simplex;
pub mod support;

mod driver;

pub use config::GjkEpaConfig;
pub use contact::ContactDetails;
pub use pool::{SupportHandle, SupportPointPool};
pub use support::{CollisionBody, SupportPoint};

pub use driver::test_collision;

pub use glam::Vec3;
