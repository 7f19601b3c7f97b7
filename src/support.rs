//! The support oracle: the thin boundary between this crate and the
//! rigid-body representation it treats as an external collaborator
//! (spec.md §1, §4.1).

use glam::Vec3;

/// Everything GJK/EPA need from a rigid body. The rigid-body representation
/// itself, its transform chain, and its mass/shape data are all out of scope
/// for this crate (spec.md §1) — this trait is the entire boundary.
pub trait CollisionBody {
    /// Farthest point of this body along `dir` (world space). `dir` need not
    /// be normalized but must be nonzero.
    fn find_support(&self, dir: Vec3) -> Vec3;

    /// World-space position of the body's origin, used to seed GJK's first
    /// search direction and as a fallback contact normal axis.
    fn position(&self) -> Vec3;

    /// Maps a world-space point into this body's local frame (the "rigid
    /// inverse transform" of spec.md §6).
    fn transform_point_to_local(&self, world: Vec3) -> Vec3;

    fn restitution(&self) -> f32;
    fn friction(&self) -> f32;
}

/// A single sample of the Minkowski difference (CSO) of two bodies, plus the
/// two witness points that produced it.
///
/// Invariant: `point == witness_a - witness_b` always holds; it is computed
/// once at construction and never touched afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPoint {
    pub witness_a: Vec3,
    pub witness_b: Vec3,
    pub point: Vec3,
}

impl SupportPoint {
    fn new(witness_a: Vec3, witness_b: Vec3) -> Self {
        Self {
            witness_a,
            witness_b,
            point: witness_a - witness_b,
        }
    }
}

/// Samples the CSO support point of `(a, b)` along `dir`: body A's farthest
/// point along `+dir`, body B's farthest point along `-dir`.
pub fn sample<A: CollisionBody, B: CollisionBody>(a: &A, b: &B, dir: Vec3) -> SupportPoint {
    let witness_a = a.find_support(dir);
    let witness_b = b.find_support(-dir);
    SupportPoint::new(witness_a, witness_b)
}
