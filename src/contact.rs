//! `ContactDetails`, the single-point contact manifold this crate produces,
//! and the assembly logic shared by the shallow-margin path and EPA
//! (spec.md §4.5: one function, a boolean flag selecting the two branches'
//! normal-negation and depth formula).

use glam::Vec3;

use crate::config::GjkEpaConfig;
use crate::math::barycentric_coordinates;
use crate::support::{CollisionBody, SupportPoint};

/// A single-point contact manifold (spec.md §4.5). Multi-point manifolds
/// and manifold caching/warm-starting are explicit non-goals — a host
/// engine that wants either builds them on top of repeated calls to
/// `test_collision`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDetails {
    /// World-space point roughly on the two bodies' shared surface.
    pub point: Vec3,
    /// The world contact point expressed in body A's local frame.
    pub point_in_a: Vec3,
    /// The world contact point expressed in body B's local frame.
    pub point_in_b: Vec3,
    /// Unit normal, by convention pointing from A toward B (spec.md §3).
    pub normal: Vec3,
    /// How far the shapes interpenetrate along `normal`. Always `>= 0`.
    pub penetration_depth: f32,
    /// Mean of the two bodies' restitution coefficients.
    pub restitution: f32,
    /// Mean of the two bodies' friction coefficients.
    pub friction: f32,
}

/// Shared contact assembly (spec.md §4.5). `tri` is the CSO witness
/// triangle whose barycentric combination reproduces `closest` — the
/// simplex's final rejected triangle on the shallow path, or EPA's closest
/// polyhedron face. `shallow` selects the two branch-specific rules: the
/// shallow path negates the raw `q/|q|` normal and derives depth as
/// `MARGIN - |q|`; the EPA path keeps the normal as-is and derives depth as
/// `|q| + MARGIN`.
///
/// Returns `None` if the triangle is degenerate enough to produce NaN
/// barycentric coordinates (spec.md §7/§9's NaN-barycentric open question,
/// resolved as "no contact" rather than panicking).
fn assemble<A: CollisionBody, B: CollisionBody>(
    a: &A,
    b: &B,
    tri: [&SupportPoint; 3],
    closest: Vec3,
    shallow: bool,
    config: &GjkEpaConfig,
) -> Option<ContactDetails> {
    let (u, v, w) = barycentric_coordinates(closest, tri[0].point, tri[1].point, tri[2].point);
    if u.is_nan() || v.is_nan() || w.is_nan() {
        return None;
    }

    let distance_sq = closest.length_squared();
    let raw_normal = if distance_sq > config.epsilon * config.epsilon {
        closest / distance_sq.sqrt()
    } else {
        let separation = b.position() - a.position();
        if separation.length_squared() > config.epsilon * config.epsilon {
            separation.normalize()
        } else {
            Vec3::Y
        }
    };
    let normal = if shallow { -raw_normal } else { raw_normal };

    let distance = distance_sq.sqrt();
    let penetration_depth = if shallow {
        (config.margin - distance).max(0.0)
    } else {
        distance + config.margin
    };

    let point_in_a_world =
        tri[0].witness_a * u + tri[1].witness_a * v + tri[2].witness_a * w;
    let point_in_b_world = if shallow {
        point_in_a_world + normal * -penetration_depth
    } else {
        tri[0].witness_b * u + tri[1].witness_b * v + tri[2].witness_b * w
    };

    let point = (point_in_a_world + point_in_b_world) * 0.5;

    Some(ContactDetails {
        point,
        point_in_a: a.transform_point_to_local(point_in_a_world),
        point_in_b: b.transform_point_to_local(point_in_b_world),
        normal,
        penetration_depth,
        restitution: (a.restitution() + b.restitution()) * 0.5,
        friction: (a.friction() + b.friction()) * 0.5,
    })
}

/// Builds the shallow-contact `ContactDetails` for GJK's margin shortcut
/// (spec.md §4.2's margin-hit path / §4.5). `closest` is the closest point
/// on the rejected triangle to the origin, already computed by the caller.
pub fn assemble_shallow<A: CollisionBody, B: CollisionBody>(
    a: &A,
    b: &B,
    tri: [&SupportPoint; 3],
    closest: Vec3,
    config: &GjkEpaConfig,
) -> Option<ContactDetails> {
    assemble(a, b, tri, closest, true, config)
}

/// Builds the `ContactDetails` for the EPA path (spec.md §4.5): `tri` is
/// EPA's closest polyhedron face's three witnesses, `closest` the point on
/// that face nearest the origin.
pub fn assemble_epa<A: CollisionBody, B: CollisionBody>(
    a: &A,
    b: &B,
    tri: [&SupportPoint; 3],
    closest: Vec3,
    config: &GjkEpaConfig,
) -> Option<ContactDetails> {
    assemble(a, b, tri, closest, false, config)
}
