//! Geometric helpers layered on top of `glam` that the simplex and polyhedron
//! need but that don't belong to either: barycentric coordinates and
//! closest-point-on-triangle/segment queries.

use glam::Vec3;

/// Barycentric coordinates `(u, v, w)` of `p` with respect to triangle `(a, b, c)`,
/// i.e. `p ~= u*a + v*b + w*c` with `u + v + w == 1`.
///
/// Uses the standard Cramer's-rule derivation. Returns `NaN` components when
/// the triangle is degenerate (zero area) rather than panicking — callers are
/// expected to check for that (see spec.md §4.5 / §7).
pub fn barycentric_coordinates(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    let inv_denom = 1.0 / denom;

    let v = (d11 * d20 - d01 * d21) * inv_denom;
    let w = (d00 * d21 - d01 * d20) * inv_denom;
    let u = 1.0 - v - w;
    (u, v, w)
}

/// Closest point to the origin on segment `(a, b)`.
pub fn closest_point_on_segment_to_origin(a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f32::EPSILON {
        return a;
    }
    let t = (-a.dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest point to the origin on triangle `(a, b, c)`, handling all Voronoi
/// regions (the three vertices, the three edges, and the interior).
pub fn closest_point_on_triangle_to_origin(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = -a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = -b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return closest_point_on_segment_to_origin(a, b);
    }

    let cp = -c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return closest_point_on_segment_to_origin(a, c);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return closest_point_on_segment_to_origin(b, c);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
