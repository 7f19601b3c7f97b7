//! GJK: builds a simplex on the CSO and drives it toward the origin.
//!
//! Simplex reduction follows the cross-product Voronoi-region case split
//! (point/line/triangle/tetrahedron), not Johnson's subalgorithm — each
//! `update_*` function both shrinks the simplex to the feature closest to
//! the origin and produces the next search direction.

use glam::Vec3;
use log::trace;

use crate::config::GjkEpaConfig;
use crate::contact::{assemble_shallow, ContactDetails};
use crate::support::{sample, CollisionBody, SupportPoint};

/// Outcome of one `Simplex::step`. Replaces a single shared mutable result
/// register with an explicit return value, so nothing about a `Simplex` is
/// process-wide or reentrancy-hazardous.
pub enum GjkStep {
    /// The simplex does not yet contain the origin; call `step` again with
    /// the returned direction.
    Continue(Vec3),
    /// The CSO does not contain the origin and the two shapes are farther
    /// apart than the margin: no contact.
    NoOverlap,
    /// The simplex came within `margin` of the origin without fully
    /// enclosing it: a shallow contact, already resolved without EPA.
    Shallow(ContactDetails),
    /// The simplex encloses the origin: hand the tetrahedron off to EPA.
    RunEpa,
}

/// A 1-to-4 point simplex built incrementally on the CSO of two bodies.
pub struct Simplex {
    points: Vec<SupportPoint>,
}

impl Simplex {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn points(&self) -> &[SupportPoint] {
        &self.points
    }

    /// Seeds the simplex with one support point along `initial_dir` and
    /// returns the direction to search next.
    pub fn initialize<A: CollisionBody, B: CollisionBody>(
        &mut self,
        a: &A,
        b: &B,
        initial_dir: Vec3,
    ) -> Vec3 {
        let dir = if initial_dir.length_squared() < f32::EPSILON {
            Vec3::X
        } else {
            initial_dir
        };
        let point = sample(a, b, dir);
        let next_dir = -point.point;
        self.points.push(point);
        next_dir
    }

    /// Adds a new support point sampled along `dir` and reduces the simplex.
    /// `config` supplies the margin used for the shallow-contact shortcut
    /// and the iteration-count-independent `epsilon` used for degeneracy
    /// checks.
    pub fn step<A: CollisionBody, B: CollisionBody>(
        &mut self,
        a: &A,
        b: &B,
        dir: Vec3,
        config: &GjkEpaConfig,
    ) -> GjkStep {
        if dir.length_squared() < f32::EPSILON {
            return GjkStep::RunEpa;
        }

        let new_point = sample(a, b, dir);
        trace!("gjk: sampled {:?} along {:?}", new_point.point, dir);
        self.points.push(new_point);

        // A new point that doesn't pass the origin along the search
        // direction means the CSO can't contain the origin on this side
        // (spec.md §4.2 step 3): either we're within the margin of
        // touching, or there's no contact at all.
        if new_point.point.dot(dir) < 0.0 && self.points.len() >= 2 {
            if self.points.len() >= 3 {
                let tri = [self.points[0], self.points[1], self.points[2]];
                let closest = crate::math::closest_point_on_triangle_to_origin(
                    tri[0].point,
                    tri[1].point,
                    tri[2].point,
                );
                if closest.length_squared() <= config.margin * config.margin {
                    return match assemble_shallow(
                        a,
                        b,
                        [&tri[0], &tri[1], &tri[2]],
                        closest,
                        config,
                    ) {
                        Some(contact) => GjkStep::Shallow(contact),
                        None => GjkStep::NoOverlap,
                    };
                }
            }
            self.points.pop();
            return GjkStep::NoOverlap;
        }

        match self.points.len() {
            2 => self.update_line(),
            3 => self.update_triangle(),
            4 => self.update_tetrahedron(config),
            _ => unreachable!("simplex never grows past 4 points"),
        }
    }

    fn update_line(&mut self) -> GjkStep {
        let b = self.points[0].point;
        let a = self.points[1].point;
        let ab = b - a;
        let ao = -a;

        if ab.dot(ao) > 0.0 {
            GjkStep::Continue(ab.cross(ao).cross(ab))
        } else {
            self.points.remove(0);
            GjkStep::Continue(ao)
        }
    }

    fn update_triangle(&mut self) -> GjkStep {
        let c = self.points[0].point;
        let b = self.points[1].point;
        let a = self.points[2].point;
        let ab = b - a;
        let ac = c - a;
        let ao = -a;
        let abc = ab.cross(ac);

        if abc.cross(ac).dot(ao) > 0.0 {
            if ac.dot(ao) > 0.0 {
                self.points = vec![self.points[0], self.points[2]];
                return GjkStep::Continue(ac.cross(ao).cross(ac));
            }
            return self.star_from_edge_ab();
        }

        if ab.cross(abc).dot(ao) > 0.0 {
            return self.star_from_edge_ab();
        }

        if abc.dot(ao) > 0.0 {
            GjkStep::Continue(abc)
        } else {
            self.points.swap(0, 1);
            GjkStep::Continue(-abc)
        }
    }

    /// Shared tail of `update_triangle`'s "closest feature is edge AB" cases.
    fn star_from_edge_ab(&mut self) -> GjkStep {
        let b = self.points[1].point;
        let a = self.points[2].point;
        let ab = b - a;
        let ao = -a;
        self.points = vec![self.points[1], self.points[2]];
        GjkStep::Continue(ab.cross(ao).cross(ab))
    }

    fn update_tetrahedron(&mut self, config: &GjkEpaConfig) -> GjkStep {
        let d = self.points[0].point;
        let c = self.points[1].point;
        let b = self.points[2].point;
        let a = self.points[3].point;
        let ao = -a;

        let ab = b - a;
        let ac = c - a;
        let ad = d - a;

        let abc = ab.cross(ac);
        let acd = ac.cross(ad);
        let adb = ad.cross(ab);

        // Orient each face's normal away from the fourth vertex so "abc.dot(ao) > 0"
        // consistently means "the origin is outside this face".
        let abc = if abc.dot(ad) > 0.0 { -abc } else { abc };
        let acd = if acd.dot(ab) > 0.0 { -acd } else { acd };
        let adb = if adb.dot(ac) > 0.0 { -adb } else { adb };

        if abc.dot(ao) > config.epsilon {
            self.points = vec![c, b, a];
            return self.update_triangle();
        }
        if acd.dot(ao) > config.epsilon {
            self.points = vec![d, c, a];
            return self.update_triangle();
        }
        if adb.dot(ao) > config.epsilon {
            self.points = vec![b, d, a];
            return self.update_triangle();
        }

        GjkStep::RunEpa
    }
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GjkEpaConfig;

    struct Sphere {
        center: Vec3,
        radius: f32,
    }

    impl CollisionBody for Sphere {
        fn find_support(&self, dir: Vec3) -> Vec3 {
            self.center + dir.normalize_or_zero() * self.radius
        }
        fn position(&self) -> Vec3 {
            self.center
        }
        fn transform_point_to_local(&self, world: Vec3) -> Vec3 {
            world - self.center
        }
        fn restitution(&self) -> f32 {
            0.0
        }
        fn friction(&self) -> f32 {
            0.0
        }
    }

    fn run_gjk(a: &Sphere, b: &Sphere, config: &GjkEpaConfig) -> GjkStep {
        let mut simplex = Simplex::new();
        let initial = b.position() - a.position();
        let mut dir = simplex.initialize(a, b, initial);
        for _ in 0..config.max_iterations {
            match simplex.step(a, b, dir, config) {
                GjkStep::Continue(next) => dir = next,
                other => return other,
            }
        }
        GjkStep::NoOverlap
    }

    #[test]
    fn far_apart_spheres_have_no_overlap() {
        let a = Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = Sphere {
            center: Vec3::new(10.0, 0.0, 0.0),
            radius: 1.0,
        };
        let config = GjkEpaConfig::default();
        assert!(matches!(run_gjk(&a, &b, &config), GjkStep::NoOverlap));
    }

    #[test]
    fn overlapping_spheres_hand_off_to_epa() {
        let a = Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = Sphere {
            center: Vec3::new(0.5, 0.0, 0.0),
            radius: 1.0,
        };
        let config = GjkEpaConfig::default();
        assert!(matches!(run_gjk(&a, &b, &config), GjkStep::RunEpa));
    }

    #[test]
    fn barely_touching_spheres_report_shallow_contact() {
        let a = Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = Sphere {
            center: Vec3::new(2.01, 0.0, 0.0),
            radius: 1.0,
        };
        let config = GjkEpaConfig::default();
        match run_gjk(&a, &b, &config) {
            GjkStep::Shallow(contact) => {
                assert!(contact.penetration_depth >= 0.0);
            }
            GjkStep::NoOverlap => {
                // Also acceptable: 0.01 may fall just outside MARGIN depending
                // on which simplex feature is closest when the loop exits.
            }
            _ => panic!("expected shallow contact or no overlap"),
        }
    }
}
