//! EPA: expands a GJK tetrahedron into a convex polyhedron on the CSO,
//! tracking the face closest to the origin until a newly sampled support
//! point stops improving on it.
//!
//! The polyhedron is an arena of faces (`Vec<Option<Face>>`) rather than a
//! half-edge mesh; adding a vertex removes every face the new vertex can
//! "see" and re-triangulates the hole left behind using the loose-edge
//! silhouette, following the rhusics `epa3d.rs` / Fyrox `gjk_epa.rs` style
//! this crate is grounded on.

use glam::Vec3;
use log::trace;

use crate::config::GjkEpaConfig;
use crate::pool::{SupportHandle, SupportPointPool};

/// One triangular face of the polyhedron.
#[derive(Clone, Copy)]
pub struct Face {
    pub vertices: [SupportHandle; 3],
    /// Outward-facing unit normal (away from the polyhedron's interior,
    /// i.e. away from the origin once GJK has guaranteed containment).
    pub normal: Vec3,
    /// Distance from the origin to the face's plane along `normal`.
    pub distance: f32,
}

/// Opaque index into `Polyhedron`'s face arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(usize);

pub struct Polyhedron {
    faces: Vec<Option<Face>>,
}

impl Polyhedron {
    /// Builds the initial polyhedron from a GJK tetrahedron, in the vertex
    /// order (d, c, b, a) GJK's `update_tetrahedron` hands off with (spec.md
    /// §4.3): four faces, each wound so its normal points away from the
    /// opposite vertex.
    pub fn from_tetrahedron(vertices: [SupportHandle; 4], pool: &SupportPointPool) -> Self {
        let p = |h: SupportHandle| pool.get(h).expect("tetrahedron vertex still live").point;
        let [d, c, b, a] = vertices;

        let mut faces = Vec::with_capacity(4);
        for (tri, opposite) in [
            ([d, c, b], a),
            ([d, b, a], c),
            ([d, a, c], b),
            ([c, a, b], d),
        ] {
            // If the as-given winding faces inward, swap two vertices rather
            // than just negating the normal, so `vertices` and `normal` stay
            // consistent for the silhouette edge-matching in `add_vertex`.
            let mut tri = tri;
            let mut normal =
                (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0])).normalize_or_zero();
            if normal.dot(p(opposite) - p(tri[0])) > 0.0 {
                tri.swap(1, 2);
                normal = (p(tri[1]) - p(tri[0]))
                    .cross(p(tri[2]) - p(tri[0]))
                    .normalize_or_zero();
            }
            let distance = normal.dot(p(tri[0]));
            faces.push(Some(Face {
                vertices: tri,
                normal,
                distance,
            }));
        }

        Self { faces }
    }

    pub fn face(&self, id: FaceId) -> &Face {
        self.faces[id.0].as_ref().expect("face id still live")
    }

    fn live_faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId(i), f)))
    }

    /// Finds the active face whose nearest point to the origin (interior or
    /// boundary, not just its plane) is closest, per spec.md §3's
    /// `Polyhedron` invariant. Returns the face id, that nearest point, and
    /// its squared distance from the origin.
    pub fn find_face_closest_to_origin(&self, pool: &SupportPointPool) -> (FaceId, Vec3, f32) {
        let point_of = |h: SupportHandle| pool.get(h).expect("face vertex still live").point;
        self.live_faces()
            .map(|(id, f)| {
                let [x, y, z] = f.vertices;
                let closest = crate::math::closest_point_on_triangle_to_origin(
                    point_of(x),
                    point_of(y),
                    point_of(z),
                );
                (id, closest, closest.length_squared())
            })
            .min_by(|(_, _, a), (_, _, b)| a.partial_cmp(b).unwrap())
            .expect("polyhedron always has at least one live face")
    }

    /// Adds `vertex` to the polyhedron, removing every face it can see and
    /// re-triangulating the resulting hole from the silhouette edge loop.
    /// Consumed support points are not reclaimed here; the driver clears the
    /// whole pool once `test_collision` returns.
    pub fn add_vertex(&mut self, vertex: SupportHandle, pool: &SupportPointPool, config: &GjkEpaConfig) {
        let point = pool.get(vertex).expect("new EPA vertex still live").point;

        let visible: Vec<FaceId> = self
            .live_faces()
            .filter(|(_, f)| f.normal.dot(point) - f.distance > config.epsilon)
            .map(|(id, _)| id)
            .collect();

        if visible.is_empty() {
            trace!("epa: vertex not visible from any face, skipping expansion");
            return;
        }

        // An edge shared by two visible faces is interior to the removed
        // patch and appears as the reverse pair from each face's side (the
        // file-level invariant this module relies on); cancel it against its
        // reverse as it's encountered instead of counting occurrences, since
        // both directed copies of an interior edge hash to different keys
        // and would otherwise each look like a lone, silhouette-bordering
        // edge. Only edges with no matching reverse survive as silhouette.
        let mut silhouette: Vec<(SupportHandle, SupportHandle)> = Vec::new();
        for &id in &visible {
            let face = self.faces[id.0].as_ref().unwrap();
            for edge in edges_of(face) {
                if let Some(pos) = silhouette
                    .iter()
                    .position(|&(from, to)| from == edge.1 && to == edge.0)
                {
                    silhouette.remove(pos);
                } else {
                    silhouette.push(edge);
                }
            }
        }

        for &id in &visible {
            self.faces[id.0] = None;
        }

        for (from, to) in silhouette {
            let i = pool.get(from).unwrap().point;
            let j = pool.get(to).unwrap().point;
            let mut verts = [from, to, vertex];
            let mut normal = (j - i).cross(point - i).normalize_or_zero();
            // A silhouette edge's new face must point away from the
            // polyhedron's interior; the origin is always interior, so
            // swap the edge's two vertices (keeping winding and normal
            // consistent) if the normal currently points toward it.
            if normal.dot(-i) > 0.0 {
                verts.swap(0, 1);
                let i = pool.get(verts[0]).unwrap().point;
                let j = pool.get(verts[1]).unwrap().point;
                normal = (j - i).cross(point - i).normalize_or_zero();
            }
            let distance = normal.dot(pool.get(verts[0]).unwrap().point);
            let face = Face {
                vertices: verts,
                normal,
                distance,
            };
            self.insert_face(face);
        }
    }

    fn insert_face(&mut self, face: Face) -> FaceId {
        if let Some(slot) = self.faces.iter_mut().position(|f| f.is_none()) {
            self.faces[slot] = Some(face);
            FaceId(slot)
        } else {
            self.faces.push(Some(face));
            FaceId(self.faces.len() - 1)
        }
    }
}

fn edges_of(face: &Face) -> [(SupportHandle, SupportHandle); 3] {
    let [a, b, c] = face.vertices;
    [(a, b), (b, c), (c, a)]
}
