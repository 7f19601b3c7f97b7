//! Tunable constants for the GJK/EPA narrow phase.

use serde::{Deserialize, Serialize};

/// Skin width used by GJK's shallow-contact margin test.
pub const MARGIN: f32 = 0.03;

/// Shared iteration budget for both GJK and EPA.
pub const MAX_ITERATIONS: usize = 20;

/// EPA convergence threshold: stop expanding once a new support point gets
/// this close to the current closest face.
pub const EPA_CONDITION: f32 = 0.001;

/// "Effectively zero" threshold used in tetrahedron face selection and
/// closest-face-distance checks.
pub const EPSILON: f32 = 1e-6;

/// Bundles the tunables above so host applications can load/override them the
/// way they already load other engine configuration (mirrors the teacher
/// crate's `config.rs`, which exposes plain constants for the same purpose).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GjkEpaConfig {
    pub margin: f32,
    pub max_iterations: usize,
    pub epa_condition: f32,
    pub epsilon: f32,
}

impl Default for GjkEpaConfig {
    fn default() -> Self {
        Self {
            margin: MARGIN,
            max_iterations: MAX_ITERATIONS,
            epa_condition: EPA_CONDITION,
            epsilon: EPSILON,
        }
    }
}
