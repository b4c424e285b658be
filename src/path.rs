//! Value records for in-flight rays and the results a trace produces.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// One in-flight ray. Mutable during a trace; exists only for the
/// duration of the trace pass that created it.
#[derive(Debug, Clone)]
pub struct PathState {
    pub origin: Vec3,
    pub direction: Vec3,
    pub delay_ms: f32,
    pub attenuation: f32,
    pub distance: f32,
    pub bounce_depth: u32,
    pub terminated: bool,
    pub reflections: Vec<Vec3>,
    pub seed_origin: Vec3,
}

impl PathState {
    pub fn new_seed(origin: Vec3, direction: Vec3, initial_delay_ms: f32, initial_attenuation: f32) -> Self {
        Self {
            origin,
            direction,
            delay_ms: initial_delay_ms,
            attenuation: initial_attenuation,
            distance: 0.0,
            bounce_depth: 0,
            terminated: false,
            reflections: Vec::new(),
            seed_origin: origin,
        }
    }
}

/// A point in space from which reflected/diffused sound reaches the
/// listener, tagged with accumulated delay, attenuation, and traveled
/// distance up to that point. Ear-to-point delay is added later by the
/// injector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudiblePoint {
    pub location: Vec3,
    pub delay_ms: f32,
    pub attenuation: f32,
    pub path_distance: f32,
}

/// Output of one full reflection-engine trace: the audible points used by
/// the injector, plus the finished path records used by visualization.
#[derive(Debug, Clone, Default)]
pub struct TraceResult {
    pub audible_points: Vec<AudiblePoint>,
    pub finished_paths: Vec<PathState>,
    /// Number of times the diffusion active-path ceiling guard fired
    /// during this trace (section 7 runaway-trace handling), once for a
    /// full-queue termination, once per spawn group that had to drop
    /// children. Always 0 for the chain engine, which has no unbounded
    /// branching to guard against.
    pub ceiling_exceeded_count: usize,
}

impl TraceResult {
    pub fn empty() -> Self {
        Self { audible_points: Vec::new(), finished_paths: Vec::new(), ceiling_exceeded_count: 0 }
    }
}
