//! Aggregate statistics recomputed on each inbound batch (chain engine)
//! or on each trace (diffusion engine).

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::path::TraceResult;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PropagationStats {
    pub min_delay_ms: f32,
    pub max_delay_ms: f32,
    pub avg_delay_ms: f32,
    pub min_attenuation: f32,
    pub max_attenuation: f32,
    pub avg_attenuation: f32,
    pub total_path_count: usize,
    pub diffusion_path_count: usize,
    /// Non-zero when a diffusion trace hit the active-path ceiling and
    /// had to terminate paths early (spec section 7 runaway-trace
    /// handling surfaces a count-based warning here instead of aborting).
    pub ceiling_exceeded_count: usize,
}

impl PropagationStats {
    /// `listener` classifies finished paths as primary seeds (`seed_origin
    /// == listener`) versus diffusion children (spawned at a bounce
    /// point), per the `PathState.seedOrigin` convention in spec section 3.
    pub fn from_trace(trace: &TraceResult, listener: Vec3) -> Self {
        let points = &trace.audible_points;
        let diffusion_path_count = trace.finished_paths.iter().filter(|p| p.seed_origin != listener).count();

        if points.is_empty() {
            return Self {
                total_path_count: trace.finished_paths.len(),
                diffusion_path_count,
                ceiling_exceeded_count: trace.ceiling_exceeded_count,
                ..Default::default()
            };
        }

        let mut min_delay = f32::INFINITY;
        let mut max_delay = f32::NEG_INFINITY;
        let mut sum_delay = 0.0f32;
        let mut min_atten = f32::INFINITY;
        let mut max_atten = f32::NEG_INFINITY;
        let mut sum_atten = 0.0f32;

        for point in points {
            min_delay = min_delay.min(point.delay_ms);
            max_delay = max_delay.max(point.delay_ms);
            sum_delay += point.delay_ms;
            min_atten = min_atten.min(point.attenuation);
            max_atten = max_atten.max(point.attenuation);
            sum_atten += point.attenuation;
        }

        let count = points.len() as f32;

        Self {
            min_delay_ms: min_delay,
            max_delay_ms: max_delay,
            avg_delay_ms: sum_delay / count,
            min_attenuation: min_atten,
            max_attenuation: max_atten,
            avg_attenuation: sum_atten / count,
            total_path_count: trace.finished_paths.len(),
            diffusion_path_count,
            ceiling_exceeded_count: trace.ceiling_exceeded_count,
        }
    }
}
