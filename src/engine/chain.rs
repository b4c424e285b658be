//! Single-bounce-chain strategy: one uninterrupted reflection sequence
//! per seed direction, terminated on miss, attenuation floor, delay
//! ceiling, or bounce ceiling.

use cgmath::InnerSpace;
use rand::Rng;

use crate::geometry::{jittered_normal, reflect, seed_directions, Quat, Vec3};
use crate::model::{AcousticModel, Strategy, MAX_BOUNCES, MIN_ATTENUATION, SLIGHTLY_SHORT};
use crate::oracle::RayHitOracle;
use crate::path::{AudiblePoint, PathState, TraceResult};

pub fn trace<R: Rng + ?Sized>(
    model: &AcousticModel,
    oracle: &dyn RayHitOracle,
    listener: Vec3,
    orientation: Quat,
    rng: &mut R,
) -> TraceResult {
    let mut audible_points = Vec::new();
    let mut finished_paths = Vec::new();

    for seed_dir in seed_directions(orientation) {
        let mut start = listener;
        let mut dir = seed_dir;
        let mut path_distance = 0.0f32;
        let mut bounce_count = 0u32;
        let mut reflections = Vec::new();
        let mut last_delay = 0.0f32;
        let mut last_attenuation = 1.0f32;

        loop {
            let Some(hit) = oracle.intersect(start, dir) else { break };
            let end = start + dir * (hit.distance * SLIGHTLY_SHORT);
            let segment = (end - start).magnitude();
            path_distance += segment;
            bounce_count += 1;

            let ear_distance = (end - listener).magnitude();
            let total_delay = model.delay_from_distance(ear_distance + path_distance, Strategy::Chain);
            let attenuation =
                model.distance_attenuation(ear_distance + path_distance) * model.bounce_attenuation(bounce_count);

            reflections.push(end);
            audible_points.push(AudiblePoint {
                location: end,
                delay_ms: total_delay,
                attenuation,
                path_distance,
            });
            last_delay = total_delay;
            last_attenuation = attenuation;

            if attenuation <= MIN_ATTENUATION
                || total_delay >= crate::model::MAX_DELAY_MS
                || bounce_count >= MAX_BOUNCES
            {
                break;
            }

            let normal = jittered_normal(hit.face, model.params().jitter_normals, rng);
            dir = reflect(dir, normal);
            start = end;
        }

        finished_paths.push(PathState {
            origin: start,
            direction: dir,
            delay_ms: last_delay,
            attenuation: last_attenuation,
            distance: path_distance,
            bounce_depth: bounce_count,
            terminated: true,
            reflections,
            seed_origin: listener,
        });
    }

    TraceResult { audible_points, finished_paths, ceiling_exceeded_count: 0 }
}
