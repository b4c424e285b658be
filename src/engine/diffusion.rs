//! Diffusion strategy: a queue of active paths advanced one bounce per
//! tick, spawning scattered children at each bounce until the queue runs
//! dry or the active-path ceiling is hit.

use cgmath::InnerSpace;
use rand::Rng;

use crate::geometry::{jittered_normal, reflect, scattered_hemisphere_direction, seed_directions, Quat, Vec3};
use crate::model::{AcousticModel, Strategy, MAX_ACTIVE_PATHS, MAX_BOUNCES, MAX_DELAY_MS, MIN_ATTENUATION, SLIGHTLY_SHORT};
use crate::oracle::RayHitOracle;
use crate::path::{AudiblePoint, PathState, TraceResult};

pub fn trace<R: Rng + ?Sized>(
    model: &AcousticModel,
    oracle: &dyn RayHitOracle,
    listener: Vec3,
    orientation: Quat,
    rng: &mut R,
) -> TraceResult {
    let initial_delay = model.delay_from_distance(0.0, Strategy::Diffusion) + model.params().pre_delay_ms;

    let mut active: Vec<PathState> = seed_directions(orientation)
        .into_iter()
        .map(|dir| PathState::new_seed(listener, dir, initial_delay, 1.0))
        .collect();

    let mut finished_paths = Vec::new();
    let mut audible_points = Vec::new();
    let mut ceiling_warned = false;
    let mut ceiling_exceeded_count = 0usize;

    while !active.is_empty() {
        if active.len() > MAX_ACTIVE_PATHS {
            log::warn!(
                "diffusion active-path ceiling exceeded ({} active paths); terminating remaining paths",
                active.len()
            );
            ceiling_exceeded_count += 1;
            for mut path in active.drain(..) {
                path.terminated = true;
                finished_paths.push(path);
            }
            break;
        }

        let mut next_active = Vec::with_capacity(active.len());

        for mut path in active.drain(..) {
            if path.bounce_depth >= MAX_BOUNCES {
                path.terminated = true;
                finished_paths.push(path);
                continue;
            }

            let Some(hit) = oracle.intersect(path.origin, path.direction) else {
                path.terminated = true;
                finished_paths.push(path);
                continue;
            };

            let end = path.origin + path.direction * (hit.distance * SLIGHTLY_SHORT);
            let seg_len = (end - path.origin).magnitude();
            let s_prime = path.distance + seg_len;
            let to_listener = (end - listener).magnitude();
            let delta_prime = path.delay_ms + model.delay_from_distance(seg_len, Strategy::Diffusion);
            let delta_total = delta_prime + model.delay_from_distance(to_listener, Strategy::Diffusion);
            let alpha_to_listener = model.distance_attenuation(to_listener + s_prime);

            let surface = model.surface(Some(hit.element));
            let alpha_refl = path.attenuation * surface.reflective;
            let alpha_diff_total = path.attenuation * surface.diffusion;
            let fanout = model.params().diffusion_fanout;
            let alpha_diff_each = if fanout >= 1 { alpha_diff_total / fanout as f32 } else { 0.0 };

            if fanout >= 1 && alpha_diff_each * alpha_to_listener > MIN_ATTENUATION && delta_total < MAX_DELAY_MS {
                for _ in 0..fanout {
                    if next_active.len() + 1 > MAX_ACTIVE_PATHS {
                        if !ceiling_warned {
                            log::warn!("diffusion spawn would exceed active-path ceiling of {}; dropping remainder", MAX_ACTIVE_PATHS);
                            ceiling_warned = true;
                        }
                        ceiling_exceeded_count += 1;
                        break;
                    }
                    let child_dir = scattered_hemisphere_direction(hit.face, rng);
                    let mut child = PathState::new_seed(end, child_dir, delta_prime, alpha_diff_each);
                    child.distance = s_prime;
                    next_active.push(child);
                }
            }

            if (alpha_refl + alpha_diff_total) * alpha_to_listener > MIN_ATTENUATION && delta_total < MAX_DELAY_MS {
                path.reflections.push(end);
                audible_points.push(AudiblePoint {
                    location: end,
                    delay_ms: delta_prime,
                    attenuation: alpha_refl + alpha_diff_total,
                    path_distance: s_prime,
                });
            }

            if alpha_refl * alpha_to_listener > MIN_ATTENUATION {
                path.origin = end;
                path.direction = reflect(path.direction, jittered_normal(hit.face, model.params().jitter_normals, rng));
                path.delay_ms = delta_prime;
                path.attenuation = alpha_refl;
                path.distance = s_prime;
                path.bounce_depth += 1;
                next_active.push(path);
            } else {
                path.terminated = true;
                finished_paths.push(path);
            }
        }

        active = next_active;
    }

    TraceResult { audible_points, finished_paths, ceiling_exceeded_count }
}
