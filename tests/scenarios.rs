//! Integration tests for the six concrete scenarios and supplemental
//! properties called out for the controller/engine pairing.

mod common;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use common::{CountingOracle, CubeOracle, FixedPose, NoHitOracle, OmniWallOracle, PlaneXOracle, RecordingSink};
use reverb_core::{
    AcousticModel, AcousticParameters, ReflectionEngine, ReverbController, SampleInjector, Strategy,
    MAX_ACTIVE_PATHS, MAX_BOUNCES,
};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn identity() -> reverb_core::Quat {
    cgmath::Quaternion::new(1.0, 0.0, 0.0, 0.0)
}

fn listener_origin() -> reverb_core::Vec3 {
    reverb_core::Vec3::new(0.0, 0.0, 0.0)
}

#[test]
fn free_space_produces_no_audible_points() {
    let diffusion_params = AcousticParameters::default();
    let diffusion_engine = ReflectionEngine::new(diffusion_params).unwrap();
    let diffusion_trace = diffusion_engine.trace(&NoHitOracle, listener_origin(), identity(), &mut rng(1));
    assert!(diffusion_trace.audible_points.is_empty());
    assert_eq!(diffusion_trace.finished_paths.len(), 14);
    assert!(diffusion_trace.finished_paths.iter().all(|p| p.bounce_depth == 0 && p.reflections.is_empty()));

    let mut chain_params = AcousticParameters::default();
    chain_params.with_diffusion = false;
    let chain_engine = ReflectionEngine::new(chain_params).unwrap();
    let chain_trace = chain_engine.trace(&NoHitOracle, listener_origin(), identity(), &mut rng(1));
    assert!(chain_trace.audible_points.is_empty());
    assert_eq!(chain_trace.finished_paths.len(), 14);
    assert!(chain_trace.finished_paths.iter().all(|p| p.reflections.is_empty()));
}

#[test]
fn single_wall_chain_engine_single_bounce() {
    let mut params = AcousticParameters::default();
    params.with_diffusion = false;
    params.jitter_normals = false;
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = PlaneXOracle { plane_x: 10.0 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(2));

    // Seed index 0 is the "right" (+X) axial direction.
    let right_chain = &trace.finished_paths[0];
    assert_eq!(right_chain.reflections.len(), 1);
    let hit = right_chain.reflections[0];
    assert!((hit.x - 9.99).abs() < 1e-3);
    assert!(hit.y.abs() < 1e-6 && hit.z.abs() < 1e-6);

    let point = &trace.audible_points[0];
    assert!((point.delay_ms - 79.94).abs() < 0.05);
    assert!((point.path_distance - 9.99).abs() < 1e-3);
}

#[test]
fn chain_engine_injector_round_trip_matches_scenario_two() {
    let mut params = AcousticParameters::default();
    params.with_diffusion = false;
    params.jitter_normals = false;
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = PlaneXOracle { plane_x: 10.0 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(8));

    let pose = FixedPose::at_origin();
    let sink = RecordingSink::default();
    let batch: Vec<u8> = [1000i16, 1000i16].iter().flat_map(|s| s.to_le_bytes()).collect();

    SampleInjector::new()
        .inject(engine.model(), Strategy::Chain, &trace, &pose, &batch, 48_000, 0, &sink)
        .unwrap();

    let expected_delay_ms = engine.model().delay_from_distance(9.99 * 2.0, Strategy::Chain);
    assert!((expected_delay_ms - 79.94).abs() < 0.05);
    let expected_delay_samples = (expected_delay_ms * 48_000.0 / 1000.0).round() as i64;

    // Seed index 0 ("right") submits its left/right contributions first.
    let submissions = sink.submissions.lock().unwrap();
    assert_eq!(submissions[0].0, expected_delay_samples);
    assert_eq!(submissions[1].0, expected_delay_samples);
}

#[test]
fn single_wall_diffusion_engine_zero_fanout() {
    let mut params = AcousticParameters::new(
        0.0, 3.0, 2.0, 0, 0.125, 0.125, false, true, true, true, true,
    )
    .unwrap();
    params.with_diffusion = true;
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = PlaneXOracle { plane_x: 10.0 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(3));

    let point = &trace.audible_points[0];
    assert!((point.attenuation - 0.875).abs() < 1e-3);
    assert!((point.delay_ms - 29.97).abs() < 0.05);
}

#[test]
fn closed_box_chain_engine_reaches_bounce_ceiling_on_every_seed() {
    let mut params = AcousticParameters::default();
    params.with_diffusion = false;
    params.jitter_normals = false;
    params.absorption_ratio = 0.0;
    params.diffusion_ratio = 0.0;
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = CubeOracle { half_extent: 0.05 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(4));

    let total_reflections: usize = trace.finished_paths.iter().map(|p| p.reflections.len()).sum();
    assert_eq!(total_reflections, 14 * MAX_BOUNCES as usize);
    assert_eq!(trace.audible_points.len(), 14 * MAX_BOUNCES as usize);
    assert!(trace.finished_paths.iter().all(|p| p.bounce_depth == MAX_BOUNCES));
}

#[test]
fn closed_box_diffusion_engine_zero_fanout_matches_chain_count() {
    let mut params = AcousticParameters::default();
    params.with_diffusion = true;
    params.jitter_normals = false;
    params.diffusion_fanout = 0;
    params.absorption_ratio = 0.0;
    params.diffusion_ratio = 0.0;
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = CubeOracle { half_extent: 0.05 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(5));
    assert_eq!(trace.audible_points.len(), 14 * MAX_BOUNCES as usize);
}

#[test]
fn diffusion_explosion_guard_terminates_without_panicking() {
    let params = AcousticParameters::default();
    let engine = ReflectionEngine::new(params).unwrap();
    let oracle = OmniWallOracle { distance: 1.0 };

    let trace = engine.trace(&oracle, listener_origin(), identity(), &mut rng(6));

    // The branching factor (fanout + continuing reflection) blows past the
    // active-path ceiling within a handful of ticks; the engine must still
    // return, and the ceiling guard means it only does so once well past it.
    assert!(trace.finished_paths.len() > MAX_ACTIVE_PATHS);
}

#[test]
fn controller_staleness_gating_skips_retrace_for_unchanged_pose() {
    let params = AcousticParameters::default();
    let controller = ReverbController::new(params, 7).unwrap();
    let oracle = CountingOracle::new(NoHitOracle);
    let pose = FixedPose::at_origin();

    controller.render(&pose, &oracle).unwrap();
    let calls_after_first = oracle.calls.load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(calls_after_first, 14);

    controller.render(&pose, &oracle).unwrap();
    let calls_after_second = oracle.calls.load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(calls_after_second, calls_after_first);
}

#[test]
fn acoustic_model_rejects_malformed_parameters_without_panicking() {
    assert!(AcousticParameters::new(20.0, 3.0, 2.0, 5, 0.9, 0.9, true, true, true, true, true).is_err());
    assert!(AcousticParameters::new(-1.0, 3.0, 2.0, 5, 0.1, 0.1, true, true, true, true, true).is_err());
    assert!(AcousticParameters::new(20.0, 0.0, 2.0, 5, 0.1, 0.1, true, true, true, true, true).is_err());
    assert!(AcousticModel::new(AcousticParameters::default()).is_ok());
}
