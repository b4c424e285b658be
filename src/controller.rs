//! Coordinator: caches the last listener pose, decides when to re-trace,
//! holds parameters and aggregate statistics, and routes inbound audio
//! batches to the injector.

use cgmath::InnerSpace;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::ReflectionEngine;
use crate::error::ReverbResult;
use crate::geometry::{Quat, Vec3};
use crate::injector::SampleInjector;
use crate::model::{AcousticParameters, Strategy};
use crate::oracle::{ListenerPose, RayHitOracle, SpatialMixSink};
use crate::path::TraceResult;
use crate::stats::PropagationStats;

/// Position cache-invalidation threshold (1 cm).
const POSITION_EPSILON: f32 = 0.01;
/// Orientation cache-invalidation threshold, expressed as a minimum
/// quaternion dot product; below this the pose is considered rotated.
const ORIENTATION_DOT_EPSILON: f32 = 0.9999;

struct CachedPose {
    position: Vec3,
    orientation: Quat,
    left_ear: Vec3,
    right_ear: Vec3,
    with_diffusion: bool,
}

struct State {
    cached_pose: Option<CachedPose>,
    trace: TraceResult,
    stats: PropagationStats,
    rng: ChaCha8Rng,
}

pub struct ReverbController {
    engine: ReflectionEngine,
    injector: SampleInjector,
    state: Mutex<State>,
}

impl ReverbController {
    pub fn new(params: AcousticParameters, rng_seed: u64) -> ReverbResult<Self> {
        let engine = ReflectionEngine::new(params)?;
        Ok(Self {
            engine,
            injector: SampleInjector::new(),
            state: Mutex::new(State {
                cached_pose: None,
                trace: TraceResult::empty(),
                stats: PropagationStats::default(),
                rng: ChaCha8Rng::seed_from_u64(rng_seed),
            }),
        })
    }

    /// One renderer tick: retraces when the pose has moved meaningfully,
    /// otherwise reuses the cached `TraceResult`.
    pub fn render(&self, pose: &dyn ListenerPose, oracle: &dyn RayHitOracle) -> ReverbResult<()> {
        let orientation = if self.engine.model().params().head_oriented {
            pose.head_orientation()
        } else {
            pose.orientation()
        };
        let position = pose.position();
        let left_ear = pose.left_ear_position();
        let right_ear = pose.right_ear_position();
        let with_diffusion = self.engine.model().params().with_diffusion;

        let mut state = self.state.lock();
        let stale = match &state.cached_pose {
            None => true,
            Some(cached) => {
                (cached.position - position).magnitude() > POSITION_EPSILON
                    || cached.orientation.dot(orientation).abs() < ORIENTATION_DOT_EPSILON
                    || (cached.left_ear - left_ear).magnitude() > POSITION_EPSILON
                    || (cached.right_ear - right_ear).magnitude() > POSITION_EPSILON
                    || cached.with_diffusion != with_diffusion
            }
        };

        if !stale {
            log::trace!("reverb controller: pose unchanged, reusing cached trace");
            return Ok(());
        }

        log::debug!("reverb controller: pose stale, retracing ({:?})", self.engine.strategy());
        let trace = self.engine.trace(oracle, position, orientation, &mut state.rng);
        let stats = PropagationStats::from_trace(&trace, position);

        state.trace = trace;
        state.stats = stats;
        state.cached_pose = Some(CachedPose { position, orientation, left_ear, right_ear, with_diffusion });
        Ok(())
    }

    /// Forwards one inbound audio batch to the injector using the most
    /// recently traced `TraceResult`, regardless of whether this tick
    /// also retraced.
    pub fn ingest_audio(
        &self,
        pose: &dyn ListenerPose,
        batch: &[u8],
        sample_rate: u32,
        sample_time: i64,
        sink: &dyn SpatialMixSink,
    ) -> ReverbResult<()> {
        let mut state = self.state.lock();
        let strategy = self.engine.strategy();
        let result = self.injector.inject(
            self.engine.model(),
            strategy,
            &state.trace,
            pose,
            batch,
            sample_rate,
            sample_time,
            sink,
        );

        if matches!(strategy, Strategy::Chain) {
            let listener = pose.position();
            state.stats = PropagationStats::from_trace(&state.trace, listener);
        }

        result
    }

    pub fn stats(&self) -> PropagationStats {
        self.state.lock().stats
    }

    pub fn strategy(&self) -> Strategy {
        self.engine.strategy()
    }
}
