//! For each audible point (diffusion engine) or reflection-point prefix
//! (chain engine), produces per-ear delayed and attenuated PCM and
//! submits it to the mix sink.

use cgmath::InnerSpace;

use crate::error::{ReverbError, ReverbResult};
use crate::geometry::Vec3;
use crate::model::{AcousticModel, Strategy};
use crate::oracle::{ListenerPose, SpatialMixSink};
use crate::path::{AudiblePoint, TraceResult};

const CHANNELS: usize = 2;
const BYTES_PER_SAMPLE: usize = 2;

/// Which ear a per-ear contribution is computed for, used to drive the
/// shared left/right computation instead of hand-duplicating it per call
/// site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarId {
    Left,
    Right,
}

fn ear_position(ear: EarId, left_ear: Vec3, right_ear: Vec3) -> Vec3 {
    match ear {
        EarId::Left => left_ear,
        EarId::Right => right_ear,
    }
}

/// Stateless injector: all per-trace state lives in the `TraceResult` and
/// `AcousticModel` passed to `inject`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleInjector;

impl SampleInjector {
    pub fn new() -> Self {
        Self
    }

    /// Processes one inbound audio batch against the current trace
    /// result, submitting one (or two, when both ears are attenuated
    /// independently) delayed buffer per contribution to `sink`. Rejects
    /// the whole batch if its length is not a multiple of
    /// `channels * sizeof(i16)`; never submits a partial mix.
    pub fn inject(
        &self,
        model: &AcousticModel,
        strategy: Strategy,
        trace: &TraceResult,
        pose: &dyn ListenerPose,
        batch: &[u8],
        sample_rate: u32,
        sample_time: i64,
        sink: &dyn SpatialMixSink,
    ) -> ReverbResult<()> {
        let frame_bytes = CHANNELS * BYTES_PER_SAMPLE;
        if batch.len() % frame_bytes != 0 {
            return Err(ReverbError::MalformedAudioBatch {
                expected_multiple_of: frame_bytes,
                actual_len: batch.len(),
            });
        }

        let n = batch.len() / BYTES_PER_SAMPLE;
        let ns = n / CHANNELS;
        let samples: Vec<i16> = batch
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        let head = pose.position();
        let (left_ear, right_ear) = if model.params().separate_ears {
            (pose.left_ear_position(), pose.right_ear_position())
        } else {
            (head, head)
        };

        match strategy {
            Strategy::Diffusion => {
                for point in &trace.audible_points {
                    let ear_contribution = |ear| {
                        diffusion_ear_contribution(model, point, ear_position(ear, left_ear, right_ear))
                    };
                    let (left_delay, left_atten) = ear_contribution(EarId::Left);
                    let (right_delay, right_atten) = ear_contribution(EarId::Right);
                    self.submit_contribution(
                        &samples,
                        n,
                        ns,
                        model.params().stereo_source,
                        left_delay,
                        left_atten,
                        right_delay,
                        right_atten,
                        sample_rate,
                        sample_time,
                        sink,
                    );
                }
            }
            Strategy::Chain => {
                for path in &trace.finished_paths {
                    for bounce in 1..=path.reflections.len() {
                        let ear_contribution = |ear| {
                            chain_ear_contribution(
                                model,
                                path.seed_origin,
                                &path.reflections,
                                bounce,
                                ear_position(ear, left_ear, right_ear),
                            )
                        };
                        let (left_delay, left_atten) = ear_contribution(EarId::Left);
                        let (right_delay, right_atten) = ear_contribution(EarId::Right);
                        self.submit_contribution(
                            &samples,
                            n,
                            ns,
                            model.params().stereo_source,
                            left_delay,
                            left_atten,
                            right_delay,
                            right_atten,
                            sample_rate,
                            sample_time,
                            sink,
                        );
                    }
                }
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn submit_contribution(
        &self,
        samples: &[i16],
        n: usize,
        ns: usize,
        stereo_source: bool,
        left_delay_ms: f32,
        left_attenuation: f32,
        right_delay_ms: f32,
        right_attenuation: f32,
        sample_rate: u32,
        sample_time: i64,
        sink: &dyn SpatialMixSink,
    ) {
        let mut left_out = vec![0i16; n];
        let mut right_out = vec![0i16; n];

        for i in 0..ns {
            let left_sample = samples[2 * i] as f32;
            let right_sample = if stereo_source { samples[2 * i + 1] as f32 } else { left_sample };
            left_out[2 * i] = scale_sample(left_sample, left_attenuation);
            right_out[2 * i + 1] = scale_sample(right_sample, right_attenuation);
        }

        let left_delay_samples = ms_to_samples(left_delay_ms, sample_rate);
        let right_delay_samples = ms_to_samples(right_delay_ms, sample_rate);
        sink.add_spatial_audio_to_buffer(sample_time + left_delay_samples, &left_out);
        sink.add_spatial_audio_to_buffer(sample_time + right_delay_samples, &right_out);
    }
}

fn diffusion_ear_contribution(model: &AcousticModel, point: &AudiblePoint, ear: Vec3) -> (f32, f32) {
    let ear_distance = (point.location - ear).magnitude();
    let delay = model.delay_from_distance(ear_distance, Strategy::Diffusion) + point.delay_ms;
    let attenuation = point.attenuation * model.distance_attenuation(ear_distance + point.path_distance);
    (delay, attenuation)
}

/// Distance from seed origin through the bounce chain up to `bounce`, plus
/// the final segment from the last reflection back to `ear`, matching the
/// engine's own `pathDistance + earDistance` accounting in
/// `engine::chain::trace`. Not a one-way walk from the ear outward.
fn chain_ear_contribution(
    model: &AcousticModel,
    seed_origin: Vec3,
    reflections: &[Vec3],
    bounce: usize,
    ear: Vec3,
) -> (f32, f32) {
    let mut previous = seed_origin;
    let mut path_distance = 0.0f32;
    for point in &reflections[..bounce] {
        path_distance += (*point - previous).magnitude();
        previous = *point;
    }
    let ear_distance = (reflections[bounce - 1] - ear).magnitude();
    let total_distance = path_distance + ear_distance;
    let delay = model.delay_from_distance(total_distance, Strategy::Chain);
    let attenuation = model.distance_attenuation(total_distance) * model.bounce_attenuation(bounce as u32);
    (delay, attenuation)
}

fn ms_to_samples(delay_ms: f32, sample_rate: u32) -> i64 {
    (delay_ms * sample_rate as f32 / 1000.0).round() as i64
}

/// Saturating multiply-and-round. The reference implementation wraps on
/// overflow; saturating is an explicitly-permitted alternative (spec
/// section 4.5 numeric notes) and avoids surprising clicks/pops.
fn scale_sample(sample: f32, attenuation: f32) -> i16 {
    (sample * attenuation).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
