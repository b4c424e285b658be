//! External collaborator interfaces. These are consumed, never
//! implemented, by the acoustic core: voxel storage, the ray-vs-voxel
//! intersection primitive, the downstream mixer, and the listener pose
//! source all live outside this crate.

use crate::geometry::{BoxFace, Quat, Vec3};

/// Opaque handle to whatever voxel/element a ray hit. The core never
/// interprets this beyond passing it to `AcousticModel::surface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// One surface hit reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub face: BoxFace,
    pub element: ElementHandle,
}

/// Voxel octree storage and the ray-vs-voxel intersection primitive.
/// Must be safe under concurrent reads; the core never mutates it.
pub trait RayHitOracle: Send + Sync {
    fn intersect(&self, start: Vec3, dir: Vec3) -> Option<RayHit>;
}

/// The downstream audio mixer that accepts delayed per-ear PCM buffers.
/// Assumed to tolerate concurrent submissions and to order contributions
/// by `sample_time_anchor` itself.
pub trait SpatialMixSink: Send + Sync {
    /// `sample_time_anchor` is measured in the sink's own sample clock.
    /// `samples` is raw stereo-interleaved 16-bit PCM.
    fn add_spatial_audio_to_buffer(&self, sample_time_anchor: i64, samples: &[i16]);
}

/// Listener pose source: head position/orientation and per-ear positions.
pub trait ListenerPose {
    fn position(&self) -> Vec3;
    fn orientation(&self) -> Quat;
    fn head_orientation(&self) -> Quat;
    fn left_ear_position(&self) -> Vec3;
    fn right_ear_position(&self) -> Vec3;
}
