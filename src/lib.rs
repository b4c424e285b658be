//! Early acoustic reflection/diffusion engine.
//!
//! Given a listener pose, a voxel occupancy oracle, and a stream of PCM
//! samples, this crate traces a small bundle of rays out from the
//! listener, records where they bounce, and turns the resulting
//! reflection/diffusion points into delayed, attenuated per-ear sample
//! injections for a downstream spatial mixer.
//!
//! The crate consumes three external collaborators through traits
//! ([`RayHitOracle`], [`SpatialMixSink`], [`ListenerPose`]) and never
//! implements them: voxel storage, ray-vs-voxel intersection, audio
//! mixing, and pose tracking all live outside this core.

pub mod controller;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod injector;
pub mod logging;
pub mod model;
pub mod oracle;
pub mod path;
pub mod stats;

pub use controller::ReverbController;
pub use engine::ReflectionEngine;
pub use error::{ReverbError, ReverbResult};
pub use geometry::{BoxFace, Quat, Vec3};
pub use injector::SampleInjector;
pub use model::{
    AcousticModel, AcousticParameters, Strategy, MAX_ACTIVE_PATHS, MAX_BOUNCES, MAX_DELAY_MS,
    MIN_ATTENUATION, SLIGHTLY_SHORT,
};
pub use oracle::{ElementHandle, ListenerPose, RayHit, RayHitOracle, SpatialMixSink};
pub use path::{AudiblePoint, PathState, TraceResult};
pub use stats::PropagationStats;
