use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use reverb_core::{BoxFace, ElementHandle, ListenerPose, Quat, RayHit, RayHitOracle, SpatialMixSink, Vec3};

/// Never hits anything; free space.
pub struct NoHitOracle;

impl RayHitOracle for NoHitOracle {
    fn intersect(&self, _start: Vec3, _dir: Vec3) -> Option<RayHit> {
        None
    }
}

/// A single infinite plane at `x = plane_x`, hit only by rays with a
/// positive X direction component, with a fixed face tag.
pub struct PlaneXOracle {
    pub plane_x: f32,
}

impl RayHitOracle for PlaneXOracle {
    fn intersect(&self, start: Vec3, dir: Vec3) -> Option<RayHit> {
        if dir.x.abs() < 1e-6 {
            return None;
        }
        let distance = (self.plane_x - start.x) / dir.x;
        if distance > 0.0 {
            Some(RayHit { distance, face: BoxFace::MinX, element: ElementHandle(0) })
        } else {
            None
        }
    }
}

/// An axis-aligned cube centered at the origin with the given half
/// extent, hit from the inside on every ray.
pub struct CubeOracle {
    pub half_extent: f32,
}

impl RayHitOracle for CubeOracle {
    fn intersect(&self, start: Vec3, dir: Vec3) -> Option<RayHit> {
        let mut best: Option<(f32, BoxFace)> = None;
        let faces = [
            (self.half_extent, BoxFace::MaxX, Vec3::new(1.0, 0.0, 0.0)),
            (-self.half_extent, BoxFace::MinX, Vec3::new(-1.0, 0.0, 0.0)),
            (self.half_extent, BoxFace::MaxY, Vec3::new(0.0, 1.0, 0.0)),
            (-self.half_extent, BoxFace::MinY, Vec3::new(0.0, -1.0, 0.0)),
            (self.half_extent, BoxFace::MaxZ, Vec3::new(0.0, 0.0, 1.0)),
            (-self.half_extent, BoxFace::MinZ, Vec3::new(0.0, 0.0, -1.0)),
        ];
        for (plane, face, axis) in faces {
            let denom = dir.x * axis.x + dir.y * axis.y + dir.z * axis.z;
            if denom.abs() < 1e-8 {
                continue;
            }
            let start_axis = start.x * axis.x + start.y * axis.y + start.z * axis.z;
            let distance = (plane - start_axis) / denom;
            if distance > 1e-6 {
                match best {
                    Some((best_distance, _)) if best_distance <= distance => {}
                    _ => best = Some((distance, face)),
                }
            }
        }
        best.map(|(distance, face)| RayHit { distance, face, element: ElementHandle(0) })
    }
}

/// Wall in every direction at a fixed distance, worst case for the
/// diffusion-explosion guard.
pub struct OmniWallOracle {
    pub distance: f32,
}

impl RayHitOracle for OmniWallOracle {
    fn intersect(&self, _start: Vec3, _dir: Vec3) -> Option<RayHit> {
        Some(RayHit { distance: self.distance, face: BoxFace::MaxX, element: ElementHandle(0) })
    }
}

/// Wraps another oracle and counts how many times `intersect` was
/// called, to assert cache-staleness gating without caring about the
/// geometry.
pub struct CountingOracle<O> {
    inner: O,
    pub calls: AtomicUsize,
}

impl<O: RayHitOracle> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self { inner, calls: AtomicUsize::new(0) }
    }
}

impl<O: RayHitOracle> RayHitOracle for CountingOracle<O> {
    fn intersect(&self, start: Vec3, dir: Vec3) -> Option<RayHit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.intersect(start, dir)
    }
}

pub struct FixedPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub left_ear: Vec3,
    pub right_ear: Vec3,
}

impl FixedPose {
    pub fn at_origin() -> Self {
        let identity = Quat::new(1.0, 0.0, 0.0, 0.0);
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            orientation: identity,
            left_ear: Vec3::new(0.0, 0.0, 0.0),
            right_ear: Vec3::new(0.0, 0.0, 0.0),
        }
    }
}

impl ListenerPose for FixedPose {
    fn position(&self) -> Vec3 {
        self.position
    }
    fn orientation(&self) -> Quat {
        self.orientation
    }
    fn head_orientation(&self) -> Quat {
        self.orientation
    }
    fn left_ear_position(&self) -> Vec3 {
        self.left_ear
    }
    fn right_ear_position(&self) -> Vec3 {
        self.right_ear
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub submissions: Mutex<Vec<(i64, Vec<i16>)>>,
}

impl SpatialMixSink for RecordingSink {
    fn add_spatial_audio_to_buffer(&self, sample_time_anchor: i64, samples: &[i16]) {
        self.submissions.lock().unwrap().push((sample_time_anchor, samples.to_vec()));
    }
}
