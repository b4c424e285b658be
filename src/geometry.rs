//! Vector/quaternion math, the 14-direction seed generator, voxel face
//! normals, and normal jitter for imperfect-surface modeling.

use cgmath::{InnerSpace, Quaternion, Rotation, Vector3};
use rand::Rng;

pub type Vec3 = Vector3<f32>;
pub type Quat = Quaternion<f32>;

/// Which face of an axis-aligned voxel a ray hit, as reported by the
/// oracle. Matches the wire-visible tags in the external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxFace {
    MinX,
    MaxX,
    MinY,
    MaxY,
    MinZ,
    MaxZ,
}

impl BoxFace {
    /// Outward unit normal for this face.
    pub fn normal(self) -> Vec3 {
        match self {
            BoxFace::MinX => Vec3::new(-1.0, 0.0, 0.0),
            BoxFace::MaxX => Vec3::new(1.0, 0.0, 0.0),
            BoxFace::MinY => Vec3::new(0.0, -1.0, 0.0),
            BoxFace::MaxY => Vec3::new(0.0, 1.0, 0.0),
            BoxFace::MinZ => Vec3::new(0.0, 0.0, -1.0),
            BoxFace::MaxZ => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Reflects `dir` about `normal` (both expected roughly unit length).
pub fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - normal * (2.0 * dir.dot(normal))
}

/// A normal perturbed to model a slightly imperfect surface: the
/// normal-axis component keeps magnitude `m ~ U[0.99, 1.0]`, and the two
/// tangential components each take `(1 - m) / 2` scaled by an
/// independent random sign. Returns the face normal unchanged when
/// `jitter` is false.
pub fn jittered_normal<R: Rng + ?Sized>(face: BoxFace, jitter: bool, rng: &mut R) -> Vec3 {
    if !jitter {
        return face.normal();
    }

    let magnitude: f32 = rng.gen_range(0.99..=1.0);
    let tangential = (1.0 - magnitude) / 2.0;
    let sign_a: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sign_b: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let (axis, tangent_a, tangent_b) = tangent_basis(face);
    let perturbed = axis * magnitude + tangent_a * (tangential * sign_a) + tangent_b * (tangential * sign_b);
    perturbed.normalize()
}

/// Returns `(normal_axis, tangent_a, tangent_b)` for a face, used to build
/// jittered normals and diffusion-child directions in the face's local
/// frame.
fn tangent_basis(face: BoxFace) -> (Vec3, Vec3, Vec3) {
    let axis = face.normal();
    let (tangent_a, tangent_b) = match face {
        BoxFace::MinX | BoxFace::MaxX => (Vec3::unit_y(), Vec3::unit_z()),
        BoxFace::MinY | BoxFace::MaxY => (Vec3::unit_x(), Vec3::unit_z()),
        BoxFace::MinZ | BoxFace::MaxZ => (Vec3::unit_x(), Vec3::unit_y()),
    };
    (axis, tangent_a, tangent_b)
}

/// A direction scattered into the hemisphere of a hit face, used to seed
/// diffusion children: the principal component along the face normal is
/// `r ~ U[0.5, 1]`, the two tangential components each `(1 - r) / 2` times
/// an independent random sign, normalized.
pub fn scattered_hemisphere_direction<R: Rng + ?Sized>(face: BoxFace, rng: &mut R) -> Vec3 {
    let r: f32 = rng.gen_range(0.5..=1.0);
    let tangential = (1.0 - r) / 2.0;
    let sign_a: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sign_b: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let (axis, tangent_a, tangent_b) = tangent_basis(face);
    let scattered = axis * r + tangent_a * (tangential * sign_a) + tangent_b * (tangential * sign_b);
    scattered.normalize()
}

/// The 14 seed directions fired from the listener each trace: 6 axial
/// (right, left, up, down, front, back) and 8 diagonals (the normalized
/// sum of one of {front, back}, one of {left, right}, one of {up, down}),
/// all rotated into world space by `orientation`.
pub fn seed_directions(orientation: Quat) -> [Vec3; 14] {
    let right = Vec3::unit_x();
    let left = -Vec3::unit_x();
    let up = Vec3::unit_y();
    let down = -Vec3::unit_y();
    let front = Vec3::unit_z();
    let back = -Vec3::unit_z();

    let mut local = [Vec3::new(0.0, 0.0, 0.0); 14];
    local[0] = right;
    local[1] = left;
    local[2] = up;
    local[3] = down;
    local[4] = front;
    local[5] = back;

    let mut i = 6;
    for depth in [front, back] {
        for horiz in [left, right] {
            for vert in [up, down] {
                local[i] = (depth + horiz + vert).normalize();
                i += 1;
            }
        }
    }
    debug_assert_eq!(i, 14);

    let mut world = [Vec3::new(0.0, 0.0, 0.0); 14];
    for (dst, src) in world.iter_mut().zip(local.iter()) {
        *dst = orientation.rotate_vector(*src);
    }
    world
}
