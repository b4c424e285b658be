//! Parameter-driven acoustic formulas: delay-from-distance, distance
//! attenuation, bounce/reflective attenuation, and surface lookup.

use serde::{Deserialize, Serialize};

use crate::error::{ReverbError, ReverbResult};

/// Geometric-spreading constant from the reference formula.
const GA: f32 = 0.3;
/// Log base used by the distance-attenuation curve.
const LOG_BASE: f32 = 2.5;

/// Minimum attenuation below which a path/contribution is considered
/// inaudible and dropped.
pub const MIN_ATTENUATION: f32 = 1.0 / 256.0;
/// Hard ceiling on accumulated delay.
pub const MAX_DELAY_MS: f32 = 20_000.0;
/// Hard ceiling on bounce depth.
pub const MAX_BOUNCES: u32 = 10;
/// Fraction of the raw hit distance used to keep a reflection point on
/// the interior side of the surface.
pub const SLIGHTLY_SHORT: f32 = 0.999;
/// Hard ceiling on the number of simultaneously active diffusion paths
/// per trace, guarding against fanout explosion.
pub const MAX_ACTIVE_PATHS: usize = 10_000;

/// Immutable parameters for one trace pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticParameters {
    pub pre_delay_ms: f32,
    pub ms_per_meter: f32,
    pub distance_scale: f32,
    pub diffusion_fanout: u32,
    pub absorption_ratio: f32,
    pub diffusion_ratio: f32,
    pub jitter_normals: bool,
    pub head_oriented: bool,
    pub separate_ears: bool,
    pub stereo_source: bool,
    pub with_diffusion: bool,
}

impl Default for AcousticParameters {
    fn default() -> Self {
        Self {
            pre_delay_ms: 20.0,
            ms_per_meter: 3.0,
            distance_scale: 2.0,
            diffusion_fanout: 5,
            absorption_ratio: 0.125,
            diffusion_ratio: 0.125,
            jitter_normals: true,
            head_oriented: true,
            separate_ears: true,
            stereo_source: true,
            with_diffusion: true,
        }
    }
}

impl AcousticParameters {
    /// Validates at construction time; malformed parameters are rejected,
    /// never silently clamped.
    pub fn new(
        pre_delay_ms: f32,
        ms_per_meter: f32,
        distance_scale: f32,
        diffusion_fanout: u32,
        absorption_ratio: f32,
        diffusion_ratio: f32,
        jitter_normals: bool,
        head_oriented: bool,
        separate_ears: bool,
        stereo_source: bool,
        with_diffusion: bool,
    ) -> ReverbResult<Self> {
        let params = Self {
            pre_delay_ms,
            ms_per_meter,
            distance_scale,
            diffusion_fanout,
            absorption_ratio,
            diffusion_ratio,
            jitter_normals,
            head_oriented,
            separate_ears,
            stereo_source,
            with_diffusion,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> ReverbResult<()> {
        if self.ms_per_meter <= 0.0 {
            return Err(ReverbError::InvalidParameters {
                reason: format!("msPerMeter must be > 0, got {}", self.ms_per_meter),
            });
        }
        if self.pre_delay_ms < 0.0 {
            return Err(ReverbError::InvalidParameters {
                reason: format!("preDelayMs must be >= 0, got {}", self.pre_delay_ms),
            });
        }
        if self.distance_scale < 0.0 {
            return Err(ReverbError::InvalidParameters {
                reason: format!("distanceScale must be >= 0, got {}", self.distance_scale),
            });
        }
        if !(0.0..=1.0).contains(&self.absorption_ratio) {
            return Err(ReverbError::InvalidParameters {
                reason: format!("absorptionRatio must be in [0,1], got {}", self.absorption_ratio),
            });
        }
        if !(0.0..=1.0).contains(&self.diffusion_ratio) {
            return Err(ReverbError::InvalidParameters {
                reason: format!("diffusionRatio must be in [0,1], got {}", self.diffusion_ratio),
            });
        }
        let reflective = 1.0 - self.absorption_ratio - self.diffusion_ratio;
        if reflective < 0.0 {
            return Err(ReverbError::InvalidParameters {
                reason: format!(
                    "absorptionRatio + diffusionRatio must be <= 1, got {}",
                    self.absorption_ratio + self.diffusion_ratio
                ),
            });
        }
        Ok(())
    }

    pub fn reflective_ratio(&self) -> f32 {
        1.0 - self.absorption_ratio - self.diffusion_ratio
    }
}

/// Surface energy split for one reflection point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCharacteristics {
    pub reflective: f32,
    pub absorption: f32,
    pub diffusion: f32,
}

/// Which reflection strategy is in effect; selected once per trace from
/// `AcousticParameters::with_diffusion`, modeled as a tagged variant
/// rather than polymorphic engine objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Chain,
    Diffusion,
}

/// Pure, parameter-driven acoustic formulas. Holds a validated parameter
/// set and exposes the formulas from spec section 4.2 as methods so they
/// can be exercised/mocked without reaching for process-global state.
#[derive(Debug, Clone)]
pub struct AcousticModel {
    params: AcousticParameters,
}

impl AcousticModel {
    pub fn new(params: AcousticParameters) -> ReverbResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AcousticParameters {
        &self.params
    }

    pub fn strategy(&self) -> Strategy {
        if self.params.with_diffusion {
            Strategy::Diffusion
        } else {
            Strategy::Chain
        }
    }

    /// `msPerMeter * d`, plus `preDelayMs` when the chain strategy is in
    /// effect (the diffusion engine applies pre-delay once at seed time
    /// instead; see `ReflectionEngine`/diffusion path seeding).
    pub fn delay_from_distance(&self, distance: f32, strategy: Strategy) -> f32 {
        let base = self.params.ms_per_meter * distance.max(0.0);
        match strategy {
            Strategy::Chain => base + self.params.pre_delay_ms,
            Strategy::Diffusion => base,
        }
    }

    /// Geometric-spreading distance attenuation, clamped to 1 at close
    /// range: `min(1, distanceScale * GA^(k + 0.5*log_b(d^2) - 1))` with
    /// `GA = 0.3`, `b = 2.5`, `k = log_b(2.5)`.
    pub fn distance_attenuation(&self, distance: f32) -> f32 {
        let d = distance.max(0.0);
        let log_b = |x: f32| x.ln() / LOG_BASE.ln();
        let k = log_b(LOG_BASE);
        let exponent = k + 0.5 * log_b(d * d) - 1.0;
        let raw = self.params.distance_scale * GA.powf(exponent);
        raw.min(1.0)
    }

    /// `reflectiveRatio^n`, used by the chain strategy.
    pub fn bounce_attenuation(&self, bounce_count: u32) -> f32 {
        self.params.reflective_ratio().powi(bounce_count as i32)
    }

    /// Surface energy split for the element a ray hit. The reference
    /// implementation ignores the element handle and returns the global
    /// parameter split; an implementer may look up per-voxel material
    /// here instead.
    pub fn surface(&self, _element: Option<crate::oracle::ElementHandle>) -> SurfaceCharacteristics {
        SurfaceCharacteristics {
            reflective: self.params.reflective_ratio(),
            absorption: self.params.absorption_ratio,
            diffusion: self.params.diffusion_ratio,
        }
    }
}
