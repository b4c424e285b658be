//! Fires the 14 seed rays from the listener and dispatches to whichever
//! strategy `AcousticParameters::with_diffusion` selects.

mod chain;
mod diffusion;

use rand::Rng;

use crate::error::ReverbResult;
use crate::geometry::{Quat, Vec3};
use crate::model::{AcousticModel, AcousticParameters, Strategy};
use crate::oracle::RayHitOracle;
use crate::path::TraceResult;

/// Fires directional probes from the listener, bounces them off voxel
/// surfaces, and accumulates the set of audible points for one trace.
#[derive(Debug, Clone)]
pub struct ReflectionEngine {
    model: AcousticModel,
}

impl ReflectionEngine {
    pub fn new(params: AcousticParameters) -> ReverbResult<Self> {
        Ok(Self { model: AcousticModel::new(params)? })
    }

    pub fn model(&self) -> &AcousticModel {
        &self.model
    }

    pub fn strategy(&self) -> Strategy {
        self.model.strategy()
    }

    /// Runs one full trace from `listener`/`orientation`, using `oracle`
    /// for ray intersections and `rng` for jitter/diffusion scattering.
    /// Two identical invocations (same inputs, same rng seed) produce
    /// identical `AudiblePoint` sets.
    pub fn trace<R: Rng + ?Sized>(
        &self,
        oracle: &dyn RayHitOracle,
        listener: Vec3,
        orientation: Quat,
        rng: &mut R,
    ) -> TraceResult {
        match self.strategy() {
            Strategy::Chain => chain::trace(&self.model, oracle, listener, orientation, rng),
            Strategy::Diffusion => diffusion::trace(&self.model, oracle, listener, orientation, rng),
        }
    }
}
