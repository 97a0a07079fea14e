use crate::core::models::model::{Evaluation, Model};
use crate::core::precision::{Precision, PrecisionKind};
use nalgebra::Vector3;
use rand::Rng;
use rand::distributions::Standard;
use rand_pcg::Pcg32;
use std::marker::PhantomData;

/// Independent generator for one worker. Workers share the user seed and are
/// separated by their index, both in the starting state and in the stream.
pub fn worker_rng(seed: u64, worker: u64) -> Pcg32 {
    Pcg32::new(seed.wrapping_add(worker), worker)
}

/// Volume-preserving multipliers for the three semiaxes of one layer.
///
/// The x and y factors are `2^((u - 0.5)·T)`; the z factor is their reciprocal
/// product, so `abc` is kept (up to round-off in `T`).
pub fn jitter<T: Precision>(u1: f64, u2: f64, temperature: f64) -> Vector3<f64> {
    let half = T::lit(0.5);
    let temperature = T::lit(temperature);
    let mul_x = ((T::lit(u1) - half) * temperature).exp2();
    let mul_y = ((T::lit(u2) - half) * temperature).exp2();
    let mul_z = T::lit(1.0) / (mul_x * mul_y);
    Vector3::new(mul_x.widen(), mul_y.widen(), mul_z.widen())
}

/// Produces jittered copies of a template model.
#[derive(Debug, Clone, Copy)]
pub struct VariationGenerator<'a, T: Precision> {
    template: &'a Model,
    temperature: f64,
    storage: PrecisionKind,
    _precision: PhantomData<T>,
}

impl<'a, T: Precision> VariationGenerator<'a, T> {
    pub fn new(template: &'a Model, temperature: f64, storage: PrecisionKind) -> Self {
        Self {
            template,
            temperature,
            storage,
            _precision: PhantomData,
        }
    }

    /// Candidate for worker `worker`; depends only on `(seed, worker)`.
    pub fn generate(&self, seed: u64, worker: usize) -> Model {
        let mut rng = worker_rng(seed, worker as u64);
        self.generate_with(&mut rng)
    }

    /// Draws three uniforms per layer (the third is reserved and discarded)
    /// and scales each layer's semiaxes by [`jitter`]. The angular momentum,
    /// densities and stated mean radii are copied unchanged. New semiaxes are
    /// rounded to the storage precision.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Model {
        let mut candidate = self.template.clone();
        candidate.evaluation = Evaluation::default();
        for shell in candidate.layers_mut() {
            let u1: f64 = rng.sample(Standard);
            let u2: f64 = rng.sample(Standard);
            let _reserved: f64 = rng.sample(Standard);
            let scaled = shell
                .semiaxes()
                .component_mul(&jitter::<T>(u1, u2, self.temperature))
                .map(|v| self.storage.round(v));
            shell.set_semiaxes(&scaled);
        }
        candidate
    }
}
