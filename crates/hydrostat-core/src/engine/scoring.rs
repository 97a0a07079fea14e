use crate::core::models::model::{Evaluation, Model, SENTINEL};
use crate::core::models::shell::ellipsoid_moment_of_inertia;
use crate::core::potential::{Axis, exterior, interior, layer_potential_energy};
use crate::core::precision::Precision;
use std::marker::PhantomData;

/// What a candidate is ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Objective {
    /// Minimize the equipotential error.
    Equilibrium,
    /// Among candidates with error under `threshold`, minimize kinetic
    /// energy; the rest get [`SENTINEL`].
    FeasibleKinetic { threshold: f64 },
}

impl Objective {
    pub fn from_threshold(threshold: Option<f64>) -> Self {
        match threshold {
            Some(threshold) => Objective::FeasibleKinetic { threshold },
            None => Objective::Equilibrium,
        }
    }

    pub fn score(&self, error: f64, kinetic_energy: f64) -> f64 {
        match *self {
            Objective::Equilibrium => error,
            Objective::FeasibleKinetic { threshold } if error < threshold => kinetic_energy,
            Objective::FeasibleKinetic { .. } => SENTINEL,
        }
    }
}

/// Evaluates models in calculation precision `T`.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<T: Precision> {
    objective: Objective,
    _precision: PhantomData<T>,
}

impl<T: Precision> Scorer<T> {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            _precision: PhantomData,
        }
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Scores `model` in place and returns its score.
    pub fn score(&self, model: &mut Model) -> f64 {
        model.evaluation = self.evaluate(model);
        model.evaluation.score
    }

    /// Computes the derived quantities of `model` without modifying it.
    ///
    /// The angular velocity follows from the prescribed angular momentum and
    /// the summed layer moments of inertia. For each layer the effective
    /// potential (gravity of every layer plus the centrifugal term
    /// `½ω²(x² + y²)`) is sampled at the three tips, and the relative spread
    /// `(max - min) / min` is averaged over layers. The layer itself and the
    /// layers outside it contribute their interior potential, the layers
    /// inside it their exterior potential. A non-nested stack or any
    /// non-finite result is penalized with [`SENTINEL`].
    pub fn evaluate(&self, model: &Model) -> Evaluation {
        let layers = model.layers();
        let zero = T::lit(0.0);
        let half = T::lit(0.5);

        let inertia = layers.iter().fold(zero, |acc, shell| {
            acc + ellipsoid_moment_of_inertia(
                T::lit(shell.a),
                T::lit(shell.b),
                T::lit(shell.c),
                T::lit(shell.density),
            )
        });
        let omega = T::lit(model.angular_momentum) / inertia;
        let half_omega_squared = half * omega * omega;

        let mut nested = true;
        let mut total_error = zero;
        for (s, test) in layers.iter().enumerate() {
            let tips = [T::lit(test.a), T::lit(test.b), T::lit(test.c)];
            let mut phi = [
                half_omega_squared * tips[0] * tips[0],
                half_omega_squared * tips[1] * tips[1],
                zero,
            ];
            for (m, source) in layers.iter().enumerate() {
                if m < s {
                    nested &= test.encloses(source);
                }
                let (a, b, c) = (T::lit(source.a), T::lit(source.b), T::lit(source.c));
                let density = T::lit(source.density);
                for axis in Axis::ALL {
                    let t = tips[axis.index()];
                    let potential = if m >= s {
                        interior(a, b, c, axis, t)
                    } else {
                        exterior(a, b, c, axis, t)
                    };
                    phi[axis.index()] += density * potential;
                }
            }
            let highest = phi[0].max(phi[1]).max(phi[2]);
            let lowest = phi[0].min(phi[1]).min(phi[2]);
            total_error += (highest - lowest) / lowest;
        }

        let mut rel_equipotential_err = (total_error / T::lit(layers.len() as f64)).widen();
        if !nested || !rel_equipotential_err.is_finite() {
            rel_equipotential_err = SENTINEL;
        }

        let potential_energy = layers
            .iter()
            .map(|shell| {
                layer_potential_energy(
                    T::lit(shell.a),
                    T::lit(shell.b),
                    T::lit(shell.c),
                    T::lit(shell.density),
                )
            })
            .fold(zero, |acc, w| acc + w)
            .widen();
        let kinetic_energy = (half * inertia * omega * omega).widen();
        let virial_ratio = if potential_energy != 0.0 {
            2.0 * kinetic_energy / potential_energy.abs()
        } else {
            0.0
        };

        let mut score = self.objective.score(rel_equipotential_err, kinetic_energy);
        if !score.is_finite() {
            score = SENTINEL;
        }

        Evaluation {
            rel_equipotential_err,
            total_energy: kinetic_energy + potential_energy,
            angular_velocity: omega.widen(),
            moment_of_inertia: inertia.widen(),
            potential_energy,
            kinetic_energy,
            virial_ratio,
            score,
        }
    }
}
