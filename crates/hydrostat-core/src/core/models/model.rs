use super::error::ModelError;
use super::shell::Shell;
use super::stack::ShellStack;
use serde::Serialize;

/// Penalty stored in place of an error or score that cannot be trusted: a
/// non-nested layer order or a non-finite intermediate.
pub const SENTINEL: f64 = 1.0e30;

/// Quantities derived by scoring a model. All zero until the model is scored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Evaluation {
    /// Mean over layers of the relative spread of the effective potential at
    /// the three tips of the layer.
    pub rel_equipotential_err: f64,
    pub total_energy: f64,
    pub angular_velocity: f64,
    pub moment_of_inertia: f64,
    pub potential_energy: f64,
    pub kinetic_energy: f64,
    pub virial_ratio: f64,
    /// The quantity the search minimizes.
    pub score: f64,
}

impl Evaluation {
    /// Whether the equipotential error was replaced by [`SENTINEL`].
    pub fn is_penalized(&self) -> bool {
        self.rel_equipotential_err >= SENTINEL
    }
}

/// A rigidly rotating figure of nested homogeneous ellipsoidal layers with a
/// prescribed angular momentum about the z axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub angular_momentum: f64,
    layers: ShellStack,
    pub evaluation: Evaluation,
}

impl Model {
    /// Creates a model with no layers.
    pub fn new(angular_momentum: f64) -> Self {
        Self {
            angular_momentum,
            ..Self::default()
        }
    }

    /// Creates a model from layers listed innermost first.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CapacityExceeded`] if more layers are given than
    /// a model can hold.
    pub fn with_layers(angular_momentum: f64, layers: &[Shell]) -> Result<Self, ModelError> {
        Ok(Self {
            angular_momentum,
            layers: ShellStack::from_slice(layers)?,
            evaluation: Evaluation::default(),
        })
    }

    pub(crate) fn from_parts(angular_momentum: f64, layers: ShellStack, evaluation: Evaluation) -> Self {
        Self {
            angular_momentum,
            layers,
            evaluation,
        }
    }

    pub fn push_layer(&mut self, shell: Shell) -> Result<(), ModelError> {
        self.layers.push(shell)
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Shell] {
        self.layers.as_slice()
    }

    pub fn layers_mut(&mut self) -> &mut [Shell] {
        self.layers.as_mut_slice()
    }

    pub fn score(&self) -> f64 {
        self.evaluation.score
    }

    /// Whether every layer strictly encloses all layers before it.
    pub fn is_nested(&self) -> bool {
        let layers = self.layers();
        layers
            .iter()
            .enumerate()
            .all(|(s, outer)| layers[..s].iter().all(|inner| outer.encloses(inner)))
    }

    /// Total mass, summing each layer's density over its full volume.
    pub fn mass(&self) -> f64 {
        self.layers().iter().map(|s| s.density * s.volume()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(a: f64, b: f64, c: f64) -> Shell {
        Shell::new(a, b, c, 1.0).unwrap()
    }

    #[test]
    fn growing_spheres_are_nested() {
        let model = Model::with_layers(0.0, &[shell(1.0, 1.0, 1.0), shell(2.0, 2.0, 2.0)]).unwrap();
        assert!(model.is_nested());
    }

    #[test]
    fn a_single_axis_overlap_breaks_nesting() {
        let model = Model::with_layers(0.0, &[shell(1.0, 1.0, 1.5), shell(2.0, 2.0, 1.0)]).unwrap();
        assert!(!model.is_nested());
    }

    #[test]
    fn nesting_is_checked_against_every_outer_layer() {
        let model = Model::with_layers(
            0.0,
            &[shell(1.0, 1.0, 1.5), shell(2.0, 2.0, 1.0), shell(3.0, 3.0, 3.0)],
        )
        .unwrap();
        assert!(!model.is_nested());
    }

    #[test]
    fn a_smaller_outer_layer_breaks_nesting() {
        let model = Model::with_layers(0.0, &[shell(2.0, 2.0, 2.0), shell(1.0, 1.0, 1.0)]).unwrap();
        assert!(!model.is_nested());
    }

    #[test]
    fn empty_and_single_layer_models_are_trivially_nested() {
        assert!(Model::new(1.0).is_nested());
        assert!(Model::with_layers(1.0, &[shell(1.0, 2.0, 3.0)]).unwrap().is_nested());
    }

    #[test]
    fn push_layer_grows_the_model() {
        let mut model = Model::new(0.5);
        model.push_layer(shell(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(model.num_layers(), 1);
        assert_eq!(model.score(), 0.0);
    }

    #[test]
    fn mass_sums_layer_contributions() {
        let model = Model::with_layers(0.0, &[shell(1.0, 1.0, 1.0), shell(1.0, 1.0, 1.0)]).unwrap();
        let expected = 2.0 * 4.0 / 3.0 * std::f64::consts::PI;
        assert!((model.mass() - expected).abs() < 1e-12);
    }

    #[test]
    fn sentinel_errors_are_reported_as_penalized() {
        let evaluation = Evaluation {
            rel_equipotential_err: SENTINEL,
            ..Evaluation::default()
        };
        assert!(evaluation.is_penalized());
        assert!(!Evaluation::default().is_penalized());
    }
}
