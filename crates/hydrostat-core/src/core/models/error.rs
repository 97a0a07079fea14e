use super::stack::CAPACITY;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("A model holds at most {capacity} layers")]
    CapacityExceeded { capacity: usize },

    #[error("Semiaxis {axis} must be positive and finite, got {value}")]
    InvalidSemiaxis { axis: char, value: f64 },

    #[error("Density must be finite, got {value}")]
    InvalidDensity { value: f64 },

    #[error("Mean radius {found} does not match the cube root of the semiaxis product {expected}")]
    InconsistentRadius { expected: f64, found: f64 },
}

impl ModelError {
    pub(crate) const fn capacity_exceeded() -> Self {
        ModelError::CapacityExceeded { capacity: CAPACITY }
    }
}
