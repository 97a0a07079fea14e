use super::error::ModelError;
use crate::core::precision::Precision;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One homogeneous ellipsoidal layer of a layered figure.
///
/// Semiaxes are along the principal directions (`a` on x, `b` on y, `c` on
/// the rotation axis z). The stated mean radius `r` is carried through
/// unchanged and is not used by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Shell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Mean radius, nominally `(abc)^(1/3)`.
    pub r: f64,
    /// Density of this layer alone. The density seen at a point is the sum
    /// over all layers enclosing it.
    pub density: f64,
}

/// Moment of inertia about z of a full homogeneous ellipsoid,
/// `ρ · abc · (a² + b²) · 4π/15`.
#[inline]
pub fn ellipsoid_moment_of_inertia<T: Precision>(a: T, b: T, c: T, density: T) -> T {
    density * a * b * c * (a * a + b * b) * T::lit(4.0 * PI / 15.0)
}

impl Shell {
    /// Creates a layer whose mean radius is derived from its semiaxes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidSemiaxis`] for a non-positive or non-finite
    /// semiaxis and [`ModelError::InvalidDensity`] for a non-finite density.
    pub fn new(a: f64, b: f64, c: f64, density: f64) -> Result<Self, ModelError> {
        Self::validate(a, b, c, density)?;
        Ok(Self {
            a,
            b,
            c,
            r: (a * b * c).cbrt(),
            density,
        })
    }

    /// Creates a layer with an explicitly stated mean radius, which must agree
    /// with the semiaxes to a relative `1e-8`.
    pub fn with_radius(a: f64, b: f64, c: f64, r: f64, density: f64) -> Result<Self, ModelError> {
        let shell = Self::new(a, b, c, density)?;
        if !r.is_finite() || ((r - shell.r) / shell.r).abs() > 1e-8 {
            return Err(ModelError::InconsistentRadius {
                expected: shell.r,
                found: r,
            });
        }
        Ok(Self { r, ..shell })
    }

    pub fn sphere(radius: f64, density: f64) -> Result<Self, ModelError> {
        Self::new(radius, radius, radius, density)
    }

    fn validate(a: f64, b: f64, c: f64, density: f64) -> Result<(), ModelError> {
        for (axis, value) in [('a', a), ('b', b), ('c', c)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidSemiaxis { axis, value });
            }
        }
        if !density.is_finite() {
            return Err(ModelError::InvalidDensity { value: density });
        }
        Ok(())
    }

    #[inline]
    pub fn semiaxes(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    pub fn set_semiaxes(&mut self, semiaxes: &Vector3<f64>) {
        self.a = semiaxes.x;
        self.b = semiaxes.y;
        self.c = semiaxes.z;
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.a * self.b * self.c
    }

    /// Moment of inertia of this layer about the rotation axis.
    pub fn moment_of_inertia(&self) -> f64 {
        ellipsoid_moment_of_inertia(self.a, self.b, self.c, self.density)
    }

    /// Whether `inner` lies strictly inside this layer on all three axes.
    pub fn encloses(&self, inner: &Shell) -> bool {
        self.a > inner.a && self.b > inner.b && self.c > inner.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_mean_radius_from_semiaxes() {
        let shell = Shell::new(2.0, 1.0, 0.5, 1.0).unwrap();
        assert!((shell.r - 1.0).abs() < 1e-15);
    }

    #[test]
    fn new_rejects_non_positive_semiaxes() {
        assert_eq!(
            Shell::new(1.0, 0.0, 1.0, 1.0),
            Err(ModelError::InvalidSemiaxis {
                axis: 'b',
                value: 0.0
            })
        );
        assert!(Shell::new(f64::NAN, 1.0, 1.0, 1.0).is_err());
        assert!(Shell::new(1.0, 1.0, -2.0, 1.0).is_err());
    }

    #[test]
    fn new_rejects_non_finite_density() {
        assert_eq!(
            Shell::new(1.0, 1.0, 1.0, f64::INFINITY),
            Err(ModelError::InvalidDensity {
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn with_radius_checks_consistency() {
        assert!(Shell::with_radius(2.0, 1.0, 0.5, 1.0, 1.0).is_ok());
        assert!(matches!(
            Shell::with_radius(2.0, 1.0, 0.5, 1.1, 1.0),
            Err(ModelError::InconsistentRadius { .. })
        ));
    }

    #[test]
    fn sphere_moment_of_inertia_is_two_fifths_m_r_squared() {
        let shell = Shell::sphere(1.5, 2.0).unwrap();
        let mass = shell.density * shell.volume();
        let expected = 0.4 * mass * 1.5 * 1.5;
        assert!((shell.moment_of_inertia() - expected).abs() < 1e-12);
    }

    #[test]
    fn single_precision_inertia_agrees_with_the_shell() {
        let shell = Shell::new(1.6, 1.1, 0.7, 2.5).unwrap();
        let single = ellipsoid_moment_of_inertia(1.6_f32, 1.1, 0.7, 2.5) as f64;
        let expected = shell.moment_of_inertia();
        assert!(((single - expected) / expected).abs() < 1e-6);
    }

    #[test]
    fn encloses_requires_every_axis_to_be_strictly_larger() {
        let outer = Shell::new(2.0, 2.0, 2.0, 1.0).unwrap();
        let inner = Shell::new(1.0, 1.0, 1.0, 1.0).unwrap();
        let touching = Shell::new(1.0, 2.0, 1.0, 1.0).unwrap();
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(!outer.encloses(&touching));
    }

    #[test]
    fn set_semiaxes_updates_all_three_axes() {
        let mut shell = Shell::sphere(1.0, 1.0).unwrap();
        shell.set_semiaxes(&Vector3::new(1.5, 1.0, 0.5));
        assert_eq!(shell.semiaxes(), Vector3::new(1.5, 1.0, 0.5));
        assert_eq!(shell.r, 1.0);
    }
}
