//! Classical single-layer equilibrium figures with known rotation rates.
//!
//! These are reference solutions for seeding and validating a search: a
//! homogeneous Maclaurin spheroid or Jacobi ellipsoid rotating at the right
//! rate is an exact equipotential, so its scored error sits at round-off.

use super::carlson::rd;
use super::models::error::ModelError;
use super::models::model::Model;
use super::models::shell::Shell;
use super::potential::{Axis, surface};
use std::f64::consts::PI;
use thiserror::Error;
use tracing::debug;

const BISECTION_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FigureError {
    #[error("Semiaxes a = {a}, c = {c} do not describe an oblate spheroid")]
    InvalidAxes { a: f64, c: f64 },

    #[error("No Jacobi ellipsoid with a = {a} and unit volume radius (a must exceed the bifurcation point)")]
    NoBracket { a: f64 },

    #[error("Root search did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A homogeneous rotating ellipsoid together with the squared angular velocity
/// that makes its surface an equipotential.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumFigure {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub density: f64,
    pub omega_squared: f64,
}

impl EquilibriumFigure {
    pub fn shell(&self) -> Result<Shell, ModelError> {
        Shell::new(self.a, self.b, self.c, self.density)
    }

    pub fn angular_velocity(&self) -> f64 {
        self.omega_squared.max(0.0).sqrt()
    }

    pub fn moment_of_inertia(&self) -> Result<f64, ModelError> {
        Ok(self.shell()?.moment_of_inertia())
    }

    pub fn angular_momentum(&self) -> Result<f64, ModelError> {
        Ok(self.moment_of_inertia()? * self.angular_velocity())
    }

    /// Builds a one-layer model carrying the equilibrium angular momentum.
    pub fn to_model(&self) -> Result<Model, ModelError> {
        Model::with_layers(self.angular_momentum()?, &[self.shell()?])
    }
}

/// Maclaurin spheroid with equatorial semiaxis `a` and polar semiaxis `c`.
///
/// Uses the closed form `ω² / (πGρ) = 2√(1-e²)(3-2e²) asin(e) / e³ - 6(1-e²) / e²`.
pub fn maclaurin(a: f64, c: f64, density: f64) -> Result<EquilibriumFigure, FigureError> {
    if !(a.is_finite() && c.is_finite() && c > 0.0 && c <= a) {
        return Err(FigureError::InvalidAxes { a, c });
    }
    let e2 = 1.0 - (c * c) / (a * a);
    let omega_squared = if e2 == 0.0 {
        0.0
    } else {
        let e = e2.sqrt();
        let ratio = 2.0 * (1.0 - e2).sqrt() * (3.0 - 2.0 * e2) * e.asin() / (e2 * e)
            - 6.0 * (1.0 - e2) / e2;
        PI * density * ratio
    };
    Ok(EquilibriumFigure {
        a,
        b: a,
        c,
        density,
        omega_squared,
    })
}

/// Residual of the Jacobi condition for unit volume radius (`abc = 1`).
fn jacobi_residual(a: f64, b: f64) -> f64 {
    let c = 1.0 / (a * b);
    let (a2, b2, c2) = (a * a, b * b, c * c);
    a2 * b2 / (b2 - a2) * (rd(b2, c2, a2) - rd(a2, c2, b2)) - c2 * rd(a2, b2, c2)
}

/// Jacobi ellipsoid with longest semiaxis `a` and `abc = 1`, at unit density.
///
/// Solves the Jacobi condition for the intermediate semiaxis by bisection on
/// `(1/√a, a)`; the rotation rate then follows from equating the effective
/// potential at the x and z tips. Exists only for `a` beyond the
/// Maclaurin–Jacobi bifurcation point, about 1.1972.
pub fn jacobi(a: f64) -> Result<EquilibriumFigure, FigureError> {
    if !(a.is_finite() && a > 1.0) {
        return Err(FigureError::NoBracket { a });
    }
    let mut lo = (1.0 / a).sqrt();
    let mut hi = a * (1.0 - 1e-9);
    let mut f_lo = jacobi_residual(a, lo);
    let f_hi = jacobi_residual(a, hi);
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(FigureError::NoBracket { a });
    }

    let mut converged = false;
    for _ in 0..BISECTION_LIMIT {
        let mid = 0.5 * (lo + hi);
        let f_mid = jacobi_residual(a, mid);
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 4.0 * f64::EPSILON * a {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(FigureError::NotConverged {
            iterations: BISECTION_LIMIT,
        });
    }

    let b = 0.5 * (lo + hi);
    let c = 1.0 / (a * b);
    let phi_x = surface(a, b, c, Axis::X);
    let phi_z = surface(a, b, c, Axis::Z);
    let omega_squared = 2.0 * (phi_z - phi_x) / (a * a);
    debug!(a, b, c, omega_squared, "Solved Jacobi ellipsoid");
    Ok(EquilibriumFigure {
        a,
        b,
        c,
        density: 1.0,
        omega_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn sphere_does_not_rotate() {
        let figure = maclaurin(1.0, 1.0, 1.0).unwrap();
        assert_eq!(figure.omega_squared, 0.0);
        assert_eq!(figure.angular_momentum().unwrap(), 0.0);
    }

    #[test]
    fn maclaurin_rate_equalizes_equator_and_pole() {
        let a = 1.2;
        let figure = maclaurin(a, 1.0 / (a * a), 1.0).unwrap();
        let phi_x = surface(figure.a, figure.b, figure.c, Axis::X);
        let phi_z = surface(figure.a, figure.b, figure.c, Axis::Z);
        let from_potential = 2.0 * (phi_z - phi_x) / (a * a);
        assert!(f64_approx_equal(figure.omega_squared, from_potential, 1e-10));
        assert!(f64_approx_equal(figure.omega_squared, 1.1835, 1e-4));
    }

    #[test]
    fn maclaurin_rate_scales_with_density() {
        let light = maclaurin(1.3, 0.8, 1.0).unwrap();
        let heavy = maclaurin(1.3, 0.8, 3.0).unwrap();
        assert!(f64_approx_equal(heavy.omega_squared, 3.0 * light.omega_squared, 1e-12));
    }

    #[test]
    fn maclaurin_rejects_prolate_axes() {
        assert_eq!(maclaurin(1.0, 2.0, 1.0), Err(FigureError::InvalidAxes { a: 1.0, c: 2.0 }));
    }

    #[test]
    fn jacobi_matches_reference_solution() {
        let figure = jacobi(1.3).unwrap();
        assert!(f64_approx_equal(figure.b, 1.105_575_570_700_127, 1e-10));
        assert!(f64_approx_equal(figure.c, 0.695_774_029_036_874, 1e-10));
        assert!(f64_approx_equal(figure.omega_squared, 1.163_368_984_675_365, 1e-9));
        assert!(f64_approx_equal(figure.angular_momentum().unwrap(), 2.631_558_685_805_989, 1e-9));
    }

    #[test]
    fn jacobi_is_an_equipotential_in_y_as_well() {
        let figure = jacobi(1.5).unwrap();
        let (a, b, c) = (figure.a, figure.b, figure.c);
        let w = 0.5 * figure.omega_squared;
        let phi_x = surface(a, b, c, Axis::X) + w * a * a;
        let phi_y = surface(a, b, c, Axis::Y) + w * b * b;
        let phi_z = surface(a, b, c, Axis::Z);
        assert!(f64_approx_equal(phi_x, phi_z, 1e-10));
        assert!(f64_approx_equal(phi_y, phi_z, 1e-8));
    }

    #[test]
    fn jacobi_below_bifurcation_has_no_bracket() {
        assert_eq!(jacobi(1.1), Err(FigureError::NoBracket { a: 1.1 }));
        assert!(matches!(jacobi(0.5), Err(FigureError::NoBracket { .. })));
    }

    #[test]
    fn to_model_builds_a_single_layer() {
        let model = jacobi(1.3).unwrap().to_model().unwrap();
        assert_eq!(model.num_layers(), 1);
        assert!(f64_approx_equal(model.angular_momentum, 2.631_558_685_805_989, 1e-9));
    }
}
