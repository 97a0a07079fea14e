use super::carlson::{rd, rf};
use super::precision::Precision;
use std::f64::consts::PI;
use std::fmt;

/// A principal axis of a layer. The figure rotates about [`Axis::Z`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Picks the semiaxis along this axis out of `(a, b, c)`.
    #[inline]
    pub fn pick<T: Copy>(self, a: T, b: T, c: T) -> T {
        match self {
            Axis::X => a,
            Axis::Y => b,
            Axis::Z => c,
        }
    }

    // RD argument order puts this axis' squared semiaxis last.
    #[inline]
    fn rd_arguments<T: Copy>(self, a2: T, b2: T, c2: T) -> (T, T, T) {
        match self {
            Axis::X => (b2, c2, a2),
            Axis::Y => (a2, c2, b2),
            Axis::Z => (a2, b2, c2),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

fn axis_potential<T: Precision>(a: T, b: T, c: T, axis: Axis, t: T, lambda: T) -> T {
    let abc = a * b * c;
    let (a2, b2, c2) = (a * a + lambda, b * b + lambda, c * c + lambda);
    let (x, y, z) = axis.rd_arguments(a2, b2, c2);
    let constant = T::lit(2.0) * abc * rf(a2, b2, c2);
    let quadratic = T::lit(2.0 / 3.0) * abc * rd(x, y, z);
    T::lit(PI) * (constant - quadratic * t * t)
}

/// Potential of a unit-density homogeneous ellipsoid at `t` on `axis`, with
/// `|t|` not beyond the semiaxis on that axis.
pub fn interior<T: Precision>(a: T, b: T, c: T, axis: Axis, t: T) -> T {
    axis_potential(a, b, c, axis, t, T::lit(0.0))
}

/// Potential at `t` on `axis` outside the body, `|t|` at least the semiaxis.
///
/// The confocal parameter `λ = t² - s²` shifts every squared semiaxis; a
/// slightly negative λ from round-off is floored at zero so the surface
/// value is shared with [`interior`].
pub fn exterior<T: Precision>(a: T, b: T, c: T, axis: Axis, t: T) -> T {
    let s = axis.pick(a, b, c);
    let lambda = (t * t - s * s).max(T::lit(0.0));
    axis_potential(a, b, c, axis, t, lambda)
}

/// Potential at the tip of the body on `axis`.
pub fn surface<T: Precision>(a: T, b: T, c: T, axis: Axis) -> T {
    interior(a, b, c, axis, axis.pick(a, b, c))
}

/// Dispatches to [`interior`] or [`exterior`] depending on where `t` lies.
pub fn on_axis<T: Precision>(a: T, b: T, c: T, axis: Axis, t: T) -> T {
    if t.abs() <= axis.pick(a, b, c) {
        interior(a, b, c, axis, t)
    } else {
        exterior(a, b, c, axis, t)
    }
}

pub fn potential_interior_x<T: Precision>(a: T, b: T, c: T, x: T) -> T {
    interior(a, b, c, Axis::X, x)
}

pub fn potential_interior_y<T: Precision>(a: T, b: T, c: T, y: T) -> T {
    interior(a, b, c, Axis::Y, y)
}

pub fn potential_interior_z<T: Precision>(a: T, b: T, c: T, z: T) -> T {
    interior(a, b, c, Axis::Z, z)
}

pub fn potential_exterior_x<T: Precision>(a: T, b: T, c: T, x: T) -> T {
    exterior(a, b, c, Axis::X, x)
}

pub fn potential_exterior_y<T: Precision>(a: T, b: T, c: T, y: T) -> T {
    exterior(a, b, c, Axis::Y, y)
}

pub fn potential_exterior_z<T: Precision>(a: T, b: T, c: T, z: T) -> T {
    exterior(a, b, c, Axis::Z, z)
}

pub fn potential_surface_x<T: Precision>(a: T, b: T, c: T) -> T {
    surface(a, b, c, Axis::X)
}

pub fn potential_surface_y<T: Precision>(a: T, b: T, c: T) -> T {
    surface(a, b, c, Axis::Y)
}

pub fn potential_surface_z<T: Precision>(a: T, b: T, c: T) -> T {
    surface(a, b, c, Axis::Z)
}

/// Gravitational self-energy of a homogeneous ellipsoid of density `density`
/// (G = 1), `W = -(8π²/15) ρ² abc · I₀` with `I₀ = 2abc · RF(a², b², c²)`.
/// For a sphere of radius `R` this is `-(16/15) π² ρ² R⁵`.
///
/// The layered model sums this per layer, which treats each layer as if it
/// were alone.
pub fn layer_potential_energy<T: Precision>(a: T, b: T, c: T, density: T) -> T {
    let abc = a * b * c;
    let i0 = T::lit(2.0) * abc * rf(a * a, b * b, c * c);
    -T::lit(8.0 * PI * PI / 15.0) * density * density * abc * i0
}
