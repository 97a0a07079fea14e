//! Carlson symmetric elliptic integrals RC, RF, RD and RJ.
//!
//! Every kernel runs a fixed number of duplication steps (no convergence test)
//! chosen by the calculation precision, then closes with a truncated Taylor
//! series around the arithmetic mean of the reduced arguments. Arguments are
//! expected to be non-negative (at most one zero among `x, y, z`); RC and RJ
//! additionally accept a negative last argument and return the Cauchy
//! principal value.

use super::precision::Precision;
use std::cmp::Ordering;

const TINY: f64 = 1.0e-30;

/// `RC(x, y) = RF(x, y, y)`.
pub fn rc<T: Precision>(x: T, y: T) -> T {
    let zero = T::lit(0.0);
    let quarter = T::lit(0.25);

    // Principal value for y < 0: RC(x, y) = sqrt(x / (x - y)) * RC(x - y, -y).
    let (mut xt, mut yt, weight) = if y < zero {
        let shifted = x - y;
        let weight = x.max(zero).sqrt() / shifted.max(zero).sqrt().max(T::lit(TINY));
        (shifted, -y, weight)
    } else {
        (x, y, T::lit(1.0))
    };
    xt = xt.max(zero);
    yt = yt.max(zero);

    for _ in 0..T::DUPLICATION_STEPS {
        let lambda = T::lit(2.0) * xt.sqrt() * yt.sqrt() + yt;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
    }

    let mean = ((xt + yt + yt) / T::lit(3.0)).max(T::lit(TINY));
    let s = (yt - mean) / mean;
    let series = T::lit(1.0)
        + s * s
            * (T::lit(3.0 / 10.0)
                + s * (T::lit(1.0 / 7.0) + s * (T::lit(3.0 / 8.0) + s * T::lit(9.0 / 22.0))));
    weight * series / mean.sqrt()
}

/// Carlson's integral of the first kind.
pub fn rf<T: Precision>(x: T, y: T, z: T) -> T {
    let zero = T::lit(0.0);
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt) = (x.max(zero), y.max(zero), z.max(zero));

    for _ in 0..T::DUPLICATION_STEPS {
        let (sx, sy, sz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
    }

    let mean = ((xt + yt + zt) / T::lit(3.0)).max(T::lit(TINY));
    let dx = (mean - xt) / mean;
    let dy = (mean - yt) / mean;
    let dz = -(dx + dy);
    let e2 = dx * dy - dz * dz;
    let e3 = dx * dy * dz;
    let series = T::lit(1.0) - e2 / T::lit(10.0) + e3 / T::lit(14.0) + e2 * e2 / T::lit(24.0)
        - T::lit(3.0) * e2 * e3 / T::lit(44.0)
        + T::lit(3.0) * e3 * e3 / T::lit(104.0);
    series / mean.sqrt()
}

/// Carlson's integral of the second kind, `RD(x, y, z) = RJ(x, y, z, z)`.
pub fn rd<T: Precision>(x: T, y: T, z: T) -> T {
    let zero = T::lit(0.0);
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt) = (x.max(zero), y.max(zero), z.max(T::lit(TINY)));
    let mut sum = zero;
    let mut factor = T::lit(1.0);

    for _ in 0..T::DUPLICATION_STEPS {
        let (sx, sy, sz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        sum += factor / (sz * (zt + lambda)).max(T::lit(TINY));
        factor *= quarter;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
    }

    let mean = (T::lit(0.2) * (xt + yt + T::lit(3.0) * zt)).max(T::lit(TINY));
    let dx = (mean - xt) / mean;
    let dy = (mean - yt) / mean;
    let dz = (mean - zt) / mean;
    let ea = dx * dy;
    let eb = dz * dz;
    let ec = ea - eb;
    let ed = ea - T::lit(6.0) * eb;
    let ee = ed + ec + ec;
    let series = T::lit(1.0)
        + ed * (T::lit(-3.0 / 14.0) + T::lit(9.0 / 88.0) * ed
            - T::lit(9.0 / 52.0) * dz * ee)
        + dz * (ee / T::lit(6.0)
            + dz * (T::lit(-9.0 / 22.0) * ec + dz * T::lit(3.0 / 26.0) * ea));
    T::lit(3.0) * sum + factor * series / (mean * mean.sqrt())
}

/// Carlson's integral of the third kind.
///
/// A negative `p` yields the Cauchy principal value through the standard
/// transformation onto a positive fourth argument.
pub fn rj<T: Precision>(x: T, y: T, z: T, p: T) -> T {
    if p < T::lit(0.0) {
        principal_value(x, y, z, p)
    } else {
        rj_positive(x, y, z, p)
    }
}

fn rj_positive<T: Precision>(x: T, y: T, z: T, p: T) -> T {
    let zero = T::lit(0.0);
    let quarter = T::lit(0.25);
    let (mut xt, mut yt, mut zt, mut pt) = (x.max(zero), y.max(zero), z.max(zero), p.max(zero));
    let mut sum = zero;
    let mut factor = T::lit(1.0);

    // RJ's error term decays more slowly than RF's and RD's.
    for _ in 0..T::DUPLICATION_STEPS + 4 {
        let (sx, sy, sz, sp) = (xt.sqrt(), yt.sqrt(), zt.sqrt(), pt.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        let d = (sp + sx) * (sp + sy) * (sp + sz);
        let delta = (pt - xt) * (pt - yt) * (pt - zt);
        sum += factor * T::lit(6.0) * rc(d * d, d * d + delta);
        factor *= quarter;
        xt = quarter * (xt + lambda);
        yt = quarter * (yt + lambda);
        zt = quarter * (zt + lambda);
        pt = quarter * (pt + lambda);
    }

    let mean = ((xt + yt + zt + pt + pt) / T::lit(5.0)).max(T::lit(TINY));
    let dx = (mean - xt) / mean;
    let dy = (mean - yt) / mean;
    let dz = (mean - zt) / mean;
    let dp = (mean - pt) / mean;
    let p2 = dp * dp;
    let p3 = p2 * dp;
    let xyz = dx * dy * dz;
    let e2 = dx * dy + dx * dz + dy * dz - T::lit(3.0) * p2;
    let e3 = xyz + T::lit(2.0) * e2 * dp + T::lit(4.0) * p3;
    let e4 = (T::lit(2.0) * xyz + e2 * dp + T::lit(3.0) * p3) * dp;
    let e5 = xyz * p2;

    let mut series = T::lit(1.0) - T::lit(3.0 / 14.0) * e2 + e3 / T::lit(6.0)
        + T::lit(9.0 / 88.0) * e2 * e2
        - T::lit(3.0 / 22.0) * e4
        - T::lit(9.0 / 52.0) * e2 * e3
        + T::lit(3.0 / 26.0) * e5;
    if T::EXTENDED_SERIES {
        series += -e2 * e2 * e2 / T::lit(16.0) + T::lit(3.0 / 40.0) * e3 * e3
            + T::lit(3.0 / 20.0) * e2 * e4
            + T::lit(45.0 / 272.0) * e2 * e2 * e3
            - T::lit(9.0 / 68.0) * (e3 * e4 + e2 * e5);
    }
    sum + factor * series / (mean * mean.sqrt())
}

fn principal_value<T: Precision>(x: T, y: T, z: T, p: T) -> T {
    let mut sorted = [x, y, z];
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let [x, y, z] = sorted;

    let q = -p;
    let shifted = (z - y) * (y - x) / (y + q) + y;
    let xz = x * z;
    let pq = shifted * q;

    let first = (shifted - y) * rj_positive(x, y, z, shifted);
    let second = T::lit(3.0) * rf(x, y, z);
    let third =
        T::lit(3.0) * (x * y * z / (xz + pq)).max(T::lit(0.0)).sqrt() * rc(xz + pq, pq);
    (first - second + third) / (y + q)
}
