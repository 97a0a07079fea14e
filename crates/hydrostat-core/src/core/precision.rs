use nalgebra::RealField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime selector for a numeric width, used independently for the storage
/// records and for the internal calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrecisionKind {
    #[serde(alias = "f32", alias = "float", alias = "32")]
    Single,
    #[default]
    #[serde(alias = "f64", alias = "64")]
    Double,
}

impl PrecisionKind {
    pub const fn bytes(self) -> usize {
        match self {
            PrecisionKind::Single => 4,
            PrecisionKind::Double => 8,
        }
    }

    pub const fn bits(self) -> u32 {
        (self.bytes() * 8) as u32
    }

    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(PrecisionKind::Single),
            64 => Some(PrecisionKind::Double),
            _ => None,
        }
    }

    pub const fn duplication_steps(self) -> usize {
        match self {
            PrecisionKind::Single => <f32 as Precision>::DUPLICATION_STEPS,
            PrecisionKind::Double => <f64 as Precision>::DUPLICATION_STEPS,
        }
    }

    /// Rounds a value to what a buffer of this width would hold.
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        match self {
            PrecisionKind::Single => value as f32 as f64,
            PrecisionKind::Double => value,
        }
    }
}

impl fmt::Display for PrecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionKind::Single => write!(f, "single (32-bit)"),
            PrecisionKind::Double => write!(f, "double (64-bit)"),
        }
    }
}

/// Calculation precision.
///
/// The duplication iteration count of the Carlson kernels and the order of the
/// RJ closing series are tied to the float type, so a width can never be
/// paired with the accuracy/cost setting of the other.
pub trait Precision: RealField + Copy + Send + Sync + 'static {
    const KIND: PrecisionKind;
    const DUPLICATION_STEPS: usize;
    const EXTENDED_SERIES: bool;

    fn lit(value: f64) -> Self;

    fn widen(self) -> f64;
}

impl Precision for f64 {
    const KIND: PrecisionKind = PrecisionKind::Double;
    const DUPLICATION_STEPS: usize = 11;
    const EXTENDED_SERIES: bool = true;

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        self
    }
}

impl Precision for f32 {
    const KIND: PrecisionKind = PrecisionKind::Single;
    const DUPLICATION_STEPS: usize = 8;
    const EXTENDED_SERIES: bool = false;

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        self as f64
    }
}
