//! # Core Module
//!
//! Stateless numerics and data models for layered rotating figures.
//!
//! ## Overview
//!
//! A figure is a stack of nested homogeneous ellipsoids rotating rigidly about
//! the z axis. Everything the search needs to judge such a figure lives here:
//! the Carlson elliptic integrals, the closed-form potentials of a homogeneous
//! ellipsoid on its principal axes, the model types, and the binary records
//! the host exchanges.
//!
//! ## Architecture
//!
//! - **Numeric Width** ([`precision`]) - The calculation precision trait and its
//!   runtime selector
//! - **Elliptic Integrals** ([`carlson`]) - RC, RF, RD and RJ by fixed-count duplication
//! - **Potentials** ([`potential`]) - Interior, exterior and surface potentials
//!   along each principal axis, plus the self-energy of a layer
//! - **Models** ([`models`]) - Layers, layer stacks and models
//! - **Binary Records** ([`layout`]) - Fixed host layouts for templates and scored models
//! - **Reference Figures** ([`figures`]) - Maclaurin spheroids and Jacobi ellipsoids
//!
//! ## Units
//!
//! G = 1 throughout. Densities, lengths and angular momenta are in whatever
//! consistent units the caller chooses.

pub mod carlson;
pub mod figures;
pub mod layout;
pub mod models;
pub mod potential;
pub mod precision;
