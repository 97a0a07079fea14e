//! # Core Models Module
//!
//! Data structures describing a layered rotating figure.
//!
//! ## Key Components
//!
//! - [`shell`] - One homogeneous ellipsoidal layer (semiaxes, mean radius, density)
//! - [`stack`] - Fixed-capacity inline list of layers, innermost first
//! - [`model`] - The figure itself: angular momentum, layers, and the quantities
//!   derived by scoring
//! - [`error`] - Construction errors
//!
//! ## Usage
//!
//! ```
//! use hydrostat::core::models::{model::Model, shell::Shell};
//!
//! let core = Shell::new(0.6, 0.6, 0.35, 2.0)?;
//! let envelope = Shell::new(1.2, 1.2, 0.7, 1.0)?;
//! let model = Model::with_layers(2.5, &[core, envelope])?;
//! assert!(model.is_nested());
//! # Ok::<(), hydrostat::core::models::error::ModelError>(())
//! ```

pub mod error;
pub mod model;
pub mod shell;
pub mod stack;
