//! # Hydrostat
//!
//! Equipotential scoring and randomized shape search for rigidly rotating
//! bodies made of nested, homogeneous ellipsoidal layers.
//!
//! A body is in hydrostatic equilibrium when its outer surface is a level
//! surface of the effective potential, gravity plus the centrifugal term. The
//! library measures how far a layered model is from that state, and searches
//! around a template for layer shapes that come closer.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Precision selection, Carlson elliptic
//!   integrals, the potential of a homogeneous ellipsoid, the layered model
//!   types, classical equilibrium figures and the binary record layouts.
//!
//! - **[`engine`]: The Search Machinery.** Configuration, the scorer, the
//!   variation generator, the group tournament and global reduction, ranking
//!   and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete searches that tie `engine`
//!   and `core` together.
//!
//! ## Example
//!
//! ```
//! use hydrostat::core::figures::jacobi;
//! use hydrostat::engine::config::SearchConfig;
//! use hydrostat::engine::progress::ProgressReporter;
//! use hydrostat::workflows::explore;
//!
//! let template = jacobi(1.5).unwrap().to_model().unwrap();
//! let config = SearchConfig::builder()
//!     .population_size(64)
//!     .seed(7)
//!     .temperature(0.05)
//!     .build()
//!     .unwrap();
//!
//! let result = explore::run(&template, &config, &ProgressReporter::new()).unwrap();
//! assert_eq!(result.group_bests.len(), 1);
//! assert!(result.global_best.score.is_finite());
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
