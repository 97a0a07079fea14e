//! # Engine Module
//!
//! The search machinery: turning one template into a scored population and
//! picking the best candidates out of it.
//!
//! ## Overview
//!
//! A search is a single stateless pass. Each worker derives its own random
//! stream from the seed and its index, jitters the template's semiaxes, and
//! scores the result. Scores are then reduced per group of
//! [`reduction::GROUP_SIZE`] lanes through a turn-ordered tournament and
//! finally across groups.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search parameters, builder and TOML loading
//! - **Scoring** ([`scoring`]) - Equipotential error, energies and the objective
//! - **Variation** ([`variation`]) - Per-worker random streams and volume-preserving jitter
//! - **Reduction** ([`reduction`]) - Group tournaments and the global pass
//! - **Ranking** ([`ranking`]) - Lowest-k selection over a scored population
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for the host
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! ## Key Capabilities
//!
//! - **Calculation precision chosen at runtime**, with the numerics monomorphized per width
//! - **Deterministic results** for a given template, seed and temperature
//! - **Parallel generation and scoring** over the rayon pool (feature `parallel`)

pub mod config;
pub mod error;
pub mod progress;
pub mod ranking;
pub mod reduction;
pub mod scoring;
pub mod variation;
