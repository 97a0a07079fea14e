//! # Workflows Module
//!
//! End-to-end searches built from the [`crate::engine`] pieces.
//!
//! ## Overview
//!
//! A workflow takes a template model and a [`crate::engine::config::SearchConfig`],
//! and runs the whole pipeline: population generation and scoring, per-group
//! tournaments, the global reduction and the final ranking. Progress is
//! reported per phase through a [`crate::engine::progress::ProgressReporter`].
//!
//! ## Architecture
//!
//! - **Exploration Workflow** ([`explore`]) - One stateless pass of the
//!   randomized shape search around a template.
//!
//! ## Key Capabilities
//!
//! - **Storage and calculation precision** chosen independently at runtime
//! - **Reproducible winners** for a fixed seed under the default global mode
//! - **Group winners and top-k ranking** returned with their full models

pub mod explore;
