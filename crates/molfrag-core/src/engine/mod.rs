//! # Engine Module
//!
//! The stateful layer of the fragment system: it turns a classified
//! query molecule into a persisted aggregate by fanning out over a
//! reference repository, and answers needle queries against stored
//! aggregates.
//!
//! ## Architecture
//!
//! - [`config`] - Build settings with a validating builder
//! - [`repository`] - Reference-molecule discovery on disk
//! - [`tool`] - The external partitioning-tool contract and its process
//!   implementation (plus the trait seam for test doubles)
//! - [`generator`] - Bounded parallel fan-out, aggregation, missing-atom
//!   computation
//! - [`cache`] - Flat-file aggregate store keyed by name
//! - [`registry`] - Single-flight coordination of concurrent builds
//! - [`finder`] - Needle matching and bond reconstruction
//! - [`error`] - The failure taxonomy shared by all of the above
//!
//! Public operations never panic on bad input; every failure mode is a
//! typed error that the [`crate::workflows`] boundary converts into a
//! structured response.

pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod generator;
pub mod registry;
pub mod repository;
pub mod tool;
