//! # molfrag Core Library
//!
//! A library for building and querying repositories of charged
//! molecular sub-structures ("fragments") used to estimate partial
//! atomic charges. Given a query molecule it classifies each atom from
//! its local bonding environment, asks an external partitioning tool to
//! decompose every reference molecule of a repository into fragments
//! anchored on matching atoms, caches the aggregated result, and
//! answers substructure ("needle") queries against the cache.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to
//! keep it modular and testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (molecular
//!   graph, fragments, aggregate), the atom type classifier, and the
//!   exchange-format writer.
//!
//! - **[`engine`]: The Logic Core.** Stateful orchestration: repository
//!   discovery, the bounded parallel fan-out over the external tool, the
//!   flat-file cache, single-flight build coordination, and needle
//!   matching.
//!
//! - **[`workflows`]: The Public API.** The `generate` and `find`
//!   operations, including the boundary contract that folds every
//!   failure into a structured `{error}` response.

pub mod core;
pub mod engine;
pub mod workflows;
