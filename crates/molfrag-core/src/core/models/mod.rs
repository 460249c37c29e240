//! # Core Models Module
//!
//! Fundamental data structures for the fragment system: the query-side
//! molecular graph and the fragment/aggregate records exchanged with the
//! external partitioning tool and the cache.
//!
//! ## Key Components
//!
//! - [`molecule`] - Atoms, bonds and the adjacency queries the
//!   classifier and the matcher's bond reconstruction rely on
//! - [`fragment`] - Fragment pairs, per-reference fragment sets, the
//!   persisted aggregate, and the query-result shapes

pub mod fragment;
pub mod molecule;
