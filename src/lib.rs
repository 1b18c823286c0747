// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Graph assembly from a dictionary of typed sections.
//!
//! A *section* is a point with an ordered list of slots; each slot is either
//! an open *connector* (a link type and a pole) or a *link* that has already
//! been made. Given a dictionary of sections and a table saying which poles
//! may mate, the engine grows fully connected graphs outward from one or
//! more nucleation points.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: Dictionary (Immutable)
//!
//! Built once before the search and only read during it:
//! - The pole table
//! - Sections indexed by point and by exposed connector
//! - Optional selection weights
//!
//! ## Tier 2: Frame (Mutable)
//!
//! Search state that changes during the search, saved on the trail:
//! - Open points and open sections
//! - The linkage of closed sections
//! - The odometer wheels of the current recursion level
//!
//! # Search Algorithm
//!
//! Each recursion level builds an odometer with one wheel per open
//! connector and candidate mate. Stepping the odometer connects every open
//! connector at once, asking the selection policy for a candidate per wheel
//! and rolling back to the previous wheel when a wheel runs out. A frame
//! with no open sections left is a solution.
//!
//! The engine imposes no bounds of its own. Termination comes from the
//! policy's [`params::Parameters`]: steps, depth, network size, solutions.

pub mod collect;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod params;
pub mod policy;
pub mod section;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use collect::SolutionCollector;
pub use dictionary::Dictionary;
pub use engine::Aggregate;
pub use error::{AggregateError, Result};
pub use params::Parameters;
pub use policy::{ExhaustivePolicy, RandomPolicy, SelectionPolicy};
pub use state::{Frame, Linkage};
pub use trail::Trail;
