// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search state that changes during aggregation.

pub mod frame;
pub mod statistics;

pub use frame::{Frame, Linkage};
pub use statistics::{Counters, Statistics};
