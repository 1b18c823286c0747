// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Solution collector.

use crate::state::{Frame, Linkage};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Accumulates distinct completed linkages.
///
/// Linkages are compared by value, so the same graph reached along two
/// different search paths is stored once.
#[derive(Debug, Clone, Default)]
pub struct SolutionCollector {
    solutions: BTreeSet<Linkage>,
    rediscoveries: u64,
}

impl SolutionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the linkage of a completed frame. Returns true if it is new.
    pub fn record_solution(&mut self, frame: &Frame) -> bool {
        self.record_linkage(frame.linkage().clone())
    }

    /// Record a linkage directly. Returns true if it is new.
    pub fn record_linkage(&mut self, linkage: Linkage) -> bool {
        let size = linkage.len();
        if self.solutions.insert(linkage) {
            info!(
                "Solution {} found: {} sections",
                self.solutions.len(),
                size
            );
            true
        } else {
            self.rediscoveries += 1;
            debug!("Solution rediscovered: {} sections", size);
            false
        }
    }

    /// The distinct solutions, in value order.
    pub fn get_solutions(&self) -> Vec<Linkage> {
        self.solutions.iter().cloned().collect()
    }

    pub fn num_solutions(&self) -> usize {
        self.solutions.len()
    }

    /// How many recorded solutions were duplicates of earlier ones.
    pub fn rediscoveries(&self) -> u64 {
        self.rediscoveries
    }
}
