// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search bounds and selection knobs.
//!
//! The engine has no termination condition of its own; every limit lives
//! here and is enforced by the selection policy.

use crate::error::{AggregateError, Result};
use serde::{Deserialize, Serialize};

/// Parameters consulted once at setup.
///
/// Every field has a default, so a TOML `[parameters]` table only needs to
/// name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Stop once this many distinct solutions have been recorded.
    pub max_solutions: usize,

    /// Upper bound on recursion entries (step-gate consultations).
    pub max_steps: usize,

    /// Deepest recursion level the step gate admits.
    pub max_depth: usize,

    /// Largest network (open plus closed sections) a solution may have.
    pub max_network_size: usize,

    /// May a section link to another section rooted at its own point?
    pub allow_self_connections: bool,

    /// Most links of any type allowed between one pair of points.
    pub pair_any_links: usize,

    /// Most links of one type allowed between one pair of points.
    pub pair_typed_links: usize,

    /// Probability that the random policy tries joining an open section
    /// before drawing a fresh one from the dictionary.
    pub join_existing: f64,

    /// Seed for the random policy. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            max_solutions: 100,
            max_steps: 10_000,
            max_depth: 10,
            max_network_size: 20,
            allow_self_connections: false,
            pair_any_links: 1,
            pair_typed_links: 1,
            join_existing: 0.7,
            seed: None,
        }
    }
}

impl Parameters {
    /// Reject values no search could honour.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.join_existing) {
            return Err(AggregateError::InvalidParameter {
                name: "join_existing",
                detail: format!("{} is not a probability", self.join_existing),
            });
        }
        if self.pair_any_links == 0 {
            return Err(AggregateError::InvalidParameter {
                name: "pair_any_links",
                detail: "at least one link per pair is needed to connect anything".into(),
            });
        }
        if self.pair_typed_links == 0 {
            return Err(AggregateError::InvalidParameter {
                name: "pair_typed_links",
                detail: "at least one link per pair is needed to connect anything".into(),
            });
        }
        if self.max_network_size == 0 {
            return Err(AggregateError::InvalidParameter {
                name: "max_network_size",
                detail: "a network holds at least its root".into(),
            });
        }
        Ok(())
    }

    /// Parse a bare `key = value` TOML table and validate it.
    pub fn from_toml_str(text: &str) -> Result<Parameters> {
        let params: Parameters = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}
