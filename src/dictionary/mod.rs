// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The dictionary (lexis): immutable, precomputed lookup data.
//!
//! Like any MEMO tier, the dictionary is filled in once before the search
//! starts and is only read while the search runs. It holds:
//! - The pole table: which pole may mate with which
//! - An index from connector to every lexis entry exposing it
//! - An index from point to every lexis entry rooted there
//! - Optional per-entry selection weights
//!
//! Both indexes preserve registration order, which is the order the
//! exhaustive policy offers candidates in.

use crate::error::{AggregateError, Result};
use crate::section::{Connector, Point, Section, Slot, INSTANCE_SEPARATOR};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Weight given to entries registered without one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Dictionary of sections that can connect to one another.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Directed pole pairings `(from, to)`.
    pole_pairs: Vec<(String, String)>,

    /// Every registered section, in registration order.
    lexis: Vec<Rc<Section>>,

    /// Map from connectors to the sections exposing them.
    connectables: HashMap<Connector, Vec<Rc<Section>>>,

    /// Map from points to the sections rooted there.
    entries: HashMap<Point, Vec<Rc<Section>>>,

    weights: HashMap<Rc<Section>, f64>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that pole `from` may mate with pole `to`.
    ///
    /// The relation is directional. For a symmetric pairing the caller adds
    /// the reverse pair too. Adding an existing pair again is a no-op.
    pub fn add_pole_pair(&mut self, from: &str, to: &str) -> Result<()> {
        if from.is_empty() || to.is_empty() {
            return Err(AggregateError::MalformedPolePair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let pair = (from.to_string(), to.to_string());
        if !self.pole_pairs.contains(&pair) {
            self.pole_pairs.push(pair);
        }
        Ok(())
    }

    /// Add both `(a, b)` and `(b, a)`.
    pub fn add_symmetric_pole_pair(&mut self, a: &str, b: &str) -> Result<()> {
        self.add_pole_pair(a, b)?;
        self.add_pole_pair(b, a)
    }

    pub fn pole_pairs(&self) -> &[(String, String)] {
        &self.pole_pairs
    }

    /// Connectors that `connector` may legally mate to.
    ///
    /// A mate is only returned if some lexis entry exposes it; a connector
    /// nothing in the lexis can receive can never close. An empty result is
    /// a dead end, not an error.
    pub fn joints(&self, connector: &Connector) -> Vec<Connector> {
        let mut mates: Vec<Connector> = Vec::new();
        for (from, to) in &self.pole_pairs {
            if from != connector.pole() {
                continue;
            }
            let mate = connector.with_pole(to);
            if self.connectables.contains_key(&mate) && !mates.contains(&mate) {
                mates.push(mate);
            }
        }
        mates
    }

    /// True if the pole table lets `a` mate with `b`.
    pub fn mateable(&self, a: &Connector, b: &Connector) -> bool {
        a.link_type() == b.link_type()
            && self
                .pole_pairs
                .iter()
                .any(|(from, to)| from == a.pole() && to == b.pole())
    }

    /// Register a section as available for assembly, with the default weight.
    pub fn add_to_lexis(&mut self, section: Section) -> Result<Rc<Section>> {
        self.add_weighted_to_lexis(section, DEFAULT_WEIGHT)
    }

    /// Register a section with a selection weight (used by the random policy).
    ///
    /// Registering a structurally identical section again returns the
    /// existing entry and leaves the indexes unchanged.
    pub fn add_weighted_to_lexis(&mut self, section: Section, weight: f64) -> Result<Rc<Section>> {
        Self::check_entry(&section)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(AggregateError::InvalidWeight {
                point: section.point().to_string(),
                weight,
            });
        }

        if let Some(existing) = self.lexis.iter().find(|s| ***s == section) {
            debug!("lexis already holds {}", existing);
            return Ok(existing.clone());
        }

        let section = Rc::new(section);
        self.lexis.push(section.clone());
        self.weights.insert(section.clone(), weight);
        self.entries
            .entry(section.point().clone())
            .or_default()
            .push(section.clone());

        for (_, connector) in section.open_connectors() {
            let list = self.connectables.entry(connector.clone()).or_default();
            if !list.iter().any(|s| Rc::ptr_eq(s, &section)) {
                list.push(section.clone());
            }
        }
        Ok(section)
    }

    fn check_entry(section: &Section) -> Result<()> {
        if section.point().name().is_empty() {
            return Err(AggregateError::EmptyPoint);
        }
        if section.point().name().contains(INSTANCE_SEPARATOR) {
            return Err(AggregateError::ReservedSeparator(section.point().to_string()));
        }
        for (offset, slot) in section.slots().iter().enumerate() {
            match slot {
                Slot::Link(_) => {
                    return Err(AggregateError::LinkInLexis {
                        point: section.point().to_string(),
                        offset,
                    })
                }
                Slot::Connector(c) if c.link_type().is_empty() || c.pole().is_empty() => {
                    return Err(AggregateError::MalformedConnector {
                        point: section.point().to_string(),
                        offset,
                    })
                }
                Slot::Connector(_) => {}
            }
        }
        Ok(())
    }

    /// All lexis entries exposing `connector`, in registration order.
    pub fn connectables(&self, connector: &Connector) -> &[Rc<Section>] {
        self.connectables
            .get(connector)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All lexis entries rooted at `point`, in registration order.
    pub fn entries(&self, point: &Point) -> &[Rc<Section>] {
        self.entries.get(point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Selection weight of a lexis entry. Sections not in the lexis (for
    /// example instances created during a search) get the default weight.
    pub fn weight(&self, section: &Section) -> f64 {
        self.weights.get(section).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.lexis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexis.is_empty()
    }
}
