// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Selection policies.
//!
//! The engine decides *where* to connect next; a policy decides *what* to
//! connect there. A policy enumerates starting configurations, supplies
//! candidate sections one at a time for each wheel, manufactures links, and
//! gates recursion with its budget.
//!
//! # Scoping
//!
//! `select` is a resumable generator. The engine calls it repeatedly for one
//! wheel, rewinding the frame between calls, until it returns `None`. The
//! policy keeps its cursor for each wheel in a map that is saved and cleared
//! on `push_frame` and restored on `pop_frame`. A wheel's cursor therefore
//! survives the exploration of its own commits, and is forgotten when an
//! earlier wheel re-steps and the wheel has to start again.
//!
//! Two implementations are provided:
//! - [`ExhaustivePolicy`]: every open join, then every dictionary draw, in a
//!   fixed order
//! - [`RandomPolicy`]: weighted draws without replacement from a seeded
//!   generator

pub mod exhaustive;
pub mod link_style;
pub mod random;

pub use exhaustive::ExhaustivePolicy;
pub use link_style::LinkStyle;
pub use random::RandomPolicy;

use crate::collect::SolutionCollector;
use crate::dictionary::Dictionary;
use crate::engine::odometer::Odometer;
use crate::error::{AggregateError, Result};
use crate::params::Parameters;
use crate::section::{Connector, Link, Point, Section};
use crate::state::Frame;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tracing::{debug, trace};

/// Strategy consulted by the aggregation engine.
///
/// # Lifecycle
///
/// 1. `root_set` once, then `next_root` until it returns an empty set
/// 2. for each root configuration the engine recurses, calling `step` at
///    every level and `select` for every wheel
/// 3. `push_frame`/`pop_frame` and `push_odometer`/`pop_odometer` bracket
///    every change the engine makes, always properly nested
/// 4. `solution` for every frame with no open sections left
pub trait SelectionPolicy {
    /// Prepare to enumerate starting configurations rooted at `nuclei`.
    fn root_set(&mut self, nuclei: &BTreeSet<Point>) -> Result<()>;

    /// The next starting configuration, or an empty set when exhausted.
    fn next_root(&mut self) -> Vec<Rc<Section>>;

    /// Connectors `connector` may mate with.
    fn joints(&self, connector: &Connector) -> Vec<Connector>;

    /// The next candidate to connect to slot `offset` of `from` through
    /// `to_connector`, or `None` when this wheel has rolled over.
    fn select(
        &mut self,
        frame: &Frame,
        from: &Rc<Section>,
        offset: usize,
        to_connector: &Connector,
    ) -> Option<Rc<Section>>;

    fn make_link(
        &mut self,
        from_connector: &Connector,
        to_connector: &Connector,
        from_point: &Point,
        to_point: &Point,
    ) -> Link;

    /// Links between the points of `a` and `b`, counted in `a`.
    fn num_links(&self, a: &Section, b: &Section, link_type: Option<&str>) -> usize;

    /// Called after the engine saves `frame` and before it changes it.
    fn push_frame(&mut self, _frame: &Frame) {}

    /// Called after the engine restores `frame`.
    fn pop_frame(&mut self, _frame: &Frame) {}

    fn push_odometer(&mut self, _odometer: &Odometer) {}

    fn pop_odometer(&mut self, _odometer: &Odometer) {}

    /// Gate on entry to recursion level `depth`. False prunes the branch.
    fn step(&mut self, frame: &Frame, depth: usize) -> bool;

    /// `frame` has no open sections left.
    fn solution(&mut self, frame: &Frame);
}

/// Step and solution accounting shared by the policies.
#[derive(Debug, Clone)]
pub struct Budget {
    params: Parameters,
    steps_taken: usize,
    collector: SolutionCollector,
}

impl Budget {
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        Ok(Budget {
            params,
            steps_taken: 0,
            collector: SolutionCollector::new(),
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn collector(&self) -> &SolutionCollector {
        &self.collector
    }

    /// True once no further work may be done.
    pub fn is_spent(&self) -> bool {
        self.steps_taken > self.params.max_steps
            || self.collector.num_solutions() >= self.params.max_solutions
    }

    /// Count one step at `depth` and decide whether it may proceed.
    pub fn admit_step(&mut self, frame: &Frame, depth: usize) -> bool {
        self.steps_taken += 1;
        if self.is_spent() {
            trace!("Step {} refused: budget spent", self.steps_taken);
            return false;
        }
        if frame.linkage().len() > self.params.max_network_size {
            trace!("Step refused: linkage of {} too large", frame.linkage().len());
            return false;
        }
        if depth > self.params.max_depth {
            trace!("Step refused: depth {} too deep", depth);
            return false;
        }
        true
    }

    /// True if `frame` has room for one more section.
    pub fn can_grow(&self, frame: &Frame) -> bool {
        frame.network_size() < self.params.max_network_size
    }

    pub fn record(&mut self, frame: &Frame) -> bool {
        self.collector.record_solution(frame)
    }
}

/// The dictionary entries available at each nucleation point.
#[derive(Debug, Clone)]
pub struct RootSet {
    nuclei: Vec<(Point, Vec<Rc<Section>>)>,
    position: Vec<usize>,
    exhausted: bool,
}

impl RootSet {
    /// Fails if there are no nuclei or a nucleus roots no entries.
    pub fn new(dictionary: &Dictionary, nuclei: &BTreeSet<Point>) -> Result<Self> {
        if nuclei.is_empty() {
            return Err(AggregateError::NoNuclei);
        }
        let mut table = Vec::with_capacity(nuclei.len());
        for point in nuclei {
            let entries = dictionary.entries(point);
            if entries.is_empty() {
                return Err(AggregateError::NoRootSections(point.to_string()));
            }
            debug!("Nucleus {} has {} entries", point, entries.len());
            table.push((point.clone(), entries.to_vec()));
        }
        Ok(RootSet {
            position: vec![0; table.len()],
            nuclei: table,
            exhausted: false,
        })
    }

    pub fn nuclei(&self) -> impl Iterator<Item = (&Point, &[Rc<Section>])> {
        self.nuclei.iter().map(|(p, e)| (p, e.as_slice()))
    }

    /// The next combination of one entry per nucleus, rightmost nucleus
    /// varying fastest.
    pub fn next_combination(&mut self) -> Option<Vec<Rc<Section>>> {
        if self.exhausted {
            return None;
        }
        let picks = self
            .position
            .iter()
            .zip(&self.nuclei)
            .map(|(&i, (_, entries))| entries[i].clone())
            .collect();

        let mut digit = self.position.len();
        loop {
            if digit == 0 {
                self.exhausted = true;
                break;
            }
            digit -= 1;
            self.position[digit] += 1;
            if self.position[digit] < self.nuclei[digit].1.len() {
                break;
            }
            self.position[digit] = 0;
        }
        Some(picks)
    }
}

/// Identifies one wheel's query: from-section value, offset, mate.
pub type WheelKey = (Rc<Section>, usize, Connector);

/// Per-wheel policy state, saved and cleared with each frame push.
#[derive(Debug, Clone)]
pub struct WheelScopes<S> {
    current: HashMap<WheelKey, S>,
    saved: Vec<(HashMap<WheelKey, S>, u64)>,
    odometers: usize,
}

impl<S> Default for WheelScopes<S> {
    fn default() -> Self {
        WheelScopes {
            current: HashMap::new(),
            saved: Vec::new(),
            odometers: 0,
        }
    }
}

impl<S> WheelScopes<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current cursors with the instance serial, and start afresh.
    pub fn push(&mut self, serial: u64) {
        let current = std::mem::take(&mut self.current);
        self.saved.push((current, serial));
    }

    /// Restore the cursors saved by the matching `push`; returns its serial.
    ///
    /// # Panics
    ///
    /// Panics on a pop with no matching push.
    pub fn pop(&mut self) -> u64 {
        let Some((current, serial)) = self.saved.pop() else {
            panic!("pop_frame without matching push_frame");
        };
        self.current = current;
        serial
    }

    pub fn enter_odometer(&mut self) {
        self.odometers += 1;
    }

    /// # Panics
    ///
    /// Panics on a pop with no matching push.
    pub fn leave_odometer(&mut self) {
        assert!(self.odometers > 0, "pop_odometer without matching push_odometer");
        self.odometers -= 1;
    }

    pub fn get(&self, key: &WheelKey) -> Option<&S> {
        self.current.get(key)
    }

    pub fn get_mut(&mut self, key: &WheelKey) -> Option<&mut S> {
        self.current.get_mut(key)
    }

    pub fn insert(&mut self, key: WheelKey, state: S) {
        self.current.insert(key, state);
    }
}

/// Open sections that `from` may join at `offset` through `to_connector`,
/// in the frame's value order, honouring the self-connection and parallel-link limits.
pub fn open_candidates(
    frame: &Frame,
    from: &Rc<Section>,
    offset: usize,
    to_connector: &Connector,
    params: &Parameters,
    style: &LinkStyle,
) -> Vec<Rc<Section>> {
    frame
        .open_sections()
        .iter()
        .filter(|to| {
            let exclude = (*to == from).then_some(offset);
            if to.find_connector(to_connector, exclude).is_none() {
                return false;
            }
            if to.point() == from.point() && !params.allow_self_connections {
                return false;
            }
            if style.num_links(from, to, None) >= params.pair_any_links {
                return false;
            }
            style.num_links(from, to, Some(to_connector.link_type())) < params.pair_typed_links
        })
        .cloned()
        .collect()
}
