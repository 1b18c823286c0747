// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Deterministic exhaustive selection.
//!
//! For each wheel, every compatible open section is offered first, in the
//! frame's value order (joining one closes a cycle). Then every dictionary
//! entry exposing the mate connector is offered, in registration order. Repeated runs over the same dictionary
//! visit the same frames in the same order.

use super::{open_candidates, Budget, LinkStyle, RootSet, SelectionPolicy, WheelKey, WheelScopes};
use crate::collect::SolutionCollector;
use crate::dictionary::Dictionary;
use crate::engine::odometer::Odometer;
use crate::error::Result;
use crate::params::Parameters;
use crate::section::{Connector, Link, Point, Section};
use crate::state::{Frame, Linkage};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::trace;

/// Position of one wheel's generator.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    open: usize,
    lexis: usize,
}

#[derive(Debug, Clone)]
pub struct ExhaustivePolicy {
    dictionary: Dictionary,
    budget: Budget,
    style: LinkStyle,
    roots: Option<RootSet>,
    cursors: WheelScopes<Cursor>,
}

impl ExhaustivePolicy {
    pub fn new(dictionary: Dictionary, params: Parameters) -> Result<Self> {
        Ok(ExhaustivePolicy {
            dictionary,
            budget: Budget::new(params)?,
            style: LinkStyle::new(),
            roots: None,
            cursors: WheelScopes::new(),
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn params(&self) -> &Parameters {
        self.budget.params()
    }

    pub fn steps_taken(&self) -> usize {
        self.budget.steps_taken()
    }

    pub fn collector(&self) -> &SolutionCollector {
        self.budget.collector()
    }

    pub fn get_solutions(&self) -> Vec<Linkage> {
        self.budget.collector().get_solutions()
    }
}

impl SelectionPolicy for ExhaustivePolicy {
    fn root_set(&mut self, nuclei: &BTreeSet<Point>) -> Result<()> {
        self.roots = Some(RootSet::new(&self.dictionary, nuclei)?);
        Ok(())
    }

    fn next_root(&mut self) -> Vec<Rc<Section>> {
        if self.budget.is_spent() {
            return Vec::new();
        }
        let Some(picks) = self.roots.as_mut().and_then(RootSet::next_combination) else {
            return Vec::new();
        };
        self.style.rewind_serial(0);
        picks.iter().map(|s| self.style.make_instance(s)).collect()
    }

    fn joints(&self, connector: &Connector) -> Vec<Connector> {
        self.dictionary.joints(connector)
    }

    fn select(
        &mut self,
        frame: &Frame,
        from: &Rc<Section>,
        offset: usize,
        to_connector: &Connector,
    ) -> Option<Rc<Section>> {
        if self.budget.is_spent() {
            return None;
        }
        let key: WheelKey = (from.clone(), offset, to_connector.clone());
        let mut cursor = self.cursors.get(&key).copied().unwrap_or_default();

        let open = open_candidates(frame, from, offset, to_connector, self.budget.params(), &self.style);
        let chosen = if cursor.open < open.len() {
            cursor.open += 1;
            Some(open[cursor.open - 1].clone())
        } else {
            let lexis = self.dictionary.connectables(to_connector);
            if cursor.lexis < lexis.len() && self.budget.can_grow(frame) {
                let entry = lexis[cursor.lexis].clone();
                cursor.lexis += 1;
                Some(self.style.make_instance(&entry))
            } else {
                None
            }
        };
        self.cursors.insert(key, cursor);

        match &chosen {
            Some(to) => trace!("Select {} [{}] {} -> {}", from.point(), offset, to_connector, to),
            None => trace!("Select {} [{}] {}: exhausted", from.point(), offset, to_connector),
        }
        chosen
    }

    fn make_link(
        &mut self,
        from_connector: &Connector,
        to_connector: &Connector,
        from_point: &Point,
        to_point: &Point,
    ) -> Link {
        self.style.make_link(from_connector, to_connector, from_point, to_point)
    }

    fn num_links(&self, a: &Section, b: &Section, link_type: Option<&str>) -> usize {
        self.style.num_links(a, b, link_type)
    }

    fn push_frame(&mut self, _frame: &Frame) {
        self.cursors.push(self.style.serial());
    }

    fn pop_frame(&mut self, _frame: &Frame) {
        let serial = self.cursors.pop();
        self.style.rewind_serial(serial);
    }

    fn push_odometer(&mut self, _odometer: &Odometer) {
        self.cursors.enter_odometer();
    }

    fn pop_odometer(&mut self, _odometer: &Odometer) {
        self.cursors.leave_odometer();
    }

    fn step(&mut self, frame: &Frame, depth: usize) -> bool {
        self.budget.admit_step(frame, depth)
    }

    fn solution(&mut self, frame: &Frame) {
        self.budget.record(frame);
    }
}
