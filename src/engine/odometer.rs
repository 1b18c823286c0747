// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Odometer for breadth-wise aggregation.
//!
//! One odometer is built per recursion level. It lists, in a fixed order,
//! every `(open section, connector offset, mate connector)` triple available
//! in the frame at that moment; each triple is a *wheel*. The engine steps
//! the wheels left to right, committing one connection per wheel, and rolls
//! back exactly the wheels to the right of the one it re-steps, like the
//! digits of a mechanical odometer.
//!
//! A connector with several mates gets one wheel per mate, placed side by
//! side. These sibling wheels are alternatives: once one commits the rest
//! are stale, and when one runs out of candidates the next sibling takes
//! over before anything rolls back.
//!
//! Wheels never move once the odometer is built. Committing a connection
//! replaces sections by new values, so the odometer keeps a per-wheel copy
//! of its current from-section and rewrites it on every commit. A wheel
//! whose section has since closed, or whose slot has since been linked by an
//! earlier wheel, is *stale* and is skipped rather than treated as failure.

use crate::section::{Connector, Section};
use crate::state::Frame;
use std::fmt::Write;
use std::rc::Rc;

/// The fixed part of one wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    /// Offset of the open connector in the from-section.
    pub from_offset: usize,
    /// Connector the from-connector is to be mated with.
    pub to_connector: Connector,
    /// Index of the `(section, offset)` slot, shared by sibling wheels.
    pub slot: usize,
}

/// One recursion level's set of wheels.
#[derive(Debug, Clone)]
pub struct Odometer {
    wheels: Vec<Wheel>,

    /// Current from-section of each wheel, updated as connections commit.
    sections: Vec<Rc<Section>>,

    /// Frame-trail depth recorded just before each stepped wheel committed.
    /// `None` for wheels that were skipped or have not been stepped.
    marks: Vec<Option<usize>>,

    /// Frame-trail depth when this odometer was created.
    frame_depth: usize,
}

impl Odometer {
    /// Build the wheels for the open sections of `frame`.
    ///
    /// `joints` returns the mates of a connector. Returns `None` when the
    /// frontier cannot be extended: either some open connector has no mate
    /// at all (this frontier can never close) or there are no open
    /// connectors.
    pub fn init(
        frame: &Frame,
        mut joints: impl FnMut(&Connector) -> Vec<Connector>,
        frame_depth: usize,
    ) -> Option<Odometer> {
        let mut wheels = Vec::new();
        let mut sections = Vec::new();
        let mut slot = 0;

        for section in frame.open_sections() {
            for (offset, connector) in section.open_connectors() {
                let mates = joints(connector);
                if mates.is_empty() {
                    return None;
                }
                for to_connector in mates {
                    wheels.push(Wheel {
                        from_offset: offset,
                        to_connector,
                        slot,
                    });
                    sections.push(section.clone());
                }
                slot += 1;
            }
        }

        if wheels.is_empty() {
            return None;
        }

        let marks = vec![None; wheels.len()];
        Some(Odometer {
            wheels,
            sections,
            marks,
            frame_depth,
        })
    }

    pub fn len(&self) -> usize {
        self.wheels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    pub fn wheel(&self, i: usize) -> &Wheel {
        &self.wheels[i]
    }

    /// The current from-section of wheel `i`.
    pub fn section(&self, i: usize) -> &Rc<Section> {
        &self.sections[i]
    }

    pub fn frame_depth(&self) -> usize {
        self.frame_depth
    }

    /// True if wheel `i + 1` is another mate for the slot of wheel `i`.
    pub fn has_next_mate(&self, i: usize) -> bool {
        match self.wheels.get(i + 1) {
            Some(next) => next.slot == self.wheels[i].slot,
            None => false,
        }
    }

    /// True if wheel `i` has nothing left to connect in `frame`.
    pub fn is_stale(&self, i: usize, frame: &Frame) -> bool {
        let section = &self.sections[i];
        !frame.is_open(section) || section.connector_at(self.wheels[i].from_offset).is_none()
    }

    /// Point every wheel holding `old` at `new` instead.
    pub fn replace(&mut self, old: &Section, new: &Rc<Section>) {
        for section in self.sections.iter_mut() {
            if **section == *old {
                *section = new.clone();
            }
        }
    }

    pub fn sections(&self) -> &[Rc<Section>] {
        &self.sections
    }

    /// Restore the per-wheel sections saved by [`Odometer::sections`].
    ///
    /// # Panics
    ///
    /// Panics if the saved list belongs to a different odometer.
    pub fn restore_sections(&mut self, sections: Vec<Rc<Section>>) {
        assert_eq!(
            sections.len(),
            self.sections.len(),
            "Restoring wheel sections from a different odometer"
        );
        self.sections = sections;
    }

    /// Record that wheel `i` committed after the frame trail was `mark` deep.
    pub fn mark_stepped(&mut self, i: usize, mark: usize) {
        self.marks[i] = Some(mark);
    }

    /// The trail mark of wheel `i`, if it is currently stepped.
    pub fn mark(&self, i: usize) -> Option<usize> {
        self.marks[i]
    }

    /// Forget the commits of wheel `i` and every wheel to its right.
    pub fn clear_marks_from(&mut self, i: usize) {
        for mark in &mut self.marks[i..] {
            *mark = None;
        }
    }

    /// The nearest stepped wheel strictly left of `i`.
    pub fn previous_stepped(&self, i: usize) -> Option<usize> {
        (0..i).rev().find(|&j| self.marks[j].is_some())
    }

    /// The rightmost stepped wheel.
    pub fn last_stepped(&self) -> Option<usize> {
        self.previous_stepped(self.wheels.len())
    }

    /// One line per wheel, for trace output.
    pub fn report(&self, frame: &Frame) -> String {
        let mut out = format!("Odometer: {} wheels", self.len());
        for i in 0..self.len() {
            let section = &self.sections[i];
            let wheel = &self.wheels[i];
            let slot = match section.connector_at(wheel.from_offset) {
                Some(c) => c.to_string(),
                None => "linked".to_string(),
            };
            let _ = write!(
                out,
                "\n    wheel {} (slot {}): {} [{}] {} -> {} ({}{})",
                i,
                wheel.slot,
                section.point(),
                wheel.from_offset,
                slot,
                wheel.to_connector,
                if frame.is_open(section) { "open" } else { "closed" },
                if self.marks[i].is_some() { ", stepped" } else { "" },
            );
        }
        out
    }
}
