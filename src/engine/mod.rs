// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Breadth-wise aggregation engine.
//!
//! The engine grows graphs outward from nucleation points. At each
//! recursion level it builds an [`Odometer`] over every open connector of
//! the current frame, steps the odometer to commit one connection per
//! wheel, recurses into the resulting frame, and then advances the odometer
//! to its next configuration. All the choosing is delegated to a
//! [`SelectionPolicy`].
//!
//! # Architecture
//!
//! Two stacks are kept in lockstep:
//! - The frame trail: a copy of the frame is pushed before every commit and
//!   once per nucleation. Rewinding to a mark restores the frame (and the
//!   odometer's wheel sections) exactly as they were before that commit.
//! - The odometer stack: one odometer per recursion level. Popping an
//!   odometer first realigns the frame trail to the depth recorded when the
//!   odometer was created.
//!
//! Each level runs the state machine
//! `INIT -> STEPPING <-> EXPLORE_CHILD -> DONE`, or `INIT -> DONE` when the
//! odometer cannot be built.
//!
//! The engine has no termination condition of its own. The policy's step
//! gate and the exhaustion of its candidates are what stop a search.
//!
//! # Example
//!
//! ```
//! use sectionweave::dictionary::Dictionary;
//! use sectionweave::engine::Aggregate;
//! use sectionweave::params::Parameters;
//! use sectionweave::policy::ExhaustivePolicy;
//! use sectionweave::section::{Connector, Point, Section};
//! use std::collections::BTreeSet;
//!
//! let mut dict = Dictionary::new();
//! dict.add_symmetric_pole_pair("+", "-").unwrap();
//! dict.add_to_lexis(Section::from_connectors(Point::new("a"), vec![Connector::new("S", "+")])).unwrap();
//! dict.add_to_lexis(Section::from_connectors(Point::new("b"), vec![Connector::new("S", "-")])).unwrap();
//!
//! let mut policy = ExhaustivePolicy::new(dict, Parameters::default()).unwrap();
//! Aggregate::new(&mut policy)
//!     .aggregate(&BTreeSet::from([Point::new("a")]))
//!     .unwrap();
//! assert_eq!(policy.get_solutions().len(), 1);
//! ```

pub mod odometer;

pub use odometer::{Odometer, Wheel};

use crate::error::{AggregateError, Result};
use crate::policy::SelectionPolicy;
use crate::section::{Connector, Point, Section};
use crate::state::{Counters, Frame, Statistics};
use crate::trail::Trail;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::{debug, info, trace};

/// A frame-trail entry: the frame before a commit, and the wheel sections
/// of the odometer that made it.
#[derive(Debug, Clone)]
struct Saved {
    frame: Frame,
    /// `None` for the entry pushed at nucleation, before any odometer.
    wheels: Option<Vec<Rc<Section>>>,
}

/// Outcome of stepping one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WheelStep {
    Stepped,
    Skipped,
    RolledOver,
}

/// Aggregation engine driving one policy.
pub struct Aggregate<'a, P: SelectionPolicy + ?Sized> {
    policy: &'a mut P,

    /// The frame being extended.
    frame: Frame,

    /// Saved frames, newest last.
    frames: Trail<Saved>,

    /// One odometer per recursion level; the current level's is last.
    odometers: Vec<Odometer>,

    statistics: Statistics,
}

impl<'a, P: SelectionPolicy + ?Sized> Aggregate<'a, P> {
    pub fn new(policy: &'a mut P) -> Self {
        Self {
            policy,
            frame: Frame::new(),
            frames: Trail::new(),
            odometers: Vec::new(),
            statistics: Statistics::new(),
        }
    }

    /// Grow graphs from every starting configuration the policy offers for
    /// `nuclei`, reporting each completed frame to the policy.
    ///
    /// Only setup problems are errors. A search that finds nothing, or is
    /// stopped by the policy's budget, returns `Ok(())`.
    ///
    /// # Panics
    ///
    /// Panics if the stacks are not balanced when the search returns, or if
    /// the policy's link bookkeeping is inconsistent.
    pub fn aggregate(&mut self, nuclei: &BTreeSet<Point>) -> Result<()> {
        if nuclei.is_empty() {
            return Err(AggregateError::NoNuclei);
        }
        self.policy.root_set(nuclei)?;

        loop {
            let roots = self.policy.next_root();
            if roots.is_empty() {
                break;
            }
            self.statistics.increment_counter(Counters::Nucleations);
            debug!(
                "Nucleation {}: {}",
                self.statistics.get(Counters::Nucleations),
                roots.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
            );

            let mark = self.push_frame();
            self.frame = Frame::seeded(roots);
            if self.frame.is_complete() {
                self.report_solution();
            }
            self.recurse();
            self.rewind_frames(mark);
        }

        assert!(
            self.frames.is_empty() && self.odometers.is_empty(),
            "Unbalanced stacks at return: {} frames, {} odometers",
            self.frames.len(),
            self.odometers.len()
        );
        assert_eq!(self.statistics.frame_balance(), 0, "Frame pushes and pops differ");
        assert_eq!(self.statistics.odometer_balance(), 0, "Odometer pushes and pops differ");
        info!("Aggregation finished: {}", self.statistics);
        Ok(())
    }

    /// Extend the current frame by one breadth-wise layer, and recurse.
    fn recurse(&mut self) {
        let depth = self.odometers.len();
        self.statistics.increment_counter(Counters::StepAttempts);
        if !self.policy.step(&self.frame, depth) {
            self.statistics.increment_counter(Counters::StepRefusals);
            trace!("Step refused at depth {}", depth);
            return;
        }
        if self.frame.is_complete() {
            return;
        }

        let policy = &*self.policy;
        let Some(odometer) = Odometer::init(&self.frame, |c| policy.joints(c), self.frames.len()) else {
            self.statistics.increment_counter(Counters::DeadEnds);
            debug!("Dead end at depth {}:\n{}", depth, self.frame);
            return;
        };
        trace!("Depth {}: {}", depth, odometer.report(&self.frame));
        self.push_odometer(odometer);

        let mut more = self.step_wheels(0);
        while more {
            if self.frame.is_complete() {
                self.report_solution();
            }
            self.recurse();
            more = self.advance();
        }

        self.pop_odometer();
    }

    fn current(&self) -> &Odometer {
        match self.odometers.last() {
            Some(odometer) => odometer,
            None => panic!("Odometer stack is empty"),
        }
    }

    fn current_mut(&mut self) -> &mut Odometer {
        match self.odometers.last_mut() {
            Some(odometer) => odometer,
            None => panic!("Odometer stack is empty"),
        }
    }

    /// Step wheels `start..` of the current odometer. Returns false once
    /// the odometer is exhausted.
    ///
    /// A wheel with no candidate left hands its slot to its next sibling
    /// mate. Only the last mate of a slot rolls the odometer back.
    fn step_wheels(&mut self, start: usize) -> bool {
        let mut i = start;
        while i < self.current().len() {
            match self.step_wheel(i) {
                WheelStep::Stepped | WheelStep::Skipped => i += 1,
                WheelStep::RolledOver if self.current().has_next_mate(i) => {
                    trace!("Wheel {} exhausted, passing its slot to wheel {}", i, i + 1);
                    i += 1;
                }
                WheelStep::RolledOver => {
                    self.statistics.increment_counter(Counters::Rollovers);
                    match self.current().previous_stepped(i) {
                        Some(prev) => {
                            self.unstep(prev);
                            i = prev;
                        }
                        None => return false,
                    }
                }
            }
        }
        true
    }

    /// Move the current odometer to its next configuration.
    fn advance(&mut self) -> bool {
        match self.current().last_stepped() {
            Some(last) => {
                self.unstep(last);
                self.step_wheels(last)
            }
            None => false,
        }
    }

    /// Undo the commit of wheel `i` and of every wheel after it.
    fn unstep(&mut self, i: usize) {
        let Some(mark) = self.current().mark(i) else {
            panic!("Wheel {} was never stepped", i);
        };
        self.rewind_frames(mark);
        self.current_mut().clear_marks_from(i);
    }

    fn step_wheel(&mut self, i: usize) -> WheelStep {
        let odometer = self.current();
        if odometer.is_stale(i, &self.frame) {
            self.statistics.increment_counter(Counters::WheelSkips);
            trace!("Wheel {} stale", i);
            return WheelStep::Skipped;
        }
        let from = odometer.section(i).clone();
        let offset = odometer.wheel(i).from_offset;
        let to_connector = odometer.wheel(i).to_connector.clone();

        let Some(to) = self.policy.select(&self.frame, &from, offset, &to_connector) else {
            trace!("Wheel {} rolled over", i);
            return WheelStep::RolledOver;
        };

        let mark = self.push_frame();
        self.connect_section(&from, offset, &to, &to_connector);
        self.current_mut().mark_stepped(i, mark);
        self.statistics.increment_counter(Counters::WheelSteps);
        WheelStep::Stepped
    }

    /// Link slot `offset` of `from` to the first open `to_connector` of `to`.
    ///
    /// # Panics
    ///
    /// Panics if `to` does not expose `to_connector`, or if the two sides
    /// disagree about the links between them afterwards.
    fn connect_section(
        &mut self,
        from: &Rc<Section>,
        offset: usize,
        to: &Rc<Section>,
        to_connector: &Connector,
    ) {
        let Some(from_connector) = from.connector_at(offset).cloned() else {
            panic!("Slot {} of {} is not open", offset, from);
        };
        let self_join = from == to;
        let Some(to_offset) = to.find_connector(to_connector, self_join.then_some(offset)) else {
            panic!("Selected section {} has no open {}", to, to_connector);
        };
        let link = self
            .policy
            .make_link(&from_connector, to_connector, from.point(), to.point());
        trace!("Connect {}", link);

        let (new_from, new_to) = if self_join {
            let half = self.frame.commit_link(from, offset, link.clone());
            let whole = self.frame.commit_link(&half, to_offset, link.clone());
            (whole.clone(), whole)
        } else {
            let new_from = self.frame.commit_link(from, offset, link.clone());
            let new_to = self.frame.commit_link(to, to_offset, link.clone());
            (new_from, new_to)
        };

        let there = self.policy.num_links(&new_from, &new_to, Some(link.link_type()));
        let back = self.policy.num_links(&new_to, &new_from, Some(link.link_type()));
        assert_eq!(
            there, back,
            "Undirected link counts disagree between {} and {}",
            new_from, new_to
        );

        let odometer = self.current_mut();
        odometer.replace(from, &new_from);
        if !self_join {
            odometer.replace(to, &new_to);
        }
    }

    fn report_solution(&mut self) {
        self.statistics.increment_counter(Counters::Solutions);
        trace!("Complete {}", self.frame);
        self.policy.solution(&self.frame);
    }

    /// Save the frame before changing it. Returns the mark that undoes it.
    fn push_frame(&mut self) -> usize {
        let wheels = self.odometers.last().map(|o| o.sections().to_vec());
        let mark = self.frames.push(Saved {
            frame: self.frame.clone(),
            wheels,
        });
        self.policy.push_frame(&self.frame);
        self.statistics.increment_counter(Counters::FramePushes);
        mark
    }

    /// Pop saved frames back to `mark`, restoring each in turn.
    fn rewind_frames(&mut self, mark: usize) {
        let Self {
            policy,
            frame,
            frames,
            odometers,
            statistics,
        } = self;
        frames.rewind_to(mark, |saved| {
            *frame = saved.frame;
            if let (Some(odometer), Some(wheels)) = (odometers.last_mut(), saved.wheels) {
                odometer.restore_sections(wheels);
            }
            policy.pop_frame(frame);
            statistics.increment_counter(Counters::FramePops);
        });
    }

    fn push_odometer(&mut self, odometer: Odometer) {
        self.policy.push_odometer(&odometer);
        self.odometers.push(odometer);
        self.statistics.increment_counter(Counters::OdometerPushes);
    }

    /// Realign the frame trail to the current odometer's creation depth,
    /// then pop it.
    fn pop_odometer(&mut self) {
        let depth = self.current().frame_depth();
        self.rewind_frames(depth);
        if let Some(odometer) = self.odometers.pop() {
            self.policy.pop_odometer(&odometer);
            self.statistics.increment_counter(Counters::OdometerPops);
        }
    }

    /// The frame being extended.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Deepest the frame trail has been.
    pub fn max_frame_depth(&self) -> usize {
        self.frames.max_depth()
    }
}
