// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sectionweave::engine::Odometer;
use sectionweave::section::{Connector, Link, Point, Section};
use sectionweave::state::Statistics;
use sectionweave::{Aggregate, Dictionary, ExhaustivePolicy, Frame, Linkage, Parameters, SelectionPolicy};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Section at `point` with connectors given as `(link_type, pole)`.
pub fn sect(point: &str, connectors: &[(&str, &str)]) -> Section {
    Section::from_connectors(
        Point::new(point),
        connectors.iter().map(|(t, p)| Connector::new(*t, *p)),
    )
}

pub fn nuclei(points: &[&str]) -> BTreeSet<Point> {
    points.iter().map(|p| Point::new(*p)).collect()
}

/// Dictionary with `+` and `-` mating both ways.
pub fn plus_minus(sections: Vec<Section>) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.add_symmetric_pole_pair("+", "-").unwrap();
    for s in sections {
        dict.add_to_lexis(s).unwrap();
    }
    dict
}

/// Two sections with one opposite connector each.
pub fn scenario_pair() -> Dictionary {
    plus_minus(vec![sect("a", &[("S", "+")]), sect("b", &[("S", "-")])])
}

/// A section whose only connector has no mate.
pub fn scenario_unmateable() -> Dictionary {
    plus_minus(vec![sect("a", &[("S", "?")])])
}

/// Like [`plus_minus`], with `+` also mating `*` both ways.
pub fn plus_minus_star(sections: Vec<Section>) -> Dictionary {
    let mut dict = plus_minus(Vec::new());
    dict.add_symmetric_pole_pair("+", "*").unwrap();
    for s in sections {
        dict.add_to_lexis(s).unwrap();
    }
    dict
}

/// Three sections that close into a triangle a-b-c.
pub fn scenario_triangle() -> Dictionary {
    plus_minus(vec![
        sect("a", &[("AB", "+"), ("CA", "-")]),
        sect("b", &[("AB", "-"), ("BC", "+")]),
        sect("c", &[("BC", "-"), ("CA", "+")]),
    ])
}

/// A start, an end, and a link piece that extends a chain forever.
pub fn scenario_chain() -> Dictionary {
    plus_minus(vec![
        sect("start", &[("S", "+")]),
        sect("link", &[("S", "-"), ("S", "+")]),
        sect("end", &[("S", "-")]),
    ])
}

/// A piece that branches in two at every step, and nothing to close it.
pub fn scenario_branching() -> Dictionary {
    plus_minus(vec![
        sect("root", &[("S", "+")]),
        sect("fork", &[("S", "-"), ("S", "+"), ("S", "+")]),
    ])
}

/// Run the exhaustive policy to completion.
pub fn run_exhaustive(
    dict: Dictionary,
    params: Parameters,
    points: &[&str],
) -> (Vec<Linkage>, Statistics) {
    let mut policy = Checked::new(ExhaustivePolicy::new(dict, params).unwrap());
    let statistics = {
        let mut engine = Aggregate::new(&mut policy);
        engine.aggregate(&nuclei(points)).unwrap();
        engine.statistics().clone()
    };
    policy.assert_balanced();
    (policy.inner.get_solutions(), statistics)
}

/// Number of links between the points of `a` and `b`, counted in `a`.
pub fn links_between(a: &Section, b: &Section) -> usize {
    a.links().filter(|l| l.joins(a.point(), b.point())).count()
}

/// Every link of `linkage`, each listed once.
pub fn edges(linkage: &Linkage) -> BTreeSet<Link> {
    linkage.iter().flat_map(|s| s.links().cloned()).collect()
}

/// Wraps a policy and checks the engine's bookkeeping as it runs.
///
/// Every frame seen at `push_frame` must come back unchanged at the
/// matching `pop_frame`, and every frame must satisfy the frame invariants.
pub struct Checked<P> {
    pub inner: P,
    saved: Vec<Frame>,
    odometers: usize,
    pub frame_pushes: usize,
    pub frame_pops: usize,
    pub odometer_pushes: usize,
    pub odometer_pops: usize,
    pub solutions_seen: usize,
}

impl<P> Checked<P> {
    pub fn new(inner: P) -> Self {
        Checked {
            inner,
            saved: Vec::new(),
            odometers: 0,
            frame_pushes: 0,
            frame_pops: 0,
            odometer_pushes: 0,
            odometer_pops: 0,
            solutions_seen: 0,
        }
    }

    pub fn assert_balanced(&self) {
        assert!(self.saved.is_empty(), "{} frames never popped", self.saved.len());
        assert_eq!(self.odometers, 0);
        assert_eq!(self.frame_pushes, self.frame_pops);
        assert_eq!(self.odometer_pushes, self.odometer_pops);
    }
}

impl<P: SelectionPolicy> SelectionPolicy for Checked<P> {
    fn root_set(&mut self, nuclei: &BTreeSet<Point>) -> sectionweave::Result<()> {
        self.inner.root_set(nuclei)
    }

    fn next_root(&mut self) -> Vec<Rc<Section>> {
        self.inner.next_root()
    }

    fn joints(&self, connector: &Connector) -> Vec<Connector> {
        self.inner.joints(connector)
    }

    fn select(
        &mut self,
        frame: &Frame,
        from: &Rc<Section>,
        offset: usize,
        to_connector: &Connector,
    ) -> Option<Rc<Section>> {
        assert!(frame.is_open(from), "select from a section not in the frame");
        self.inner.select(frame, from, offset, to_connector)
    }

    fn make_link(
        &mut self,
        from_connector: &Connector,
        to_connector: &Connector,
        from_point: &Point,
        to_point: &Point,
    ) -> Link {
        self.inner
            .make_link(from_connector, to_connector, from_point, to_point)
    }

    fn num_links(&self, a: &Section, b: &Section, link_type: Option<&str>) -> usize {
        self.inner.num_links(a, b, link_type)
    }

    fn push_frame(&mut self, frame: &Frame) {
        frame.check_invariants().unwrap();
        self.saved.push(frame.clone());
        self.frame_pushes += 1;
        self.inner.push_frame(frame);
    }

    fn pop_frame(&mut self, frame: &Frame) {
        frame.check_invariants().unwrap();
        let expected = self.saved.pop().expect("pop_frame without push_frame");
        assert_eq!(&expected, frame, "frame not restored on backtrack");
        self.frame_pops += 1;
        self.inner.pop_frame(frame);
    }

    fn push_odometer(&mut self, odometer: &Odometer) {
        self.odometers += 1;
        self.odometer_pushes += 1;
        self.inner.push_odometer(odometer);
    }

    fn pop_odometer(&mut self, odometer: &Odometer) {
        assert!(self.odometers > 0, "pop_odometer without push_odometer");
        self.odometers -= 1;
        self.odometer_pops += 1;
        self.inner.pop_odometer(odometer);
    }

    fn step(&mut self, frame: &Frame, depth: usize) -> bool {
        frame.check_invariants().unwrap();
        assert_eq!(depth, self.odometers, "depth is the odometer nesting");
        self.inner.step(frame, depth)
    }

    fn solution(&mut self, frame: &Frame) {
        assert!(frame.is_complete());
        assert!(frame.linkage().iter().all(|s| s.is_closed()));
        self.solutions_seen += 1;
        self.inner.solution(frame);
    }
}
