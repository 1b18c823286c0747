// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! How sections are instantiated and how links are made and counted.
//!
//! Both policies share this. Every section put to use (roots and dictionary
//! draws) is a fresh instance rooted at `name@N`, so two uses of the same
//! dictionary entry are two distinct vertices. The serial counter is part of
//! the scoped policy state: backtracking rewinds it, so a branch and its
//! retry name their draws alike.

use crate::section::{Connector, Link, Point, Section};
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct LinkStyle {
    next_serial: u64,
}

impl LinkStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `section` onto a fresh instance of its point.
    pub fn make_instance(&mut self, section: &Section) -> Rc<Section> {
        let point = section.point().instance(self.next_serial);
        self.next_serial += 1;
        Rc::new(section.rerooted(point))
    }

    /// Undirected link tagged with the from-connector's type.
    pub fn make_link(
        &self,
        from_connector: &Connector,
        _to_connector: &Connector,
        from_point: &Point,
        to_point: &Point,
    ) -> Link {
        Link::undirected(
            from_connector.link_type(),
            from_point.clone(),
            to_point.clone(),
        )
    }

    /// Links already joining the points of `a` and `b`, seen from `a`.
    pub fn num_links(&self, a: &Section, b: &Section, link_type: Option<&str>) -> usize {
        a.links_to(b.point(), link_type)
    }

    pub fn serial(&self) -> u64 {
        self.next_serial
    }

    pub fn rewind_serial(&mut self, serial: u64) {
        self.next_serial = serial;
    }
}
