// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Value types for sections ("puzzle pieces").
//!
//! This module contains the immutable values the search is built from:
//! - Point: vertex identity a section is rooted at
//! - Connector: typed, polarised open slot
//! - Link: realized undirected edge
//! - Slot: either an open connector or a resolved link
//! - Section: ordered slots rooted at a point
//!
//! Sections are never edited in place. Connecting a slot produces a new
//! section value via [`Section::with_link`]; the old value is simply dropped
//! from the frame that held it. Dictionary entries are therefore never
//! mutated by a search.

pub mod connector;
pub mod link;

pub use connector::{Connector, Point, INSTANCE_SEPARATOR};
pub use link::Link;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One position in a section's slot sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Connector(Connector),
    Link(Link),
}

impl Slot {
    /// The connector, if this slot is still open.
    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Slot::Connector(c) => Some(c),
            Slot::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Slot::Connector(_) => None,
            Slot::Link(l) => Some(l),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Slot::Connector(_))
    }
}

/// An ordered sequence of slots rooted at one point.
///
/// A section with no open connectors is *closed*, otherwise it is *open*.
/// Equality, ordering and hashing are structural, which is what the solution
/// collector relies on for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Section {
    point: Point,
    slots: Vec<Slot>,
}

impl Section {
    pub fn new(point: Point, slots: Vec<Slot>) -> Self {
        Self { point, slots }
    }

    /// Create a section whose slots are all open connectors.
    pub fn from_connectors(point: Point, connectors: impl IntoIterator<Item = Connector>) -> Self {
        Self::new(point, connectors.into_iter().map(Slot::Connector).collect())
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The connector at `offset`, if that slot exists and is still open.
    pub fn connector_at(&self, offset: usize) -> Option<&Connector> {
        self.slots.get(offset).and_then(Slot::as_connector)
    }

    /// Iterate over `(offset, connector)` for every open slot.
    pub fn open_connectors(&self) -> impl Iterator<Item = (usize, &Connector)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_connector().map(|c| (i, c)))
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.slots.iter().filter_map(Slot::as_link)
    }

    pub fn is_open(&self) -> bool {
        self.slots.iter().any(Slot::is_open)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Offset of the first open slot holding exactly `connector`, skipping
    /// `exclude` (used when a section is joined to itself).
    pub fn find_connector(&self, connector: &Connector, exclude: Option<usize>) -> Option<usize> {
        self.open_connectors()
            .find(|(i, c)| *c == connector && Some(*i) != exclude)
            .map(|(i, _)| i)
    }

    /// Copy of this section with the slot at `offset` replaced by `link`.
    ///
    /// # Panics
    ///
    /// Panics if the slot at `offset` is not an open connector. Callers only
    /// ever link open slots; anything else is a bookkeeping bug.
    pub fn with_link(&self, offset: usize, link: Link) -> Section {
        assert!(
            self.connector_at(offset).is_some(),
            "Slot {} of {} is not an open connector",
            offset,
            self
        );
        let mut slots = self.slots.clone();
        slots[offset] = Slot::Link(link);
        Section::new(self.point.clone(), slots)
    }

    /// Copy of this section rooted at a different point.
    pub fn rerooted(&self, point: Point) -> Section {
        Section::new(point, self.slots.clone())
    }

    /// Number of links from this section to the point `other`, optionally
    /// restricted to one link type.
    pub fn links_to(&self, other: &Point, link_type: Option<&str>) -> usize {
        self.links()
            .filter(|l| l.joins(&self.point, other))
            .filter(|l| link_type.map_or(true, |t| l.link_type() == t))
            .count()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.point)?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Slot::Connector(c) => write!(f, "{}", c)?,
                Slot::Link(l) => write!(f, "({})", l)?,
            }
        }
        f.write_str("]")
    }
}
