// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Traversal state for one branch of the search.

use crate::section::{Link, Point, Section};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// A set of closed sections: a (possibly partial) assembled graph.
///
/// Ordered-set semantics make equality and hashing independent of the order
/// in which sections were closed.
pub type Linkage = BTreeSet<Rc<Section>>;

/// The mutable record of one search branch.
///
/// Invariants, maintained by [`Frame::commit_link`]:
/// - every point in `open_points` roots at least one section in `open_sections`
/// - every section in `open_sections` has an open connector
/// - every section in `linkage` is closed
/// - `open_sections` and `linkage` are disjoint
///
/// Frames are plain values. The engine saves a copy before each commit and
/// restores it wholesale on backtrack; sections are shared through `Rc`, so a
/// copy costs one pointer per member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Points that are unconnected.
    open_points: BTreeSet<Point>,

    /// Sections with unconnected connectors.
    open_sections: BTreeSet<Rc<Section>>,

    /// Completed sections.
    linkage: Linkage,
}

impl Frame {
    /// An empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame seeded with the given root sections.
    pub fn seeded(roots: impl IntoIterator<Item = Rc<Section>>) -> Self {
        let mut frame = Frame::new();
        for root in roots {
            frame.place(root);
        }
        frame
    }

    pub fn open_points(&self) -> &BTreeSet<Point> {
        &self.open_points
    }

    pub fn open_sections(&self) -> &BTreeSet<Rc<Section>> {
        &self.open_sections
    }

    pub fn linkage(&self) -> &Linkage {
        &self.linkage
    }

    /// True if `section` is currently one of the open sections.
    pub fn is_open(&self, section: &Section) -> bool {
        self.open_sections.contains(section)
    }

    /// True once nothing is left to connect.
    pub fn is_complete(&self) -> bool {
        self.open_sections.is_empty()
    }

    /// Number of sections in the network, open or closed.
    pub fn network_size(&self) -> usize {
        self.open_sections.len() + self.linkage.len()
    }

    /// Replace the connector at `offset` of `section` by `link`.
    ///
    /// Returns the new section value. `section` is removed from the open set
    /// if it was there (a freshly drawn section is not yet in the frame). The
    /// new section goes to the open set if it still has an open connector,
    /// otherwise to the linkage, and its point leaves `open_points` unless
    /// another open section is still rooted there.
    pub fn commit_link(&mut self, section: &Rc<Section>, offset: usize, link: Link) -> Rc<Section> {
        self.retire(section);
        let updated = Rc::new(section.with_link(offset, link));
        self.place(updated.clone());
        updated
    }

    fn place(&mut self, section: Rc<Section>) {
        if section.is_open() {
            self.open_points.insert(section.point().clone());
            self.open_sections.insert(section);
        } else {
            let point = section.point().clone();
            self.linkage.insert(section);
            if !self.roots_open_section(&point) {
                self.open_points.remove(&point);
            }
        }
    }

    fn retire(&mut self, section: &Section) {
        if self.open_sections.remove(section) && !self.roots_open_section(section.point()) {
            self.open_points.remove(section.point());
        }
    }

    fn roots_open_section(&self, point: &Point) -> bool {
        self.open_sections.iter().any(|s| s.point() == point)
    }

    /// Check the frame invariants, describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for point in &self.open_points {
            if !self.roots_open_section(point) {
                return Err(format!("open point {} roots no open section", point));
            }
        }
        for section in &self.open_sections {
            if section.is_closed() {
                return Err(format!("closed section {} in open set", section));
            }
            if !self.open_points.contains(section.point()) {
                return Err(format!("point of open section {} is not open", section));
            }
            if self.linkage.contains(section) {
                return Err(format!("section {} is both open and closed", section));
            }
        }
        for section in &self.linkage {
            if section.is_open() {
                return Err(format!("open section {} in linkage", section));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame: pts:")?;
        for p in &self.open_points {
            write!(f, " {}", p)?;
        }
        writeln!(f)?;
        writeln!(f, "  Open:")?;
        for s in &self.open_sections {
            writeln!(f, "    {}", s)?;
        }
        writeln!(f, "  Closed:")?;
        for s in &self.linkage {
            writeln!(f, "    {}", s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Connector;

    fn sect(point: &str, cons: &[(&str, &str)]) -> Rc<Section> {
        Rc::new(Section::from_connectors(
            Point::new(point),
            cons.iter().map(|(t, p)| Connector::new(*t, *p)),
        ))
    }

    #[test]
    fn test_seeded_frame() {
        let frame = Frame::seeded(vec![sect("a", &[("S", "+")]), sect("b", &[])]);
        assert_eq!(frame.open_sections().len(), 1);
        assert_eq!(frame.linkage().len(), 1);
        assert!(frame.open_points().contains(&Point::new("a")));
        assert!(!frame.open_points().contains(&Point::new("b")));
        assert_eq!(frame.network_size(), 2);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_commit_link_closes_both_sides() {
        let a = sect("a", &[("S", "+")]);
        let b = sect("b", &[("S", "-")]);
        let mut frame = Frame::seeded(vec![a.clone()]);

        let link = Link::undirected("S", Point::new("a"), Point::new("b"));
        let a2 = frame.commit_link(&a, 0, link.clone());
        assert!(a2.is_closed());
        assert!(!frame.is_open(&a));
        frame.check_invariants().unwrap();

        // b was never in the frame: committing it just places the result
        let b2 = frame.commit_link(&b, 0, link);
        assert!(b2.is_closed());
        assert!(frame.is_complete());
        assert!(frame.open_points().is_empty());
        assert_eq!(frame.linkage().len(), 2);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_commit_link_partial() {
        let a = sect("a", &[("S", "+"), ("O", "+")]);
        let mut frame = Frame::seeded(vec![a.clone()]);
        let a2 = frame.commit_link(&a, 0, Link::undirected("S", Point::new("a"), Point::new("b")));
        assert!(frame.is_open(&a2));
        assert!(frame.open_points().contains(&Point::new("a")));
        assert_eq!(frame.open_sections().len(), 1);
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_point_stays_open_while_another_section_roots_it() {
        let a1 = sect("a", &[("S", "+")]);
        let a2 = sect("a", &[("O", "+")]);
        let mut frame = Frame::seeded(vec![a1.clone(), a2.clone()]);

        frame.commit_link(&a1, 0, Link::undirected("S", Point::new("a"), Point::new("b")));
        assert!(frame.open_points().contains(&Point::new("a")));
        frame.check_invariants().unwrap();

        frame.commit_link(&a2, 0, Link::undirected("O", Point::new("a"), Point::new("c")));
        assert!(frame.open_points().is_empty());
        frame.check_invariants().unwrap();
    }

    #[test]
    fn test_linkage_equality_ignores_insertion_order() {
        let x = sect("x", &[]);
        let y = sect("y", &[]);
        let f1 = Frame::seeded(vec![x.clone(), y.clone()]);
        let f2 = Frame::seeded(vec![y, x]);
        assert_eq!(f1.linkage(), f2.linkage());
        assert_eq!(f1, f2);
    }
}
