// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Weighted random selection.
//!
//! Each wheel draws without replacement from a pool fixed on its first
//! call: the compatible open sections, and the dictionary entries exposing
//! the mate connector. Open joins are preferred with probability
//! `join_existing`; dictionary entries are drawn in proportion to their
//! weights. The generator is owned by the policy and seeded from the
//! parameters, so a seeded run is reproducible.

use super::{open_candidates, Budget, LinkStyle, RootSet, SelectionPolicy, WheelKey, WheelScopes};
use crate::collect::SolutionCollector;
use crate::dictionary::Dictionary;
use crate::engine::odometer::Odometer;
use crate::error::Result;
use crate::params::Parameters;
use crate::section::{Connector, Link, Point, Section};
use crate::state::{Frame, Linkage};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::trace;

/// Candidates not yet drawn for one wheel.
#[derive(Debug, Clone)]
struct Pool {
    open: Vec<Rc<Section>>,
    lexis: Vec<Rc<Section>>,
}

#[derive(Debug, Clone)]
pub struct RandomPolicy {
    dictionary: Dictionary,
    budget: Budget,
    style: LinkStyle,
    roots: Option<RootSet>,
    pools: WheelScopes<Pool>,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(dictionary: Dictionary, params: Parameters) -> Result<Self> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(RandomPolicy {
            dictionary,
            budget: Budget::new(params)?,
            style: LinkStyle::new(),
            roots: None,
            pools: WheelScopes::new(),
            rng,
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

    /// Index drawn in proportion to the dictionary weights of `sections`,
    /// or `None` if every weight is zero.
    fn draw_weighted(&mut self, sections: &[Rc<Section>]) -> Option<usize> {
        let weights: Vec<f64> = sections.iter().map(|s| self.dictionary.weight(s)).collect();
        WeightedIndex::new(&weights)
            .ok()
            .map(|dist| dist.sample(&mut self.rng))
    }
}

impl SelectionPolicy for RandomPolicy {
    fn root_set(&mut self, nuclei: &BTreeSet<Point>) -> Result<()> {
        self.roots = Some(RootSet::new(&self.dictionary, nuclei)?);
        Ok(())
    }

    /// One weighted draw per nucleus, until the budget is spent.
    fn next_root(&mut self) -> Vec<Rc<Section>> {
        if self.budget.is_spent() {
            return Vec::new();
        }
        let Some(roots) = self.roots.take() else {
            return Vec::new();
        };
        let mut picks = Vec::new();
        for (_, entries) in roots.nuclei() {
            let i = match self.draw_weighted(entries) {
                Some(i) => i,
                None => self.rng.gen_range(0..entries.len()),
            };
            picks.push(entries[i].clone());
        }
        self.roots = Some(roots);

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
        let mut pool = match self.pools.get(&key) {
            Some(pool) => pool.clone(),
            None => Pool {
                open: open_candidates(frame, from, offset, to_connector, self.budget.params(), &self.style),
                lexis: self.dictionary.connectables(to_connector).to_vec(),
            },
        };
        let can_grow = self.budget.can_grow(frame);
        let join_existing = self.budget.params().join_existing;

        let chosen = loop {
            let has_open = !pool.open.is_empty();
            let has_lexis = can_grow && !pool.lexis.is_empty();
            let join = match (has_open, has_lexis) {
                (false, false) => break None,
                (true, false) => true,
                (false, true) => false,
                (true, true) => self.rng.gen_bool(join_existing),
            };
            if join {
                let i = self.rng.gen_range(0..pool.open.len());
                break Some(pool.open.remove(i));
            }
            match self.draw_weighted(&pool.lexis) {
                Some(i) => {
                    let entry = pool.lexis.remove(i);
                    break Some(self.style.make_instance(&entry));
                }
                // only zero-weight entries are left
                None => pool.lexis.clear(),
            }
        };
        self.pools.insert(key, pool);

        match &chosen {
            Some(to) => trace!("Draw {} [{}] {} -> {}", from.point(), offset, to_connector, to),
            None => trace!("Draw {} [{}] {}: exhausted", from.point(), offset, to_connector),
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
        self.pools.push(self.style.serial());
    }

    fn pop_frame(&mut self, _frame: &Frame) {
        let serial = self.pools.pop();
        self.style.rewind_serial(serial);
    }

    fn push_odometer(&mut self, _odometer: &Odometer) {
        self.pools.enter_odometer();
    }

    fn pop_odometer(&mut self, _odometer: &Odometer) {
        self.pools.leave_odometer();
    }

    fn step(&mut self, frame: &Frame, depth: usize) -> bool {
        self.budget.admit_step(frame, depth)
    }

    fn solution(&mut self, frame: &Frame) {
        self.budget.record(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sect(point: &str, cons: &[(&str, &str)]) -> Section {
        Section::from_connectors(
            Point::new(point),
            cons.iter().map(|(t, p)| Connector::new(*t, *p)),
        )
    }

    fn policy(seed: u64) -> RandomPolicy {
        let mut dict = Dictionary::new();
        dict.add_symmetric_pole_pair("+", "-").unwrap();
        dict.add_to_lexis(sect("a", &[("S", "+")])).unwrap();
        dict.add_weighted_to_lexis(sect("b", &[("S", "-")]), 3.0).unwrap();
        dict.add_weighted_to_lexis(sect("c", &[("S", "-")]), 1.0).unwrap();
        dict.add_weighted_to_lexis(sect("z", &[("S", "-")]), 0.0).unwrap();
        let params = Parameters {
            seed: Some(seed),
            ..Parameters::default()
        };
        RandomPolicy::new(dict, params).unwrap()
    }

    fn draw_all(p: &mut RandomPolicy) -> Vec<String> {
        let a = Rc::new(sect("a@0", &[("S", "+")]));
        let frame = Frame::seeded(vec![a.clone()]);
        let minus = Connector::new("S", "-");
        let mut names = Vec::new();
        while let Some(to) = p.select(&frame, &a, 0, &minus) {
            names.push(to.point().base_name().to_string());
        }
        names
    }

    #[test]
    fn test_draws_without_replacement() {
        let mut p = policy(1);
        let mut names = draw_all(&mut p);
        names.sort();
        // the zero-weight entry is never drawn
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let first = draw_all(&mut policy(42));
        let second = draw_all(&mut policy(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_roots_drawn_until_budget_spent() {
        let mut p = policy(3);
        p.root_set(&BTreeSet::from([Point::new("b")])).unwrap();
        let roots = p.next_root();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].point(), &Point::new("b@0"));
        // no solutions and no steps yet: another root is offered
        assert_eq!(p.next_root().len(), 1);
    }
}
