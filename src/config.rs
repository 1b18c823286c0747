// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lexicon files.
//!
//! A lexicon describes one run: the pole table, the sections available,
//! the nucleation points and the search parameters. It is read from TOML,
//! or from JSON when the file name ends in `.json`.
//!
//! ```toml
//! nuclei = ["a"]
//!
//! [[poles]]
//! from = "+"
//! to = "-"
//! symmetric = true
//!
//! [[sections]]
//! point = "a"
//! connectors = [{ link_type = "S", pole = "+" }]
//!
//! [[sections]]
//! point = "b"
//! connectors = [{ link_type = "S", pole = "-" }]
//! weight = 2.0
//!
//! [parameters]
//! max_network_size = 6
//! ```

use crate::dictionary::{Dictionary, DEFAULT_WEIGHT};
use crate::error::Result;
use crate::params::Parameters;
use crate::section::{Connector, Point, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// A pole pairing. `symmetric` also adds the reverse pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolePair {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub symmetric: bool,
}

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionEntry {
    pub point: Point,
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lexicon {
    #[serde(default)]
    pub nuclei: Vec<Point>,
    #[serde(default)]
    pub poles: Vec<PolePair>,
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Lexicon {
    pub fn from_toml_str(text: &str) -> Result<Lexicon> {
        let lexicon: Lexicon = toml::from_str(text)?;
        lexicon.parameters.validate()?;
        Ok(lexicon)
    }

    pub fn from_json_str(text: &str) -> Result<Lexicon> {
        let lexicon: Lexicon = serde_json::from_str(text)?;
        lexicon.parameters.validate()?;
        Ok(lexicon)
    }

    /// Read a lexicon file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Lexicon> {
        let contents = std::fs::read_to_string(path)?;
        debug!("Loading lexicon {}", path.display());
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Build the dictionary: pole pairs first, then sections in file order.
    pub fn to_dictionary(&self) -> Result<Dictionary> {
        let mut dictionary = Dictionary::new();
        for pair in &self.poles {
            if pair.symmetric {
                dictionary.add_symmetric_pole_pair(&pair.from, &pair.to)?;
            } else {
                dictionary.add_pole_pair(&pair.from, &pair.to)?;
            }
        }
        for entry in &self.sections {
            let section = Section::from_connectors(entry.point.clone(), entry.connectors.iter().cloned());
            dictionary.add_weighted_to_lexis(section, entry.weight.unwrap_or(DEFAULT_WEIGHT))?;
        }
        debug!(
            "Dictionary: {} pole pairs, {} sections",
            dictionary.pole_pairs().len(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    pub fn nucleus_set(&self) -> BTreeSet<Point> {
        self.nuclei.iter().cloned().collect()
    }
}
