// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for aggregation setup.
//!
//! Only configuration problems are errors. Search dead-ends (a connector
//! with no joints, an odometer with no wheels, a policy with no more
//! candidates) are ordinary `Option`/`bool` results inside the engine, and
//! bookkeeping inconsistencies are panics.

use thiserror::Error;

/// Errors that can occur while setting up an aggregation run.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A pole pair names an empty pole.
    #[error("malformed pole pair ({from:?}, {to:?}): poles must be non-empty")]
    MalformedPolePair { from: String, to: String },

    /// A section is rooted at a point with an empty name.
    #[error("section has an empty point name")]
    EmptyPoint,

    /// Dictionary point names may not contain the instance separator.
    #[error("point name {0:?} contains the reserved instance separator '@'")]
    ReservedSeparator(String),

    /// A connector has an empty link type or pole.
    #[error("section {point} has a malformed connector at offset {offset}")]
    MalformedConnector { point: String, offset: usize },

    /// Dictionary entries must consist of open connectors only.
    #[error("lexis entry {point} already carries a link at offset {offset}")]
    LinkInLexis { point: String, offset: usize },

    /// Selection weights must be finite and non-negative.
    #[error("invalid weight {weight} for section {point}")]
    InvalidWeight { point: String, weight: f64 },

    /// A nucleation point has no sections rooted at it.
    #[error("no sections are rooted at nucleation point {0}")]
    NoRootSections(String),

    /// Aggregation needs at least one nucleation point.
    #[error("no nucleation points given")]
    NoNuclei,

    /// A parameter is outside its allowed range.
    #[error("parameter {name} out of range: {detail}")]
    InvalidParameter { name: &'static str, detail: String },

    /// A lexicon file could not be read.
    #[error("cannot read lexicon: {0}")]
    Io(#[from] std::io::Error),

    /// A lexicon file could not be parsed.
    #[error("cannot parse lexicon: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for AggregateError {
    fn from(e: toml::de::Error) -> Self {
        AggregateError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for AggregateError {
    fn from(e: serde_json::Error) -> Self {
        AggregateError::Parse(e.to_string())
    }
}

/// Result type for aggregation setup.
pub type Result<T> = std::result::Result<T, AggregateError>;
