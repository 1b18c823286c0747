// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Points and connectors.
//!
//! A [`Point`] is the vertex identity a section is rooted at. A [`Connector`]
//! is an unconnected attachment slot: a link type plus a pole (polarity).
//! Which poles may mate is not a property of the connector; that relation
//! lives in the [`Dictionary`](crate::dictionary::Dictionary).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a point's dictionary name and its instance number.
pub const INSTANCE_SEPARATOR: char = '@';

/// A named anchor (graph vertex).
///
/// Dictionary points carry plain names ("A", "wall"). Every time a section is
/// drawn from the dictionary it gets a fresh instance point `name@N`, so two
/// uses of one dictionary entry are distinct vertices of the assembled graph.
/// The dictionary refuses names containing [`INSTANCE_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(String);

impl Point {
    /// Create a point from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The full name, including any instance suffix.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The dictionary name, with any instance suffix stripped.
    ///
    /// ```
    /// use sectionweave::section::Point;
    ///
    /// assert_eq!(Point::new("wall@12").base_name(), "wall");
    /// assert_eq!(Point::new("wall").base_name(), "wall");
    /// ```
    pub fn base_name(&self) -> &str {
        match self.0.rfind(INSTANCE_SEPARATOR) {
            Some(at) => &self.0[..at],
            None => &self.0,
        }
    }

    /// Create the `serial`-th instance of this point.
    pub fn instance(&self, serial: u64) -> Point {
        Point(format!("{}{}{}", self.base_name(), INSTANCE_SEPARATOR, serial))
    }

    /// True if this point was produced by [`Point::instance`].
    pub fn is_instance(&self) -> bool {
        self.0.contains(INSTANCE_SEPARATOR)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Point {
    fn from(name: &str) -> Self {
        Point::new(name)
    }
}

/// A typed, directional attachment slot.
///
/// Two connectors mate when their link types agree and the dictionary's pole
/// table pairs their poles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Connector {
    link_type: String,
    pole: String,
}

impl Connector {
    pub fn new(link_type: impl Into<String>, pole: impl Into<String>) -> Self {
        Self {
            link_type: link_type.into(),
            pole: pole.into(),
        }
    }

    pub fn link_type(&self) -> &str {
        &self.link_type
    }

    pub fn pole(&self) -> &str {
        &self.pole
    }

    /// The connector with the same link type and the given pole.
    pub fn with_pole(&self, pole: &str) -> Connector {
        Connector::new(self.link_type.clone(), pole)
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.link_type, self.pole)
    }
}
