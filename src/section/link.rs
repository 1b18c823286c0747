// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Realized edges between two points.

use super::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An undirected edge, tagged with its link type.
///
/// The endpoints are stored in sorted order, so `Link::undirected(t, a, b)`
/// and `Link::undirected(t, b, a)` are the same value. A self-connection has
/// equal endpoints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    link_type: String,
    endpoints: (Point, Point),
}

impl Link {
    pub fn undirected(link_type: impl Into<String>, a: Point, b: Point) -> Self {
        let endpoints = if a <= b { (a, b) } else { (b, a) };
        Self {
            link_type: link_type.into(),
            endpoints,
        }
    }

    pub fn link_type(&self) -> &str {
        &self.link_type
    }

    pub fn endpoints(&self) -> (&Point, &Point) {
        (&self.endpoints.0, &self.endpoints.1)
    }

    /// True if this link joins `a` and `b`, in either direction.
    pub fn joins(&self, a: &Point, b: &Point) -> bool {
        (&self.endpoints.0 == a && &self.endpoints.1 == b)
            || (&self.endpoints.0 == b && &self.endpoints.1 == a)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.endpoints.0, self.link_type, self.endpoints.1
        )
    }
}
