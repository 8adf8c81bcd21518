// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry probing: snapshot an element's box in viewport coordinates.

use kurbo::{Point, Rect};

/// Result of probing one element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Probe {
    /// The element is not laid out (`display: none`).
    Hidden,
    /// Viewport-relative box: origin from the bounding rectangle, size from
    /// the layout box.
    Visible(Rect),
}

/// Reads an element's current geometry.
///
/// Implementations must query the live document on every call; zones refresh
/// their snapshot on each drag pass because layout may change between polls.
pub trait GeometryProbe<E> {
    /// Probe `element`.
    fn probe(&self, element: &E) -> Probe;
}

/// A zone's geometry snapshot.
///
/// A fresh snapshot is hidden: nothing is inside a zone that was never probed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoneGeometry {
    /// Last visible box. Left stale while the element is hidden.
    pub rect: Rect,
    /// Whether the element was hidden at the last probe.
    pub hidden: bool,
}

impl Default for ZoneGeometry {
    fn default() -> Self {
        Self {
            rect: Rect::ZERO,
            hidden: true,
        }
    }
}

impl ZoneGeometry {
    /// Apply a probe result.
    pub fn apply(&mut self, probe: Probe) {
        match probe {
            Probe::Hidden => self.hidden = true,
            Probe::Visible(rect) => {
                self.rect = rect;
                self.hidden = false;
            }
        }
    }

    /// Inclusive containment test: boundary pixels count as inside.
    pub fn contains(&self, p: Point) -> bool {
        if self.hidden {
            return false;
        }
        let r = self.rect;
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    }
}
