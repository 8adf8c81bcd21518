// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline styles of the drag proxy and the capture overlay.

use alloc::format;
use alloc::string::String;

use kurbo::Point;
use smallvec::{SmallVec, smallvec};

/// CSS `(property, value)` pairs applied one by one to an element's inline style.
pub type Declarations = SmallVec<[(&'static str, String); 8]>;

/// Look of the elements the adapter inserts while dragging.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisualConfig {
    /// Opacity of a cloned proxy. Template proxies are left as rendered.
    pub proxy_opacity: f64,
    /// Stacking order of the proxy; kept below the overlay.
    pub proxy_z_index: i32,
    /// Stacking order of the capture overlay.
    pub overlay_z_index: i32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            proxy_opacity: 0.7,
            proxy_z_index: 9998,
            overlay_z_index: 9999,
        }
    }
}

impl VisualConfig {
    /// Fixed positioning shared by every proxy.
    pub fn proxy_base(&self) -> Declarations {
        smallvec![
            ("position", String::from("fixed")),
            ("z-index", format!("{}", self.proxy_z_index)),
        ]
    }

    /// Size a cloned proxy like its source (computed `width`/`height`) and
    /// fade it.
    pub fn clone_sizing(&self, width: String, height: String) -> Declarations {
        smallvec![
            ("width", width),
            ("height", height),
            ("opacity", format!("{}", self.proxy_opacity)),
        ]
    }

    /// Place the proxy's top-left corner at a viewport position.
    pub fn proxy_at(at: Point) -> Declarations {
        smallvec![("top", format!("{}px", at.y)), ("left", format!("{}px", at.x))]
    }

    /// A transparent layer over the whole viewport that takes every pointer
    /// event and never starts a text selection.
    pub fn overlay(&self) -> Declarations {
        smallvec![
            ("z-index", format!("{}", self.overlay_z_index)),
            ("position", String::from("fixed")),
            ("top", String::from("0")),
            ("left", String::from("0")),
            ("right", String::from("0")),
            ("bottom", String::from("0")),
            ("background-color", String::from("#fff")),
            ("opacity", String::from("0")),
            ("cursor", String::from(Self::overlay_cursor(false))),
            ("-webkit-user-select", String::from("none")),
            ("user-select", String::from("none")),
        ]
    }

    /// Overlay cursor for the current rejection status.
    pub fn overlay_cursor(rejected: bool) -> &'static str {
        if rejected { "no-drop" } else { "move" }
    }
}
