// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document the engine drives: everything the gesture needs from the host UI.
//!
//! The engine never touches a concrete DOM. It asks a [`Document`] for
//! geometry, class changes, hit lookups, and the transient resources of a
//! gesture. Those resources are values with scoped release:
//!
//! - dropping a [`Document::Listeners`] removes the armed-phase listeners,
//! - dropping a [`Document::Proxy`] or [`Document::Overlay`] removes the
//!   element from the document,
//! - dropping a [`Document::Timer`] cancels the pending tick.
//!
//! The engine holds them for exactly as long as the gesture phase that needs
//! them, so every exit path (drop, cancel, source disposal, engine drop)
//! releases them.

use kurbo::Point;

use crate::arena::SourceId;
use crate::draggable::ElementTree;
use crate::geometry::GeometryProbe;
use crate::zone::ClassList;

/// Host document for elements of type `E`.
pub trait Document<E>: GeometryProbe<E> + ClassList<E> + ElementTree<E> {
    /// Proxy template; rendered instead of cloning the source element.
    type Template;
    /// Move/up/leave listeners on an armed source element.
    type Listeners;
    /// The element following the pointer during a drag.
    type Proxy;
    /// The full-viewport capture layer of a drag.
    type Overlay;
    /// A pending poll tick.
    type Timer;

    /// Topmost element at a viewport position.
    fn element_from_point(&self, at: Point) -> Option<E>;

    /// Buttons, inputs and textareas never start a drag.
    fn is_input_control(&self, element: &E) -> bool;

    /// Listen for move, up and leave on `element` and route them to
    /// `source`'s move and release handlers.
    fn arm(&mut self, source: SourceId, element: &E) -> Self::Listeners;

    /// Create the drag proxy: a render of `template`, or a clone of
    /// `element` sized to its computed box.
    fn create_proxy(&mut self, element: &E, template: Option<&Self::Template>) -> Self::Proxy;

    /// Place the proxy at a viewport position.
    fn move_proxy(&mut self, proxy: &Self::Proxy, at: Point);

    /// Create the capture overlay and route its move and up events to
    /// `source`'s overlay handlers.
    fn create_overlay(&mut self, source: SourceId) -> Self::Overlay;

    /// Switch the overlay between the normal and the rejected look.
    fn set_overlay_rejected(&mut self, overlay: &Self::Overlay, rejected: bool);

    /// Arrange for `source`'s tick handler to run once after `interval_ms`.
    fn schedule_tick(&mut self, source: SourceId, interval_ms: u32) -> Self::Timer;

    /// Install (`true`) or remove (`false`) the document-level text
    /// selection suppression. Must be idempotent.
    fn suppress_selection(&mut self, on: bool);
}
