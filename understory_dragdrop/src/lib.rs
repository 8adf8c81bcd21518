// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dragdrop --heading-base-level=0

//! Understory Drag and Drop: pointer-driven drag zones, drop zones, and event zones.
//!
//! This crate implements the behavior behind declarative drag and drop on a
//! document-like UI. Elements are marked as:
//!
//! - **drag sources** ("drag zones"): pressing and moving past a threshold
//!   starts a drag carrying application data on a named *channel*,
//! - **drop zones**: accept data from the channels they list and expose a
//!   drop action,
//! - **event zones**: passive observers of drags on one channel.
//!
//! The core consists of two parts:
//!
//! - a hit-testing model ([`zone`], [`registry`], [`draggable`]) that tracks
//!   zone geometry, intersects it with the pointer, and resolves the drop
//!   winner;
//! - a gesture state machine ([`gesture`], [`engine`]) that turns raw
//!   press/move/release events into a drag lifecycle with a proxy element,
//!   a capture overlay and a poll tick.
//!
//! The crate does not touch a real DOM. The host implements [`Document`]
//! (geometry probing, class toggling, hit lookup, and scoped resources for
//! listeners, proxy, overlay and timer) and routes pointer events into
//! [`DragDrop`].
//!
//! ## Zone state
//!
//! Each zone tracks `inside` (the pointer is within its box), `active`
//! (inside and not rejected by `dragEnter`) and `dirty` (changed since the
//! last style reconciliation). Drop zones reflect the state with the
//! [`class::DRAG_OVER`] and [`class::DROP_REJECTED`] classes.
//!
//! ## Drag pass
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_dragdrop::{
//!     ClassList, Draggable, DropZoneOptions, GeometryProbe, PointerButton, PointerEvent, Probe,
//!     Registry,
//! };
//!
//! struct Page;
//! impl GeometryProbe<u32> for Page {
//!     fn probe(&self, _: &u32) -> Probe {
//!         Probe::Visible(Rect::new(0.0, 0.0, 100.0, 100.0))
//!     }
//! }
//! impl ClassList<u32> for Page {
//!     fn set_class(&mut self, _: &u32, _: &str, _: bool) {}
//! }
//!
//! let mut registry: Registry<u32, &str> = Registry::new();
//! let zone = registry.add_drop_zone(1, "trash", DropZoneOptions::new().accepts("files"));
//! let mut drag: Draggable<u32, &str> = Draggable::new("files", "report.pdf", None, None);
//!
//! drag.drag(&mut registry, &mut Page, &PointerEvent::at(50.0, 50.0, PointerButton::Primary))
//!     .unwrap();
//! assert!(registry.zone(zone).unwrap().is_active());
//! assert!(!drag.drop_rejected(&registry).unwrap());
//! ```
//!
//! ## Gestures
//!
//! A press arms the source; a move farther than the drag distance (10 px by
//! default) starts the drag unless the move is over an input control;
//! release over the overlay drops; a move without the primary button
//! cancels. Only one gesture is in flight at a time. See [`engine`] for the
//! event routing table.
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to Kurbo.
//! - `tracing`: emit `tracing` events for registration and gesture transitions.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
pub mod document;
pub mod draggable;
pub mod engine;
mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod options;
pub mod registry;
pub mod zone;

pub use arena::{SourceId, ZoneId};
pub use document::Document;
pub use draggable::{Draggable, ElementTree};
pub use engine::DragDrop;
pub use error::DragDropError;
pub use event::{PointerButton, PointerEvent, ZoneEvent};
pub use geometry::{GeometryProbe, Probe, ZoneGeometry};
pub use gesture::{GestureState, Threshold};
pub use options::{
    DragEventsOptions, DragZoneOptions, DropZoneOptions, GestureConfig, ZoneCallbacks,
};
pub use registry::{Channel, Registry, ZoneSet};
pub use zone::{ClassList, DropCapability, Zone, ZoneFlags};

/// CSS classes applied by the engine.
pub mod class {
    /// Marker on drop zone elements; drop resolution looks for it.
    pub const DROP_ZONE: &str = "drop-zone";
    /// Marker on drag source elements.
    pub const DRAGGABLE: &str = "draggable";
    /// Second marker on drag source elements, naming the behavior.
    pub const DRAG_ZONE: &str = "drag-zone";
    /// On an active drop zone.
    pub const DRAG_OVER: &str = "drag-over";
    /// On a drop zone the pointer is inside but that rejected the drag, and
    /// on the overlay while the drop would be rejected.
    pub const DROP_REJECTED: &str = "drop-rejected";
    /// On the drag proxy.
    pub const DRAG_ELEMENT: &str = "drag-element";
    /// On the capture overlay.
    pub const DRAG_OVERLAY: &str = "drag-overlay";
}
