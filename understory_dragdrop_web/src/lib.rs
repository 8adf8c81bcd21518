// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dragdrop_web --heading-base-level=0

//! Browser adapter for Understory Drag and Drop.
//!
//! On `wasm32` this crate provides `WebDocument`, an implementation of
//! [`understory_dragdrop::Document`] over `web-sys`, and `DragDropWeb`, the
//! declarative surface: `drop_zone`, `drag_events` and `drag_zone` attach a
//! behavior to an element and return a `Binding` that detaches it when
//! dropped.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn wire(
//!     card: web_sys::Element,
//!     trash: web_sys::Element,
//! ) -> Result<(), wasm_bindgen::JsValue> {
//!     use understory_dragdrop::{DragZoneOptions, DropZoneOptions, GestureConfig};
//!     use understory_dragdrop_web::{DragDropWeb, VisualConfig};
//!
//!     let dnd: DragDropWeb<&'static str> =
//!         DragDropWeb::new(GestureConfig::default(), VisualConfig::default())?;
//!     dnd.drag_zone(card, "card 7", DragZoneOptions::new("cards")).forget();
//!     dnd.drop_zone(
//!         trash,
//!         "trash",
//!         DropZoneOptions::new()
//!             .accepts("cards")
//!             .with_drop(|_card, _pile| {}),
//!     )
//!     .forget();
//!     Ok(())
//! }
//! ```
//!
//! Notes:
//! - Events that arrive while the engine is handling another event are
//!   dropped; attachments and disposals requested from callbacks are queued
//!   instead (see [`Deferred`]).
//! - The proxy and overlay styles come from [`VisualConfig`].
//! - `tracing`: forward `tracing` events from the engine and log adapter
//!   failures (proxy creation, stale handles).

#![no_std]

extern crate alloc;

pub mod deferred;
pub mod visual;
#[cfg(target_arch = "wasm32")]
mod web;

pub use deferred::Deferred;
pub use visual::{Declarations, VisualConfig};
#[cfg(target_arch = "wasm32")]
pub use web::{
    Binding, DragDropWeb, Listening, Overlay, Proxy, ProxyTemplate, Timer, WebDocument,
    is_input_control,
};
