// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed configuration for the three zone kinds and the gesture engine.
//!
//! Each behavior kind has one options struct. Callbacks are optional and
//! boxed; an absent callback is `None`, never a missing field.
//!
//! ```
//! use understory_dragdrop::options::{DropZoneOptions, DragZoneOptions};
//!
//! let zone: DropZoneOptions<u32, &'static str> = DropZoneOptions::new()
//!     .accepts("cards")
//!     .with_drag_enter(|_event, dragged, _zone| *dragged != "locked")
//!     .with_drop(|dragged, zone| {
//!         let _ = (dragged, zone);
//!     });
//! assert_eq!(zone.channels().as_slice(), &["cards"]);
//!
//! let source: DragZoneOptions<u32, &'static str, ()> = DragZoneOptions::new("cards");
//! assert_eq!(source.drag_distance, 10.0);
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use smallvec::SmallVec;

use crate::event::{PointerEvent, ZoneEvent};

/// Distance the pointer must travel from the press point before a drag
/// starts, in device-independent pixels.
pub const DEFAULT_DRAG_DISTANCE: f64 = 10.0;

/// Interval of the geometry re-evaluation tick while dragging.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 250;

/// `dragEnter(event, dragged, zone_data)`; returning `false` rejects the drag.
pub type DragEnterFn<E, D> = Box<dyn FnMut(&ZoneEvent<'_, E>, &D, &D) -> bool>;
/// `dragOver(event, dragged, zone_data)`; runs on every pass while inside.
pub type DragOverFn<E, D> = Box<dyn FnMut(&ZoneEvent<'_, E>, &D, &D)>;
/// `dragLeave(event, zone_data)`; the event is absent when a zone is disposed.
pub type DragLeaveFn<E, D> = Box<dyn FnMut(Option<&ZoneEvent<'_, E>>, &D)>;
/// `drop(dragged, zone_data)`.
pub type DropFn<D> = Box<dyn FnMut(&D, &D)>;
/// `dragStart(dragged, press_event)`; returning `false` aborts the gesture.
pub type DragStartFn<D> = Box<dyn FnMut(&D, &PointerEvent) -> bool>;
/// `dragEnd(dragged, event, element_under_pointer)`.
pub type DragEndFn<E, D> = Box<dyn FnMut(&D, &PointerEvent, Option<&E>)>;

/// Motion callbacks shared by drop zones and event zones.
pub struct ZoneCallbacks<E, D> {
    /// Called when the pointer enters the zone.
    pub drag_enter: Option<DragEnterFn<E, D>>,
    /// Called on every pass while the pointer is inside.
    pub drag_over: Option<DragOverFn<E, D>>,
    /// Called when the pointer leaves the zone.
    pub drag_leave: Option<DragLeaveFn<E, D>>,
}

impl<E, D> Default for ZoneCallbacks<E, D> {
    fn default() -> Self {
        Self {
            drag_enter: None,
            drag_over: None,
            drag_leave: None,
        }
    }
}

impl<E, D> fmt::Debug for ZoneCallbacks<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneCallbacks")
            .field("drag_enter", &self.drag_enter.is_some())
            .field("drag_over", &self.drag_over.is_some())
            .field("drag_leave", &self.drag_leave.is_some())
            .finish()
    }
}

macro_rules! callback_builders {
    () => {
        /// Set the `dragEnter` callback.
        #[must_use]
        pub fn with_drag_enter(
            mut self,
            f: impl FnMut(&ZoneEvent<'_, E>, &D, &D) -> bool + 'static,
        ) -> Self {
            self.callbacks.drag_enter = Some(Box::new(f));
            self
        }

        /// Set the `dragOver` callback.
        #[must_use]
        pub fn with_drag_over(mut self, f: impl FnMut(&ZoneEvent<'_, E>, &D, &D) + 'static) -> Self {
            self.callbacks.drag_over = Some(Box::new(f));
            self
        }

        /// Set the `dragLeave` callback.
        #[must_use]
        pub fn with_drag_leave(
            mut self,
            f: impl FnMut(Option<&ZoneEvent<'_, E>>, &D) + 'static,
        ) -> Self {
            self.callbacks.drag_leave = Some(Box::new(f));
            self
        }
    };
}

/// Options of a drop zone.
pub struct DropZoneOptions<E, D> {
    /// Channels this zone accepts drags from.
    pub accepts: SmallVec<[String; 1]>,
    /// Single-channel form, used only when `accepts` is empty.
    #[deprecated(note = "use `accepts`")]
    pub name: Option<String>,
    /// Motion callbacks.
    pub callbacks: ZoneCallbacks<E, D>,
    /// Called when a drag is released over this zone while it is active.
    pub drop: Option<DropFn<D>>,
}

#[allow(deprecated, reason = "the deprecated field still needs initializing")]
impl<E, D> Default for DropZoneOptions<E, D> {
    fn default() -> Self {
        Self {
            accepts: SmallVec::new(),
            name: None,
            callbacks: ZoneCallbacks::default(),
            drop: None,
        }
    }
}

impl<E, D> DropZoneOptions<E, D> {
    /// Options with no channels and no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept drags on one more channel.
    #[must_use]
    pub fn accepts(mut self, name: impl Into<String>) -> Self {
        self.accepts.push(name.into());
        self
    }

    /// Set the drop action.
    #[must_use]
    pub fn with_drop(mut self, f: impl FnMut(&D, &D) + 'static) -> Self {
        self.drop = Some(Box::new(f));
        self
    }

    callback_builders!();

    /// The channels the zone is registered under: `accepts`, or the
    /// deprecated `name` when `accepts` is empty. Duplicates are dropped.
    #[allow(deprecated, reason = "fallback for the single-channel form")]
    pub fn channels(&self) -> SmallVec<[String; 1]> {
        let mut out: SmallVec<[String; 1]> = SmallVec::new();
        if self.accepts.is_empty() {
            if let Some(name) = &self.name {
                out.push(name.clone());
            }
        } else {
            for name in &self.accepts {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
        }
        out
    }
}

impl<E, D> fmt::Debug for DropZoneOptions<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropZoneOptions")
            .field("accepts", &self.accepts)
            .field("callbacks", &self.callbacks)
            .field("drop", &self.drop.is_some())
            .finish_non_exhaustive()
    }
}

/// Options of an event zone: a passive observer of drags on one channel.
pub struct DragEventsOptions<E, D> {
    /// Channel to observe.
    pub name: String,
    /// Zone data; the binding context's data is used when absent.
    pub data: Option<D>,
    /// Motion callbacks.
    pub callbacks: ZoneCallbacks<E, D>,
}

impl<E, D> DragEventsOptions<E, D> {
    /// Observe drags on `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            callbacks: ZoneCallbacks::default(),
        }
    }

    /// Set explicit zone data.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    callback_builders!();
}

impl<E, D: fmt::Debug> fmt::Debug for DragEventsOptions<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEventsOptions")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

/// Options of a drag source ("drag zone").
///
/// `T` is the document's proxy template type; when no template is given
/// the source element is cloned for the proxy.
pub struct DragZoneOptions<E, D, T> {
    /// Channel the dragged data travels on.
    pub name: String,
    /// Dragged data; the binding context's data is used when absent.
    pub data: Option<D>,
    /// Threshold distance before a press turns into a drag.
    pub drag_distance: f64,
    /// Called when the threshold is crossed; `false` aborts.
    pub drag_start: Option<DragStartFn<D>>,
    /// Called when the gesture ends, by drop or by cancellation.
    pub drag_end: Option<DragEndFn<E, D>>,
    /// Template rendered for the proxy instead of a clone.
    pub template: Option<T>,
}

impl<E, D, T> DragZoneOptions<E, D, T> {
    /// Drag on channel `name` with the default threshold.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            drag_distance: DEFAULT_DRAG_DISTANCE,
            drag_start: None,
            drag_end: None,
            template: None,
        }
    }

    /// Set explicit dragged data.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the threshold distance. Non-positive values fall back to the default.
    #[must_use]
    pub fn with_drag_distance(mut self, distance: f64) -> Self {
        self.drag_distance = if distance > 0.0 {
            distance
        } else {
            DEFAULT_DRAG_DISTANCE
        };
        self
    }

    /// Set the `dragStart` callback.
    #[must_use]
    pub fn with_drag_start(mut self, f: impl FnMut(&D, &PointerEvent) -> bool + 'static) -> Self {
        self.drag_start = Some(Box::new(f));
        self
    }

    /// Set the `dragEnd` callback.
    #[must_use]
    pub fn with_drag_end(
        mut self,
        f: impl FnMut(&D, &PointerEvent, Option<&E>) + 'static,
    ) -> Self {
        self.drag_end = Some(Box::new(f));
        self
    }

    /// Render `template` for the proxy instead of cloning the source.
    #[must_use]
    pub fn with_template(mut self, template: T) -> Self {
        self.template = Some(template);
        self
    }
}

impl<E, D: fmt::Debug, T> fmt::Debug for DragZoneOptions<E, D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragZoneOptions")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("drag_distance", &self.drag_distance)
            .field("drag_start", &self.drag_start.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .field("template", &self.template.is_some())
            .finish()
    }
}

/// Engine-wide tunables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Milliseconds between re-evaluation ticks while dragging.
    pub poll_interval_ms: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
