// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zones: regions that react to a moving pointer carrying drag data.
//!
//! A [`Zone`] is bound to one element and tracks whether the pointer is
//! inside its box (`inside`), whether it accepted the drag (`active`), and
//! whether either changed since the last style reconciliation (`dirty`).
//!
//! Drop zones are zones with a [`DropCapability`] attached: the set of
//! channels they accept and an optional drop action. Event zones have none
//! and only observe motion.
//!
//! ## Invariants
//!
//! - `active` implies `inside`.
//! - [`Zone::leave`] always ends with `inside == false && active == false`.
//! - `dirty` is set by every `enter`/`leave` and cleared only by
//!   [`Zone::update_styling`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_dragdrop::event::{PointerButton, PointerEvent};
//! use understory_dragdrop::geometry::{GeometryProbe, Probe};
//! use understory_dragdrop::options::ZoneCallbacks;
//! use understory_dragdrop::zone::Zone;
//!
//! struct Fixed;
//! impl GeometryProbe<u32> for Fixed {
//!     fn probe(&self, _: &u32) -> Probe {
//!         Probe::Visible(Rect::new(0.0, 0.0, 100.0, 100.0))
//!     }
//! }
//!
//! let mut zone: Zone<u32, ()> = Zone::event_zone(7, (), ZoneCallbacks::default());
//! zone.refresh(&Fixed);
//! zone.update(&PointerEvent::at(50.0, 50.0, PointerButton::Primary), &());
//! assert!(zone.is_inside() && zone.is_active() && zone.is_dirty());
//!
//! zone.update(&PointerEvent::at(200.0, 200.0, PointerButton::Primary), &());
//! assert!(!zone.is_inside() && !zone.is_active());
//! ```

use alloc::string::String;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::class;
use crate::event::{PointerEvent, ZoneEvent};
use crate::geometry::{GeometryProbe, ZoneGeometry};
use crate::options::{DropFn, ZoneCallbacks};

/// Receives class toggles for zone elements.
pub trait ClassList<E> {
    /// Add (`on == true`) or remove `class` on `element`.
    fn set_class(&mut self, element: &E, class: &str, on: bool);
}

bitflags::bitflags! {
    /// Zone state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ZoneFlags: u8 {
        /// The pointer is within the zone's box.
        const INSIDE = 0b0000_0001;
        /// The pointer is inside and `dragEnter` did not reject the drag.
        const ACTIVE = 0b0000_0010;
        /// `INSIDE`/`ACTIVE` changed since the last style reconciliation.
        const DIRTY  = 0b0000_0100;
    }
}

/// What makes a zone a drop zone.
pub struct DropCapability<D> {
    /// Channels the zone is registered under.
    pub accepts: SmallVec<[String; 1]>,
    /// Drop action, called with `(dragged, zone_data)`.
    pub action: Option<DropFn<D>>,
}

impl<D> fmt::Debug for DropCapability<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropCapability")
            .field("accepts", &self.accepts)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// A region bound to one element that reacts to the pointer during a drag.
pub struct Zone<E, D> {
    element: E,
    data: D,
    callbacks: ZoneCallbacks<E, D>,
    drop: Option<DropCapability<D>>,
    geometry: ZoneGeometry,
    flags: ZoneFlags,
}

impl<E: fmt::Debug, D: fmt::Debug> fmt::Debug for Zone<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("element", &self.element)
            .field("data", &self.data)
            .field("callbacks", &self.callbacks)
            .field("drop", &self.drop)
            .field("geometry", &self.geometry)
            .field("flags", &self.flags)
            .finish()
    }
}

impl<E, D> Zone<E, D> {
    /// A passive zone that only observes drag motion.
    pub fn event_zone(element: E, data: D, callbacks: ZoneCallbacks<E, D>) -> Self {
        Self {
            element,
            data,
            callbacks,
            drop: None,
            geometry: ZoneGeometry::default(),
            flags: ZoneFlags::empty(),
        }
    }

    /// A zone that accepts drops on the given channels.
    pub fn drop_zone(
        element: E,
        data: D,
        callbacks: ZoneCallbacks<E, D>,
        capability: DropCapability<D>,
    ) -> Self {
        Self {
            drop: Some(capability),
            ..Self::event_zone(element, data, callbacks)
        }
    }

    /// The bound element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The zone's application data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The drop capability, if this is a drop zone.
    pub fn drop_capability(&self) -> Option<&DropCapability<D>> {
        self.drop.as_ref()
    }

    /// Returns `true` for drop zones.
    pub fn is_drop_zone(&self) -> bool {
        self.drop.is_some()
    }

    /// Current geometry snapshot.
    pub fn geometry(&self) -> ZoneGeometry {
        self.geometry
    }

    /// Current state bits.
    pub fn flags(&self) -> ZoneFlags {
        self.flags
    }

    /// The pointer is within the zone's box.
    pub fn is_inside(&self) -> bool {
        self.flags.contains(ZoneFlags::INSIDE)
    }

    /// The pointer is inside and the drag was not rejected.
    pub fn is_active(&self) -> bool {
        self.flags.contains(ZoneFlags::ACTIVE)
    }

    /// State changed since the last [`Zone::update_styling`].
    pub fn is_dirty(&self) -> bool {
        self.flags.contains(ZoneFlags::DIRTY)
    }

    /// Re-probe the element's geometry.
    pub fn refresh(&mut self, probe: &impl GeometryProbe<E>) {
        self.geometry.apply(probe.probe(&self.element));
    }

    /// Inclusive hit test against the last geometry snapshot.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.geometry.contains(Point::new(x, y))
    }

    /// Evaluate one pointer sample: enter if newly inside (then `dragOver`),
    /// otherwise leave.
    pub fn update(&mut self, event: &PointerEvent, dragged: &D) {
        if self.contains(event.client.x, event.client.y) {
            if !self.is_inside() {
                self.enter(event, dragged);
            }
            if let Some(over) = self.callbacks.drag_over.as_mut() {
                let view = ZoneEvent {
                    pointer: event,
                    target: &self.element,
                };
                over(&view, dragged, &self.data);
            }
        } else {
            self.leave(Some(event));
        }
    }

    /// Mark the pointer as inside and ask `dragEnter` whether to accept.
    pub fn enter(&mut self, event: &PointerEvent, dragged: &D) {
        let accepted = match self.callbacks.drag_enter.as_mut() {
            Some(enter) => {
                let view = ZoneEvent {
                    pointer: event,
                    target: &self.element,
                };
                enter(&view, dragged, &self.data)
            }
            None => true,
        };
        self.flags.insert(ZoneFlags::INSIDE | ZoneFlags::DIRTY);
        self.flags.set(ZoneFlags::ACTIVE, accepted);
    }

    /// Reset to outside. `dragLeave` fires only if the pointer was inside.
    ///
    /// Always marks the zone dirty, even when it was already outside.
    pub fn leave(&mut self, event: Option<&PointerEvent>) {
        if self.is_inside() {
            if let Some(leave) = self.callbacks.drag_leave.as_mut() {
                let view = event.map(|pointer| ZoneEvent {
                    pointer,
                    target: &self.element,
                });
                leave(view.as_ref(), &self.data);
            }
        }
        self.flags.remove(ZoneFlags::INSIDE | ZoneFlags::ACTIVE);
        self.flags.insert(ZoneFlags::DIRTY);
    }

    /// Reconcile the `drag-over` and `drop-rejected` classes with the state.
    ///
    /// Does nothing to the element unless dirty; always clears the dirty bit.
    pub fn update_styling(&mut self, classes: &mut impl ClassList<E>) {
        if self.is_dirty() {
            let active = self.is_active();
            classes.set_class(&self.element, class::DRAG_OVER, active);
            classes.set_class(&self.element, class::DROP_REJECTED, self.is_inside() && !active);
        }
        self.flags.remove(ZoneFlags::DIRTY);
    }

    /// Run the drop action with the dragged data. Returns `false` when this
    /// zone has no drop action.
    pub fn accept_drop(&mut self, dragged: &D) -> bool {
        match self.drop.as_mut().and_then(|cap| cap.action.as_mut()) {
            Some(action) => {
                action(dragged, &self.data);
                true
            }
            None => false,
        }
    }
}
