// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable controller: runs the drag passes of one in-flight drag.
//!
//! ## Usage
//!
//! 1) [`Draggable::start_drag`] once the gesture crosses its threshold; bail
//!    out if it returns `false`.
//! 2) [`Draggable::drag`] on every pointer move and poll tick.
//! 3) [`Draggable::drop`] on release, or [`Draggable::cancel_drag`] when the
//!    gesture is aborted.
//!
//! Every pass re-probes all zones of the channel; nothing is cached between
//! passes.

use alloc::string::String;
use core::fmt;

use crate::arena::ZoneId;
use crate::class;
use crate::error::DragDropError;
use crate::event::PointerEvent;
use crate::geometry::GeometryProbe;
use crate::options::{DragEndFn, DragStartFn};
use crate::registry::{Registry, ZoneSet};
use crate::zone::ClassList;

/// Walks from an element to its ancestors.
pub trait ElementTree<E> {
    /// Nearest ancestor-or-self of `element` carrying `class`.
    fn closest(&self, element: &E, class: &str) -> Option<E>;
}

/// The dragged side of one channel: its payload and terminal callbacks.
pub struct Draggable<E, D> {
    name: String,
    data: D,
    drag_start: Option<DragStartFn<D>>,
    drag_end: Option<DragEndFn<E, D>>,
}

impl<E, D: fmt::Debug> fmt::Debug for Draggable<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draggable")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("drag_start", &self.drag_start.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .finish()
    }
}

impl<E, D> Draggable<E, D> {
    /// Drag `data` on channel `name`.
    pub fn new(
        name: impl Into<String>,
        data: D,
        drag_start: Option<DragStartFn<D>>,
        drag_end: Option<DragEndFn<E, D>>,
    ) -> Self {
        Self {
            name: name.into(),
            data,
            drag_start,
            drag_end,
        }
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dragged data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Run `dragStart`. Returns `false` only when the callback returned `false`.
    pub fn start_drag(&mut self, event: &PointerEvent) -> bool {
        match self.drag_start.as_mut() {
            Some(start) => start(&self.data, event),
            None => true,
        }
    }

    /// One drag pass: refresh geometry, update every zone, restyle drop zones.
    pub fn drag<H>(
        &mut self,
        registry: &mut Registry<E, D>,
        host: &mut H,
        event: &PointerEvent,
    ) -> Result<(), DragDropError>
    where
        H: GeometryProbe<E> + ClassList<E>,
    {
        let data = &self.data;
        registry.for_each_mut(&self.name, ZoneSet::All, |_, zone| zone.refresh(&*host))?;
        registry.for_each_mut(&self.name, ZoneSet::All, |_, zone| zone.update(event, data))?;
        registry.for_each_mut(&self.name, ZoneSet::Drop, |_, zone| {
            zone.update_styling(&mut *host);
        })
    }

    /// The pointer is inside some drop zone, and none of those it is inside
    /// accepted the drag.
    pub fn drop_rejected(&self, registry: &Registry<E, D>) -> Result<bool, DragDropError> {
        let mut inside_any = false;
        for (_, zone) in registry.drop_zones(&self.name)? {
            if zone.is_active() {
                return Ok(false);
            }
            inside_any |= zone.is_inside();
        }
        Ok(inside_any)
    }

    /// Abort: run `dragEnd` without a target. Zones are left untouched.
    pub fn cancel_drag(&mut self, event: &PointerEvent) {
        if let Some(end) = self.drag_end.as_mut() {
            end(&self.data, event, None);
        }
    }

    /// Resolve the release.
    ///
    /// The winner is the first active drop zone whose element is the nearest
    /// `drop-zone` ancestor-or-self of `target`. All zones are forced out and
    /// restyled, `dragEnd` runs, and only then the winner's drop action.
    /// Returns the winning zone, if any.
    pub fn drop<H>(
        &mut self,
        registry: &mut Registry<E, D>,
        host: &mut H,
        event: &PointerEvent,
        target: Option<&E>,
    ) -> Result<Option<ZoneId>, DragDropError>
    where
        E: PartialEq,
        H: ClassList<E> + ElementTree<E>,
    {
        let drop_zone_element = target.and_then(|t| host.closest(t, class::DROP_ZONE));
        let winner = match &drop_zone_element {
            Some(element) => registry
                .drop_zones(&self.name)?
                .find(|(_, zone)| zone.is_active() && zone.element() == element)
                .map(|(id, _)| id),
            None => {
                // Still surfaces an unknown channel.
                registry.channel(&self.name)?;
                None
            }
        };

        registry.for_each_mut(&self.name, ZoneSet::All, |_, zone| zone.leave(Some(event)))?;
        registry.for_each_mut(&self.name, ZoneSet::Drop, |_, zone| {
            zone.update_styling(&mut *host);
        })?;

        if let Some(end) = self.drag_end.as_mut() {
            end(&self.data, event, target);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(channel = %self.name, ?winner, "drop resolved");

        if let Some(id) = winner {
            if let Some(zone) = registry.zone_mut(id) {
                zone.accept_drop(&self.data);
            }
        }
        Ok(winner)
    }
}
