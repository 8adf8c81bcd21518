// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag and drop engine: zones, drag sources, and the one gesture in flight.
//!
//! [`DragDrop`] owns the [`Registry`] and every drag source. The host routes
//! raw pointer events to it:
//!
//! | Host event                          | Engine call                   |
//! |-------------------------------------|-------------------------------|
//! | `mousedown` on a source element     | [`DragDrop::press`]           |
//! | `mousemove` on an armed source      | [`DragDrop::source_move`]     |
//! | `mouseup`/`mouseleave` while armed  | [`DragDrop::source_release`]  |
//! | `mousemove` on the overlay          | [`DragDrop::overlay_move`]    |
//! | `mouseup` on the overlay            | [`DragDrop::overlay_release`] |
//! | a scheduled tick firing             | [`DragDrop::tick`]            |
//!
//! At most one gesture is armed or dragging at a time; a press while another
//! gesture is in flight fails with [`DragDropError::GestureInFlight`].

use core::fmt;
use core::mem;

use crate::arena::{Arena, SourceId, ZoneId};
use crate::class;
use crate::document::Document;
use crate::draggable::Draggable;
use crate::error::DragDropError;
use crate::event::PointerEvent;
use crate::gesture::{GestureState, Phase, Session, Threshold};
use crate::options::{DragEventsOptions, DragZoneOptions, DropZoneOptions, GestureConfig};
use crate::registry::Registry;

type SourcePhase<E, H> = Phase<
    <H as Document<E>>::Listeners,
    <H as Document<E>>::Proxy,
    <H as Document<E>>::Overlay,
    <H as Document<E>>::Timer,
>;

type SourceSession<E, H> =
    Session<<H as Document<E>>::Proxy, <H as Document<E>>::Overlay, <H as Document<E>>::Timer>;

struct DragSource<E, D, H: Document<E>> {
    element: E,
    draggable: Draggable<E, D>,
    drag_distance: f64,
    template: Option<H::Template>,
    phase: SourcePhase<E, H>,
}

/// Drag and drop engine over a host document `H` with elements `E` and
/// application data `D`.
pub struct DragDrop<E, D, H: Document<E>> {
    registry: Registry<E, D>,
    sources: Arena<DragSource<E, D, H>>,
    in_flight: Option<SourceId>,
    config: GestureConfig,
}

impl<E, D, H: Document<E>> fmt::Debug for DragDrop<E, D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDrop")
            .field("registry", &self.registry)
            .field("sources", &self.sources.len())
            .field("in_flight", &self.in_flight)
            .field("config", &self.config)
            .finish()
    }
}

impl<E, D, H: Document<E>> Default for DragDrop<E, D, H> {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl<E, D, H: Document<E>> DragDrop<E, D, H> {
    /// An engine with no zones and no sources.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            registry: Registry::new(),
            sources: Arena::default(),
            in_flight: None,
            config,
        }
    }

    /// The zone registry.
    pub fn registry(&self) -> &Registry<E, D> {
        &self.registry
    }

    /// The zone registry, mutably.
    pub fn registry_mut(&mut self) -> &mut Registry<E, D> {
        &mut self.registry
    }

    /// Engine tunables.
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// The source whose gesture is armed or dragging.
    pub fn in_flight(&self) -> Option<SourceId> {
        self.in_flight
    }

    /// Phase of a source, or `None` for a stale handle.
    pub fn state(&self, id: SourceId) -> Option<GestureState> {
        self.sources.get(id).map(|s| s.phase.state())
    }

    /// Attach drop-zone behavior to `element`. `context` becomes the zone data.
    pub fn add_drop_zone(
        &mut self,
        host: &mut H,
        element: E,
        context: D,
        options: DropZoneOptions<E, D>,
    ) -> ZoneId {
        host.set_class(&element, class::DROP_ZONE, true);
        self.registry.add_drop_zone(element, context, options)
    }

    /// Attach drag-events behavior to `element`.
    pub fn add_event_zone(
        &mut self,
        element: E,
        context: D,
        options: DragEventsOptions<E, D>,
    ) -> ZoneId {
        self.registry.add_event_zone(element, context, options)
    }

    /// Detach a drop or event zone.
    ///
    /// A drop zone's element loses its `drop-zone` marker and any
    /// `drag-over`/`drop-rejected` state, so a later drop resolves past it.
    pub fn remove_zone(&mut self, host: &mut H, id: ZoneId) -> Result<(), DragDropError> {
        let zone = self.registry.remove(id)?;
        if zone.is_drop_zone() {
            let element = zone.element();
            host.set_class(element, class::DROP_ZONE, false);
            host.set_class(element, class::DRAG_OVER, false);
            host.set_class(element, class::DROP_REJECTED, false);
        }
        Ok(())
    }

    /// Attach drag-zone behavior to `element`. `context` is the dragged data
    /// unless the options carry their own.
    pub fn add_drag_source(
        &mut self,
        host: &mut H,
        element: E,
        context: D,
        options: DragZoneOptions<E, D, H::Template>,
    ) -> SourceId {
        self.registry.ensure_channel(&options.name);
        host.set_class(&element, class::DRAG_ZONE, true);
        host.set_class(&element, class::DRAGGABLE, true);
        let data = options.data.unwrap_or(context);
        let draggable = Draggable::new(options.name, data, options.drag_start, options.drag_end);
        let id = self.sources.insert(DragSource {
            element,
            draggable,
            drag_distance: options.drag_distance,
            template: options.template,
            phase: Phase::Idle,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, "drag source registered");
        id
    }

    /// Detach a drag source. A gesture it owns is torn down; a drag in
    /// progress is reported to `dragEnd` as cancelled.
    pub fn remove_drag_source(&mut self, host: &mut H, id: SourceId) -> Result<(), DragDropError> {
        let mut source = self
            .sources
            .remove(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        if self.in_flight == Some(id) {
            self.in_flight = None;
            host.suppress_selection(false);
        }
        if let Phase::Dragging(session) = mem::replace(&mut source.phase, Phase::Idle) {
            let last = session.release();
            source.draggable.cancel_drag(&last);
        }
        host.set_class(&source.element, class::DRAG_ZONE, false);
        host.set_class(&source.element, class::DRAGGABLE, false);
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, "drag source removed");
        Ok(())
    }

    /// Primary-button press on a source element: Idle → Armed.
    ///
    /// Other buttons are ignored. Fails while another gesture is in flight.
    pub fn press(
        &mut self,
        host: &mut H,
        id: SourceId,
        event: &PointerEvent,
    ) -> Result<GestureState, DragDropError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        if !event.is_primary() {
            return Ok(source.phase.state());
        }
        if let Some(owner) = self.in_flight {
            return Err(DragDropError::GestureInFlight { owner });
        }

        host.suppress_selection(true);
        let listeners = host.arm(id, &source.element);
        source.phase = Phase::Armed {
            press: *event,
            threshold: Threshold::new(event.page, source.drag_distance),
            listeners,
        };
        self.in_flight = Some(id);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "gesture armed");
        Ok(GestureState::Armed)
    }

    /// Pointer move over an armed source: Armed → Dragging once the
    /// threshold is crossed, unless the move is over an input control.
    ///
    /// A move that no longer reports the primary button disarms, as
    /// [`DragDrop::source_release`] does.
    ///
    /// Crossing the threshold removes the armed listeners before `dragStart`
    /// runs. If `dragStart` returns `false` the gesture ends in Idle without
    /// creating any visuals.
    pub fn source_move(
        &mut self,
        host: &mut H,
        id: SourceId,
        event: &PointerEvent,
        target: Option<&E>,
    ) -> Result<GestureState, DragDropError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        let Phase::Armed { threshold, .. } = &source.phase else {
            return Ok(source.phase.state());
        };
        if !event.is_primary() {
            // The release was missed; a hover must not start a drag.
            return self.source_release(host, id);
        }
        if target.is_some_and(|t| host.is_input_control(t)) || !threshold.crossed(event.page) {
            return Ok(GestureState::Armed);
        }

        let Phase::Armed {
            press, listeners, ..
        } = mem::replace(&mut source.phase, Phase::Idle)
        else {
            return Ok(GestureState::Idle);
        };
        drop(listeners);

        if !source.draggable.start_drag(&press) {
            self.in_flight = None;
            host.suppress_selection(false);
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, "drag start vetoed");
            return Ok(GestureState::Idle);
        }

        let proxy = host.create_proxy(&source.element, source.template.as_ref());
        host.move_proxy(&proxy, press.client);
        let overlay = host.create_overlay(id);
        let timer = host.schedule_tick(id, self.config.poll_interval_ms);
        source.phase = Phase::Dragging(Session {
            timer: Some(timer),
            proxy,
            overlay,
            last: *event,
            rejected: false,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, channel = source.draggable.name(), "drag started");
        Ok(GestureState::Dragging)
    }

    /// Mouse up or mouse leave on an armed source: back to Idle, no callbacks.
    pub fn source_release(
        &mut self,
        host: &mut H,
        id: SourceId,
    ) -> Result<GestureState, DragDropError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        if !matches!(source.phase, Phase::Armed { .. }) {
            return Ok(source.phase.state());
        }
        source.phase = Phase::Idle;
        self.in_flight = None;
        host.suppress_selection(false);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "gesture disarmed");
        Ok(GestureState::Idle)
    }

    /// Pointer move on the overlay while dragging.
    ///
    /// A move that no longer reports the primary button cancels the drag.
    /// Otherwise the proxy follows the pointer, a drag pass runs, and the
    /// poll tick is rescheduled.
    pub fn overlay_move(
        &mut self,
        host: &mut H,
        id: SourceId,
        event: &PointerEvent,
    ) -> Result<GestureState, DragDropError> {
        if !event.is_primary() {
            return self.cancel(host, id, event);
        }
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        let Phase::Dragging(session) = &mut source.phase else {
            return Ok(source.phase.state());
        };
        session.timer = None;
        host.move_proxy(&session.proxy, event.client);
        session.last = *event;
        if let Err(err) = drag_pass(&mut source.draggable, &mut self.registry, host, session) {
            self.cancel(host, id, event)?;
            return Err(err);
        }
        session.timer = Some(host.schedule_tick(id, self.config.poll_interval_ms));
        Ok(GestureState::Dragging)
    }

    /// Poll tick: replay the last pointer sample so zones whose layout moved
    /// on their own are re-evaluated, then reschedule.
    pub fn tick(&mut self, host: &mut H, id: SourceId) -> Result<GestureState, DragDropError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        let Phase::Dragging(session) = &mut source.phase else {
            return Ok(source.phase.state());
        };
        session.timer = None;
        if let Err(err) = drag_pass(&mut source.draggable, &mut self.registry, host, session) {
            let last = session.last;
            self.cancel(host, id, &last)?;
            return Err(err);
        }
        session.timer = Some(host.schedule_tick(id, self.config.poll_interval_ms));
        Ok(GestureState::Dragging)
    }

    /// Release on the overlay: Dragging → Idle with drop resolution.
    ///
    /// Tick, proxy and overlay are gone before the element under the
    /// release point is looked up, so the lookup sees the page itself.
    pub fn overlay_release(
        &mut self,
        host: &mut H,
        id: SourceId,
        event: &PointerEvent,
    ) -> Result<GestureState, DragDropError>
    where
        E: PartialEq,
    {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        if !matches!(source.phase, Phase::Dragging(_)) {
            return Ok(source.phase.state());
        }
        if let Phase::Dragging(session) = mem::replace(&mut source.phase, Phase::Idle) {
            session.release();
        }
        self.in_flight = None;

        let target = host.element_from_point(event.client);
        let result = source
            .draggable
            .drop(&mut self.registry, host, event, target.as_ref());
        host.suppress_selection(false);
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, won = matches!(result, Ok(Some(_))), "drag dropped");
        result.map(|_| GestureState::Idle)
    }

    /// Abandon a drag: release visuals and run `dragEnd` without drop
    /// resolution. Zone state is left as is.
    pub fn cancel(
        &mut self,
        host: &mut H,
        id: SourceId,
        event: &PointerEvent,
    ) -> Result<GestureState, DragDropError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or(DragDropError::UnknownSource(id))?;
        if !matches!(source.phase, Phase::Dragging(_)) {
            return Ok(source.phase.state());
        }
        if let Phase::Dragging(session) = mem::replace(&mut source.phase, Phase::Idle) {
            session.release();
        }
        self.in_flight = None;
        host.suppress_selection(false);
        source.draggable.cancel_drag(event);
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, "drag cancelled");
        Ok(GestureState::Idle)
    }
}

/// One drag pass plus overlay rejection bookkeeping. The overlay is only
/// touched when the rejection status changes.
fn drag_pass<E, D, H: Document<E>>(
    draggable: &mut Draggable<E, D>,
    registry: &mut Registry<E, D>,
    host: &mut H,
    session: &mut SourceSession<E, H>,
) -> Result<(), DragDropError> {
    let event = session.last;
    draggable.drag(registry, host, &event)?;
    let rejected = draggable.drop_rejected(registry)?;
    if rejected != session.rejected {
        host.set_overlay_rejected(&session.overlay, rejected);
        session.rejected = rejected;
    }
    Ok(())
}
