// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture phases of one drag source.
//!
//! ```text
//! Idle ──press──▶ Armed ──move past threshold──▶ Dragging ──release──▶ Idle (dropped)
//!                   │                               │
//!                   └─up / leave──▶ Idle            └─button lost──▶ Idle (cancelled)
//! ```
//!
//! Each phase owns the resources it needs, so leaving the phase releases them.

use kurbo::Point;

use crate::event::PointerEvent;

/// Observable phase of a drag source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// No gesture.
    #[default]
    Idle,
    /// Pressed, threshold not yet crossed.
    Armed,
    /// Dragging with proxy and overlay in place.
    Dragging,
}

/// Press-point tracker deciding when a press becomes a drag.
///
/// Distances are measured in page coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Threshold {
    origin: Point,
    distance: f64,
}

impl Threshold {
    /// Track from `origin` with the given distance.
    pub fn new(origin: Point, distance: f64) -> Self {
        Self { origin, distance }
    }

    /// Euclidean distance from the press point strictly exceeds the threshold.
    pub fn crossed(&self, pos: Point) -> bool {
        (pos - self.origin).hypot2() > self.distance * self.distance
    }
}

/// Resources of a drag in progress.
///
/// Field order is drop order: the tick is cancelled before any visual goes.
#[derive(Debug)]
pub(crate) struct Session<P, O, T> {
    pub(crate) timer: Option<T>,
    pub(crate) proxy: P,
    pub(crate) overlay: O,
    /// Last pointer sample, replayed by poll ticks.
    pub(crate) last: PointerEvent,
    /// Rejection look currently shown on the overlay.
    pub(crate) rejected: bool,
}

impl<P, O, T> Session<P, O, T> {
    /// Cancel the tick, then remove proxy and overlay.
    pub(crate) fn release(self) -> PointerEvent {
        let Self {
            timer,
            proxy,
            overlay,
            last,
            ..
        } = self;
        drop(timer);
        drop(proxy);
        drop(overlay);
        last
    }
}

#[derive(Debug)]
pub(crate) enum Phase<L, P, O, T> {
    Idle,
    Armed {
        press: PointerEvent,
        threshold: Threshold,
        listeners: L,
    },
    Dragging(Session<P, O, T>),
}

impl<L, P, O, T> Phase<L, P, O, T> {
    pub(crate) fn state(&self) -> GestureState {
        match self {
            Self::Idle => GestureState::Idle,
            Self::Armed { .. } => GestureState::Armed,
            Self::Dragging(_) => GestureState::Dragging,
        }
    }
}
