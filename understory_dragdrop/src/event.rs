// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input as seen by the drag and drop engine.

use kurbo::Point;

/// Mouse button reported by a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// No button is involved (e.g. a hover move).
    #[default]
    None,
    /// The primary (usually left) button.
    Primary,
    /// The secondary (usually right) button.
    Secondary,
    /// The auxiliary (usually middle) button.
    Auxiliary,
    /// Any other button, by platform code.
    Other(u16),
}

/// One pointer sample.
///
/// For presses and releases `button` is the button that changed. For moves it
/// is the button currently held, or [`PointerButton::None`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the viewport. Zone hit testing uses this.
    pub client: Point,
    /// Position relative to the document. The drag threshold uses this.
    pub page: Point,
    /// Button state, see the type docs.
    pub button: PointerButton,
}

impl PointerEvent {
    /// An event whose client and page coordinates coincide (unscrolled page).
    pub fn at(x: f64, y: f64, button: PointerButton) -> Self {
        let p = Point::new(x, y);
        Self {
            client: p,
            page: p,
            button,
        }
    }

    /// Set the page position, leaving the client position unchanged.
    #[must_use]
    pub fn with_page(mut self, page: Point) -> Self {
        self.page = page;
        self
    }

    /// Returns `true` when the primary button is the reported button.
    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

/// A pointer event as delivered to one zone's callbacks.
///
/// The incoming event is shared by every zone of the pass, so it is never
/// mutated. Instead each zone receives this view, whose `target` is rebound
/// to the zone's own element.
#[derive(Debug)]
pub struct ZoneEvent<'a, E> {
    /// The underlying pointer sample.
    pub pointer: &'a PointerEvent,
    /// The element of the zone receiving the callback.
    pub target: &'a E,
}

// Manual impls: a derive would require `E: Clone`.
impl<E> Clone for ZoneEvent<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ZoneEvent<'_, E> {}
