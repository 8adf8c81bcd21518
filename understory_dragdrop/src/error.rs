// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by the registry and the gesture engine.

use alloc::string::String;
use core::fmt;

use crate::arena::{SourceId, ZoneId};

/// Error returned by drag and drop operations.
///
/// Every variant is a programming error on the embedder's side (an unknown
/// channel, a stale handle, or overlapping gestures). They are reported
/// eagerly so the mistake is visible at the call that made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragDropError {
    /// A drag ran on a channel that no drop zone, event zone, or drag source
    /// was ever registered under.
    UnknownChannel(String),
    /// The zone handle is stale: the zone was already removed.
    UnknownZone(ZoneId),
    /// The drag source handle is stale: the source was already removed.
    UnknownSource(SourceId),
    /// A press arrived while another gesture was armed or dragging.
    GestureInFlight {
        /// The source that currently owns the pointer.
        owner: SourceId,
    },
}

impl fmt::Display for DragDropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel(name) => write!(
                f,
                "no drop or event zones were ever registered under channel {name:?}"
            ),
            Self::UnknownZone(id) => write!(f, "zone {id:?} is not registered"),
            Self::UnknownSource(id) => write!(f, "drag source {id:?} is not registered"),
            Self::GestureInFlight { owner } => {
                write!(f, "a drag gesture owned by {owner:?} is already in flight")
            }
        }
    }
}

impl core::error::Error for DragDropError {}
