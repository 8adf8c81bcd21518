// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zone registry: channel name → drop zones and event zones.
//!
//! The registry owns every zone. A drop zone registered under several
//! channels is stored once and listed under each of them. The registry is an
//! ordinary value owned by the engine, not a global; registration and
//! removal happen at element attach/detach, never inside a drag pass.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::arena::{Arena, ZoneId};
use crate::error::DragDropError;
use crate::options::{DragEventsOptions, DropZoneOptions};
use crate::zone::{DropCapability, Zone};

/// Zones listed under one channel, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Channel {
    /// Drop zones accepting this channel.
    pub drop_zones: Vec<ZoneId>,
    /// Event zones observing this channel.
    pub event_zones: Vec<ZoneId>,
}

/// Which zones of a channel a pass visits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoneSet {
    /// Drop zones only.
    Drop,
    /// Drop zones, then event zones.
    All,
}

struct Entry<E, D> {
    zone: Zone<E, D>,
    channels: SmallVec<[String; 1]>,
}

/// Owner of all zones, indexed by channel.
pub struct Registry<E, D> {
    zones: Arena<Entry<E, D>>,
    channels: HashMap<String, Channel>,
}

impl<E, D> Default for Registry<E, D> {
    fn default() -> Self {
        Self {
            zones: Arena::default(),
            channels: HashMap::new(),
        }
    }
}

impl<E, D> fmt::Debug for Registry<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("zones", &self.zones.len())
            .field("channels", &self.channels)
            .finish()
    }
}

impl<E, D> Registry<E, D> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `name` exists, possibly with no zones.
    ///
    /// Drag sources call this so that dragging on a channel nobody listens
    /// to is legal.
    pub fn ensure_channel(&mut self, name: &str) {
        if !self.channels.contains_key(name) {
            self.channels.insert(name.into(), Channel::default());
        }
    }

    /// Whether `name` was ever registered.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// The zones listed under `name`.
    pub fn channel(&self, name: &str) -> Result<&Channel, DragDropError> {
        self.channels
            .get(name)
            .ok_or_else(|| DragDropError::UnknownChannel(name.into()))
    }

    /// Register a drop zone under every channel it accepts.
    pub fn add_drop_zone(&mut self, element: E, data: D, options: DropZoneOptions<E, D>) -> ZoneId {
        let accepts = options.channels();
        let capability = DropCapability {
            accepts: accepts.clone(),
            action: options.drop,
        };
        let zone = Zone::drop_zone(element, data, options.callbacks, capability);
        let id = self.zones.insert(Entry {
            zone,
            channels: accepts.clone(),
        });
        for name in &accepts {
            self.channels
                .entry(name.clone())
                .or_default()
                .drop_zones
                .push(id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, channels = ?accepts, "drop zone registered");
        id
    }

    /// Register an event zone. `context` is used when the options carry no data.
    pub fn add_event_zone(
        &mut self,
        element: E,
        context: D,
        options: DragEventsOptions<E, D>,
    ) -> ZoneId {
        let data = options.data.unwrap_or(context);
        let zone = Zone::event_zone(element, data, options.callbacks);
        let mut channels = SmallVec::new();
        channels.push(options.name.clone());
        let id = self.zones.insert(Entry { zone, channels });
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, channel = %options.name, "event zone registered");
        self.channels
            .entry(options.name)
            .or_default()
            .event_zones
            .push(id);
        id
    }

    /// Dispose a zone: force it out (`dragLeave` runs without an event if the
    /// pointer was inside) and unlist it from every channel. Channels stay registered even when emptied.
    pub fn remove(&mut self, id: ZoneId) -> Result<Zone<E, D>, DragDropError> {
        let mut entry = self.zones.remove(id).ok_or(DragDropError::UnknownZone(id))?;
        entry.zone.leave(None);
        let is_drop = entry.zone.is_drop_zone();
        for name in &entry.channels {
            if let Some(channel) = self.channels.get_mut(name.as_str()) {
                let list = if is_drop {
                    &mut channel.drop_zones
                } else {
                    &mut channel.event_zones
                };
                if let Some(pos) = list.iter().position(|z| *z == id) {
                    list.remove(pos);
                }
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, "zone removed");
        Ok(entry.zone)
    }

    /// Look up a zone.
    pub fn zone(&self, id: ZoneId) -> Option<&Zone<E, D>> {
        self.zones.get(id).map(|e| &e.zone)
    }

    /// Look up a zone mutably.
    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone<E, D>> {
        self.zones.get_mut(id).map(|e| &mut e.zone)
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns `true` when no zones are registered.
    pub fn is_empty(&self) -> bool {
        self.zones.len() == 0
    }

    /// Visit the zones of channel `name` in registration order.
    ///
    /// Fails when `name` was never registered.
    pub fn for_each_mut(
        &mut self,
        name: &str,
        set: ZoneSet,
        mut f: impl FnMut(ZoneId, &mut Zone<E, D>),
    ) -> Result<(), DragDropError> {
        let channel = self
            .channels
            .get(name)
            .ok_or_else(|| DragDropError::UnknownChannel(name.into()))?;
        let events: &[ZoneId] = match set {
            ZoneSet::Drop => &[],
            ZoneSet::All => &channel.event_zones,
        };
        for &id in channel.drop_zones.iter().chain(events) {
            if let Some(entry) = self.zones.get_mut(id) {
                f(id, &mut entry.zone);
            }
        }
        Ok(())
    }

    /// Iterate the drop zones of channel `name`.
    pub fn drop_zones<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = (ZoneId, &'a Zone<E, D>)> + 'a, DragDropError> {
        let channel = self.channel(name)?;
        Ok(channel
            .drop_zones
            .iter()
            .filter_map(|&id| self.zones.get(id).map(|e| (id, &e.zone))))
    }
}
