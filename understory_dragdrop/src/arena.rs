// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage for zones and drag sources.

use alloc::vec::Vec;

/// Handle of a registered drop zone or event zone.
///
/// The handle consists of a slot index and a generation counter.
/// Removing a zone frees its slot; a later registration that reuses the slot
/// bumps the generation, so a stale `ZoneId` never aliases a different zone.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ZoneId(pub(crate) u32, pub(crate) u32);

/// Handle of a registered drag source (a "drag zone" element).
///
/// Same slot + generation semantics as [`ZoneId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SourceId(pub(crate) u32, pub(crate) u32);

macro_rules! slot_key {
    ($ty:ident) => {
        impl SlotKey for $ty {
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self(idx, generation)
            }

            fn idx(self) -> usize {
                self.0 as usize
            }

            fn generation(self) -> u32 {
                self.1
            }
        }
    };
}

pub(crate) trait SlotKey: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn idx(self) -> usize;
    fn generation(self) -> u32;
}

slot_key!(ZoneId);
slot_key!(SourceId);

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot vector with a free list; slots are reused with a bumped generation.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert<K: SlotKey>(&mut self, value: T) -> K {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            K::from_parts(idx, slot.generation)
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX live zones is not a supported configuration"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            K::from_parts(idx, 1)
        }
    }

    pub(crate) fn remove<K: SlotKey>(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        let value = slot.value.take()?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "slot indices originate from u32 keys"
        )]
        self.free.push(key.idx() as u32);
        Some(value)
    }

    pub(crate) fn get<K: SlotKey>(&self, key: K) -> Option<&T> {
        let slot = self.slots.get(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub(crate) fn get_mut<K: SlotKey>(&mut self, key: K) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
