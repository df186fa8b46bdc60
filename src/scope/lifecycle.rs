//! Enumeration cursors and the handles that name them.
//!
//! A scope owns a [`CursorRegistry`]. Each `begin_enum` claims a slot; the returned
//! [`EnumHandle`] records the scope id, the slot and the slot's generation. Closing a cursor
//! empties the slot and bumps its generation, so a handle outliving its cursor can never reach
//! a cursor opened later in the same slot.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{metadata::token::Token, scope::EnumKind};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique scope id.
pub(crate) fn next_scope_id() -> u64 {
    NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed)
}

/// An open enumeration over one kind of record in one scope.
///
/// Handles are neither `Clone` nor `Copy`: each names exactly one cursor, which is released by
/// [`crate::scope::MetadataScope::close_enum`] or when the scope closes.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumHandle {
    pub(crate) scope_id: u64,
    pub(crate) slot: usize,
    pub(crate) generation: u32,
    pub(crate) kind: EnumKind,
}

impl EnumHandle {
    /// The record kind this handle enumerates.
    #[must_use]
    pub fn kind(&self) -> EnumKind {
        self.kind
    }
}

#[derive(Debug)]
struct Cursor {
    kind: EnumKind,
    next_rid: u32,
    row_count: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    cursor: Option<Cursor>,
}

/// The cursors of one scope.
#[derive(Debug, Default)]
pub(crate) struct CursorRegistry {
    slots: Vec<Slot>,
}

impl CursorRegistry {
    /// Opens a cursor over `row_count` rows and returns its handle.
    pub fn open(&mut self, scope_id: u64, kind: EnumKind, row_count: u32) -> EnumHandle {
        let cursor = Cursor {
            kind,
            next_rid: 1,
            row_count,
        };

        let slot = match self.slots.iter().position(|slot| slot.cursor.is_none()) {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let entry = &mut self.slots[slot];
        entry.cursor = Some(cursor);

        EnumHandle {
            scope_id,
            slot,
            generation: entry.generation,
            kind,
        }
    }

    /// Takes up to `max_count` tokens from the cursor named by `handle`, in row order.
    ///
    /// A released or exhausted cursor yields nothing.
    pub fn advance(&mut self, handle: &EnumHandle, max_count: usize) -> Vec<Token> {
        let Some(cursor) = self.cursor_mut(handle) else {
            return Vec::new();
        };

        let remaining = cursor.row_count.saturating_sub(cursor.next_rid - 1);
        let take = u32::try_from(max_count).unwrap_or(u32::MAX).min(remaining);

        let table = cursor.kind.table();
        let tokens = (cursor.next_rid..cursor.next_rid + take)
            .map(|rid| Token::from_parts(table, rid))
            .collect();

        cursor.next_rid += take;
        tokens
    }

    /// Releases the cursor named by `handle`; returns `false` if it was already released.
    pub fn release(&mut self, handle: &EnumHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.slot) else {
            return false;
        };
        if slot.generation != handle.generation || slot.cursor.is_none() {
            return false;
        }

        slot.cursor = None;
        slot.generation = slot.generation.wrapping_add(1);
        true
    }

    /// Releases every cursor; returns how many were still open.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for slot in &mut self.slots {
            if slot.cursor.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                released += 1;
            }
        }

        released
    }

    /// Number of cursors not yet released.
    pub fn outstanding(&self) -> usize {
        self.slots.iter().filter(|slot| slot.cursor.is_some()).count()
    }

    fn cursor_mut(&mut self, handle: &EnumHandle) -> Option<&mut Cursor> {
        let slot = self.slots.get_mut(handle.slot)?;
        if slot.generation != handle.generation {
            return None;
        }

        slot.cursor.as_mut()
    }
}
