//! Seat cursor over the ordered room list.
//!
//! The cursor is the only mutable state of an allocation run: the room being
//! filled and how many of its seats are taken. It lives on the stack of one
//! run and is never shared.

use crate::{model::Room, ordering::order_rooms};

/// First-fit cursor over rooms in allocation order.
#[derive(Debug, Clone)]
pub struct SeatCursor<'r> {
    rooms: Vec<&'r Room>,
    index: usize,
    filled: u32,
}

impl<'r> SeatCursor<'r> {
    /// Position the cursor on the first room in allocation order.
    pub fn new(rooms: &'r [Room]) -> Self {
        Self { rooms: order_rooms(rooms), index: 0, filled: 0 }
    }

    /// Room currently being filled, or `None` once every room is full.
    pub fn current(&self) -> Option<&'r Room> {
        self.rooms.get(self.index).copied()
    }

    /// Label the next seat in the current room would get.
    pub fn next_label(&self) -> String {
        (self.filled + 1).to_string()
    }

    /// Take the next seat. Returns `true` when this filled the room and the
    /// cursor rolled over to the next one.
    pub fn consume(&mut self) -> bool {
        let Some(room) = self.current() else {
            return false;
        };

        self.filled += 1;
        if self.filled >= room.capacity.get() {
            self.index += 1;
            self.filled = 0;
            true
        } else {
            false
        }
    }
}
