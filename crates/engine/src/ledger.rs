// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;
use tabula_domain::{Day, Section, Year};

/// One committed or tentative assignment of a teacher and room to a grid
/// cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The assigned teacher.
    pub teacher_id: i64,
    /// The assigned room.
    pub room_id: i64,
    /// The day of the cell.
    pub day: Day,
    /// The slot index within the day grid.
    pub slot: usize,
    /// The year the placement was made for.
    pub year: Year,
    /// The section the placement was made for.
    pub section: Section,
    /// The placed subject's code.
    pub subject_code: String,
}

/// Append-only record of committed placements across all sections.
///
/// Teacher and room occupancy is tracked per `(id, day, slot)` so the
/// solver can reject conflicting candidates in constant time. Placements
/// are only committed after a whole section solves; within a section the
/// solver works through a [`LedgerOverlay`].
#[derive(Debug, Default)]
pub struct OccupancyLedger {
    placements: Vec<Placement>,
    teacher_busy: HashSet<(i64, Day, usize)>,
    room_busy: HashSet<(i64, Day, usize)>,
}

impl OccupancyLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the teacher is already committed at `(day, slot)`.
    #[must_use]
    pub fn teacher_busy(&self, teacher_id: i64, day: Day, slot: usize) -> bool {
        self.teacher_busy.contains(&(teacher_id, day, slot))
    }

    /// Whether the room is already committed at `(day, slot)`.
    #[must_use]
    pub fn room_busy(&self, room_id: i64, day: Day, slot: usize) -> bool {
        self.room_busy.contains(&(room_id, day, slot))
    }

    /// Commits a batch of placements from a solved section.
    pub fn commit(&mut self, placements: Vec<Placement>) {
        for placement in placements {
            self.teacher_busy
                .insert((placement.teacher_id, placement.day, placement.slot));
            self.room_busy
                .insert((placement.room_id, placement.day, placement.slot));
            self.placements.push(placement);
        }
    }

    /// All committed placements, in commit order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

/// Tentative placements layered over the committed ledger during one
/// section's search.
///
/// Pushes and pops are strictly LIFO, mirroring the backtracking order.
/// On success the tentative placements are taken out and committed; on
/// backtrack they are retracted without touching the base ledger.
#[derive(Debug)]
pub struct LedgerOverlay<'a> {
    base: &'a OccupancyLedger,
    tentative: Vec<Placement>,
}

impl<'a> LedgerOverlay<'a> {
    /// Creates an empty overlay over the committed ledger.
    #[must_use]
    pub const fn new(base: &'a OccupancyLedger) -> Self {
        Self {
            base,
            tentative: Vec::new(),
        }
    }

    /// Whether the teacher is busy at `(day, slot)` in either layer.
    #[must_use]
    pub fn teacher_busy(&self, teacher_id: i64, day: Day, slot: usize) -> bool {
        self.base.teacher_busy(teacher_id, day, slot)
            || self
                .tentative
                .iter()
                .any(|p| p.teacher_id == teacher_id && p.day == day && p.slot == slot)
    }

    /// Whether the room is busy at `(day, slot)` in either layer.
    #[must_use]
    pub fn room_busy(&self, room_id: i64, day: Day, slot: usize) -> bool {
        self.base.room_busy(room_id, day, slot)
            || self
                .tentative
                .iter()
                .any(|p| p.room_id == room_id && p.day == day && p.slot == slot)
    }

    /// Records a tentative placement.
    pub fn push(&mut self, placement: Placement) {
        self.tentative.push(placement);
    }

    /// Retracts the most recent tentative placement.
    pub fn pop(&mut self) -> Option<Placement> {
        self.tentative.pop()
    }

    /// Number of tentative placements currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tentative.len()
    }

    /// Whether the overlay holds no tentative placements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tentative.is_empty()
    }

    /// Consumes the overlay, yielding the tentative placements for commit.
    #[must_use]
    pub fn into_placements(self) -> Vec<Placement> {
        self.tentative
    }
}
