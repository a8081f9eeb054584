// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod slot_grid;
mod timetable;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::DomainError;
pub use slot_grid::{
    BreakInterval, DEFAULT_DAY_END, DEFAULT_DAY_START, Slot, SlotGrid, default_breaks,
};
pub use timetable::{Cell, OrderedMap, SectionGrid, TimetableDocument};
pub use types::{Day, Department, Room, RoomKind, Section, Subject, SubjectKind, Teacher, Year};
pub use validation::{
    MAX_BRANCHES, validate_department, validate_room, validate_subject, validate_teacher,
};
