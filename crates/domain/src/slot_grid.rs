// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Time;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};

/// Default day start used when a generation request does not override it.
pub const DEFAULT_DAY_START: &str = "9:00 am";

/// Default day end used when a generation request does not override it.
pub const DEFAULT_DAY_END: &str = "4:45 pm";

/// Teaching slots are a fixed hour long.
const SLOT_MINUTES: u16 = 60;

/// Wall-clock format used throughout the grid ("9:00 am").
const WALL_CLOCK: &[BorrowedFormatItem<'_>] =
    format_description!("[hour padding:none repr:12]:[minute] [period case:lower]");

/// A designated break interval excluded from assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakInterval {
    start: Time,
    end: Time,
}

impl BreakInterval {
    /// Creates a break interval. `start` must precede `end`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` if the interval is empty or
    /// inverted.
    pub fn new(start: Time, end: Time) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange {
                start: format_wall_clock(start),
                end: format_wall_clock(end),
            });
        }
        Ok(Self { start, end })
    }

    /// The break's start time.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }

    /// The break's end time.
    #[must_use]
    pub const fn end(&self) -> Time {
        self.end
    }
}

/// The standard mid-morning and lunch breaks.
#[must_use]
pub fn default_breaks() -> Vec<BreakInterval> {
    vec![
        BreakInterval {
            start: time!(11:00),
            end: time!(11:15),
        },
        BreakInterval {
            start: time!(13:15),
            end: time!(13:45),
        },
    ]
}

/// One interval in the weekly grid, break or assignable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Display label, e.g. `"9:00 am - 10:00 am"`. Used as the document key.
    pub label: String,
    /// Start of the interval.
    pub start: Time,
    /// End of the interval.
    pub end: Time,
    /// Whether this slot is a designated break.
    pub is_break: bool,
}

/// The ordered day grid derived from configured start/end times and break
/// rules.
///
/// Identical inputs always produce an identical, identically-ordered grid;
/// the solver depends on stable ordering for tie-breaking and the viewer
/// for chronological display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    slots: Vec<Slot>,
}

impl SlotGrid {
    /// Builds the grid for one day from wall-clock bounds and break rules.
    ///
    /// Walks from `day_start` to `day_end` in hour steps: when the cursor
    /// sits on a break start the break slot is emitted, otherwise a
    /// teaching slot. An interval too short for a full teaching slot is
    /// dropped.
    ///
    /// # Errors
    ///
    /// * `DomainError::InvalidTimeFormat` if either bound fails to parse
    /// * `DomainError::InvalidTimeRange` if `day_end <= day_start`
    /// * `DomainError::GridTooSmall` if no assignable slot fits
    pub fn build(
        day_start: &str,
        day_end: &str,
        breaks: &[BreakInterval],
    ) -> Result<Self, DomainError> {
        let start: Time = parse_wall_clock(day_start)?;
        let end: Time = parse_wall_clock(day_end)?;
        if end <= start {
            return Err(DomainError::InvalidTimeRange {
                start: day_start.to_string(),
                end: day_end.to_string(),
            });
        }

        let mut ordered_breaks: Vec<BreakInterval> = breaks.to_vec();
        ordered_breaks.sort_by_key(|b| b.start);

        // Arithmetic in minutes since midnight avoids Time wrap-around.
        let start_min: u16 = minutes(start);
        let end_min: u16 = minutes(end);

        let mut slots: Vec<Slot> = Vec::new();
        let mut cursor: u16 = start_min;
        while cursor < end_min {
            if let Some(brk) = ordered_breaks.iter().find(|b| minutes(b.start) == cursor) {
                let brk_end: u16 = minutes(brk.end).min(end_min);
                slots.push(make_slot(cursor, brk_end, true)?);
                cursor = brk_end;
                continue;
            }

            // A teaching slot may not run past the day end or into a break.
            let limit: u16 = ordered_breaks
                .iter()
                .map(|b| minutes(b.start))
                .filter(|&b| b > cursor)
                .min()
                .unwrap_or(end_min)
                .min(end_min);
            let slot_end: u16 = cursor + SLOT_MINUTES;
            if slot_end > limit {
                cursor = limit;
                continue;
            }
            slots.push(make_slot(cursor, slot_end, false)?);
            cursor = slot_end;
        }

        let grid: Self = Self { slots };
        if grid.assignable_count() == 0 {
            return Err(DomainError::GridTooSmall {
                start: day_start.to_string(),
                end: day_end.to_string(),
            });
        }
        Ok(grid)
    }

    /// Builds the standard grid: 9:00 am to 4:45 pm with the default breaks.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in defaults; the `Result` is kept for a
    /// uniform signature.
    pub fn standard() -> Result<Self, DomainError> {
        Self::build(DEFAULT_DAY_START, DEFAULT_DAY_END, &default_breaks())
    }

    /// All slots, in chronological order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of slots that can hold an assignment.
    #[must_use]
    pub fn assignable_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_break).count()
    }

    /// Indices and slots that can hold an assignment, in order.
    pub fn assignable(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_break)
    }

    /// Looks up a slot index by its label.
    #[must_use]
    pub fn slot_index(&self, label: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.label == label)
    }

    /// Returns the label at a slot index.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|s| s.label.as_str())
    }
}

fn make_slot(start_min: u16, end_min: u16, is_break: bool) -> Result<Slot, DomainError> {
    let start: Time = from_minutes(start_min)?;
    let end: Time = from_minutes(end_min)?;
    Ok(Slot {
        label: format!("{} - {}", format_wall_clock(start), format_wall_clock(end)),
        start,
        end,
        is_break,
    })
}

fn minutes(t: Time) -> u16 {
    u16::from(t.hour()) * 60 + u16::from(t.minute())
}

fn from_minutes(m: u16) -> Result<Time, DomainError> {
    #[allow(clippy::cast_possible_truncation)]
    Time::from_hms((m / 60) as u8, (m % 60) as u8, 0).map_err(|e| DomainError::InvalidTimeFormat {
        value: format!("{m} minutes"),
        reason: e.to_string(),
    })
}

/// Parses a 12-hour wall-clock string such as `"9:00 am"`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeFormat` if the string does not match.
pub fn parse_wall_clock(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), WALL_CLOCK).map_err(|e| DomainError::InvalidTimeFormat {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a time in the grid's 12-hour wall-clock style.
#[must_use]
pub fn format_wall_clock(t: Time) -> String {
    let hour24: u8 = t.hour();
    let hour12: u8 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let period: &str = if hour24 < 12 { "am" } else { "pm" };
    format!("{hour12}:{:02} {period}", t.minute())
}
