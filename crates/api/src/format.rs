// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Display-oriented rendering of timetable documents.
//!
//! Viewers show plain strings per cell: `"ML - SBR\n204"` for an
//! assignment, `"BREAK"` for a break, `"-"` for an empty slot. Batch cells
//! in the combined per-year view are prefixed with their batch key.

use tabula_domain::{Cell, OrderedMap, SectionGrid, TimetableDocument};

/// Section key -> day -> slot label -> display string.
pub type FormattedTimetable = OrderedMap<OrderedMap<OrderedMap<String>>>;

const BREAK_TEXT: &str = "BREAK";
const EMPTY_TEXT: &str = "-";

/// Renders every section of a document as-is, in document order.
#[must_use]
pub fn formatted_sections(document: &TimetableDocument) -> FormattedTimetable {
    let mut formatted: FormattedTimetable = OrderedMap::new();
    for (section_key, grid) in document.timetable.iter() {
        formatted.insert(section_key.to_string(), format_grid(grid, None));
    }
    formatted
}

/// Renders a document's sections plus one combined `"<YEAR>_Class"` view
/// per year, merging the year's lectures and batch practicals into a
/// single grid.
///
/// Batch grids fall back to the year's `Main` lecture for slots the batch
/// leaves empty, since the batch attends the full-class lecture then.
#[must_use]
pub fn format_document(document: &TimetableDocument) -> FormattedTimetable {
    let mut formatted: FormattedTimetable = OrderedMap::new();
    for (section_key, grid) in document.timetable.iter() {
        let main: Option<&SectionGrid> = main_grid_for_batch(document, section_key);
        formatted.insert(section_key.to_string(), format_grid(grid, main));
    }

    let mut years: Vec<&str> = Vec::new();
    for key in document.timetable.keys() {
        if let Some((year, _)) = key.split_once('_')
            && !years.contains(&year)
        {
            years.push(year);
        }
    }
    for year in years {
        if let Some(combined) = combined_year_view(document, year) {
            formatted.insert(format!("{year}_Class"), combined);
        }
    }
    formatted
}

/// The `Main` grid of the section's year, for batch section keys only.
fn main_grid_for_batch<'a>(
    document: &'a TimetableDocument,
    section_key: &str,
) -> Option<&'a SectionGrid> {
    let (year, section) = section_key.split_once('_')?;
    if section == "Main" {
        return None;
    }
    let main_key: String = format!("{year}_Main");
    document.timetable.get(&main_key)
}

fn format_grid(grid: &SectionGrid, main: Option<&SectionGrid>) -> OrderedMap<OrderedMap<String>> {
    let mut days: OrderedMap<OrderedMap<String>> = OrderedMap::new();
    for (day, row) in grid.rows().iter() {
        let mut slots: OrderedMap<String> = OrderedMap::new();
        for (slot, cell) in row.iter() {
            let text: String = if matches!(cell, Cell::Empty)
                && let Some(lecture @ Cell::Lecture { .. }) = main
                    .and_then(|m| m.rows().get(day))
                    .and_then(|r| r.get(slot))
            {
                format_cell(lecture)
            } else {
                format_cell(cell)
            };
            slots.insert(slot.to_string(), text);
        }
        days.insert(day.to_string(), slots);
    }
    days
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Lecture {
            subject,
            teacher,
            room,
        } => format!("{subject} - {teacher}\n{room}"),
        Cell::Practical {
            subject,
            teacher,
            room,
            batch,
        } => format!("{batch}: {subject} - {teacher}\n{room}"),
        Cell::Break => BREAK_TEXT.to_string(),
        Cell::Empty => EMPTY_TEXT.to_string(),
    }
}

/// Merges one year's sections into a single grid keyed like its first
/// section. Returns `None` if the year has no sections.
fn combined_year_view(
    document: &TimetableDocument,
    year: &str,
) -> Option<OrderedMap<OrderedMap<String>>> {
    let prefix: String = format!("{year}_");
    let sections: Vec<&SectionGrid> = document
        .timetable
        .iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(_, grid)| grid)
        .collect();
    let first: &SectionGrid = sections.first()?;

    let mut days: OrderedMap<OrderedMap<String>> = OrderedMap::new();
    for (day, row) in first.rows().iter() {
        let mut slots: OrderedMap<String> = OrderedMap::new();
        for (slot, template) in row.iter() {
            let mut entries: Vec<String> = Vec::new();
            for grid in &sections {
                if let Some(cell) = grid.rows().get(day).and_then(|r| r.get(slot))
                    && cell.is_populated()
                {
                    entries.push(format_cell(cell));
                }
            }
            let text: String = if entries.is_empty() {
                if matches!(template, Cell::Break) {
                    BREAK_TEXT.to_string()
                } else {
                    EMPTY_TEXT.to_string()
                }
            } else {
                entries.join("\n")
            };
            slots.insert(slot.to_string(), text);
        }
        days.insert(day.to_string(), slots);
    }
    Some(days)
}
