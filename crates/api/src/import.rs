// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of externally authored timetable documents.
//!
//! Imports are checked in three passes before anything touches the store:
//! grid shape (section/day/slot keys and cell placement against the
//! expected grid), entity references (every code in a cell must exist for
//! the department), and occupancy (no teacher or room double-booked across
//! sections).

use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::ImportTimetableRequest;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;
use tabula_domain::{
    Cell, DEFAULT_DAY_END, DEFAULT_DAY_START, Day, Department, Section, SectionGrid, SlotGrid,
    SubjectKind, TimetableDocument, Year, default_breaks,
};
use tabula_engine::{EngineError, assemble};
use tabula_persistence::SqliteStore;

/// Validates an import request against the expected grid and the stored
/// entities, returning the document ready to persist.
///
/// The grid uses the standard day bounds unless the request names the
/// bounds the document was built with.
///
/// # Errors
///
/// * `ApiError::NotFound` if the department does not exist
/// * `ApiError::ImportSchema` for structural problems, with the offending
///   key path
/// * `ApiError::ImportReference` for unknown teacher/room/subject codes
/// * `ApiError::ImportConflict` if a teacher or room is double-booked
pub fn validate_import(
    store: &SqliteStore,
    request: &ImportTimetableRequest,
) -> Result<TimetableDocument, ApiError> {
    let department: Department = store
        .get_department(request.department_id)
        .map_err(translate_persistence_error)?;
    if request.academic_year.trim().is_empty() {
        return Err(ApiError::ImportSchema {
            key: String::from("academic_year"),
            message: String::from("must not be empty"),
        });
    }

    let day_start: &str = request.day_start_time.as_deref().unwrap_or(DEFAULT_DAY_START);
    let day_end: &str = request.day_end_time.as_deref().unwrap_or(DEFAULT_DAY_END);
    let grid: SlotGrid = SlotGrid::build(day_start, day_end, &default_breaks())?;
    let sections: &Map<String, Value> =
        request.timetable.as_object().ok_or_else(|| ApiError::ImportSchema {
            key: String::from("timetable"),
            message: String::from("expected an object of section grids"),
        })?;
    if sections.is_empty() {
        return Err(ApiError::ImportSchema {
            key: String::from("timetable"),
            message: String::from("must contain at least one section"),
        });
    }

    let references: StoredReferences = StoredReferences::load(store, request.department_id)?;
    let mut document: TimetableDocument =
        TimetableDocument::new(request.department_id, request.academic_year.clone());

    for (section_key, section_value) in sections {
        let section: Section = parse_section_key(section_key, &department)?;
        let section_grid: SectionGrid =
            parse_section_grid(&grid, section_key, section, section_value, &references)?;
        document.timetable.insert(section_key.clone(), section_grid);
    }

    // Occupancy check across sections reuses the generation-side merge.
    assemble(document).map_err(|err| match err {
        EngineError::AssemblyInvariant { detail } => ApiError::ImportConflict { detail },
        other => ApiError::from(other),
    })
}

/// Splits a `"SE_Main"` style key and validates both halves.
fn parse_section_key(key: &str, department: &Department) -> Result<Section, ApiError> {
    let schema_err = |message: String| ApiError::ImportSchema {
        key: key.to_string(),
        message,
    };
    let (year, section) = key
        .split_once('_')
        .ok_or_else(|| schema_err(String::from("expected '<YEAR>_<SECTION>'")))?;
    Year::from_str(year).map_err(|e| schema_err(e.to_string()))?;
    Section::parse_key(section, department.num_branches).map_err(|e| schema_err(e.to_string()))
}

fn parse_section_grid(
    grid: &SlotGrid,
    section_key: &str,
    section: Section,
    value: &Value,
    references: &StoredReferences,
) -> Result<SectionGrid, ApiError> {
    let days: &Map<String, Value> = value.as_object().ok_or_else(|| ApiError::ImportSchema {
        key: section_key.to_string(),
        message: String::from("expected an object of day rows"),
    })?;
    if days.len() != Day::ALL.len() {
        return Err(ApiError::ImportSchema {
            key: section_key.to_string(),
            message: format!("expected {} day rows, found {}", Day::ALL.len(), days.len()),
        });
    }

    let mut section_grid: SectionGrid = SectionGrid::empty(grid);
    for (day_key, row_value) in days {
        let row_key: String = format!("{section_key}.{day_key}");
        let day: Day = Day::from_str(day_key).map_err(|e| ApiError::ImportSchema {
            key: row_key.clone(),
            message: e.to_string(),
        })?;
        let row: &Map<String, Value> =
            row_value.as_object().ok_or_else(|| ApiError::ImportSchema {
                key: row_key.clone(),
                message: String::from("expected an object of slot cells"),
            })?;

        let expected: HashSet<&str> = grid.slots().iter().map(|s| s.label.as_str()).collect();
        let provided: HashSet<&str> = row.keys().map(String::as_str).collect();
        if expected != provided {
            return Err(ApiError::ImportSchema {
                key: row_key,
                message: String::from("slot labels do not match the expected grid"),
            });
        }

        for (slot_label, cell_value) in row {
            let cell_key: String = format!("{row_key}.{slot_label}");
            let cell: Cell =
                serde_json::from_value(cell_value.clone()).map_err(|e| ApiError::ImportSchema {
                    key: cell_key.clone(),
                    message: e.to_string(),
                })?;
            check_cell(grid, section, slot_label, &cell_key, &cell, references)?;
            section_grid
                .set_cell(day, slot_label, cell)
                .map_err(ApiError::from)?;
        }
    }
    Ok(section_grid)
}

fn check_cell(
    grid: &SlotGrid,
    section: Section,
    slot_label: &str,
    cell_key: &str,
    cell: &Cell,
    references: &StoredReferences,
) -> Result<(), ApiError> {
    let is_break_slot: bool = grid
        .slot_index(slot_label)
        .and_then(|i| grid.slots().get(i))
        .is_some_and(|s| s.is_break);
    let schema_err = |message: String| ApiError::ImportSchema {
        key: cell_key.to_string(),
        message,
    };

    match cell {
        Cell::Break => {
            if !is_break_slot {
                return Err(schema_err(String::from(
                    "break cell outside a designated break slot",
                )));
            }
        }
        Cell::Empty => {
            if is_break_slot {
                return Err(schema_err(String::from(
                    "break slot must contain a break cell",
                )));
            }
        }
        Cell::Lecture { .. } | Cell::Practical { .. } => {
            if is_break_slot {
                return Err(schema_err(String::from(
                    "break slot must contain a break cell",
                )));
            }
            let expected_kind: SubjectKind = if section.is_batch() {
                SubjectKind::Practical
            } else {
                SubjectKind::Lecture
            };
            let matches_section: bool = match cell {
                Cell::Lecture { .. } => expected_kind == SubjectKind::Lecture,
                _ => expected_kind == SubjectKind::Practical,
            };
            if !matches_section {
                return Err(schema_err(format!(
                    "a {} section only holds {expected_kind} cells",
                    section.key()
                )));
            }
            if let Cell::Practical { batch, .. } = cell
                && *batch != section.key()
            {
                return Err(schema_err(format!(
                    "batch label '{batch}' does not match section '{}'",
                    section.key()
                )));
            }
            references.check(cell_key, cell)?;
        }
    }
    Ok(())
}

/// The code sets an imported cell may reference.
///
/// Teachers and rooms are shared across departments, but a document may
/// only name the importing department's own subjects.
struct StoredReferences {
    teacher_codes: HashSet<String>,
    room_numbers: HashSet<String>,
    subject_codes: HashSet<String>,
}

impl StoredReferences {
    fn load(store: &SqliteStore, department_id: i64) -> Result<Self, ApiError> {
        Ok(Self {
            teacher_codes: store
                .list_teachers()
                .map_err(translate_persistence_error)?
                .into_iter()
                .map(|t| t.code)
                .collect(),
            room_numbers: store
                .list_rooms()
                .map_err(translate_persistence_error)?
                .into_iter()
                .map(|r| r.number)
                .collect(),
            subject_codes: store
                .list_subjects_for_department(department_id)
                .map_err(translate_persistence_error)?
                .into_iter()
                .map(|s| s.code)
                .collect(),
        })
    }

    fn check(&self, cell_key: &str, cell: &Cell) -> Result<(), ApiError> {
        let reference_err = |message: String| ApiError::ImportReference {
            key: cell_key.to_string(),
            message,
        };
        if let Some(subject) = cell.subject()
            && !self.subject_codes.contains(subject)
        {
            return Err(reference_err(format!("no subject with code '{subject}'")));
        }
        if let Some(teacher) = cell.teacher()
            && !self.teacher_codes.contains(teacher)
        {
            return Err(reference_err(format!("no teacher with code '{teacher}'")));
        }
        if let Some(room) = cell.room()
            && !self.room_numbers.contains(room)
        {
            return Err(reference_err(format!("no room with number '{room}'")));
        }
        Ok(())
    }
}
