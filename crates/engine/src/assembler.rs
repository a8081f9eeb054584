// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::EngineError;
use std::collections::HashMap;
use tabula_domain::TimetableDocument;

/// Merges solved section grids into one document and verifies the
/// cross-section invariants the solver is supposed to uphold.
///
/// No teacher and no room may appear in two populated cells at the same
/// `(day, slot)`. A violation here is an engine bug, so it surfaces as
/// `AssemblyInvariant` rather than a caller-facing error.
///
/// # Errors
///
/// Returns `EngineError::AssemblyInvariant` naming the first double-booked
/// teacher or room.
pub fn assemble(document: TimetableDocument) -> Result<TimetableDocument, EngineError> {
    let mut teacher_seen: HashMap<(String, String, String), String> = HashMap::new();
    let mut room_seen: HashMap<(String, String, String), String> = HashMap::new();

    for (section, day, slot, cell) in document.populated_cells() {
        if let Some(teacher) = cell.teacher() {
            let key: (String, String, String) =
                (teacher.to_string(), day.to_string(), slot.to_string());
            if let Some(other) = teacher_seen.insert(key, section.to_string()) {
                return Err(EngineError::AssemblyInvariant {
                    detail: format!(
                        "teacher '{teacher}' double-booked at {day} {slot} ({other} and {section})"
                    ),
                });
            }
        }
        if let Some(room) = cell.room() {
            let key: (String, String, String) =
                (room.to_string(), day.to_string(), slot.to_string());
            if let Some(other) = room_seen.insert(key, section.to_string()) {
                return Err(EngineError::AssemblyInvariant {
                    detail: format!(
                        "room '{room}' double-booked at {day} {slot} ({other} and {section})"
                    ),
                });
            }
        }
    }

    Ok(document)
}
