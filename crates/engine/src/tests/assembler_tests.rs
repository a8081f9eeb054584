// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assembler::assemble;
use crate::error::EngineError;
use tabula_domain::{Cell, Day, SectionGrid, SlotGrid, TimetableDocument};

fn cell(subject: &str, teacher: &str, room: &str) -> Cell {
    Cell::Lecture {
        subject: subject.to_string(),
        teacher: teacher.to_string(),
        room: room.to_string(),
    }
}

fn document_with(sections: Vec<(&str, Day, &str, Cell)>) -> TimetableDocument {
    let grid: SlotGrid = SlotGrid::standard().unwrap();
    let mut document: TimetableDocument = TimetableDocument::new(1, String::from("2025-2026"));
    for (section, day, slot, c) in sections {
        if document.section(section).is_none() {
            document
                .timetable
                .insert(section.to_string(), SectionGrid::empty(&grid));
        }
        document
            .timetable
            .get_mut(section)
            .unwrap()
            .set_cell(day, slot, c)
            .unwrap();
    }
    document
}

#[test]
fn test_consistent_document_passes() {
    let document: TimetableDocument = document_with(vec![
        ("SE_Main", Day::Monday, "9:00 am - 10:00 am", cell("ML", "SBR", "204")),
        ("TE_Main", Day::Monday, "9:00 am - 10:00 am", cell("DL", "SJN", "301")),
        ("SE_Main", Day::Tuesday, "9:00 am - 10:00 am", cell("DBMS", "SBR", "204")),
    ]);
    assert!(assemble(document).is_ok());
}

#[test]
fn test_double_booked_teacher_is_caught() {
    let document: TimetableDocument = document_with(vec![
        ("SE_Main", Day::Monday, "9:00 am - 10:00 am", cell("ML", "SBR", "204")),
        ("TE_Main", Day::Monday, "9:00 am - 10:00 am", cell("DL", "SBR", "301")),
    ]);
    let err: EngineError = assemble(document).unwrap_err();
    assert!(matches!(
        err,
        EngineError::AssemblyInvariant { ref detail } if detail.contains("teacher 'SBR'")
    ));
}

#[test]
fn test_double_booked_room_is_caught() {
    let document: TimetableDocument = document_with(vec![
        ("SE_Main", Day::Monday, "9:00 am - 10:00 am", cell("ML", "SBR", "204")),
        ("TE_Main", Day::Monday, "9:00 am - 10:00 am", cell("DL", "SJN", "204")),
    ]);
    let err: EngineError = assemble(document).unwrap_err();
    assert!(matches!(
        err,
        EngineError::AssemblyInvariant { ref detail } if detail.contains("room '204'")
    ));
}

#[test]
fn test_same_teacher_in_different_slots_passes() {
    let document: TimetableDocument = document_with(vec![
        ("SE_Main", Day::Monday, "9:00 am - 10:00 am", cell("ML", "SBR", "204")),
        ("SE_Main", Day::Monday, "10:00 am - 11:00 am", cell("ML", "SBR", "204")),
    ]);
    assert!(assemble(document).is_ok());
}
