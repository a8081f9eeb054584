// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tabula_domain::{Department, Room, RoomKind, Subject, SubjectKind, Teacher, Year};
use tabula_persistence::SqliteStore;

/// A store pre-populated with one department, two teachers, a classroom,
/// a lab, one lecture subject, and one practical subject.
pub fn seeded_store() -> (SqliteStore, i64) {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let department: Department = store
        .create_department(&Department::new(
            String::from("Computer"),
            String::from("2025-2026"),
            2,
            60,
        ))
        .unwrap();
    let dept_id: i64 = department.id.unwrap();

    store
        .create_teacher(&Teacher::new("SBR", String::from("S. Raskar"), None))
        .unwrap();
    store
        .create_teacher(&Teacher::new("SJN", String::from("S. Jain"), None))
        .unwrap();
    store
        .create_room(&Room::new(String::from("204"), 60, RoomKind::Classroom))
        .unwrap();
    store
        .create_room(&Room::new(String::from("LAB-2"), 30, RoomKind::Lab))
        .unwrap();
    store
        .create_subject(&Subject::new(
            "ML",
            String::from("Machine Learning"),
            dept_id,
            Year::SE,
            SubjectKind::Lecture,
            None,
            Some(2),
        ))
        .unwrap();
    store
        .create_subject(&Subject::new(
            "ML-LAB",
            String::from("Machine Learning Lab"),
            dept_id,
            Year::SE,
            SubjectKind::Practical,
            None,
            None,
        ))
        .unwrap();

    (store, dept_id)
}
