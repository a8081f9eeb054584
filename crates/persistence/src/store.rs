// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::str::FromStr;
use tabula_domain::{
    Department, OrderedMap, Room, RoomKind, SectionGrid, Subject, SubjectKind, Teacher,
    TimetableDocument, Year,
};
use tracing::debug;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    academic_year TEXT    NOT NULL,
    num_branches  INTEGER NOT NULL,
    class_size    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS teachers (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    code           TEXT    NOT NULL UNIQUE,
    name           TEXT    NOT NULL,
    specialization TEXT
);

CREATE TABLE IF NOT EXISTS rooms (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    number   TEXT    NOT NULL UNIQUE,
    capacity INTEGER NOT NULL,
    kind     TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    code                 TEXT    NOT NULL UNIQUE,
    name                 TEXT    NOT NULL,
    department_id        INTEGER NOT NULL REFERENCES departments (id),
    year                 TEXT    NOT NULL,
    kind                 TEXT    NOT NULL,
    teacher_id           INTEGER REFERENCES teachers (id),
    occurrences_per_week INTEGER
);

CREATE TABLE IF NOT EXISTS timetables (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    department_id INTEGER NOT NULL REFERENCES departments (id),
    academic_year TEXT    NOT NULL,
    document      TEXT    NOT NULL,
    UNIQUE (department_id, academic_year)
);
";

/// The `SQLite`-backed store for all Tabula entities.
///
/// One connection per store; the server wraps it in a mutex, which is
/// sufficient for an admin tool's write volume.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens an in-memory database with the schema applied. Intended for
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` if the database cannot be opened
    /// or the schema fails to apply.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Opens (creating if needed) a file-backed database with the schema
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` if the database cannot be opened
    /// or the schema fails to apply.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ---- departments ----

    /// Inserts a department, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn create_department(
        &self,
        department: &Department,
    ) -> Result<Department, PersistenceError> {
        self.conn.execute(
            "INSERT INTO departments (name, academic_year, num_branches, class_size)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                department.name,
                department.academic_year,
                department.num_branches,
                department.class_size
            ],
        )?;
        let id: i64 = self.conn.last_insert_rowid();
        debug!(id, name = %department.name, "department created");
        self.get_department(id)
    }

    /// Fetches a department by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such department exists.
    pub fn get_department(&self, id: i64) -> Result<Department, PersistenceError> {
        self.conn
            .query_row(
                "SELECT id, name, academic_year, num_branches, class_size
                 FROM departments WHERE id = ?1",
                params![id],
                department_from_row,
            )
            .optional()?
            .ok_or(PersistenceError::NotFound {
                entity: "department",
                id,
            })
    }

    /// Lists all departments in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn list_departments(&self) -> Result<Vec<Department>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, academic_year, num_branches, class_size
             FROM departments ORDER BY id",
        )?;
        let rows = stmt.query_map([], department_from_row)?;
        rows.collect::<Result<Vec<Department>, rusqlite::Error>>()
            .map_err(PersistenceError::from)
    }

    /// Replaces a department's fields.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such department exists.
    pub fn update_department(
        &self,
        id: i64,
        department: &Department,
    ) -> Result<Department, PersistenceError> {
        let changed: usize = self.conn.execute(
            "UPDATE departments
             SET name = ?1, academic_year = ?2, num_branches = ?3, class_size = ?4
             WHERE id = ?5",
            params![
                department.name,
                department.academic_year,
                department.num_branches,
                department.class_size,
                id
            ],
        )?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: "department",
                id,
            });
        }
        self.get_department(id)
    }

    /// Deletes a department.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::ReferencedByTimetable` if the department still
    ///   owns a stored timetable
    /// * `PersistenceError::NotFound` if no such department exists
    pub fn delete_department(&self, id: i64) -> Result<(), PersistenceError> {
        let referenced: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM timetables WHERE department_id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if referenced {
            return Err(PersistenceError::ReferencedByTimetable {
                entity: "department",
                id,
            });
        }
        self.conn
            .execute("DELETE FROM subjects WHERE department_id = ?1", params![id])?;
        let changed: usize = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: "department",
                id,
            });
        }
        Ok(())
    }

    // ---- teachers ----

    /// Inserts a teacher, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateValue` if the code is taken.
    pub fn create_teacher(&self, teacher: &Teacher) -> Result<Teacher, PersistenceError> {
        self.conn
            .execute(
                "INSERT INTO teachers (code, name, specialization) VALUES (?1, ?2, ?3)",
                params![teacher.code, teacher.name, teacher.specialization],
            )
            .map_err(|e| map_unique(e, "teacher", &teacher.code))?;
        self.get_teacher(self.conn.last_insert_rowid())
    }

    /// Fetches a teacher by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such teacher exists.
    pub fn get_teacher(&self, id: i64) -> Result<Teacher, PersistenceError> {
        self.conn
            .query_row(
                "SELECT id, code, name, specialization FROM teachers WHERE id = ?1",
                params![id],
                teacher_from_row,
            )
            .optional()?
            .ok_or(PersistenceError::NotFound {
                entity: "teacher",
                id,
            })
    }

    /// Lists all teachers in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn list_teachers(&self) -> Result<Vec<Teacher>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, code, name, specialization FROM teachers ORDER BY id")?;
        let rows = stmt.query_map([], teacher_from_row)?;
        rows.collect::<Result<Vec<Teacher>, rusqlite::Error>>()
            .map_err(PersistenceError::from)
    }

    /// Replaces a teacher's fields.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::DuplicateValue` if the new code is taken
    /// * `PersistenceError::NotFound` if no such teacher exists
    pub fn update_teacher(&self, id: i64, teacher: &Teacher) -> Result<Teacher, PersistenceError> {
        let changed: usize = self
            .conn
            .execute(
                "UPDATE teachers SET code = ?1, name = ?2, specialization = ?3 WHERE id = ?4",
                params![teacher.code, teacher.name, teacher.specialization, id],
            )
            .map_err(|e| map_unique(e, "teacher", &teacher.code))?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: "teacher",
                id,
            });
        }
        self.get_teacher(id)
    }

    /// Deletes a teacher, unpinning any subjects that referenced it.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::ReferencedByTimetable` if the teacher appears
    ///   in a stored timetable
    /// * `PersistenceError::NotFound` if no such teacher exists
    pub fn delete_teacher(&self, id: i64) -> Result<(), PersistenceError> {
        let teacher: Teacher = self.get_teacher(id)?;
        if self.timetable_mentions(|cell| cell.teacher() == Some(teacher.code.as_str()))? {
            return Err(PersistenceError::ReferencedByTimetable {
                entity: "teacher",
                id,
            });
        }
        self.conn.execute(
            "UPDATE subjects SET teacher_id = NULL WHERE teacher_id = ?1",
            params![id],
        )?;
        self.conn
            .execute("DELETE FROM teachers WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ---- rooms ----

    /// Inserts a room, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateValue` if the number is taken.
    pub fn create_room(&self, room: &Room) -> Result<Room, PersistenceError> {
        self.conn
            .execute(
                "INSERT INTO rooms (number, capacity, kind) VALUES (?1, ?2, ?3)",
                params![room.number, room.capacity, room.kind.as_str()],
            )
            .map_err(|e| map_unique(e, "room", &room.number))?;
        self.get_room(self.conn.last_insert_rowid())
    }

    /// Fetches a room by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such room exists.
    pub fn get_room(&self, id: i64) -> Result<Room, PersistenceError> {
        self.conn
            .query_row(
                "SELECT id, number, capacity, kind FROM rooms WHERE id = ?1",
                params![id],
                room_from_row,
            )
            .optional()?
            .ok_or(PersistenceError::NotFound { entity: "room", id })
    }

    /// Lists all rooms in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn list_rooms(&self) -> Result<Vec<Room>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, number, capacity, kind FROM rooms ORDER BY id")?;
        let rows = stmt.query_map([], room_from_row)?;
        rows.collect::<Result<Vec<Room>, rusqlite::Error>>()
            .map_err(PersistenceError::from)
    }

    /// Replaces a room's fields.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::DuplicateValue` if the new number is taken
    /// * `PersistenceError::NotFound` if no such room exists
    pub fn update_room(&self, id: i64, room: &Room) -> Result<Room, PersistenceError> {
        let changed: usize = self
            .conn
            .execute(
                "UPDATE rooms SET number = ?1, capacity = ?2, kind = ?3 WHERE id = ?4",
                params![room.number, room.capacity, room.kind.as_str(), id],
            )
            .map_err(|e| map_unique(e, "room", &room.number))?;
        if changed == 0 {
            return Err(PersistenceError::NotFound { entity: "room", id });
        }
        self.get_room(id)
    }

    /// Deletes a room.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::ReferencedByTimetable` if the room appears in a
    ///   stored timetable
    /// * `PersistenceError::NotFound` if no such room exists
    pub fn delete_room(&self, id: i64) -> Result<(), PersistenceError> {
        let room: Room = self.get_room(id)?;
        if self.timetable_mentions(|cell| cell.room() == Some(room.number.as_str()))? {
            return Err(PersistenceError::ReferencedByTimetable { entity: "room", id });
        }
        self.conn
            .execute("DELETE FROM rooms WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ---- subjects ----

    /// Inserts a subject, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::DuplicateValue` if the code is taken
    /// * `PersistenceError::Sqlite` if the department or pinned teacher
    ///   does not exist (foreign key violation)
    pub fn create_subject(&self, subject: &Subject) -> Result<Subject, PersistenceError> {
        self.conn
            .execute(
                "INSERT INTO subjects
                 (code, name, department_id, year, kind, teacher_id, occurrences_per_week)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    subject.code,
                    subject.name,
                    subject.department_id,
                    subject.year.as_str(),
                    subject.kind.as_str(),
                    subject.teacher_id,
                    subject.occurrences_per_week
                ],
            )
            .map_err(|e| map_unique(e, "subject", &subject.code))?;
        self.get_subject(self.conn.last_insert_rowid())
    }

    /// Fetches a subject by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such subject exists.
    pub fn get_subject(&self, id: i64) -> Result<Subject, PersistenceError> {
        self.conn
            .query_row(
                "SELECT id, code, name, department_id, year, kind, teacher_id,
                        occurrences_per_week
                 FROM subjects WHERE id = ?1",
                params![id],
                subject_from_row,
            )
            .optional()?
            .ok_or(PersistenceError::NotFound {
                entity: "subject",
                id,
            })
    }

    /// Lists all subjects in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn list_subjects(&self) -> Result<Vec<Subject>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, code, name, department_id, year, kind, teacher_id,
                    occurrences_per_week
             FROM subjects ORDER BY id",
        )?;
        let rows = stmt.query_map([], subject_from_row)?;
        rows.collect::<Result<Vec<Subject>, rusqlite::Error>>()
            .map_err(PersistenceError::from)
    }

    /// Lists the subjects owned by one department, in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Sqlite` on database failure.
    pub fn list_subjects_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Subject>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, code, name, department_id, year, kind, teacher_id,
                    occurrences_per_week
             FROM subjects WHERE department_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![department_id], subject_from_row)?;
        rows.collect::<Result<Vec<Subject>, rusqlite::Error>>()
            .map_err(PersistenceError::from)
    }

    /// Replaces a subject's fields.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::DuplicateValue` if the new code is taken
    /// * `PersistenceError::NotFound` if no such subject exists
    pub fn update_subject(&self, id: i64, subject: &Subject) -> Result<Subject, PersistenceError> {
        let changed: usize = self
            .conn
            .execute(
                "UPDATE subjects
                 SET code = ?1, name = ?2, department_id = ?3, year = ?4, kind = ?5,
                     teacher_id = ?6, occurrences_per_week = ?7
                 WHERE id = ?8",
                params![
                    subject.code,
                    subject.name,
                    subject.department_id,
                    subject.year.as_str(),
                    subject.kind.as_str(),
                    subject.teacher_id,
                    subject.occurrences_per_week,
                    id
                ],
            )
            .map_err(|e| map_unique(e, "subject", &subject.code))?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: "subject",
                id,
            });
        }
        self.get_subject(id)
    }

    /// Deletes a subject.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::ReferencedByTimetable` if the subject appears
    ///   in a stored timetable
    /// * `PersistenceError::NotFound` if no such subject exists
    pub fn delete_subject(&self, id: i64) -> Result<(), PersistenceError> {
        let subject: Subject = self.get_subject(id)?;
        if self.timetable_mentions(|cell| cell.subject() == Some(subject.code.as_str()))? {
            return Err(PersistenceError::ReferencedByTimetable {
                entity: "subject",
                id,
            });
        }
        self.conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ---- timetables ----

    /// Inserts or replaces the timetable document for the document's
    /// `(department_id, academic_year)` pair, returning it with its
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Serialization` or `Sqlite` on failure.
    pub fn upsert_timetable(
        &self,
        document: &TimetableDocument,
    ) -> Result<TimetableDocument, PersistenceError> {
        let json: String = serde_json::to_string(&document.timetable)?;
        self.conn.execute(
            "INSERT INTO timetables (department_id, academic_year, document)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (department_id, academic_year)
             DO UPDATE SET document = excluded.document",
            params![document.department_id, document.academic_year, json],
        )?;
        debug!(
            department_id = document.department_id,
            academic_year = %document.academic_year,
            "timetable document stored"
        );
        self.find_timetable(document.department_id, &document.academic_year)?
            .ok_or(PersistenceError::NotFound {
                entity: "timetable",
                id: document.department_id,
            })
    }

    /// Fetches a timetable document by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such timetable exists.
    pub fn get_timetable(&self, id: i64) -> Result<TimetableDocument, PersistenceError> {
        let row: Option<(i64, i64, String, String)> = self
            .conn
            .query_row(
                "SELECT id, department_id, academic_year, document
                 FROM timetables WHERE id = ?1",
                params![id],
                timetable_row,
            )
            .optional()?;
        row.map_or(
            Err(PersistenceError::NotFound {
                entity: "timetable",
                id,
            }),
            document_from_parts,
        )
    }

    /// Fetches the timetable document for a department and academic year,
    /// if one is stored.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Serialization` or `Sqlite` on failure.
    pub fn find_timetable(
        &self,
        department_id: i64,
        academic_year: &str,
    ) -> Result<Option<TimetableDocument>, PersistenceError> {
        let row: Option<(i64, i64, String, String)> = self
            .conn
            .query_row(
                "SELECT id, department_id, academic_year, document
                 FROM timetables WHERE department_id = ?1 AND academic_year = ?2",
                params![department_id, academic_year],
                timetable_row,
            )
            .optional()?;
        row.map(document_from_parts).transpose()
    }

    /// Lists all timetable documents in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Serialization` or `Sqlite` on failure.
    pub fn list_timetables(&self) -> Result<Vec<TimetableDocument>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, department_id, academic_year, document
             FROM timetables ORDER BY id",
        )?;
        let rows = stmt.query_map([], timetable_row)?;
        let mut documents: Vec<TimetableDocument> = Vec::new();
        for row in rows {
            documents.push(document_from_parts(row?)?);
        }
        Ok(documents)
    }

    /// Lists one department's timetable documents in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Serialization` or `Sqlite` on failure.
    pub fn list_timetables_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<TimetableDocument>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, department_id, academic_year, document
             FROM timetables WHERE department_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![department_id], timetable_row)?;
        let mut documents: Vec<TimetableDocument> = Vec::new();
        for row in rows {
            documents.push(document_from_parts(row?)?);
        }
        Ok(documents)
    }

    /// Deletes a timetable document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such timetable exists.
    pub fn delete_timetable(&self, id: i64) -> Result<(), PersistenceError> {
        let changed: usize = self
            .conn
            .execute("DELETE FROM timetables WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: "timetable",
                id,
            });
        }
        Ok(())
    }

    /// Whether any populated cell of any stored timetable matches the
    /// predicate.
    fn timetable_mentions(
        &self,
        pred: impl Fn(&tabula_domain::Cell) -> bool,
    ) -> Result<bool, PersistenceError> {
        for document in self.list_timetables()? {
            if document.populated_cells().any(|(_, _, _, cell)| pred(cell)) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department::with_id(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn teacher_from_row(row: &Row<'_>) -> rusqlite::Result<Teacher> {
    let code: String = row.get(1)?;
    Ok(Teacher::with_id(
        row.get(0)?,
        &code,
        row.get(2)?,
        row.get(3)?,
    ))
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    let kind: String = row.get(3)?;
    let kind: RoomKind = RoomKind::from_str(&kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Room::with_id(row.get(0)?, row.get(1)?, row.get(2)?, kind))
}

fn subject_from_row(row: &Row<'_>) -> rusqlite::Result<Subject> {
    let code: String = row.get(1)?;
    let year: String = row.get(4)?;
    let year: Year = Year::from_str(&year)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let kind: String = row.get(5)?;
    let kind: SubjectKind = SubjectKind::from_str(&kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Subject::with_id(
        row.get(0)?,
        &code,
        row.get(2)?,
        row.get(3)?,
        year,
        kind,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn timetable_row(row: &Row<'_>) -> rusqlite::Result<(i64, i64, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn document_from_parts(
    (id, department_id, academic_year, json): (i64, i64, String, String),
) -> Result<TimetableDocument, PersistenceError> {
    let timetable: OrderedMap<SectionGrid> = serde_json::from_str(&json)?;
    let mut document: TimetableDocument = TimetableDocument::new(department_id, academic_year);
    document.id = Some(id);
    document.timetable = timetable;
    Ok(document)
}

fn map_unique(err: rusqlite::Error, entity: &'static str, value: &str) -> PersistenceError {
    // 1555 / 2067 are the primary-key and unique-constraint extended codes;
    // other constraint violations (foreign keys) pass through unchanged.
    if let rusqlite::Error::SqliteFailure(failure, _) = &err
        && failure.code == rusqlite::ErrorCode::ConstraintViolation
        && matches!(failure.extended_code, 1555 | 2067)
    {
        return PersistenceError::DuplicateValue {
            entity,
            value: value.to_string(),
        };
    }
    PersistenceError::Sqlite(err)
}
