// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for Tabula.
//!
//! Entities (departments, teachers, rooms, subjects) live in normal tables;
//! timetable documents are stored as a single `JSON` column keyed by
//! `(department_id, academic_year)`, since a document is only ever written
//! and read whole. In-memory databases back unit tests, a file-backed
//! database backs the server.

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
#![allow(clippy::multiple_crate_versions)]

mod error;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::PersistenceError;
pub use store::SqliteStore;
