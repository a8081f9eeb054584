// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::slot_grid::SlotGrid;
use crate::types::Day;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::marker::PhantomData;

/// A JSON-object map that preserves insertion order.
///
/// Timetable documents are keyed by section, day, and slot label; the
/// viewer relies on those keys staying in chronological order, and the
/// determinism guarantee requires byte-stable serialization. A sorted map
/// would reorder "1:45 pm" ahead of "9:00 am", so insertion order is kept
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

// Not derived: the derive would bound `V: Default`, which `Cell` does not
// satisfy.
impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a key, replacing the value in place if the key exists.
    pub fn insert(&mut self, key: String, value: V) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Looks up a value by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Checks whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V> {
    marker: PhantomData<V>,
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map: OrderedMap<V> = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: PhantomData,
        })
    }
}

/// One cell of a timetable grid.
///
/// Tagged variants instead of a loose field bag: a populated cell always
/// carries its subject/teacher/room codes, a break carries nothing, and an
/// empty cell is explicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    /// A whole-class lecture.
    Lecture {
        /// Subject code.
        subject: String,
        /// Teacher code.
        teacher: String,
        /// Room number.
        room: String,
    },
    /// A batch practical.
    Practical {
        /// Subject code.
        subject: String,
        /// Teacher code.
        teacher: String,
        /// Room number.
        room: String,
        /// Batch key (`"B1"`..).
        batch: String,
    },
    /// A designated break.
    Break,
    /// No assignment.
    Empty,
}

impl Cell {
    /// Whether this cell holds an assignment (not a break, not empty).
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        matches!(self, Self::Lecture { .. } | Self::Practical { .. })
    }

    /// The teacher code, if populated.
    #[must_use]
    pub fn teacher(&self) -> Option<&str> {
        match self {
            Self::Lecture { teacher, .. } | Self::Practical { teacher, .. } => {
                Some(teacher.as_str())
            }
            Self::Break | Self::Empty => None,
        }
    }

    /// The room number, if populated.
    #[must_use]
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::Lecture { room, .. } | Self::Practical { room, .. } => Some(room.as_str()),
            Self::Break | Self::Empty => None,
        }
    }

    /// The subject code, if populated.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Lecture { subject, .. } | Self::Practical { subject, .. } => {
                Some(subject.as_str())
            }
            Self::Break | Self::Empty => None,
        }
    }
}

/// One section's weekly grid: day -> slot label -> cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionGrid {
    rows: OrderedMap<OrderedMap<Cell>>,
}

impl SectionGrid {
    /// Creates a grid for all working days with break cells pre-filled and
    /// every other slot empty.
    #[must_use]
    pub fn empty(grid: &SlotGrid) -> Self {
        let mut rows: OrderedMap<OrderedMap<Cell>> = OrderedMap::new();
        for day in Day::ALL {
            let mut cells: OrderedMap<Cell> = OrderedMap::new();
            for slot in grid.slots() {
                let cell: Cell = if slot.is_break { Cell::Break } else { Cell::Empty };
                cells.insert(slot.label.clone(), cell);
            }
            rows.insert(day.as_str().to_string(), cells);
        }
        Self { rows }
    }

    /// Looks up the cell at a day/slot key.
    #[must_use]
    pub fn cell(&self, day: Day, slot_label: &str) -> Option<&Cell> {
        self.rows.get(day.as_str()).and_then(|r| r.get(slot_label))
    }

    /// Replaces the cell at a day/slot key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownGridKey` if the grid has no such cell.
    pub fn set_cell(&mut self, day: Day, slot_label: &str, cell: Cell) -> Result<(), DomainError> {
        let row: &mut OrderedMap<Cell> =
            self.rows
                .get_mut(day.as_str())
                .ok_or_else(|| DomainError::UnknownGridKey {
                    day: day.as_str().to_string(),
                    slot: slot_label.to_string(),
                })?;
        if !row.contains_key(slot_label) {
            return Err(DomainError::UnknownGridKey {
                day: day.as_str().to_string(),
                slot: slot_label.to_string(),
            });
        }
        row.insert(slot_label.to_string(), cell);
        Ok(())
    }

    /// Iterates `(day key, slot label, cell)` over all cells, in order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, &Cell)> {
        self.rows
            .iter()
            .flat_map(|(day, row)| row.iter().map(move |(slot, cell)| (day, slot, cell)))
    }

    /// Iterates only populated cells.
    pub fn populated_cells(&self) -> impl Iterator<Item = (&str, &str, &Cell)> {
        self.cells().filter(|(_, _, c)| c.is_populated())
    }

    /// The day rows, in insertion order.
    #[must_use]
    pub const fn rows(&self) -> &OrderedMap<OrderedMap<Cell>> {
        &self.rows
    }
}

/// The persisted timetable document for one `(department, academic_year)`.
///
/// Created by the generator or by import, read-only afterwards, and
/// replaced whole on regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableDocument {
    /// Canonical identifier assigned by the store. `None` before first save.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    /// The owning department.
    pub department_id: i64,
    /// The academic year label this document was generated for.
    pub academic_year: String,
    /// Section key (`"SE_Main"`, `"SE_B1"`, ..) -> weekly grid.
    pub timetable: OrderedMap<SectionGrid>,
}

impl TimetableDocument {
    /// Creates an empty document for a department and academic year.
    #[must_use]
    pub const fn new(department_id: i64, academic_year: String) -> Self {
        Self {
            id: None,
            department_id,
            academic_year,
            timetable: OrderedMap::new(),
        }
    }

    /// Looks up one section's grid by key.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&SectionGrid> {
        self.timetable.get(key)
    }

    /// Iterates `(section key, day, slot label, cell)` over populated cells
    /// of every section.
    pub fn populated_cells(&self) -> impl Iterator<Item = (&str, &str, &str, &Cell)> {
        self.timetable.iter().flat_map(|(section, grid)| {
            grid.populated_cells()
                .map(move |(day, slot, cell)| (section, day, slot, cell))
        })
    }
}
