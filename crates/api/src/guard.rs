// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Tracks which `(department, academic year)` pairs have a generation run
/// in flight.
///
/// A second request for the same pair is rejected instead of queued; runs
/// for other departments proceed independently. Permits release on drop,
/// so an engine error can never leave a pair stuck busy.
#[derive(Debug, Default)]
pub struct GenerationGuard {
    active: Mutex<HashSet<(i64, String)>>,
}

impl GenerationGuard {
    /// Creates a guard with no runs in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim the pair, returning `None` if a run already holds
    /// it.
    #[must_use]
    pub fn try_acquire(
        self: &Arc<Self>,
        department_id: i64,
        academic_year: &str,
    ) -> Option<GenerationPermit> {
        let key: (i64, String) = (department_id, academic_year.to_string());
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            return None;
        }
        Some(GenerationPermit {
            guard: Arc::clone(self),
            key,
        })
    }

    fn release(&self, key: &(i64, String)) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// An exclusive claim on one `(department, academic year)` generation run.
#[derive(Debug)]
pub struct GenerationPermit {
    guard: Arc<GenerationGuard>,
    key: (i64, String),
}

impl Drop for GenerationPermit {
    fn drop(&mut self) {
        self.guard.release(&self.key);
    }
}
