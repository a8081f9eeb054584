// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::guard::GenerationGuard;
use std::sync::Arc;

#[test]
fn test_second_acquire_of_same_pair_fails() {
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let held = guard.try_acquire(1, "2025-2026");
    assert!(held.is_some());
    assert!(guard.try_acquire(1, "2025-2026").is_none());
}

#[test]
fn test_other_pairs_are_independent() {
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let _held = guard.try_acquire(1, "2025-2026").unwrap();
    assert!(guard.try_acquire(2, "2025-2026").is_some());
    assert!(guard.try_acquire(1, "2024-2025").is_some());
}

#[test]
fn test_dropping_the_permit_releases_the_pair() {
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let held = guard.try_acquire(1, "2025-2026").unwrap();
    drop(held);
    assert!(guard.try_acquire(1, "2025-2026").is_some());
}
