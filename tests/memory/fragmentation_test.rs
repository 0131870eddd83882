/*!
 * Fragmentation Tests
 * Lazy coalescing behaviour when free space is split by live blocks
 */

use memsim::memory::{MemoryError, MemoryManager};
use pretty_assertions::assert_eq;

/// Five 100-unit blocks in a 600-unit space with the 2nd and 4th freed:
/// [A 0-100][F 100-200][A 200-300][F 300-400][A 400-500][F 500-600]
fn checkerboard() -> MemoryManager {
    let mut mm = MemoryManager::new(600).unwrap();
    let handles: Vec<_> = (0..5).map(|_| mm.allocate(100).unwrap()).collect();
    mm.free(handles[1]).unwrap();
    mm.free(handles[3]).unwrap();
    mm
}

#[test]
fn test_separated_free_space_cannot_be_combined() {
    let mut mm = checkerboard();
    let stats = mm.stats();
    assert!(stats.is_fragmented_for(300));

    let result = mm.allocate(300);

    assert_eq!(
        result,
        Err(MemoryError::OutOfMemory {
            requested: 300,
            available: 300,
            largest_free: 100,
        })
    );
    // The pass ran but allocated separators kept every extent apart
    assert_eq!(mm.counters().defragmentations, 1);
    assert_eq!(mm.counters().merged_blocks, 0);
    assert_eq!(mm.blocks().len(), 6);
}

#[test]
fn test_out_of_memory_reports_requested_and_available() {
    let mut mm = checkerboard();

    match mm.allocate(400) {
        Err(MemoryError::OutOfMemory {
            requested,
            available,
            ..
        }) => {
            assert_eq!(requested, 400);
            assert_eq!(available, 300);
        }
        other => panic!("Expected OutOfMemory error, got {:?}", other),
    }
}

#[test]
fn test_small_requests_still_fit_into_holes() {
    let mut mm = checkerboard();

    let h = mm.allocate(100).unwrap();

    assert_eq!(mm.block(h).unwrap().offset, 100);
    assert_eq!(mm.counters().defragmentations, 0);
}

#[test]
fn test_freeing_a_separator_lets_fallback_merge_the_run() {
    let mut mm = MemoryManager::new(600).unwrap();
    let handles: Vec<_> = (0..5).map(|_| mm.allocate(100).unwrap()).collect();
    mm.free(handles[1]).unwrap();
    mm.free(handles[2]).unwrap();
    mm.free(handles[3]).unwrap();

    let h = mm.allocate(300).unwrap();

    assert_eq!(mm.block(h).unwrap().offset, 100);
    let layout: Vec<String> = mm.blocks().iter().map(ToString::to_string).collect();
    assert_eq!(
        layout,
        vec![
            "[Allocated 0-100]",
            "[Allocated 100-400]",
            "[Allocated 400-500]",
            "[Free 500-600]",
        ]
    );
}

#[test]
fn test_explicit_defragment_leaves_no_adjacent_free_blocks() {
    let mut mm = MemoryManager::new(100).unwrap();
    let handles: Vec<_> = (0..10).map(|_| mm.allocate(10).unwrap()).collect();
    for (i, handle) in handles.iter().enumerate() {
        if i % 3 != 0 {
            mm.free(*handle).unwrap();
        }
    }

    let report = mm.defragment();

    assert!(report.merged() > 0);
    assert!(mm
        .blocks()
        .windows(2)
        .all(|pair| !(pair[0].is_free() && pair[1].is_free())));
    assert_eq!(mm.stats().used_total, 40);
}
