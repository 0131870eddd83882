/*!
 * Memory Manager Tests
 * Construction, allocation, deallocation, and statistics
 */

use memsim::memory::{
    validation, Allocator, MemoryError, MemoryInfo, MemoryManager, MemoryPressure, MemoryStats,
};
use pretty_assertions::assert_eq;

#[test]
fn test_memory_manager_initialization() {
    let mm = MemoryManager::new(1024).unwrap();
    let (total, used, available) = mm.info();

    assert_eq!(total, 1024);
    assert_eq!(used, 0);
    assert_eq!(available, total);
    assert_eq!(mm.blocks().len(), 1);
    assert_eq!(
        mm.stats(),
        MemoryStats {
            capacity: 1024,
            used_total: 0,
            free_total: 1024,
            free_block_count: 1,
            largest_free_block: 1024,
            allocated_block_count: 0,
            pressure: MemoryPressure::Low,
        }
    );
}

#[test]
fn test_zero_capacity_rejected() {
    let result = MemoryManager::new(0);
    assert!(matches!(
        result,
        Err(MemoryError::InvalidCapacity { requested: 0 })
    ));
}

#[test]
fn test_negative_capacity_rejected_by_validation() {
    assert_eq!(
        validation::capacity(-5),
        Err(MemoryError::InvalidCapacity { requested: -5 })
    );
}

#[test]
fn test_invalid_sizes() {
    let mut mm = MemoryManager::new(1024).unwrap();

    assert_eq!(mm.allocate(0), Err(MemoryError::InvalidSize { requested: 0 }));
    assert_eq!(
        validation::size(-1).and_then(|size| mm.allocate(size)),
        Err(MemoryError::InvalidSize { requested: -1 })
    );
    assert_eq!(mm.counters().allocations, 0);
}

#[test]
fn test_multiple_allocations() {
    let mut mm = MemoryManager::new(1024).unwrap();

    let b1 = mm.allocate(100).unwrap();
    let b2 = mm.allocate(200).unwrap();
    let b3 = mm.allocate(300).unwrap();

    assert_eq!(mm.block_size(b1), Some(100));
    assert_eq!(mm.block_size(b2), Some(200));
    assert_eq!(mm.block_size(b3), Some(300));

    let stats = mm.stats();
    assert_eq!(stats.used_total, 600);
    assert_eq!(stats.free_total, 424);
    assert_eq!(stats.allocated_block_count, 3);
}

#[test]
fn test_allocation_and_deallocation() {
    let mut mm = MemoryManager::new(1024).unwrap();

    let b1 = mm.allocate(100).unwrap();
    let b2 = mm.allocate(100).unwrap();
    mm.free(b1).unwrap();
    mm.free(b2).unwrap();

    let (_, used, free) = mm.info();
    assert_eq!(used, 0);
    assert_eq!(free, 1024);
    // Three separate free blocks until something forces a merge
    assert_eq!(mm.stats().free_block_count, 3);
    assert_eq!(mm.stats().largest_free_block, 824);
}

#[test]
fn test_foreign_handle_rejected() {
    let mut mm = MemoryManager::new(1024).unwrap();
    let mut other = MemoryManager::new(1024).unwrap();
    let b1 = mm.allocate(100).unwrap();
    other.allocate(100).unwrap();

    assert_ne!(mm.id(), other.id());
    assert_eq!(other.free(b1), Err(MemoryError::InvalidHandle(b1)));
    assert!(mm.is_allocated(b1));
}

#[test]
fn test_manager_ids_increase() {
    let first = MemoryManager::new(10).unwrap();
    let second = MemoryManager::new(10).unwrap();
    let mut third = MemoryManager::new(10).unwrap();

    assert!(first.id() < second.id());
    assert!(second.id() < third.id());

    let handle = third.allocate(5).unwrap();
    assert_eq!(handle.manager(), third.id());
    assert_eq!(handle.sequence(), 1);
}

#[test]
fn test_independent_managers_do_not_share_state() {
    let mut first = MemoryManager::new(100).unwrap();
    let second = MemoryManager::new(100).unwrap();

    first.allocate(60).unwrap();

    assert_eq!(first.stats().used_total, 60);
    assert_eq!(second.stats().used_total, 0);
}

#[test]
fn test_counters_track_peak_usage() {
    let mut mm = MemoryManager::new(1000).unwrap();
    let a = mm.allocate(300).unwrap();
    let b = mm.allocate(400).unwrap();
    mm.free(a).unwrap();
    mm.free(b).unwrap();
    mm.allocate(100).unwrap();

    let counters = mm.counters();
    assert_eq!(counters.allocations, 3);
    assert_eq!(counters.frees, 2);
    assert_eq!(counters.current_used, 100);
    assert_eq!(counters.peak_used, 700);
}

#[test]
fn test_builder_thresholds_drive_pressure() {
    let mut mm = MemoryManager::builder()
        .with_capacity(100)
        .with_warning_threshold(0.5)
        .with_critical_threshold(0.7)
        .build()
        .unwrap();

    mm.allocate(55).unwrap();
    assert_eq!(mm.pressure(), MemoryPressure::High);
    assert_eq!(mm.stats().pressure, MemoryPressure::High);

    mm.allocate(20).unwrap();
    assert_eq!(MemoryInfo::pressure(&mm), MemoryPressure::Critical);
}

#[test]
fn test_usage_percentage() {
    let mut mm = MemoryManager::new(200).unwrap();
    mm.allocate(50).unwrap();

    assert_eq!(mm.stats().usage_percentage(), 25.0);
}

#[test]
fn test_trait_interfaces() {
    fn churn<A: Allocator + MemoryInfo>(allocator: &mut A) -> usize {
        let handle = allocator.allocate(10).unwrap();
        assert!(allocator.is_allocated(handle));
        assert_eq!(allocator.block_size(handle), Some(10));
        allocator.free(handle).unwrap();
        assert!(!allocator.is_allocated(handle));
        allocator.info().1
    }

    let mut mm = MemoryManager::new(100).unwrap();
    assert_eq!(churn(&mut mm), 0);
}

#[test]
fn test_validate_after_mixed_operations() {
    let mut mm = MemoryManager::new(500).unwrap();
    let handles: Vec<_> = (1..=5).map(|i| mm.allocate(i * 20).unwrap()).collect();
    mm.free(handles[1]).unwrap();
    mm.free(handles[3]).unwrap();
    mm.defragment();

    assert_eq!(mm.validate(), Ok(()));
}
