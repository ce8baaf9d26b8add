//! Heap allocation counters.
//!
//! [`CountingAllocator`] wraps the system allocator and counts every
//! allocation and free. A binary opts in by installing it as its
//! `#[global_allocator]`; otherwise every counter stays at zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static TOTAL_BYTES: AtomicU64 = AtomicU64::new(0);
static MALLOCS: AtomicU64 = AtomicU64::new(0);
static FREES: AtomicU64 = AtomicU64::new(0);

/// System allocator that keeps process-wide allocation counters.
pub struct CountingAllocator;

impl CountingAllocator {
    fn record_alloc(size: usize) {
        LIVE_BYTES.fetch_add(size as u64, Ordering::Relaxed);
        TOTAL_BYTES.fetch_add(size as u64, Ordering::Relaxed);
        MALLOCS.fetch_add(1, Ordering::Relaxed);
    }

    fn record_free(size: usize) {
        LIVE_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
        FREES.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            Self::record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            Self::record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        Self::record_free(layout.size());
    }

    // Counted as a free of the old block plus an allocation of the new one.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            Self::record_free(layout.size());
            Self::record_alloc(new_size);
        }
        new_ptr
    }
}

/// Point-in-time allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Bytes currently allocated.
    pub alloc: u64,
    /// Bytes allocated since start, never decreasing.
    pub total_alloc: u64,
    /// Allocations since start.
    pub mallocs: u64,
    /// Frees since start.
    pub frees: u64,
}

impl AllocStats {
    /// Live heap blocks.
    pub fn heap_objects(&self) -> u64 {
        self.mallocs.saturating_sub(self.frees)
    }
}

/// Read the counters kept by [`CountingAllocator`].
pub fn alloc_stats() -> AllocStats {
    AllocStats {
        alloc: LIVE_BYTES.load(Ordering::Relaxed),
        total_alloc: TOTAL_BYTES.load(Ordering::Relaxed),
        mallocs: MALLOCS.load(Ordering::Relaxed),
        frees: FREES.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
#[global_allocator]
static TEST_ALLOCATOR: CountingAllocator = CountingAllocator;
