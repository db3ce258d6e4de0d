#![cfg(feature = "count-alloc")]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use html_prescan::perf_fixtures::{make_blocks, make_late_declaration};
use html_prescan::{
    EncodingSniffer, MetaScanner, ScanOutcome, ScannerConfig, SliceSource, SniffResult,
    SnifferConfig,
};

// Counts allocation and realloc events while enabled; not live heap usage.
struct CountingAlloc;

static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);
static ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);
static REALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);
static ENABLED: AtomicBool = AtomicBool::new(false);
static SERIAL: Mutex<()> = Mutex::new(());

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
            ALLOC_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            REALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
            let old_size = layout.size();
            if new_size > old_size {
                ALLOC_BYTES.fetch_add(new_size - old_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn alloc_counts() -> (usize, usize, usize) {
    (
        ALLOC_COUNT.load(Ordering::Relaxed),
        ALLOC_BYTES.load(Ordering::Relaxed),
        REALLOC_COUNT.load(Ordering::Relaxed),
    )
}

struct AllocGuard {
    _serial: std::sync::MutexGuard<'static, ()>,
}

impl AllocGuard {
    fn new() -> Self {
        let serial = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        ALLOC_COUNT.store(0, Ordering::Relaxed);
        ALLOC_BYTES.store(0, Ordering::Relaxed);
        REALLOC_COUNT.store(0, Ordering::Relaxed);
        ENABLED.store(true, Ordering::Relaxed);
        Self { _serial: serial }
    }
}

impl Drop for AllocGuard {
    fn drop(&mut self) {
        ENABLED.store(false, Ordering::Relaxed);
    }
}

#[test]
fn scanning_markup_without_declarations_does_not_allocate() {
    let doc = make_blocks(20_000);
    let mut scanner = MetaScanner::new(ScannerConfig::default());
    let mut calls = 0usize;

    let guard = AllocGuard::new();
    let outcome = scanner.scan(&mut SliceSource::new(doc.as_bytes()), &mut |_: &str| {
        calls += 1;
        false
    });
    let (allocs, bytes, reallocs) = alloc_counts();
    drop(guard);

    assert_eq!(outcome, ScanOutcome::Exhausted);
    assert_eq!(calls, 0);
    assert_eq!(
        (allocs, bytes, reallocs),
        (0, 0, 0),
        "scan of {} bytes allocated",
        doc.len()
    );
}

#[test]
fn ascii_candidates_are_offered_without_allocating() {
    let mut doc = String::new();
    for _ in 0..1_000 {
        doc.push_str("<meta charset=\"no-such-encoding\"><p>filler</p>");
    }
    let mut scanner = MetaScanner::new(ScannerConfig::default());

    let guard = AllocGuard::new();
    let outcome = scanner.scan(&mut SliceSource::new(doc.as_bytes()), &mut |_: &str| false);
    let (allocs, _, reallocs) = alloc_counts();
    drop(guard);

    assert_eq!(outcome, ScanOutcome::Exhausted);
    let tried = scanner.stats().candidates_tried as usize;
    assert_eq!(tried, 1_000);
    assert_eq!((allocs, reallocs), (0, 0), "candidates={tried}");
}

#[test]
fn sniffer_stays_allocation_free_until_the_limit() {
    let doc = make_late_declaration(200, "utf-8");
    let mut sniffer = EncodingSniffer::new(SnifferConfig::default());

    let guard = AllocGuard::new();
    let result = sniffer.push_bytes(doc.as_bytes());
    let (allocs, _, reallocs) = alloc_counts();
    drop(guard);

    let SniffResult::Done(sniffed) = result else {
        panic!("limit should settle the sniffer");
    };
    assert_eq!(sniffed.source, html_prescan::CharsetSource::Default);
    assert_eq!((allocs, reallocs), (0, 0));
}
