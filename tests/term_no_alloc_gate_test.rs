use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use blockfall::core::{GameConfig, GameSession};
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::Command;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn term_game_view_render_is_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 40);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let mut session = GameSession::new(GameConfig::new(1).with_preview_len(3), None, 0).unwrap();
    let mut snap = session.snapshot();

    // Warm-up (initial clears).
    view.render_into(&snap, 0, viewport, &mut fb);

    let mut now = 0u64;
    let allocs = with_alloc_counting(|| {
        for i in 0..200 {
            now += 16;
            if i % 20 == 0 && !session.game_over() {
                session.apply(Command::HardDrop, now);
            }
            let _ = session.tick(now);
            session.snapshot_into(&mut snap);
            view.render_into(&snap, now, viewport, &mut fb);
        }
    });

    assert!(allocs == 0);
}
