//! Frame encoding tests - locked pieces reach the terminal byte stream
//!
//! Renders session snapshots into framebuffers and checks what the diff
//! encoder would send to the terminal.

use blockfall::core::{Board, GameConfig, GameSession};
use blockfall::term::{encode_diff_into, encode_full_into, FrameBuffer, GameView, Viewport};
use blockfall::types::Command;

const VIEWPORT: Viewport = Viewport {
    width: 32,
    height: 33,
};

fn blocks(fb: &FrameBuffer) -> usize {
    fb.cells().iter().filter(|c| c.ch == '█').count()
}

#[test]
fn test_locked_pieces_rendered_on_first_frame() {
    let board = Board::from_text(&[
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "..1............",
        ".111...22......",
        "4444...22......",
    ]);
    let mut snap = GameSession::with_board(GameConfig::new(1), board, None, 0)
        .unwrap()
        .snapshot();
    snap.active = None;
    snap.ghost_y = None;

    let fb = GameView::default().render(&snap, 0, VIEWPORT);
    // 12 locked cells, two columns each.
    assert_eq!(blocks(&fb), 24);

    let mut out = Vec::new();
    encode_full_into(&fb, &mut out).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert_eq!(text.matches('█').count(), 24);
}

#[test]
fn test_lock_shows_up_in_next_diff() {
    let mut session = GameSession::new(GameConfig::new(3), None, 0).unwrap();
    let view = GameView::default();

    let before = view.render(&session.snapshot(), 0, VIEWPORT);
    session.apply(Command::HardDrop, 0);
    let after = view.render(&session.snapshot(), 0, VIEWPORT);

    assert_ne!(before, after);
    let bottom = after.row_text(VIEWPORT.height - 2);
    assert!(bottom.contains('█'), "bottom row: {}", bottom);

    let mut out = Vec::new();
    encode_diff_into(&before, &after, &mut out).unwrap();
    assert!(String::from_utf8_lossy(&out).contains('█'));
}

#[test]
fn test_unchanged_frames_send_nothing() {
    let session = GameSession::new(GameConfig::new(3), None, 0).unwrap();
    let view = GameView::default();
    let snap = session.snapshot();

    let a = view.render(&snap, 0, VIEWPORT);
    let b = view.render(&snap, 16, VIEWPORT);

    let mut out = Vec::new();
    encode_diff_into(&a, &b, &mut out).unwrap();
    assert!(out.is_empty());
}
