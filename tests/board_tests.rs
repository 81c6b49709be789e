//! Board tests - collision, placement and row clearing

use blockfall::core::{canonical, Board, Shape};
use blockfall::types::{ShapeId, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, EMPTY};

fn fill_row(board: &mut Board, y: i16, color: u8) {
    for x in 0..board.width() as i16 {
        board.set(x, y, color);
    }
}

#[test]
fn test_board_default_is_empty_15_by_31() {
    let board = Board::default();
    assert_eq!(board.width(), DEFAULT_GRID_WIDTH);
    assert_eq!(board.height(), DEFAULT_GRID_HEIGHT);
    assert_eq!((board.width(), board.height()), (15, 31));
    assert!(board.cells().iter().all(|&c| c == EMPTY));
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::default();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(15, 0), None);
    assert_eq!(board.get(0, 31), None);
    assert_eq!(board.get(14, 30), Some(EMPTY));
}

#[test]
fn test_board_set_rejects_out_of_bounds_and_bad_colors() {
    let mut board = Board::default();

    assert!(!board.set(-1, 0, 1));
    assert!(!board.set(0, 31, 1));
    assert!(!board.set(0, 0, 8));
    assert!(board.set(0, 0, 7));
    assert!(board.is_occupied(0, 0));
}

#[test]
fn test_cells_above_the_grid_never_collide() {
    let board = Board::default();
    let i = canonical(ShapeId::I).rotate_cw();

    // Vertical I poking three rows above the top.
    assert!(board.is_valid_position(&i, 5, -3));
    // But columns are still checked up there.
    assert!(!board.is_valid_position(&i, -1, -3));
    assert!(!board.is_valid_position(&i, 15, -3));
}

#[test]
fn test_position_is_contained_and_free() {
    let mut board = Board::default();
    let o = canonical(ShapeId::O);

    assert!(board.is_valid_position(&o, 0, 0));
    assert!(board.is_valid_position(&o, 13, 29));
    assert!(!board.is_valid_position(&o, 14, 29));
    assert!(!board.is_valid_position(&o, 13, 30));

    board.set(4, 6, 3);
    assert!(!board.is_valid_position(&o, 3, 5));
    assert!(board.is_valid_position(&o, 5, 5));
}

#[test]
fn test_single_cell_fits_bottom_right_corner() {
    let board = Board::default();
    let dot = Shape::from_rows(&[&[1]]).unwrap();

    assert!(board.is_valid_position(&dot, 14, 30));
    assert!(!board.is_valid_position(&dot, 15, 30));
    assert!(!board.is_valid_position(&dot, 14, 31));
}

#[test]
fn test_single_cell_completes_bottom_row() {
    let mut board = Board::default();
    let dot = Shape::from_rows(&[&[1]]).unwrap();
    for x in 0..14 {
        board.set(x, 30, 1);
    }
    board.set(3, 29, 4);
    assert!(!board.is_row_full(30));

    assert_eq!(board.place(&dot, 14, 30, 2), 1);
    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[30]);

    // Row 29 moved down into row 30; nothing else is left.
    let mut expected = [EMPTY; 15];
    expected[3] = 4;
    assert_eq!(board.row(30), Some(&expected[..]));
    assert_eq!(board.get(3, 30), Some(4));
    assert_eq!(board.row(29), Some(&[EMPTY; 15][..]));
    assert_eq!(board.row(0), Some(&[EMPTY; 15][..]));
    assert_eq!(board.cells().iter().filter(|&&c| c != EMPTY).count(), 1);
}

#[test]
fn test_place_writes_color_and_skips_cells_above_grid() {
    let mut board = Board::default();
    let i = canonical(ShapeId::I).rotate_cw();

    let written = board.place(&i, 2, -2, 5);
    assert_eq!(written, 2);
    assert_eq!(board.get(2, 0), Some(5));
    assert_eq!(board.get(2, 1), Some(5));
    assert_eq!(board.get(2, 2), Some(EMPTY));
}

#[test]
fn test_clear_non_adjacent_rows_keeps_order() {
    let mut board = Board::new(6, 8);

    fill_row(&mut board, 2, 1);
    fill_row(&mut board, 5, 1);
    board.set(0, 1, 2);
    board.set(1, 3, 3);
    board.set(2, 4, 4);
    board.set(3, 6, 5);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[2, 5]);

    // Row 6 sits below both cleared rows and does not move.
    assert_eq!(board.get(3, 6), Some(5));
    // Rows 3 and 4 were between the cleared rows: down by one.
    assert_eq!(board.get(1, 4), Some(3));
    assert_eq!(board.get(2, 5), Some(4));
    // Row 1 was above both: down by two.
    assert_eq!(board.get(0, 3), Some(2));

    for y in 0..2 {
        assert_eq!(board.row(y), Some(&[EMPTY; 6][..]));
    }
    assert!(!(0..8).any(|y| board.is_row_full(y)));
}

#[test]
fn test_clear_full_rows_on_tall_stack() {
    let mut board = Board::default();
    for y in 27..31 {
        fill_row(&mut board, y, 1);
    }
    board.set(7, 26, 6);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 4);
    assert_eq!(board.get(7, 30), Some(6));
    assert_eq!(board.cells().iter().filter(|&&c| c != EMPTY).count(), 1);
}

#[test]
fn test_clear_with_no_full_rows_changes_nothing() {
    let mut board = Board::from_text(&["....", ".1..", "11.1", "2222"]);
    board.set(3, 3, EMPTY);
    let before = board.clone();

    assert!(board.clear_full_rows().is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_game_over_is_spawn_validity() {
    let mut board = Board::default();
    let t = canonical(ShapeId::T);

    assert!(!board.is_game_over(&t, 6, 0));
    board.set(7, 1, 1);
    assert!(board.is_game_over(&t, 6, 0));
    // Top row is still empty; only the spawn check says game over.
    assert!(!board.is_top_row_occupied());
}

#[test]
fn test_danger_zone_is_top_four_rows() {
    let mut board = Board::default();
    board.set(0, 4, 1);
    assert!(!board.is_danger_zone());
    board.set(0, 3, 1);
    assert!(board.is_danger_zone());
}

#[test]
fn test_from_text_reads_colors() {
    let board = Board::from_text(&["..3", "x.."]);
    assert_eq!((board.width(), board.height()), (3, 2));
    assert_eq!(board.get(2, 0), Some(3));
    assert_eq!(board.get(0, 1), Some(1));
    assert_eq!(board.get(1, 1), Some(EMPTY));
}
