//! Field tests - collision, landing, row deletion, fading

use dumblox::core::{Field, Piece, Tetromino};
use dumblox::types::{BlockKind, GridCoord, GRID_COLUMNS, GRID_ROWS};

fn fill(field: &mut Field, col: i16, row: i16) {
    field.set(col, row, Some(Piece::new(GridCoord::new(col, row), BlockKind::L)));
}

fn fill_row_except(field: &mut Field, row: i16, holes: &[i16]) {
    for col in 0..field.columns() as i16 {
        if !holes.contains(&col) {
            fill(field, col, row);
        }
    }
}

#[test]
fn test_field_new_empty() {
    let field = Field::default();
    assert_eq!(field.rows(), GRID_ROWS);
    assert_eq!(field.columns(), GRID_COLUMNS);
    assert_eq!(field.occupied_count(), 0);
    assert!(!field.is_game_over());

    for row in 0..GRID_ROWS as i16 {
        for col in 0..GRID_COLUMNS as i16 {
            assert!(field.get(col, row).is_none());
        }
    }
}

#[test]
fn test_field_get_out_of_bounds() {
    let mut field = Field::default();
    fill(&mut field, 0, 0);

    assert!(field.get(-1, 0).is_none());
    assert!(field.get(0, -1).is_none());
    assert!(field.get(GRID_COLUMNS as i16, 0).is_none());
    assert!(field.get(0, GRID_ROWS as i16).is_none());
    assert!(!field.set(-1, 3, None));
}

#[test]
fn test_collides_walls_floor_and_pile() {
    let mut field = Field::default();

    // Horizontal I at column 5: cells 3..=6
    let inside = Tetromino::new(BlockKind::I, GridCoord::new(5, 10));
    assert!(!field.collides(&inside));

    let left = Tetromino::new(BlockKind::I, GridCoord::new(1, 10));
    assert!(field.collides(&left));

    let right = Tetromino::new(BlockKind::I, GridCoord::new(9, 10));
    assert!(field.collides(&right));

    let below = Tetromino::new(BlockKind::I, GridCoord::new(5, GRID_ROWS as i16));
    assert!(field.collides(&below));

    fill(&mut field, 6, 10);
    assert!(field.collides(&inside));
}

#[test]
fn test_cells_above_grid_ignore_pile() {
    let mut field = Field::default();
    fill_row_except(&mut field, 0, &[]);

    // Entirely above row 0: only the side walls matter.
    let above = Tetromino::new(BlockKind::I, GridCoord::new(5, -1));
    assert!(!field.collides(&above));

    let above_wall = Tetromino::new(BlockKind::I, GridCoord::new(0, -1));
    assert!(field.collides(&above_wall));
}

#[test]
fn test_single_hole_completes_only_that_row() {
    let mut field = Field::default();
    fill_row_except(&mut field, 19, &[4, 5]);
    fill_row_except(&mut field, 18, &[0, 1, 2, 3, 4, 5]);

    // O with pivot at (4, 18) covers (4,18) (5,18) (4,19) (5,19)
    let o = Tetromino::new(BlockKind::O, GridCoord::new(4, 18));
    assert!(!field.collides(&o));

    let completed = field.merge_landed(&o);
    assert_eq!(completed.as_slice(), &[19]);
    assert!(field.is_row_complete(19));
    assert!(!field.is_row_complete(18));
}

#[test]
fn test_merge_reports_rows_ascending() {
    let mut field = Field::default();
    for row in 16..20 {
        fill_row_except(&mut field, row, &[0]);
    }

    let mut i = Tetromino::new(BlockKind::I, GridCoord::new(5, 0));
    assert!(i.try_rotate(&field, dumblox::types::RotateDirection::Clockwise));
    while i.try_move(&field, dumblox::types::Direction::Left) {}
    i.drop_to_bottom(&field);

    let completed = field.merge_landed(&i);
    assert_eq!(completed.as_slice(), &[16, 17, 18, 19]);
}

#[test]
fn test_delete_single_mid_row() {
    let mut field = Field::default();
    fill(&mut field, 2, 5);
    fill(&mut field, 7, 8);
    fill_row_except(&mut field, 10, &[]);
    fill(&mut field, 3, 15);

    field.delete_rows(&[10]);

    // Above: shifted down one row
    assert!(field.get(2, 6).is_some());
    assert!(field.get(2, 5).is_none());
    assert!(field.get(7, 9).is_some());
    // The deleted row now holds what was above it
    assert_eq!(
        (0..10).filter(|&c| field.get(c, 10).is_some()).count(),
        0
    );
    // Below: unchanged
    assert!(field.get(3, 15).is_some());
    assert_eq!(field.occupied_count(), 3);
}

#[test]
fn test_delete_non_adjacent_rows() {
    let mut field = Field::default();
    fill_row_except(&mut field, 19, &[]);
    fill(&mut field, 1, 18);
    fill_row_except(&mut field, 17, &[]);
    fill(&mut field, 8, 16);

    field.delete_rows(&[19, 17]);

    assert_eq!(field.occupied_count(), 2);
    assert_eq!(field.get(1, 19).map(|p| p.coord), Some(GridCoord::new(1, 19)));
    assert_eq!(field.get(8, 18).map(|p| p.coord), Some(GridCoord::new(8, 18)));
}

#[test]
fn test_set_opacity_only_touches_given_rows() {
    let mut field = Field::default();
    fill(&mut field, 0, 3);
    fill(&mut field, 0, 4);

    field.set_opacity(&[3, 99], 0.25);

    assert_eq!(field.get(0, 3).map(Piece::opacity), Some(0.25));
    assert_eq!(field.get(0, 4).map(Piece::opacity), Some(1.0));
}

#[test]
fn test_row_zero_landing_on_pile_is_game_over() {
    let mut field = Field::default();
    fill(&mut field, 5, 0);

    let t = Tetromino::new(BlockKind::T, GridCoord::new(5, 0));
    field.merge_landed(&t);
    assert!(field.is_game_over());

    // Sticky through later operations
    field.delete_rows(&[0, 1]);
    field.set_opacity(&[0], 0.0);
    assert!(field.is_game_over());

    field.clear();
    assert!(!field.is_game_over());
    assert_eq!(field.occupied_count(), 0);
}

#[test]
fn test_landing_above_grid_is_game_over() {
    let mut field = Field::default();
    let mut i = Tetromino::new(BlockKind::I, GridCoord::new(5, 0));
    assert!(i.try_rotate(&field, dumblox::types::RotateDirection::Clockwise));

    // Vertical I with its top two cells at rows -2 and -1
    let completed = field.merge_landed(&i);
    assert!(completed.is_empty());
    assert!(field.is_game_over());
    assert_eq!(field.occupied_count(), 2);
}
