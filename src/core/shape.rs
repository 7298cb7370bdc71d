//! Board geometry classifier.
//!
//! Recognizes named shapes in a partial board layout. Checks run in priority
//! order on a scratch copy of the occupancy; anchored shapes consume the cell
//! they are anchored on (or borrow) so later checks see the remainder.

use tracing::trace;

use crate::schema::board::{GridOccupancy, BOARD_COLUMNS, BOARD_ROWS};

/// Shapes that carry a centre anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchoredShape {
    Cross,
    L,
    Square,
}

/// One recognized board shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardShape {
    FourCorners,
    /// The outer ring of the board.
    Border,
    Seven,
    UpperLeftRectangle,
    Center,
    Diagonal,
    Crescent,
    ZShape,
    Anchored {
        shape: AnchoredShape,
        row: usize,
        column: u8,
    },
    /// A fully occupied row.
    Row(usize),
    /// A column occupied in every row.
    Column(u8),
}

type Scratch = [Vec<u8>; BOARD_ROWS];

/// Whole-board layouts recognized only by exact match.
const LITERAL_LAYOUTS: [(BoardShape, [&[u8]; BOARD_ROWS]); 6] = [
    (BoardShape::Seven, [&[3, 4, 5], &[3, 5], &[5], &[5], &[]]),
    (BoardShape::UpperLeftRectangle, [&[0, 1, 2], &[0, 1, 2], &[], &[], &[]]),
    (
        BoardShape::Center,
        [&[], &[1, 2, 3, 4], &[1, 2, 3, 4], &[1, 2, 3, 4], &[]],
    ),
    (
        BoardShape::Diagonal,
        [&[4, 5], &[3, 4], &[2, 3], &[1, 2], &[0, 1]],
    ),
    (
        BoardShape::Crescent,
        [&[2, 3, 4], &[1, 4, 5], &[5], &[1, 4, 5], &[2, 3, 4]],
    ),
    (
        BoardShape::ZShape,
        [&[0, 1, 2, 3, 4], &[3], &[2], &[1], &[0, 1, 2, 3, 4]],
    ),
];

/// Classify an occupancy into an ordered list of shapes.
///
/// Output order: four corners, border ring, literal layouts, anchored shapes
/// in detection order, then fallback rows and columns. The fallback only runs
/// when nothing else matched.
pub fn classify(grid: &GridOccupancy) -> Vec<BoardShape> {
    let mut board = grid.to_scratch();
    let total = grid.cell_count();

    let mut labels = Vec::new();
    let mut anchored = Vec::new();

    if total == 4 && board[0].len() == 2 && board[BOARD_ROWS - 1].len() == 2 {
        labels.push(BoardShape::FourCorners);
    }

    if total > 0 && total % 5 == 0 {
        find_crosses(&mut board, &mut anchored);
        find_ells(&mut board, &mut anchored);
    }

    if total > 0 && total % 9 == 0 {
        find_squares(&mut board, &mut anchored);
    }

    if total == 18 && is_border(&board) {
        labels.push(BoardShape::Border);
    }

    labels.extend(
        LITERAL_LAYOUTS
            .iter()
            .filter(|(_, layout)| matches_layout(grid, layout))
            .map(|(shape, _)| *shape),
    );

    labels.extend(anchored);

    if labels.is_empty() && total > 0 {
        labels.extend(fallback_lines(&board));
    }

    trace!(cells = total, shapes = labels.len(), "classified board");
    labels
}

fn find_crosses(board: &mut Scratch, out: &mut Vec<BoardShape>) {
    for row in 1..BOARD_ROWS - 1 {
        if board[row].len() == 3 && board[row - 1].len() == 1 && board[row + 1].len() == 1 {
            let column = board[row].remove(1);
            out.push(BoardShape::Anchored {
                shape: AnchoredShape::Cross,
                row,
                column,
            });
        }
    }
}

fn find_ells(board: &mut Scratch, out: &mut Vec<BoardShape>) {
    let middle = BOARD_ROWS / 2;
    for row in 0..BOARD_ROWS {
        if board[row].len() != 3 {
            continue;
        }
        let neighbour = if row < middle {
            row + 1
        } else if row > middle {
            row - 1
        } else if !board[row + 1].is_empty() {
            row + 1
        } else {
            row - 1
        };
        // An L needs a cell to borrow; a bare three-cell row is not one.
        if board[neighbour].is_empty() {
            continue;
        }
        let column = board[neighbour].remove(0);
        out.push(BoardShape::Anchored {
            shape: AnchoredShape::L,
            row,
            column,
        });
    }
}

fn find_squares(board: &mut Scratch, out: &mut Vec<BoardShape>) {
    for row in 1..BOARD_ROWS - 1 {
        if board[row].len() == 3 && board[row - 1].len() == 3 && board[row + 1].len() == 3 {
            let column = board[row].remove(1);
            out.push(BoardShape::Anchored {
                shape: AnchoredShape::Square,
                row,
                column,
            });
        }
    }
}

fn is_border(board: &Scratch) -> bool {
    let interior: usize = board[1..BOARD_ROWS - 1].iter().map(Vec::len).sum();
    board[0].len() == BOARD_COLUMNS && board[BOARD_ROWS - 1].len() == BOARD_COLUMNS && interior == 6
}

fn matches_layout(grid: &GridOccupancy, layout: &[&[u8]; BOARD_ROWS]) -> bool {
    grid.rows()
        .iter()
        .zip(layout.iter())
        .all(|(row, expected)| row.as_slice() == *expected)
}

fn fallback_lines(board: &Scratch) -> Vec<BoardShape> {
    let mut lines: Vec<BoardShape> = board
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() == BOARD_COLUMNS)
        .map(|(idx, _)| BoardShape::Row(idx))
        .collect();
    for column in 0..BOARD_COLUMNS as u8 {
        if board.iter().all(|row| row.contains(&column)) {
            lines.push(BoardShape::Column(column));
        }
    }
    lines
}
