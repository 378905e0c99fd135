//! Terminal rendering of target and secret boards.

use commitboard::{
    board::{BoardLayout, Coordinate, EMPTY_MARKER},
    view::{RevealedCell, TargetGrid},
};

/// Marker printed on the cell of a shot still awaiting its reveal.
const PENDING: char = '*';

/// Print the viewer's target board: reveal annotations plus the pending
/// marker when the viewer's own shot has not been answered yet.
pub fn print_target_board(board: &TargetGrid, pending: Option<Coordinate>) {
    print_grid(board.size(), |coord| {
        if pending == Some(coord) {
            PENDING
        } else {
            match board.revealed(coord) {
                RevealedCell::Unknown => ' ',
                RevealedCell::Miss => '.',
                RevealedCell::Hit => 'X',
            }
        }
    });
}

/// Print the viewer's secret board: ship symbols plus the pending marker
/// when the opponent's shot is still waiting for this player's reveal.
pub fn print_secret_board(layout: &BoardLayout, pending: Option<Coordinate>) {
    print_grid(layout.size(), |coord| {
        if pending == Some(coord) {
            PENDING
        } else {
            match layout.get(coord).map(|cell| cell.symbol()) {
                Some(symbol) if symbol != EMPTY_MARKER => symbol,
                _ => ' ',
            }
        }
    });
}

/// Shared frame: 1-based column numbers across the top, letter row labels
/// down the side.
fn print_grid(size: usize, symbol_at: impl Fn(Coordinate) -> char) {
    print!("   ");
    for col in 0..size {
        print!("{:>3}", col + 1);
    }
    println!();
    for row in 0..size {
        print!("{:>2} ", (b'A' + row as u8) as char);
        for col in 0..size {
            print!("  {}", symbol_at(Coordinate::new(row, col)));
        }
        println!();
    }
}
