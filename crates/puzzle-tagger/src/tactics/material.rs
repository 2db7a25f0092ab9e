/// Material-based detectors: sacrifice, exposed_king

use chess::{Color, File, Piece, Rank, Square};

use crate::board::BoardQuery;
use crate::board_utils::material_diff;
use crate::puzzle::Puzzle;

/// Sacrifice: solver is down at least two points against the starting
/// position after one of their later moves.
pub fn sacrifice<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let initial = match puzzle.start_board() {
        Some(board) => material_diff(board, puzzle.pov),
        None => return false,
    };

    // The first solver move is skipped: an immediate capture-back is not a sacrifice
    puzzle
        .solver_moves()
        .iter()
        .skip(1)
        .any(|node| material_diff(&node.board_after, puzzle.pov) - initial <= -2)
}

/// Exposed king: opponent's king stands high up the board without pawn
/// cover, and the solver checks it in the middle of the line.
pub fn exposed_king<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let board = match puzzle.start_board() {
        Some(board) => board,
        None => return false,
    };
    let defender = !puzzle.pov;
    let king_sq = board.king_square(defender);
    let king_rank = king_sq.get_rank().to_index();
    let king_file = king_sq.get_file().to_index();

    // Rank counted from the solver's side: the enemy king is still in its own back three ranks
    let relative_rank = match puzzle.pov {
        Color::White => king_rank,
        Color::Black => 7 - king_rank,
    };
    if relative_rank < 5 {
        return false;
    }

    // One rank toward the solver; exists since relative_rank >= 5
    let front_rank = match puzzle.pov {
        Color::White => king_rank - 1,
        Color::Black => king_rank + 1,
    };

    let mut shield = vec![(front_rank, king_file)];
    if king_file > 0 {
        shield.push((king_rank, king_file - 1));
        shield.push((front_rank, king_file - 1));
    }
    if king_file < 7 {
        shield.push((king_rank, king_file + 1));
        shield.push((front_rank, king_file + 1));
    }

    let has_pawn_cover = shield.into_iter().any(|(rank, file)| {
        let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
        board.piece_at(sq) == Some((Piece::Pawn, defender))
    });
    if has_pawn_cover {
        return false;
    }

    // Must have a check in solver moves (excluding first and last)
    let solver = puzzle.solver_moves();
    if solver.len() < 3 {
        return false;
    }
    solver[1..solver.len() - 1]
        .iter()
        .any(|node| node.board_after.is_check())
}
