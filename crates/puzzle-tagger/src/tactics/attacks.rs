/// Attack-based detectors: fork, hanging_piece, trapped_piece, capturing_defender

use chess::Piece;

use crate::board::{contains, BoardQuery};
use crate::board_utils::{
    attacked_opponent_squares, is_capture, is_hanging, is_trapped, king_value, material_diff,
    moved_piece_type, piece_value,
};
use crate::puzzle::Puzzle;

/// Fork: a piece attacks two or more pieces that are worth more than it,
/// are the king, or are hanging
pub fn fork<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let mut solver_moves = puzzle.solver_moves();

    // A fork on the final move is irrelevant, the puzzle is already decided
    solver_moves.pop();

    for node in solver_moves {
        let moved_piece = match moved_piece_type(node) {
            Some(Piece::King) | None => continue,
            Some(p) => p,
        };

        let board = &node.board_after;
        // A mating attack is not a fork; the first one settles the whole line
        if board.is_checkmate() {
            return false;
        }

        let fork_count = attacked_opponent_squares(board, node.chess_move.get_dest(), puzzle.pov)
            .into_iter()
            .filter(|&(piece, square)| {
                piece != Piece::Pawn
                    && (piece == Piece::King
                        || king_value(piece) > king_value(moved_piece)
                        || is_hanging(board, !puzzle.pov, square))
            })
            .count();
        if fork_count > 1 {
            return true;
        }
    }
    false
}

/// Hanging piece: the first solver move captures a piece that the opponent
/// left undefended with a quiet setup move
pub fn hanging_piece<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let (setup, first_solver) = match (puzzle.mainline.first(), puzzle.mainline.get(1)) {
        (Some(setup), Some(first)) => (setup, first),
        _ => return false,
    };

    // Recaptures and check escapes are not hanging pieces
    if is_capture(setup) || setup.board_after.is_check() {
        return false;
    }

    let to_sq = first_solver.chess_move.get_dest();
    let board = &setup.board_after;
    let captured_color = match board.piece_at(to_sq) {
        Some((Piece::Pawn, _)) | None => return false,
        Some((_, color)) => color,
    };

    if !is_hanging(board, captured_color, to_sq) {
        return false;
    }

    // The material won must survive the opponent's reply and the next solver move
    match puzzle.mainline.get(3) {
        None => true,
        Some(later) => {
            material_diff(&later.board_after, puzzle.pov)
                >= material_diff(&first_solver.board_after, puzzle.pov)
        }
    }
}

/// Trapped piece: a piece that could not escape is eventually captured
pub fn trapped_piece<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    // Skip first solver move, check subsequent ones
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let mut square = node.chess_move.get_dest();
        match node.board_before.piece_type_at(square) {
            Some(Piece::Pawn) | None => continue,
            Some(_) => {}
        }

        // If the opponent just moved to this square, look where it came from
        let prev = &puzzle.mainline[node.ply - 1];
        if prev.chess_move.get_dest() == square {
            square = prev.chess_move.get_source();
        }

        // Was the piece trapped in the position before the opponent moved?
        if is_trapped(&puzzle.mainline[node.ply - 2].board_after, square) {
            return true;
        }
    }
    false
}

/// Capturing defender: the solver removes a defender, then wins the piece
/// it was guarding
pub fn capturing_defender<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let board = &node.board_after;
        let to_sq = node.chess_move.get_dest();

        let wins_hanging_piece = match (node.board_before.piece_at(to_sq), moved_piece_type(node)) {
            (Some((captured, color)), Some(mover)) => {
                mover != Piece::King
                    && piece_value(captured) <= piece_value(mover)
                    && is_hanging(&node.board_before, color, to_sq)
            }
            _ => false,
        };
        if !board.is_checkmate() && !wins_hanging_piece {
            continue;
        }

        let prev = &puzzle.mainline[node.ply - 2];
        if prev.board_after.is_check() || prev.chess_move.get_dest() == node.chess_move.get_source() {
            continue;
        }

        // The piece the solver captured on the previous move was guarding this square
        let init_board = &puzzle.mainline[node.ply - 3].board_after;
        let defender_square = prev.chess_move.get_dest();
        if let Some((_, defender_color)) = init_board.piece_at(defender_square) {
            if contains(init_board.attackers(defender_color, to_sq), defender_square)
                && !init_board.is_check()
            {
                return true;
            }
        }
    }
    false
}
