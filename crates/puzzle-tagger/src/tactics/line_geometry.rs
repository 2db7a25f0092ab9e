/// Line geometry detectors: discovered_check, discovered_attack, skewer

use chess::EMPTY;

use crate::board::{between, contains, BoardQuery};
use crate::board_utils::{is_capture, is_ray_piece, king_value, moved_piece_type};
use crate::puzzle::Puzzle;

/// Discovered check: the checker is not the piece that moved
pub fn discovered_check<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    puzzle.solver_moves().into_iter().any(|node| {
        let checkers = node.board_after.checkers();
        checkers != EMPTY && !contains(checkers, node.chess_move.get_dest())
    })
}

/// Discovered attack (includes discovered check)
pub fn discovered_attack<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    if discovered_check(puzzle) {
        return true;
    }

    // Skip first solver move
    for node in puzzle.solver_moves().into_iter().skip(1) {
        if !is_capture(node) {
            continue;
        }

        let from = node.chess_move.get_source();
        let to = node.chess_move.get_dest();

        // A recapture on the opponent's square settles it
        let prev_op = &puzzle.mainline[node.ply - 1];
        if prev_op.chess_move.get_dest() == to {
            return false;
        }

        // The previous solver move opened the line
        let prev_solver = &puzzle.mainline[node.ply - 2];
        if contains(between(from, to), prev_solver.chess_move.get_source())
            && to != prev_solver.chess_move.get_dest()
        {
            return true;
        }
    }
    false
}

/// Skewer: a valuable piece steps off the line and the piece behind it falls
pub fn skewer<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let prev = &puzzle.mainline[node.ply - 1];
        let from = node.chess_move.get_source();
        let to = node.chess_move.get_dest();

        let captured = match prev.board_after.piece_type_at(to) {
            Some(p) => p,
            None => continue,
        };
        if !matches!(moved_piece_type(node), Some(p) if is_ray_piece(p)) {
            continue;
        }
        if node.board_after.is_checkmate() {
            continue;
        }

        // The opponent's piece must have stepped off the line, not onto the target
        let op_move = prev.chess_move;
        if op_move.get_dest() == to || !contains(between(from, to), op_move.get_source()) {
            continue;
        }

        if let Some(op_piece) = moved_piece_type(prev) {
            if king_value(op_piece) > king_value(captured) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::extraction::puzzle_from_uci;

    #[test]
    fn test_discovered_check() {
        // Knight e4 steps aside and the e1 rook gives check
        let puzzle = puzzle_from_uci(
            "disc1",
            "4k3/8/8/8/4N3/8/7r/4R1K1 b - - 0 1",
            "h2h7 e4c5 e8f8 c5d7",
        )
        .unwrap();
        assert!(discovered_check(&puzzle));
        assert!(discovered_attack(&puzzle));
        assert!(!skewer(&puzzle));
    }

    #[test]
    fn test_skewer_king_and_queen() {
        // Rook checks along the e-file, the king steps off, the queen behind falls
        let puzzle = puzzle_from_uci(
            "skew1",
            "4q3/p7/8/8/4k3/8/8/1R5K b - - 0 1",
            "a7a6 b1e1 e4d5 e1e8",
        )
        .unwrap();
        assert!(skewer(&puzzle));
        assert!(!discovered_attack(&puzzle));
    }
}
