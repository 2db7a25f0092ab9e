/// Pin detector

use crate::board::{contains, BoardQuery};
use crate::board_utils::{is_hanging, king_value};
use crate::puzzle::Puzzle;

/// Pin: a pinned opponent piece attacks a solver piece off its pin line
/// that it could otherwise win
pub fn pin<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let mut solver_moves = puzzle.solver_moves();
    solver_moves.pop();

    for node in solver_moves {
        let board = &node.board_after;

        for sq in board.occupied() {
            let (piece, color) = match board.piece_at(sq) {
                Some(pc) => pc,
                None => continue,
            };
            if color == puzzle.pov {
                continue;
            }

            if !board.is_pinned(color, sq) {
                continue;
            }
            let pin_dir = board.pin_ray(color, sq);

            for atk_sq in board.attacks(sq) {
                if let Some((attacked, attacked_color)) = board.piece_at(atk_sq) {
                    if attacked_color == puzzle.pov
                        && !contains(pin_dir, atk_sq)
                        && (king_value(attacked) > king_value(piece)
                            || is_hanging(board, attacked_color, atk_sq))
                    {
                        return true;
                    }
                }
            }
        }
    }
    false
}
